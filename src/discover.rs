//! Migration file discovery
//!
//! Lists a directory of migration files, sorts them by natural order (digit
//! runs compared numerically, so `file_2` precedes `file_10`), and
//! fingerprints each one. Every call re-reads the directory and re-hashes
//! every file; nothing is memoized across runs.

use crate::error::MigrateError;
use crate::fingerprint::fingerprint_file;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A discovered migration file, immutable once built.
///
/// Content is read exactly once, at discovery time: the same bytes are hashed
/// and retained for execution, so the fingerprint always matches what runs.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    /// File name; the sort and display key, unique within the ledger.
    pub name: String,

    /// Full path, for diagnostics.
    pub path: PathBuf,

    /// Lowercase hex SHA-256 of the file contents.
    pub fingerprint: String,

    /// The file contents, executed as one statement batch on apply.
    pub sql: String,
}

/// List, order, and fingerprint the migration files under `location`.
///
/// Non-file entries (subdirectories, sockets, ...) are excluded. Names are
/// sorted naturally before fingerprinting so the returned sequence is the
/// application order.
pub fn discover(location: &Path) -> Result<Vec<MigrationFile>, MigrateError> {
    let entries = std::fs::read_dir(location).map_err(|e| MigrateError::Discovery {
        path: location.to_path_buf(),
        source: e,
    })?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MigrateError::Discovery {
            path: location.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    names.sort_by(|a, b| natural_cmp(a, b));

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let path = location.join(&name);
        let (digest, sql) = fingerprint_file(&path)?;
        files.push(MigrationFile {
            name,
            path,
            fingerprint: digest,
            sql,
        });
    }

    Ok(files)
}

/// Natural string comparison: digit runs compare by numeric value, everything
/// else byte-wise. Leading zeros lose a full-string lexical tie-break, which
/// keeps the ordering total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ab = a.as_bytes();
    let bb = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            // Compare stripped digit runs by length, then lexically. This is
            // numeric comparison without overflow on arbitrarily long runs.
            let da = a[si..i].trim_start_matches('0');
            let db = b[sj..j].trim_start_matches('0');
            let ord = da.len().cmp(&db.len()).then_with(|| da.cmp(db));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (ab.len() - i)
        .cmp(&(bb.len() - j))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;

    #[test]
    fn test_natural_cmp_numeric_runs() {
        assert_eq!(natural_cmp("file_2", "file_10"), Ordering::Less);
        assert_eq!(natural_cmp("file_10", "file_2"), Ordering::Greater);
        assert_eq!(natural_cmp("v2_x", "v10_x"), Ordering::Less);
    }

    #[test]
    fn test_natural_cmp_plain_strings() {
        assert_eq!(natural_cmp("alpha", "beta"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_natural_cmp_leading_zeros() {
        // Equal numeric value falls back to lexical order
        assert_eq!(natural_cmp("file_01", "file_1"), Ordering::Less);
        assert_eq!(natural_cmp("file_02", "file_10"), Ordering::Less);
    }

    #[test]
    fn test_natural_cmp_mixed_segments() {
        assert_eq!(natural_cmp("v1_b", "v1_c"), Ordering::Less);
        assert_eq!(natural_cmp("v1", "v1_extra"), Ordering::Less);
        assert_eq!(natural_cmp("9_file", "10_file"), Ordering::Less);
    }

    #[test]
    fn test_natural_cmp_long_digit_runs_no_overflow() {
        let small = "f_99999999999999999999";
        let big = "f_100000000000000000000";
        assert_eq!(natural_cmp(small, big), Ordering::Less);
    }

    #[test]
    fn test_discover_natural_order() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for name in ["file_2", "file_10", "file_1"] {
            fs::write(dir.path().join(name), format!("-- {name}")).expect("write");
        }

        let files = discover(dir.path()).expect("Failed to discover");
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["file_1", "file_2", "file_10"]);
    }

    #[test]
    fn test_discover_excludes_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("v1.sql"), "SELECT 1;").expect("write");
        fs::create_dir(dir.path().join("archive")).expect("mkdir");

        let files = discover(dir.path()).expect("Failed to discover");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "v1.sql");
    }

    #[test]
    fn test_discover_fingerprints_and_content() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("v1.sql"), "CREATE TABLE t (id int);").expect("write");

        let files = discover(dir.path()).expect("Failed to discover");
        assert_eq!(files[0].sql, "CREATE TABLE t (id int);");
        assert_eq!(
            files[0].fingerprint,
            crate::fingerprint::fingerprint(b"CREATE TABLE t (id int);")
        );
    }

    #[test]
    fn test_discover_missing_location() {
        let result = discover(Path::new("/nonexistent/migrations"));
        match result {
            Err(MigrateError::Discovery { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/migrations"));
            }
            other => panic!("Expected MigrateError::Discovery, got: {:?}", other),
        }
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let files = discover(dir.path()).expect("Failed to discover");
        assert!(files.is_empty());
    }

    proptest! {
        #[test]
        fn prop_numeric_suffixes_order_by_value(a in 0u64..100_000, b in 0u64..100_000) {
            let fa = format!("file_{a}");
            let fb = format!("file_{b}");
            prop_assert_eq!(natural_cmp(&fa, &fb), a.cmp(&b));
        }

        #[test]
        fn prop_reflexive_and_antisymmetric(s in "[a-z0-9_]{0,12}", t in "[a-z0-9_]{0,12}") {
            prop_assert_eq!(natural_cmp(&s, &s), Ordering::Equal);
            prop_assert_eq!(natural_cmp(&s, &t), natural_cmp(&t, &s).reverse());
        }

        #[test]
        fn prop_equal_only_for_identical(s in "[a-z0-9_]{0,12}", t in "[a-z0-9_]{0,12}") {
            if natural_cmp(&s, &t) == Ordering::Equal {
                prop_assert_eq!(&s, &t);
            }
        }
    }
}
