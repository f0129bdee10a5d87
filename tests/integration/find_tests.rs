use dupescan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupescan::scanner::WindowPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_find_copies_outside_haystack() {
    let needle_dir = tempdir().unwrap();
    let hay = tempdir().unwrap();
    let needle = write(needle_dir.path(), "invoice.pdf", b"%PDF-1.4 invoice body");
    let first = write(hay.path(), "2023/invoice.pdf", b"%PDF-1.4 invoice body");
    let second = write(hay.path(), "backup/renamed.pdf", b"%PDF-1.4 invoice body");
    write(hay.path(), "other.pdf", b"%PDF-1.4 another body");

    let search = DuplicateFinder::with_defaults()
        .find_copies(&needle, hay.path())
        .unwrap();

    assert_eq!(search.matches, vec![first, second]);
    assert_eq!(search.stats.files, 3);
    assert!(search.errors.is_empty());
}

#[test]
fn test_find_copies_excludes_needle_inside_haystack() {
    let hay = tempdir().unwrap();
    let needle = write(hay.path(), "needle.txt", b"hello");

    let search = DuplicateFinder::with_defaults()
        .find_copies(&needle, hay.path())
        .unwrap();

    assert!(search.matches.is_empty());
    assert_eq!(search.stats.files, 1);
}

#[test]
fn test_find_copies_respects_window() {
    let hay = tempdir().unwrap();
    let needle = write(hay.path(), "a.bin", b"HEADERpayload-one");
    write(hay.path(), "b.bin", b"HEADERpayload-two");

    let prefix = DuplicateFinder::new(FinderConfig::default().with_window(WindowPolicy::Prefix(6)))
        .find_copies(&needle, hay.path())
        .unwrap();
    assert_eq!(prefix.matches.len(), 1);

    let whole = DuplicateFinder::new(FinderConfig::default().with_window(WindowPolicy::WholeFile))
        .find_copies(&needle, hay.path())
        .unwrap();
    assert!(whole.matches.is_empty());
}

#[test]
fn test_find_copies_bad_haystack() {
    let dir = tempdir().unwrap();
    let needle = write(dir.path(), "n.txt", b"x");

    let err = DuplicateFinder::with_defaults()
        .find_copies(&needle, &dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, FinderError::PathNotFound(_)));

    let err = DuplicateFinder::with_defaults()
        .find_copies(&needle, &needle)
        .unwrap_err();
    assert!(matches!(err, FinderError::NotADirectory(_)));
    assert!(err.is_invalid_input());
}
