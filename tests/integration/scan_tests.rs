use dupescan::duplicates::{DuplicateFinder, FinderConfig, ReportMode};
use dupescan::scanner::{HashAlgorithm, WalkerConfig, WindowPolicy};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, name: &str, content: &[u8]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.hash_duplicates.is_empty());
    assert!(report.unique.is_empty());
    assert_eq!(report.summary.files, 0);
    assert_eq!(report.summary.directories, 1);
}

#[test]
fn test_scan_same_length_two_contents() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"aaaaaaaaaa");
    write(dir.path(), "b", b"bbbbbbbbbb");
    write(dir.path(), "c", b"aaaaaaaaaa");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.hash_duplicates.len(), 1);
    assert_eq!(report.hash_duplicates[0].path, dir.path().join("c"));
    assert_eq!(report.hash_duplicates[0].original, dir.path().join("a"));
    assert_eq!(
        report.size_duplicates,
        vec![dir.path().join("b"), dir.path().join("c")]
    );
    assert!(report.unique.is_empty());
    assert_eq!(
        report.retained,
        vec![dir.path().join("a"), dir.path().join("b")]
    );
}

#[test]
fn test_scan_distinct_lengths_reads_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "five", b"12345");
    write(dir.path(), "seven", b"1234567");
    write(dir.path(), "nine", b"123456789");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.summary.fingerprints_computed, 0);
    assert_eq!(report.summary.bytes_read, 0);
    assert_eq!(report.unique.len(), 3);
    assert!(report.size_duplicates.is_empty());
    assert!(report.hash_duplicates.is_empty());
}

#[test]
fn test_scan_pre_order_visit() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/inner.txt", b"same");
    write(dir.path(), "b.txt", b"same");
    write(dir.path(), "a/z/deep.txt", b"same");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // a/inner.txt, a/z/deep.txt, b.txt
    let paths = report.duplicate_paths();
    assert_eq!(
        paths,
        vec![
            dir.path().join("a/z/deep.txt").as_path(),
            dir.path().join("b.txt").as_path()
        ]
    );
    assert!(report
        .hash_duplicates
        .iter()
        .all(|d| d.original == dir.path().join("a/inner.txt")));
}

#[test]
fn test_scan_whole_file_window_rejects_shared_prefix() {
    let dir = tempdir().unwrap();
    let mut first = vec![b'x'; 8192];
    let mut second = first.clone();
    first[8000] = b'1';
    second[8000] = b'2';
    write(dir.path(), "first.bin", &first);
    write(dir.path(), "second.bin", &second);

    let prefix = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(prefix.hash_duplicates.len(), 1);

    let whole = DuplicateFinder::new(FinderConfig::default().with_window(WindowPolicy::WholeFile))
        .find_duplicates(dir.path())
        .unwrap();
    assert!(whole.hash_duplicates.is_empty());
    assert_eq!(whole.size_duplicates.len(), 1);
}

#[test]
fn test_scan_suffix_window_sees_trailing_bytes() {
    let dir = tempdir().unwrap();
    let mut first = vec![b'x'; 10_000];
    let mut second = first.clone();
    first[9_999] = b'1';
    second[9_999] = b'2';
    write(dir.path(), "first.bin", &first);
    write(dir.path(), "second.bin", &second);

    let config = FinderConfig::default().with_window(WindowPolicy::Suffix(16));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.hash_duplicates.is_empty());
    assert_eq!(report.summary.bytes_read, 32);
}

#[test]
fn test_scan_identical_files_match_under_every_policy() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
    write(dir.path(), "one.bin", &content);
    write(dir.path(), "two.bin", &content);

    for window in [
        WindowPolicy::Prefix(4096),
        WindowPolicy::Suffix(4096),
        WindowPolicy::Proportional(10),
        WindowPolicy::WholeFile,
    ] {
        for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
            let config = FinderConfig::default()
                .with_window(window)
                .with_algorithm(algorithm);
            let report = DuplicateFinder::new(config)
                .find_duplicates(dir.path())
                .unwrap();
            assert_eq!(report.hash_duplicates.len(), 1, "{window} / {algorithm}");
        }
    }
}

#[test]
fn test_scan_candidates_mode() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"1111");
    write(dir.path(), "b", b"2222");
    write(dir.path(), "c", b"1111");
    write(dir.path(), "d", b"unique length");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        report.paths(ReportMode::Candidates),
        vec![
            dir.path().join("b").as_path(),
            dir.path().join("c").as_path()
        ]
    );
    assert_eq!(
        report.paths(ReportMode::Unique),
        vec![dir.path().join("d").as_path()]
    );
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    write(dir.path(), "visible.txt", b"content");
    write(dir.path(), ".hidden.txt", b"content");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, None));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.summary.files, 1);
    assert!(report.hash_duplicates.is_empty());
}

#[test]
fn test_scan_summary_counts() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/1.txt", b"abc");
    write(dir.path(), "x/2.txt", b"abc");
    write(dir.path(), "y/3.txt", b"abcd");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let summary = &report.summary;
    assert_eq!(summary.files, 3);
    assert_eq!(summary.directories, 3);
    assert_eq!(summary.classified, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.distinct_sizes, 2);
    assert_eq!(summary.unique_files, 1);
    assert_eq!(summary.size_duplicates, 1);
    assert_eq!(summary.hash_duplicates, 1);
    assert_eq!(summary.reclaimable_bytes, 3);
    assert_eq!(summary.fingerprints_computed, 2);
    assert_eq!(summary.bytes_read, 6);
}
