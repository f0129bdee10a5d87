use dupescan::actions::copy_batch;
use dupescan::duplicates::DuplicateFinder;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, name: &str, content: &[u8]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_copy_unique_files_preserves_layout() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(src.path(), "docs/readme.txt", b"read me");
    write(src.path(), "docs/deep/notes.md", b"some longer notes");
    write(src.path(), "dup1", b"xy");
    write(src.path(), "dup2", b"xy");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let result = copy_batch(&report.unique, &report.root, dst.path());

    assert!(result.all_succeeded());
    assert_eq!(result.success_count(), 2);
    assert_eq!(
        fs::read(dst.path().join("docs/readme.txt")).unwrap(),
        b"read me"
    );
    assert_eq!(
        fs::read(dst.path().join("docs/deep/notes.md")).unwrap(),
        b"some longer notes"
    );
    assert!(!dst.path().join("dup1").exists());
    assert!(!dst.path().join("dup2").exists());
}

#[test]
fn test_copy_retained_set_drops_later_copies() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(src.path(), "a.txt", b"same");
    write(src.path(), "b.txt", b"same");
    write(src.path(), "c.txt", b"diff");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let result = copy_batch(&report.retained, &report.root, dst.path());

    assert_eq!(result.success_count(), 2);
    assert!(dst.path().join("a.txt").exists());
    assert!(!dst.path().join("b.txt").exists());
    assert!(dst.path().join("c.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_copy_permission_denied_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(src.path(), "ok.txt", b"fine");
    write(src.path(), "locked/blocked.txt", b"cannot land");

    let locked = dst.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can write anyway.
    if fs::write(locked.join("probe"), b"").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    assert_eq!(report.unique.len(), 2);

    let result = copy_batch(&report.unique, &report.root, dst.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].0, src.path().join("locked/blocked.txt"));
    assert!(result.failures[0].1.contains("permission denied"));
    assert_eq!(fs::read(dst.path().join("ok.txt")).unwrap(), b"fine");
}

#[test]
fn test_copy_never_overwrites_existing_destination() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(src.path(), "file.txt", b"fresh content");
    write(dst.path(), "file.txt", b"keep me");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let result = copy_batch(&report.unique, &report.root, dst.path());

    assert_eq!(result.failure_count(), 1);
    assert_eq!(fs::read(dst.path().join("file.txt")).unwrap(), b"keep me");
}
