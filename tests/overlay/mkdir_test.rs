/*!
 * Directory Creation Tests
 * Single-level and recursive mkdir semantics
 */

use fs_overlay::{
    FsError, MkdirOptions, OverlayConfig, OverlayFs, PathTranslator, Permissions, Resolver,
    RootTranslator,
};
use std::sync::Arc;
use tempfile::TempDir;

fn overlay_for(temp: &TempDir) -> OverlayFs {
    let t: Arc<dyn PathTranslator> = Arc::new(RootTranslator::new(temp.path()));
    OverlayFs::new(OverlayConfig {
        resolver: Resolver::new(t.clone(), t),
        ..Default::default()
    })
}

fn entry_count(temp: &TempDir) -> usize {
    std::fs::read_dir(temp.path()).unwrap().count()
}

#[test]
fn test_single_level_create() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);

    overlay
        .mkdir("/fresh", Permissions::new(0o755), MkdirOptions::default())
        .unwrap();
    assert!(temp.path().join("fresh").is_dir());
}

#[test]
fn test_single_level_never_descends() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);

    let err = overlay
        .mkdir("/p/q/r", Permissions::new(0o755), MkdirOptions::default())
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
    // One attempt on the full path only: no intermediate was created.
    assert!(!temp.path().join("p").exists());
}

#[test]
fn test_recursive_creates_missing_intermediates() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);
    std::fs::create_dir(temp.path().join("a")).unwrap();

    overlay
        .mkdir("/a/b/c", Permissions::new(0o755), MkdirOptions::recursive())
        .unwrap();
    assert!(temp.path().join("a/b").is_dir());
    assert!(temp.path().join("a/b/c").is_dir());
}

#[test]
fn test_recursive_rejects_existing_path() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);
    std::fs::create_dir_all(temp.path().join("x/y")).unwrap();

    let err = overlay
        .mkdir("/x/y", Permissions::new(0o755), MkdirOptions::recursive())
        .unwrap_err();
    assert!(matches!(err, FsError::AlreadyExists(_)));
    // EEXIST
    assert_eq!(err.raw_os_error(), Some(17));
}

#[test]
fn test_recursive_rejects_oversized_path_without_creating() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);

    // Well past any PATH_MAX; the length check fires before the walk.
    let long = format!("/{}", "seg/".repeat(2048));
    let err = overlay
        .mkdir(&long, Permissions::new(0o755), MkdirOptions::recursive())
        .unwrap_err();
    assert!(matches!(err, FsError::NameTooLong(_)));
    assert_eq!(entry_count(&temp), 0);
}

#[test]
fn test_recursive_partial_failure_keeps_created_prefixes() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);

    // Total length passes the up-front check, but the final component
    // exceeds the per-name limit, so creation fails only after the
    // intermediate directories were made.
    let leaf = "x".repeat(300);
    let path = format!("/a/b/{}", leaf);
    let err = overlay
        .mkdir(&path, Permissions::new(0o755), MkdirOptions::recursive())
        .unwrap_err();
    assert!(matches!(err, FsError::NameTooLong(_)));

    // No rollback: the prefixes created before the failure remain.
    assert!(temp.path().join("a").is_dir());
    assert!(temp.path().join("a/b").is_dir());
    assert!(std::fs::read_dir(temp.path().join("a/b")).unwrap().count() == 0);
}

#[test]
fn test_recursive_aborts_on_non_directory_component() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);
    std::fs::write(temp.path().join("blocker"), b"file").unwrap();

    let err = overlay
        .mkdir(
            "/blocker/sub/leaf",
            Permissions::new(0o755),
            MkdirOptions::recursive(),
        )
        .unwrap_err();
    assert!(matches!(err, FsError::NotADirectory(_)));
    assert!(temp.path().join("blocker").is_file());
}

#[test]
fn test_recursive_via_bitmask() {
    let temp = TempDir::new().unwrap();
    let overlay = overlay_for(&temp);

    overlay
        .mkdir(
            "/m/n",
            Permissions::new(0o755),
            MkdirOptions::from_bits(MkdirOptions::RECURSIVE),
        )
        .unwrap();
    assert!(temp.path().join("m/n").is_dir());
}
