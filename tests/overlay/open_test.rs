/*!
 * Layered Open Tests
 * Cache precedence, include-path fallback, and physical fallthrough
 */

use fs_overlay::{
    ContentCache, FsError, IncludePath, OpenFlags, OpenOptions, OverlayConfig, OverlayFs,
    PathTranslator, Resolver, RootTranslator,
};
use pretty_assertions::assert_eq;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn rooted_resolver(temp: &TempDir) -> Resolver {
    let t: Arc<dyn PathTranslator> = Arc::new(RootTranslator::new(temp.path()));
    Resolver::new(t.clone(), t)
}

fn read_all(overlay: &OverlayFs, path: &str, options: OpenOptions) -> String {
    let mut file = overlay
        .open(path, OpenFlags::read_only(), options)
        .unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

#[test]
fn test_cache_takes_precedence_over_physical_copy() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("assets")).unwrap();
    std::fs::write(temp.path().join("assets/style.css"), b"physical").unwrap();

    let mut builder = ContentCache::builder(temp.path());
    builder.insert("assets/style.css", b"cached".to_vec());
    let cache = builder.build();

    let overlay = OverlayFs::new(OverlayConfig {
        cache: Some(Arc::new(cache)),
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    assert_eq!(
        read_all(&overlay, "/assets/style.css", OpenOptions::default()),
        "cached"
    );
}

#[test]
fn test_cache_hit_needs_no_physical_file() {
    // Nothing exists on disk below the temp root; a successful open proves
    // the real filesystem was never consulted.
    let temp = TempDir::new().unwrap();

    let mut builder = ContentCache::builder(temp.path());
    builder.insert("virtual/only.txt", b"baked in".to_vec());
    let cache = builder.build();

    let overlay = OverlayFs::new(OverlayConfig {
        cache: Some(Arc::new(cache)),
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    assert_eq!(
        read_all(&overlay, "/virtual/only.txt", OpenOptions::default()),
        "baked in"
    );
    assert!(!temp.path().join("virtual").exists());
}

#[test]
fn test_write_mode_bypasses_cache() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("page.html"), b"old").unwrap();

    let mut builder = ContentCache::builder(temp.path());
    builder.insert("page.html", b"cached".to_vec());
    let cache = builder.build();

    let overlay = OverlayFs::new(OverlayConfig {
        cache: Some(Arc::new(cache)),
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    // Read-oriented cache entries cannot satisfy a write open; the probe
    // misses silently and the physical file is opened instead.
    let mut file = overlay
        .open(
            "/page.html",
            OpenFlags::from_mode("w").unwrap(),
            OpenOptions::default(),
        )
        .unwrap();
    use std::io::Write;
    file.write_all(b"rewritten").unwrap();
    drop(file);

    assert_eq!(std::fs::read(temp.path().join("page.html")).unwrap(), b"rewritten");

    // Reads still see the baked content.
    assert_eq!(
        read_all(&overlay, "/page.html", OpenOptions::default()),
        "cached"
    );
}

#[test]
fn test_no_cache_falls_through_to_physical() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("plain.txt"), b"from disk").unwrap();

    let overlay = OverlayFs::new(OverlayConfig {
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    assert_eq!(
        read_all(&overlay, "/plain.txt", OpenOptions::default()),
        "from disk"
    );
    assert_eq!(
        read_all(&overlay, "file:///plain.txt", OpenOptions::default()),
        "from disk"
    );
}

#[test]
fn test_include_path_used_only_when_requested() {
    let incdir = TempDir::new().unwrap();
    std::fs::create_dir_all(incdir.path().join("lib")).unwrap();
    std::fs::write(incdir.path().join("lib/helper.inc"), b"included").unwrap();

    let overlay = OverlayFs::new(OverlayConfig {
        include_path: Some(Arc::new(IncludePath::new([incdir.path()]))),
        ..Default::default()
    });

    assert_eq!(
        read_all(&overlay, "lib/helper.inc", OpenOptions::include_path()),
        "included"
    );

    let err = overlay
        .open(
            "lib/helper.inc",
            OpenFlags::read_only(),
            OpenOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
}

#[test]
fn test_cache_checked_before_include_path() {
    let temp = TempDir::new().unwrap();
    let incdir = TempDir::new().unwrap();
    std::fs::create_dir_all(incdir.path().join("lib")).unwrap();
    std::fs::write(incdir.path().join("lib/mod.inc"), b"from include").unwrap();

    let mut builder = ContentCache::builder(temp.path());
    builder.insert("lib/mod.inc", b"from cache".to_vec());
    let cache = builder.build();

    let overlay = OverlayFs::new(OverlayConfig {
        cache: Some(Arc::new(cache)),
        include_path: Some(Arc::new(IncludePath::new([incdir.path()]))),
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    assert_eq!(
        read_all(&overlay, "lib/mod.inc", OpenOptions::include_path()),
        "from cache"
    );
}

#[test]
fn test_final_open_failure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let overlay = OverlayFs::new(OverlayConfig {
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    let err = overlay
        .open("/absent.txt", OpenFlags::read_only(), OpenOptions::default())
        .unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
}

#[test]
fn test_open_dir() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("sub")).unwrap();
    std::fs::write(temp.path().join("sub/one.txt"), b"1").unwrap();
    std::fs::write(temp.path().join("sub/two.txt"), b"2").unwrap();

    let overlay = OverlayFs::new(OverlayConfig {
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    let dir = overlay.open_dir("/sub").unwrap();
    let mut names: Vec<String> = dir.map(|e| e.unwrap().name).collect();
    names.sort();
    assert_eq!(names, vec!["one.txt", "two.txt"]);

    assert!(overlay.open_dir("/no-such-dir").is_err());
}

#[test]
fn test_stat_cache_aware_translation() {
    let live = TempDir::new().unwrap();
    let baked = TempDir::new().unwrap();
    std::fs::write(baked.path().join("gen.bin"), b"12345678").unwrap();

    let resolver = Resolver::new(
        Arc::new(RootTranslator::new(live.path())),
        Arc::new(RootTranslator::new(baked.path())),
    );
    let overlay = OverlayFs::new(OverlayConfig {
        resolver,
        ..Default::default()
    });

    let md = overlay.stat("/gen.bin", true).unwrap();
    assert_eq!(md.size, 8);
    assert!(md.is_file());

    let err = overlay.stat("/gen.bin", false).unwrap_err();
    assert!(matches!(err, FsError::NotFound(_)));
}

#[cfg(unix)]
#[test]
fn test_lstat_does_not_follow_symlink() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("target.txt"), b"data").unwrap();
    std::os::unix::fs::symlink(
        temp.path().join("target.txt"),
        temp.path().join("link.txt"),
    )
    .unwrap();

    let overlay = OverlayFs::new(OverlayConfig {
        resolver: rooted_resolver(&temp),
        ..Default::default()
    });

    assert!(overlay.stat("/link.txt", false).unwrap().is_file());
    assert!(overlay.lstat("/link.txt", false).unwrap().is_symlink());
}

#[test]
fn test_translated_paths_never_keep_the_scheme() {
    let t = RootTranslator::new("/srv");
    let resolver = Resolver::new(
        Arc::new(t.clone()) as Arc<dyn PathTranslator>,
        Arc::new(t) as Arc<dyn PathTranslator>,
    );
    let physical = resolver.translate("file:///deep/file.txt", false);
    assert_eq!(physical, Path::new("/srv/deep/file.txt"));
    assert!(!physical.to_string_lossy().contains("file://"));
}
