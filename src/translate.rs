/*!
 * Path Resolution
 * Scheme stripping and logical-to-physical path translation
 */

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

const FILE_SCHEME: &str = "file://";

/// Strip one leading literal `file://` marker; other paths pass through
/// unchanged. Pure text transform, no I/O.
pub fn strip_scheme(path: &str) -> &str {
    path.strip_prefix(FILE_SCHEME).unwrap_or(path)
}

/// Pure logical-to-physical path transform.
///
/// Translation never performs existence checks; it is a string transform
/// only. The layer dispatches between two injected translators, a default
/// one and a cache-rebased one for cache-aware metadata lookups.
pub trait PathTranslator: Send + Sync {
    fn translate(&self, path: &Path) -> PathBuf;
}

/// Passthrough: the logical path already is the physical path.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl PathTranslator for IdentityTranslator {
    fn translate(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Rebase every path under a fixed root.
///
/// The relative part is cleaned before the root is prepended, so `..`
/// components collapse first and can never climb out of the root.
#[derive(Debug, Clone)]
pub struct RootTranslator {
    root: PathBuf,
}

impl RootTranslator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathTranslator for RootTranslator {
    fn translate(&self, path: &Path) -> PathBuf {
        let rel = path.strip_prefix("/").unwrap_or(path);

        let mut out = self.root.clone();
        for comp in path_clean::clean(rel).components() {
            match comp {
                Component::Normal(c) => out.push(c),
                // Leading .. left over after cleaning stops at the root
                // boundary; everything else is already collapsed.
                _ => {}
            }
        }
        out
    }
}

/// The pair of physical-path translators the access layer dispatches
/// between. `stat`/`lstat`/`access` callers may opt into the cache-aware
/// variant; every other operation uses the default.
#[derive(Clone)]
pub struct Resolver {
    default: Arc<dyn PathTranslator>,
    cache_aware: Arc<dyn PathTranslator>,
}

impl Resolver {
    pub fn new(default: Arc<dyn PathTranslator>, cache_aware: Arc<dyn PathTranslator>) -> Self {
        Self {
            default,
            cache_aware,
        }
    }

    /// Both translators are passthrough.
    pub fn passthrough() -> Self {
        let identity: Arc<dyn PathTranslator> = Arc::new(IdentityTranslator);
        Self {
            default: identity.clone(),
            cache_aware: identity,
        }
    }

    /// Strip the scheme, then delegate to the selected translator.
    pub fn translate(&self, path: &str, use_cache_aware: bool) -> PathBuf {
        self.translate_path(Path::new(strip_scheme(path)), use_cache_aware)
    }

    /// Delegate an already scheme-stripped path to the selected translator.
    pub fn translate_path(&self, path: &Path, use_cache_aware: bool) -> PathBuf {
        if use_cache_aware {
            self.cache_aware.translate(path)
        } else {
            self.default.translate(path)
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::passthrough()
    }
}
