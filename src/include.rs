/*!
 * Include-Path Resolution
 * Fallback search over configured roots for relative logical paths
 */

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Metadata;

/// A successful include-path lookup: the resolved physical path together
/// with the metadata observed while probing it.
#[derive(Debug, Clone)]
pub struct IncludeHit {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// Search strategy consulted when an open misses the content cache and the
/// caller asked for include-path resolution. A miss is silent.
pub trait IncludeResolver: Send + Sync {
    fn resolve(&self, path: &Path) -> Option<IncludeHit>;
}

/// Ordered list of search roots; the first root containing the path wins.
/// Absolute paths are probed directly.
#[derive(Debug, Clone, Default)]
pub struct IncludePath {
    roots: Vec<PathBuf>,
}

impl IncludePath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push<P: Into<PathBuf>>(&mut self, root: P) {
        self.roots.push(root.into());
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl IncludeResolver for IncludePath {
    fn resolve(&self, path: &Path) -> Option<IncludeHit> {
        if path.is_absolute() {
            let md = fs::metadata(path).ok()?;
            return Some(IncludeHit {
                path: path.to_path_buf(),
                metadata: Metadata::from_fs(&md),
            });
        }

        for root in &self.roots {
            let candidate = root.join(path);
            if let Ok(md) = fs::metadata(&candidate) {
                return Some(IncludeHit {
                    path: candidate,
                    metadata: Metadata::from_fs(&md),
                });
            }
        }

        None
    }
}
