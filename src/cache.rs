/*!
 * Content Cache Overlay
 * Read-only store of precompiled file content consulted before the real
 * filesystem
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::info;

use crate::traits::FileHandle;
use crate::types::{FsError, FsResult, FileType, Metadata, OpenFlags, Permissions};

/// One sealed cache entry. Content is shared and never mutated.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Arc<[u8]>,
    permissions: Permissions,
    modified: SystemTime,
}

/// Precompiled read-only content cache.
///
/// Built once at startup via [`ContentCacheBuilder`], sealed before first
/// use, and never mutated afterward, which makes it safe for unbounded
/// concurrent reads. Entries are keyed by their path relative to the
/// root the content was compiled from.
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
    entries: Arc<DashMap<PathBuf, CacheEntry, RandomState>>,
}

impl ContentCache {
    pub fn builder<P: Into<PathBuf>>(root: P) -> ContentCacheBuilder {
        ContentCacheBuilder {
            root: root.into(),
            entries: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// The physical prefix the cache content was compiled from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebase a physical path against the cache root. `None` when the path
    /// lies outside the content the cache was compiled from.
    pub fn relative_path(&self, physical: &Path) -> Option<PathBuf> {
        physical
            .strip_prefix(&self.root)
            .ok()
            .map(|rel| path_clean::clean(rel))
    }

    pub fn contains(&self, relative: &Path) -> bool {
        self.entries.contains_key(&path_clean::clean(relative))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Open a cached entry with the requested flags.
    ///
    /// Cache content is baked at build time, so any write-capable flag is
    /// refused. A miss is an ordinary `NotFound`; callers probing the
    /// cache treat it as silent fallthrough.
    pub fn open(&self, relative: &Path, flags: OpenFlags) -> FsResult<CachedFile> {
        let key = path_clean::clean(relative);
        if flags.is_write() {
            return Err(FsError::ReadOnly(key.display().to_string()));
        }

        let entry = self
            .entries
            .get(&key)
            .map(|e| e.clone())
            .ok_or_else(|| FsError::NotFound(key.display().to_string()))?;

        Ok(CachedFile {
            path: key,
            permissions: entry.permissions,
            modified: entry.modified,
            cursor: Cursor::new(entry.data),
            flags,
        })
    }
}

/// Accumulates precompiled content, then seals it into an immutable
/// [`ContentCache`].
pub struct ContentCacheBuilder {
    root: PathBuf,
    entries: DashMap<PathBuf, CacheEntry, RandomState>,
}

impl ContentCacheBuilder {
    /// Add one entry, keyed by its path relative to the cache root.
    pub fn insert<P: AsRef<Path>>(&mut self, relative: P, data: impl Into<Vec<u8>>) -> &mut Self {
        self.insert_with(
            relative,
            data,
            Permissions::readonly(),
            SystemTime::now(),
        )
    }

    pub fn insert_with<P: AsRef<Path>>(
        &mut self,
        relative: P,
        data: impl Into<Vec<u8>>,
        permissions: Permissions,
        modified: SystemTime,
    ) -> &mut Self {
        let key = path_clean::clean(relative.as_ref());
        self.entries.insert(
            key,
            CacheEntry {
                data: data.into().into(),
                permissions,
                modified,
            },
        );
        self
    }

    /// Seal the cache. After this point the content is immutable.
    pub fn build(self) -> ContentCache {
        info!(
            root = %self.root.display(),
            entries = self.entries.len(),
            "content cache sealed"
        );
        ContentCache {
            root: self.root,
            entries: Arc::new(self.entries),
        }
    }
}

/// Read-oriented file handle backed by the content cache.
#[derive(Debug)]
pub struct CachedFile {
    path: PathBuf,
    permissions: Permissions,
    modified: SystemTime,
    cursor: Cursor<Arc<[u8]>>,
    flags: OpenFlags,
}

impl CachedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for CachedFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.flags.read {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file not opened for reading",
            ));
        }
        self.cursor.read(buf)
    }
}

impl Write for CachedFile {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "cache-backed file is read-only",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for CachedFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl FileHandle for CachedFile {
    fn metadata(&self) -> FsResult<Metadata> {
        Ok(Metadata {
            file_type: FileType::File,
            size: self.cursor.get_ref().len() as u64,
            permissions: self.permissions,
            modified: self.modified,
            accessed: self.modified,
            created: self.modified,
        })
    }

    fn sync(&mut self) -> FsResult<()> {
        Ok(())
    }

    fn set_len(&mut self, _size: u64) -> FsResult<()> {
        Err(FsError::ReadOnly(self.path.display().to_string()))
    }
}
