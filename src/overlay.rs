/*!
 * Layered File Access
 * Cache-first open routing, path translation, and filesystem mutations
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::unistd::{access, AccessFlags};
use tracing::warn;

use crate::cache::ContentCache;
use crate::include::IncludeResolver;
use crate::limits::MAX_PATH_BYTES;
use crate::physical::{DirHandle, PhysicalFile};
use crate::traits::FileHandle;
use crate::translate::{strip_scheme, Resolver};
use crate::types::{
    FsError, FsResult, Metadata, MkdirOptions, OpenFlags, OpenOptions, Permissions, RmdirOptions,
};

/// How `rename` reaches the OS: the standard rename primitive, or a byte
/// copy followed by source removal for stores where an in-place rename is
/// unavailable or unsafe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameStrategy {
    #[default]
    Standard,
    DirectCopy,
}

/// Injected configuration for the access layer: the optional content cache
/// overlay, the optional include-path resolver, the rename strategy, and
/// the pair of physical-path translators.
#[derive(Default)]
pub struct OverlayConfig {
    pub cache: Option<Arc<ContentCache>>,
    pub include_path: Option<Arc<dyn IncludeResolver>>,
    pub rename_strategy: RenameStrategy,
    pub resolver: Resolver,
}

/// Filesystem access layer with an optional precompiled content overlay.
///
/// Logical paths are text: they may carry a `file://` scheme and may be
/// relative to the configured include path. Opens consult the overlay
/// first; every other operation translates the path and calls straight
/// into the corresponding OS primitive, adding no locking or retry of its
/// own. Every call blocks until the primitive returns.
pub struct OverlayFs {
    cache: Option<Arc<ContentCache>>,
    include_path: Option<Arc<dyn IncludeResolver>>,
    rename_strategy: RenameStrategy,
    resolver: Resolver,
}

impl OverlayFs {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            cache: config.cache,
            include_path: config.include_path,
            rename_strategy: config.rename_strategy,
            resolver: config.resolver,
        }
    }

    /// The configured content cache, if one was initialized at startup.
    pub fn cache(&self) -> Option<&ContentCache> {
        self.cache.as_deref()
    }

    fn translate(&self, path: &str, cache_aware: bool) -> PathBuf {
        self.resolver.translate(path, cache_aware)
    }

    /// Cache probe for the open algorithm.
    ///
    /// Misses are silent: the overlay is expected to miss for everything
    /// that was not baked in at build time.
    fn open_from_cache(&self, stripped: &Path, flags: OpenFlags) -> Option<Box<dyn FileHandle>> {
        let cache = self.cache.as_deref()?;
        let physical = self.resolver.translate_path(stripped, false);
        let relative = cache.relative_path(&physical)?;
        cache
            .open(&relative, flags)
            .ok()
            .map(|file| Box::new(file) as Box<dyn FileHandle>)
    }

    /// Open a file with cache precedence.
    ///
    /// The content cache is authoritative and is checked first; content
    /// baked in at build time takes precedence over any live filesystem
    /// copy, and a cache hit never touches the real filesystem. The
    /// include path is consulted only for paths that missed the cache and
    /// only when the caller set the option. Direct physical open is the
    /// fallback of last resort and the only layer whose failure is
    /// diagnosed.
    pub fn open(
        &self,
        path: &str,
        flags: OpenFlags,
        options: OpenOptions,
    ) -> FsResult<Box<dyn FileHandle>> {
        let stripped = PathBuf::from(strip_scheme(path));

        if let Some(file) = self.open_from_cache(&stripped, flags) {
            return Ok(file);
        }

        let mut working = stripped;
        if options.use_include_path {
            if let Some(hit) = self
                .include_path
                .as_ref()
                .and_then(|resolver| resolver.resolve(&working))
            {
                working = hit.path;
            }
        }

        let physical = self.resolver.translate_path(&working, false);
        match PhysicalFile::open(&physical, flags, Permissions::default()) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) => {
                warn!(path = %physical.display(), error = %e, "file open failed");
                Err(e)
            }
        }
    }

    /// Open a directory stream on the translated path.
    pub fn open_dir(&self, path: &str) -> FsResult<DirHandle> {
        let physical = self.translate(path, false);
        match DirHandle::open(&physical) {
            Ok(dir) => Ok(dir),
            Err(e) => {
                warn!(path = %physical.display(), error = %e, "directory open failed");
                Err(e)
            }
        }
    }

    /// access(2) on the translated path. `cache_aware` selects the
    /// cache-rebased translator for probes against precompiled content.
    pub fn access(&self, path: &str, mode: AccessFlags, cache_aware: bool) -> FsResult<()> {
        let physical = self.translate(path, cache_aware);
        access(physical.as_path(), mode)
            .map_err(|e| FsError::from_errno(e, format!("access {}", physical.display())))
    }

    pub fn stat(&self, path: &str, cache_aware: bool) -> FsResult<Metadata> {
        let physical = self.translate(path, cache_aware);
        fs::metadata(&physical)
            .map(|md| Metadata::from_fs(&md))
            .map_err(|e| FsError::from_io(e, format!("stat {}", physical.display())))
    }

    /// Like [`OverlayFs::stat`] but does not follow a trailing symlink.
    pub fn lstat(&self, path: &str, cache_aware: bool) -> FsResult<Metadata> {
        let physical = self.translate(path, cache_aware);
        fs::symlink_metadata(&physical)
            .map(|md| Metadata::from_fs(&md))
            .map_err(|e| FsError::from_io(e, format!("lstat {}", physical.display())))
    }

    pub fn unlink(&self, path: &str) -> FsResult<()> {
        let physical = self.translate(path, false);
        fs::remove_file(&physical)
            .map_err(|e| FsError::from_io(e, format!("unlink {}", physical.display())))
    }

    /// Remove an empty directory. `options` is reserved: accepted for
    /// interface compatibility, not currently differentiated.
    pub fn rmdir(&self, path: &str, _options: RmdirOptions) -> FsResult<()> {
        let physical = self.translate(path, false);
        fs::remove_dir(&physical)
            .map_err(|e| FsError::from_io(e, format!("rmdir {}", physical.display())))
    }

    /// Rename with both paths translated, dispatched by the configured
    /// strategy.
    pub fn rename(&self, old: &str, new: &str) -> FsResult<()> {
        let from = self.translate(old, false);
        let to = self.translate(new, false);

        match self.rename_strategy {
            RenameStrategy::Standard => fs::rename(&from, &to).map_err(|e| {
                FsError::from_io(e, format!("rename {} -> {}", from.display(), to.display()))
            }),
            RenameStrategy::DirectCopy => Self::direct_rename(&from, &to),
        }
    }

    /// Copy bytes to the destination, then remove the source. Used where
    /// the backing store cannot rename in place (cross-device moves,
    /// object-backed mounts).
    fn direct_rename(from: &Path, to: &Path) -> FsResult<()> {
        fs::copy(from, to).map_err(|e| {
            FsError::from_io(e, format!("copy {} -> {}", from.display(), to.display()))
        })?;
        fs::remove_file(from)
            .map_err(|e| FsError::from_io(e, format!("unlink {}", from.display())))
    }

    /// Create a directory on the translated path.
    ///
    /// With the recursive option every missing intermediate directory is
    /// created; without it exactly one creation attempt is made, never
    /// descending into intermediate segments.
    pub fn mkdir(&self, path: &str, mode: Permissions, options: MkdirOptions) -> FsResult<()> {
        if options.recursive {
            return self.mkdir_recursive(path, mode);
        }
        let physical = self.translate(path, false);
        Self::mkdir_one(&physical, mode)
    }

    /// Create every missing directory along the translated path.
    ///
    /// Not transactional: a failure part-way through the walk leaves the
    /// prefixes created so far on disk. Callers must treat partial
    /// creation as a possible outcome of a failed call.
    fn mkdir_recursive(&self, path: &str, mode: Permissions) -> FsResult<()> {
        let full = self.translate(path, false);

        if full.as_os_str().len() > MAX_PATH_BYTES {
            return Err(FsError::NameTooLong(full.display().to_string()));
        }

        if Self::path_exists(&full) {
            return Err(FsError::AlreadyExists(full.display().to_string()));
        }

        // Shortest prefix first. The final element is the full path
        // itself, which also covers paths that do not end in a separator.
        let prefixes: Vec<&Path> = full.ancestors().collect();
        for prefix in prefixes.into_iter().rev() {
            if prefix.as_os_str().is_empty() {
                continue;
            }
            if !Self::path_exists(prefix) {
                Self::mkdir_one(prefix, mode)?;
            }
        }

        Ok(())
    }

    fn mkdir_one(path: &Path, mode: Permissions) -> FsResult<()> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode.mode);
        }
        builder
            .create(path)
            .map_err(|e| FsError::from_io(e, format!("mkdir {}", path.display())))
    }

    /// Existence probe via access(2) F_OK, the same view the creation walk
    /// uses.
    fn path_exists(path: &Path) -> bool {
        access(path, AccessFlags::F_OK).is_ok()
    }
}
