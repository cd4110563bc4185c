/*!
 * Overlay Filesystem Access Layer
 * Cache-first file access with scheme stripping, include-path search, and
 * direct filesystem mutations
 */

pub mod cache;
pub mod include;
pub mod limits;
pub mod overlay;
pub mod physical;
pub mod traits;
pub mod translate;
pub mod types;

// Re-exports
pub use cache::{CachedFile, ContentCache, ContentCacheBuilder};
pub use include::{IncludeHit, IncludePath, IncludeResolver};
pub use overlay::{OverlayConfig, OverlayFs, RenameStrategy};
pub use physical::{DirHandle, PhysicalFile};
pub use traits::FileHandle;
pub use translate::{strip_scheme, IdentityTranslator, PathTranslator, Resolver, RootTranslator};
pub use types::{
    Entry, FileType, FsError, FsResult, Metadata, MkdirOptions, OpenFlags, OpenOptions,
    Permissions, RmdirOptions,
};

/// Access-mode bits for [`OverlayFs::access`], re-exported from `nix`.
pub use nix::unistd::AccessFlags;
