/*!
 * Handle Traits
 * Common capability set for open file handles
 */

use std::fmt::Debug;
use std::io::{Read, Seek, Write};

use crate::types::{FsResult, Metadata};

/// An open file handle.
///
/// A handle returned to a caller is always in a valid, open state:
/// construction failures surface as errors, never as half-built handles.
/// The caller owns the handle exclusively; it is closed on drop.
pub trait FileHandle: Read + Write + Seek + Send + Sync + Debug {
    /// Metadata of the object behind the handle
    fn metadata(&self) -> FsResult<Metadata>;

    /// Flush handle state to the backing store
    fn sync(&mut self) -> FsResult<()>;

    /// Resize the object behind the handle
    fn set_len(&mut self, size: u64) -> FsResult<()>;
}
