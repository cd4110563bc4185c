/*!
 * Physical Filesystem Handles
 * File and directory handles backed by real OS descriptors
 */

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::traits::FileHandle;
use crate::types::{Entry, FileType, FsError, FsResult, Metadata, OpenFlags, Permissions};

/// File handle backed by a real filesystem descriptor. Supports every
/// requested mode (read/write/append/...).
#[derive(Debug)]
pub struct PhysicalFile {
    path: PathBuf,
    file: fs::File,
}

impl PhysicalFile {
    /// Open a physical file with the requested flags.
    ///
    /// `mode` supplies the permission bits when the open may create the
    /// file. A returned handle is always open and valid.
    pub fn open(path: &Path, flags: OpenFlags, mode: Permissions) -> FsResult<Self> {
        let mut options = fs::OpenOptions::new();
        options
            .read(flags.read)
            .write(flags.write)
            .append(flags.append)
            .truncate(flags.truncate)
            .create(flags.create)
            .create_new(flags.create_new);

        #[cfg(unix)]
        if flags.create || flags.create_new {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode.mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let file = options
            .open(path)
            .map_err(|e| FsError::from_io(e, format!("open {}", path.display())))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for PhysicalFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for PhysicalFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for PhysicalFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl FileHandle for PhysicalFile {
    fn metadata(&self) -> FsResult<Metadata> {
        let md = self
            .file
            .metadata()
            .map_err(|e| FsError::from_io(e, format!("metadata {}", self.path.display())))?;
        Ok(Metadata::from_fs(&md))
    }

    fn sync(&mut self) -> FsResult<()> {
        self.file
            .sync_all()
            .map_err(|e| FsError::from_io(e, format!("sync {}", self.path.display())))
    }

    fn set_len(&mut self, size: u64) -> FsResult<()> {
        self.file
            .set_len(size)
            .map_err(|e| FsError::from_io(e, format!("set_len {}", self.path.display())))
    }
}

/// Directory stream rooted at a physical path.
///
/// Validity is checked at construction: an unreadable directory never
/// yields a handle. Iteration yields entries in OS order.
#[derive(Debug)]
pub struct DirHandle {
    path: PathBuf,
    inner: fs::ReadDir,
}

impl DirHandle {
    pub fn open(path: &Path) -> FsResult<Self> {
        let inner = fs::read_dir(path)
            .map_err(|e| FsError::from_io(e, format!("opendir {}", path.display())))?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for DirHandle {
    type Item = FsResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(e) => e,
            Err(e) => {
                return Some(Err(FsError::from_io(
                    e,
                    format!("read entry in {}", self.path.display()),
                )))
            }
        };

        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => {
                return Some(Err(FsError::InvalidPath(format!(
                    "non UTF-8 name in {}",
                    self.path.display()
                ))))
            }
        };

        let file_type = entry
            .file_type()
            .map(FileType::from_fs)
            .unwrap_or(FileType::Unknown);

        Some(Ok(Entry::new(name, file_type)))
    }
}
