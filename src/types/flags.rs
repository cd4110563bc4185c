/*!
 * Open Modes and Option Bitmasks
 * Parsed forms of the runtime's mode strings and operation option bits
 */

use serde::{Deserialize, Serialize};

/// File open flags.
///
/// The runtime hands the layer a textual mode ("r", "w+", "ab", ...);
/// [`OpenFlags::from_mode`] parses it into this explicit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub create_new: bool,
}

impl OpenFlags {
    pub fn read_only() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            truncate: false,
            create: false,
            create_new: false,
        }
    }

    /// "w": write, creating or truncating.
    pub fn write_create() -> Self {
        Self {
            read: false,
            write: true,
            append: false,
            truncate: true,
            create: true,
            create_new: false,
        }
    }

    /// "a": append, creating if absent.
    pub fn append_create() -> Self {
        Self {
            read: false,
            write: true,
            append: true,
            truncate: false,
            create: true,
            create_new: false,
        }
    }

    /// Parse a runtime mode string.
    ///
    /// Base modes: 'r' (read), 'w' (write/create/truncate), 'a'
    /// (append/create), 'x' (exclusive create). A '+' adds the missing
    /// read or write half; 'b' and 't' are accepted and ignored. Anything
    /// else is rejected.
    pub fn from_mode(mode: &str) -> Option<Self> {
        let mut chars = mode.chars();
        let mut flags = match chars.next()? {
            'r' => Self::read_only(),
            'w' => Self::write_create(),
            'a' => Self::append_create(),
            'x' => Self {
                read: false,
                write: true,
                append: false,
                truncate: false,
                create: false,
                create_new: true,
            },
            _ => return None,
        };

        for c in chars {
            match c {
                '+' => {
                    flags.read = true;
                    flags.write = true;
                }
                'b' | 't' => {}
                _ => return None,
            }
        }

        Some(flags)
    }

    /// True when the handle may mutate content.
    pub fn is_write(&self) -> bool {
        self.write || self.append || self.truncate || self.create || self.create_new
    }
}

/// Options recognized by `open`. Wire form is a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub use_include_path: bool,
}

impl OpenOptions {
    pub const USE_INCLUDE_PATH: u32 = 0x0001;

    pub fn from_bits(bits: u32) -> Self {
        Self {
            use_include_path: bits & Self::USE_INCLUDE_PATH != 0,
        }
    }

    pub fn include_path() -> Self {
        Self {
            use_include_path: true,
        }
    }
}

/// Options recognized by `mkdir`. Wire form is a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MkdirOptions {
    pub recursive: bool,
}

impl MkdirOptions {
    pub const RECURSIVE: u32 = 0x0001;

    pub fn from_bits(bits: u32) -> Self {
        Self {
            recursive: bits & Self::RECURSIVE != 0,
        }
    }

    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

/// Options accepted by `rmdir`. Reserved: no bit is currently observed to
/// alter behavior at this layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RmdirOptions(pub u32);
