use std::time::SystemTime;

use crate::dirent::{DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DT_UNKNOWN};

const S_IFMT: u32 = 0o170_000;

/// Metadata for one entry, read without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    /// Size in bytes.
    pub len: u64,
    /// Unix mode bits, file type included.
    pub mode: u32,
    /// Last modification time.
    pub modified: Option<SystemTime>,
    /// Last access time.
    pub accessed: Option<SystemTime>,
    /// Last status change time.
    pub changed: Option<SystemTime>,
}

impl EntryStat {
    /// No write permission bit is set.
    pub const fn is_readonly(&self) -> bool {
        self.mode & 0o222 == 0
    }

    /// `DT_*` value matching the file type bits of [`mode`](Self::mode).
    pub const fn file_type(&self) -> u8 {
        dtype_from_mode(self.mode)
    }
}

/// Maps `st_mode` file type bits to the listing's `DT_*` constants.
pub const fn dtype_from_mode(mode: u32) -> u8 {
    match mode & S_IFMT {
        0o010_000 => DT_FIFO,
        0o020_000 => DT_CHR,
        0o040_000 => DT_DIR,
        0o060_000 => DT_BLK,
        0o100_000 => DT_REG,
        0o120_000 => DT_LNK,
        0o140_000 => DT_SOCK,
        _ => DT_UNKNOWN,
    }
}
