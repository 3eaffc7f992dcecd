//! Directory listing record layout.
//!
//! Batches returned by [`DirectoryHandle::read_batch`](crate::DirectoryHandle::read_batch)
//! are sequences of variable-length records using the Linux `linux_dirent64`
//! layout on every platform:
//!
//! ```text
//! offset  size  field
//! 0       8     d_ino     (native endian u64)
//! 8       8     d_off     (native endian i64)
//! 16      2     d_reclen  (native endian u16, total record length)
//! 18      1     d_type    (DT_* constant)
//! 19      ..    d_name    (NUL terminated, padded to 8 bytes)
//! ```

use std::ffi::OsStr;

/// Bytes preceding the name in every record.
pub const RECORD_HEADER_LEN: usize = 19;
/// Records are padded to this alignment.
pub const RECORD_ALIGN: usize = 8;

/// Unknown entry type; callers must stat to classify.
pub const DT_UNKNOWN: u8 = 0;
/// Named pipe.
pub const DT_FIFO: u8 = 1;
/// Character device.
pub const DT_CHR: u8 = 2;
/// Directory.
pub const DT_DIR: u8 = 4;
/// Block device.
pub const DT_BLK: u8 = 6;
/// Regular file.
pub const DT_REG: u8 = 8;
/// Symbolic link.
pub const DT_LNK: u8 = 10;
/// Unix domain socket.
pub const DT_SOCK: u8 = 12;

/// A record failed bounds validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Fewer bytes remain than a record header needs.
    #[error("truncated record header: only {available} bytes available")]
    TruncatedHeader {
        /// Bytes left in the batch.
        available: usize,
    },
    /// `d_reclen` is too small or runs past the end of the batch.
    #[error("record length {record_len} is invalid for {available} remaining bytes")]
    BadLength {
        /// Declared record length.
        record_len: usize,
        /// Bytes left in the batch.
        available: usize,
    },
    /// The name has no terminating NUL inside the record.
    #[error("record name is not NUL terminated")]
    Unterminated,
}

/// One validated listing record borrowed from a batch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    inode: u64,
    next_offset: i64,
    record_len: usize,
    file_type: u8,
    name: &'a [u8],
}

impl<'a> RawRecord<'a> {
    /// Parses the record at the start of `bytes`.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, RecordError> {
        let available = bytes.len();
        if available < RECORD_HEADER_LEN {
            return Err(RecordError::TruncatedHeader { available });
        }

        let inode = u64::from_ne_bytes(field(bytes, 0));
        let next_offset = i64::from_ne_bytes(field(bytes, 8));
        let record_len = usize::from(u16::from_ne_bytes(field(bytes, 16)));
        let file_type = bytes[18];

        if record_len <= RECORD_HEADER_LEN || record_len > available {
            return Err(RecordError::BadLength {
                record_len,
                available,
            });
        }

        let name_area = &bytes[RECORD_HEADER_LEN..record_len];
        let name_len = name_area
            .iter()
            .position(|&b| b == 0)
            .ok_or(RecordError::Unterminated)?;

        Ok(Self {
            inode,
            next_offset,
            record_len,
            file_type,
            name: &name_area[..name_len],
        })
    }

    /// Inode number reported by the listing.
    pub const fn inode(&self) -> u64 {
        self.inode
    }

    /// Opaque cookie for the following record.
    pub const fn next_offset(&self) -> i64 {
        self.next_offset
    }

    /// Total length of the record, padding included.
    pub const fn record_len(&self) -> usize {
        self.record_len
    }

    /// One of the `DT_*` constants.
    pub const fn file_type(&self) -> u8 {
        self.file_type
    }

    /// Raw name bytes without the terminator.
    pub const fn name_bytes(&self) -> &'a [u8] {
        self.name
    }

    /// Name as an [`OsStr`].
    #[cfg(unix)]
    pub fn name(&self) -> &'a OsStr {
        use std::os::unix::ffi::OsStrExt;
        OsStr::from_bytes(self.name)
    }

    /// Name as an [`OsStr`].
    ///
    /// Non-Unix batches are always written from UTF-8 names.
    #[cfg(not(unix))]
    pub fn name(&self) -> &'a OsStr {
        OsStr::new(std::str::from_utf8(self.name).unwrap_or_default())
    }
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

/// Padded length of a record carrying a `name_len`-byte name.
pub const fn record_len_for(name_len: usize) -> usize {
    let raw = RECORD_HEADER_LEN + name_len + 1;
    raw.div_ceil(RECORD_ALIGN) * RECORD_ALIGN
}

/// Writes one record at the start of `out`.
///
/// Returns the record length, or `None` when the record does not fit or its
/// length cannot be represented in `d_reclen`.
pub fn encode_record(
    out: &mut [u8],
    inode: u64,
    next_offset: i64,
    file_type: u8,
    name: &[u8],
) -> Option<usize> {
    let len = record_len_for(name.len());
    let reclen = u16::try_from(len).ok()?;
    if len > out.len() {
        return None;
    }

    let record = &mut out[..len];
    record[0..8].copy_from_slice(&inode.to_ne_bytes());
    record[8..16].copy_from_slice(&next_offset.to_ne_bytes());
    record[16..18].copy_from_slice(&reclen.to_ne_bytes());
    record[18] = file_type;
    let name_end = RECORD_HEADER_LEN + name.len();
    record[RECORD_HEADER_LEN..name_end].copy_from_slice(name);
    record[name_end..].fill(0);
    Some(len)
}
