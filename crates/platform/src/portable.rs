//! `std::fs::read_dir` backed listing, used where `getdents64` is missing.
//!
//! Entries are packed into the same record layout the Linux backend produces,
//! including the `.` and `..` pseudo-entries, so consumers see one format.

use std::ffi::{OsStr, OsString};
use std::fs::{self, FileType, Metadata, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use crate::dirent::{DT_DIR, DT_LNK, DT_REG, DT_UNKNOWN, encode_record};
use crate::stat::EntryStat;

struct Pending {
    name: OsString,
    file_type: u8,
}

/// An open directory listed through [`std::fs::read_dir`].
pub struct ReadDirHandle {
    path: PathBuf,
    entries: ReadDir,
    dots_emitted: u8,
    pending: Option<Pending>,
    cookie: i64,
}

impl std::fmt::Debug for ReadDirHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadDirHandle")
            .field("path", &self.path)
            .field("cookie", &self.cookie)
            .finish_non_exhaustive()
    }
}

impl ReadDirHandle {
    /// Opens `path` for listing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            entries: fs::read_dir(path)?,
            dots_emitted: 0,
            pending: None,
            cookie: 0,
        })
    }

    /// Packs as many records as fit into `buf`.
    ///
    /// Returns the number of bytes written; `0` means the listing is
    /// exhausted. A buffer too small for even one record is an
    /// `InvalidInput` error.
    pub fn read_batch(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;

        while let Some(next) = self.next_pending()? {
            let name = encode_name(&next.name);
            self.cookie += 1;
            match encode_record(&mut buf[written..], 0, self.cookie, next.file_type, &name) {
                Some(len) => written += len,
                None => {
                    self.cookie -= 1;
                    self.pending = Some(next);
                    if written == 0 {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "listing buffer too small for entry",
                        ));
                    }
                    break;
                }
            }
        }

        Ok(written)
    }

    fn next_pending(&mut self) -> io::Result<Option<Pending>> {
        if let Some(pending) = self.pending.take() {
            return Ok(Some(pending));
        }

        if self.dots_emitted < 2 {
            self.dots_emitted += 1;
            let name = if self.dots_emitted == 1 { "." } else { ".." };
            return Ok(Some(Pending {
                name: OsString::from(name),
                file_type: DT_DIR,
            }));
        }

        match self.entries.next() {
            None => Ok(None),
            Some(entry) => {
                let entry = entry?;
                let file_type = entry.file_type().map_or(DT_UNKNOWN, dtype_from_file_type);
                Ok(Some(Pending {
                    name: entry.file_name(),
                    file_type,
                }))
            }
        }
    }

    /// Stats `name` relative to this directory without following links.
    pub fn stat_entry(&self, name: &OsStr) -> io::Result<EntryStat> {
        let metadata = fs::symlink_metadata(self.path.join(name))?;
        Ok(entry_stat(&metadata))
    }

    /// Stats whatever `name` resolves to, following symbolic links.
    pub fn stat_target(&self, name: &OsStr) -> io::Result<EntryStat> {
        let metadata = fs::metadata(self.path.join(name))?;
        Ok(entry_stat(&metadata))
    }

    /// Releases the listing.
    pub fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

#[cfg(unix)]
fn encode_name(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn encode_name(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

fn dtype_from_file_type(file_type: FileType) -> u8 {
    if file_type.is_symlink() {
        DT_LNK
    } else if file_type.is_dir() {
        DT_DIR
    } else if file_type.is_file() {
        DT_REG
    } else {
        DT_UNKNOWN
    }
}

#[cfg(unix)]
fn entry_stat(metadata: &Metadata) -> EntryStat {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let changed = u64::try_from(metadata.ctime())
        .ok()
        .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs)));

    EntryStat {
        len: metadata.len(),
        mode: metadata.mode(),
        modified: metadata.modified().ok(),
        accessed: metadata.accessed().ok(),
        changed,
    }
}

#[cfg(not(unix))]
fn entry_stat(metadata: &Metadata) -> EntryStat {
    let kind = if metadata.file_type().is_symlink() {
        0o120_000
    } else if metadata.is_dir() {
        0o040_000
    } else {
        0o100_000
    };
    let perms = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };

    EntryStat {
        len: metadata.len(),
        mode: kind | perms,
        modified: metadata.modified().ok(),
        accessed: metadata.accessed().ok(),
        changed: None,
    }
}
