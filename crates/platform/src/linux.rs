//! `getdents64`/`fstatat` backed directory handles.

use std::ffi::{CString, OsStr};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::stat::EntryStat;

/// An open directory positioned for listing.
///
/// The descriptor is closed exactly once: by [`close`](Self::close) when the
/// caller wants the result, otherwise on drop.
#[derive(Debug)]
pub struct DirectoryHandle {
    fd: OwnedFd,
}

impl DirectoryHandle {
    /// Opens `path` for listing with `O_DIRECTORY | O_CLOEXEC`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file: File = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_DIRECTORY)
            .open(path)?;
        Ok(Self { fd: file.into() })
    }

    /// Reads the next batch of records into `buf`.
    ///
    /// Returns the number of bytes written; `0` means the listing is
    /// exhausted.
    pub fn read_batch(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            // SAFETY: the descriptor is open for the lifetime of `self` and
            // the kernel writes at most `buf.len()` bytes into `buf`.
            let read = unsafe {
                libc::syscall(
                    libc::SYS_getdents64,
                    self.fd.as_raw_fd(),
                    buf.as_mut_ptr().cast::<libc::c_void>(),
                    buf.len(),
                )
            };

            if read >= 0 {
                return Ok(read as usize);
            }

            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    /// Stats `name` relative to this directory without following links.
    pub fn stat_entry(&self, name: &OsStr) -> io::Result<EntryStat> {
        self.stat_at(name, libc::AT_SYMLINK_NOFOLLOW)
    }

    /// Stats whatever `name` resolves to, following symbolic links.
    pub fn stat_target(&self, name: &OsStr) -> io::Result<EntryStat> {
        self.stat_at(name, 0)
    }

    fn stat_at(&self, name: &OsStr, flags: libc::c_int) -> io::Result<EntryStat> {
        let c_name = CString::new(name.as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: `libc::stat` is plain old data; zeroed is a valid value.
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        // SAFETY: `c_name` is NUL terminated and `st` is a valid out pointer.
        let ret = unsafe { libc::fstatat(self.fd.as_raw_fd(), c_name.as_ptr(), &raw mut st, flags) };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(EntryStat {
            len: st.st_size as u64,
            mode: st.st_mode,
            modified: timestamp(i64::from(st.st_mtime), i64::from(st.st_mtime_nsec)),
            accessed: timestamp(i64::from(st.st_atime), i64::from(st.st_atime_nsec)),
            changed: timestamp(i64::from(st.st_ctime), i64::from(st.st_ctime_nsec)),
        })
    }

    /// Closes the descriptor and reports the result of `close(2)`.
    pub fn close(self) -> io::Result<()> {
        let fd = self.fd.into_raw_fd();
        // SAFETY: ownership of `fd` was released above, so it is closed once.
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

fn timestamp(secs: i64, nsecs: i64) -> Option<SystemTime> {
    let nanos = u32::try_from(nsecs).ok()?;
    if secs >= 0 {
        UNIX_EPOCH.checked_add(Duration::new(secs as u64, nanos))
    } else {
        UNIX_EPOCH
            .checked_sub(Duration::from_secs(secs.unsigned_abs()))?
            .checked_add(Duration::from_nanos(u64::from(nanos)))
    }
}
