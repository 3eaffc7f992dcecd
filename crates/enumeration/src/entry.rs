//! Borrowed view over the listing record being evaluated.

use std::cell::Cell;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use platform::dirent::{DT_BLK, DT_CHR, DT_DIR, DT_LNK, DT_UNKNOWN, RawRecord};
use platform::{DirectoryHandle, EntryStat};

use crate::options::FileAttributes;
use crate::paths;

/// The entry currently under evaluation.
///
/// A `FileSystemEntry` borrows the enumerator's listing buffer and is only
/// valid inside the include, recurse and transform callbacks. Metadata beyond
/// the name and type is read lazily with one `fstatat` call and cached for the
/// rest of the callback chain. A symbolic link's target is stated separately,
/// once, when the caller first asks whether the entry is a directory.
pub struct FileSystemEntry<'a> {
    record: RawRecord<'a>,
    directory: &'a Path,
    root_directory: &'a Path,
    original_root_directory: &'a Path,
    handle: &'a DirectoryHandle,
    stat: Cell<Option<EntryStat>>,
    link_to_directory: Cell<Option<bool>>,
}

impl<'a> FileSystemEntry<'a> {
    pub(crate) fn new(
        record: RawRecord<'a>,
        directory: &'a Path,
        root_directory: &'a Path,
        original_root_directory: &'a Path,
        handle: &'a DirectoryHandle,
    ) -> Self {
        Self {
            record,
            directory,
            root_directory,
            original_root_directory,
            handle,
            stat: Cell::new(None),
            link_to_directory: Cell::new(None),
        }
    }

    /// Name of the entry.
    pub fn file_name(&self) -> &'a OsStr {
        self.record.name()
    }

    /// Full path of the directory containing the entry.
    pub fn directory(&self) -> &'a Path {
        self.directory
    }

    /// Full path of the enumeration root.
    pub fn root_directory(&self) -> &'a Path {
        self.root_directory
    }

    /// Root directory exactly as the caller supplied it.
    pub fn original_root_directory(&self) -> &'a Path {
        self.original_root_directory
    }

    /// The name is exactly `.` or `..`.
    pub fn is_dot_or_dotdot(&self) -> bool {
        matches!(self.record.name_bytes(), b"." | b"..")
    }

    /// Listing type of the entry, stating it when the listing did not say.
    fn file_type(&self) -> u8 {
        match self.record.file_type() {
            DT_UNKNOWN => self.metadata().map_or(DT_UNKNOWN, |stat| stat.file_type()),
            known => known,
        }
    }

    /// The entry is a directory, or a symbolic link whose target is one.
    pub fn is_directory(&self) -> bool {
        match self.file_type() {
            DT_DIR => true,
            DT_LNK => self.links_to_directory(),
            _ => false,
        }
    }

    /// Resolves a link's target; dangling links are not directories.
    fn links_to_directory(&self) -> bool {
        if let Some(cached) = self.link_to_directory.get() {
            return cached;
        }
        let resolved = self
            .handle
            .stat_target(self.file_name())
            .is_ok_and(|target| target.file_type() == DT_DIR);
        self.link_to_directory.set(Some(resolved));
        resolved
    }

    /// The entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.file_type() == DT_LNK
    }

    /// The name starts with `.` and is not a pseudo-entry.
    pub fn is_hidden(&self) -> bool {
        self.record.name_bytes().first() == Some(&b'.') && !self.is_dot_or_dotdot()
    }

    /// Attributes derivable without reading metadata.
    pub(crate) fn basic_attributes(&self) -> FileAttributes {
        let mut attributes = FileAttributes::empty();
        match self.file_type() {
            DT_DIR => attributes.insert(FileAttributes::DIRECTORY),
            DT_LNK => {
                attributes.insert(FileAttributes::REPARSE_POINT);
                if self.links_to_directory() {
                    attributes.insert(FileAttributes::DIRECTORY);
                }
            }
            DT_CHR | DT_BLK => attributes.insert(FileAttributes::DEVICE),
            _ => {}
        }
        if self.is_hidden() {
            attributes.insert(FileAttributes::HIDDEN);
        }
        if attributes.is_empty() {
            attributes.insert(FileAttributes::NORMAL);
        }
        attributes
    }

    /// Full attribute set, including [`FileAttributes::READ_ONLY`].
    ///
    /// Computing `READ_ONLY` reads the entry's metadata; if that fails the bit
    /// is left clear.
    pub fn attributes(&self) -> FileAttributes {
        let mut attributes = self.basic_attributes();
        if self.metadata().is_ok_and(|stat| stat.is_readonly()) {
            attributes.remove(FileAttributes::NORMAL);
            attributes.insert(FileAttributes::READ_ONLY);
        }
        attributes
    }

    /// Entry metadata, read once without following symbolic links.
    pub fn metadata(&self) -> io::Result<EntryStat> {
        if let Some(stat) = self.stat.get() {
            return Ok(stat);
        }
        let stat = self.handle.stat_entry(self.file_name())?;
        self.stat.set(Some(stat));
        Ok(stat)
    }

    /// Size in bytes; `0` for directories.
    pub fn len(&self) -> io::Result<u64> {
        if self.is_directory() {
            return Ok(0);
        }
        self.metadata().map(|stat| stat.len)
    }

    /// Last modification time.
    pub fn modified(&self) -> io::Result<SystemTime> {
        timestamp(self.metadata()?.modified)
    }

    /// Last access time.
    pub fn accessed(&self) -> io::Result<SystemTime> {
        timestamp(self.metadata()?.accessed)
    }

    /// Last status change time.
    pub fn changed(&self) -> io::Result<SystemTime> {
        timestamp(self.metadata()?.changed)
    }

    /// [`directory`](Self::directory) joined with the name.
    pub fn to_full_path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }

    /// Path relative to the enumeration root.
    pub fn relative_path(&self) -> PathBuf {
        self.directory
            .strip_prefix(self.root_directory)
            .map_or_else(|_| PathBuf::new(), Path::to_path_buf)
            .join(self.file_name())
    }

    /// Path in the form the caller used for the root: the original root
    /// followed by [`relative_path`](Self::relative_path).
    pub fn to_specified_full_path(&self) -> PathBuf {
        match self.directory.strip_prefix(self.root_directory) {
            Ok(relative) => {
                paths::combine(self.original_root_directory, relative).join(self.file_name())
            }
            Err(_) => self.to_full_path(),
        }
    }
}

impl std::fmt::Debug for FileSystemEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemEntry")
            .field("name", &self.file_name())
            .field("directory", &self.directory)
            .field("file_type", &self.record.file_type())
            .finish_non_exhaustive()
    }
}

fn timestamp(value: Option<SystemTime>) -> io::Result<SystemTime> {
    value.ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "timestamp not available"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::dirent::{DT_REG, encode_record};
    use test_support::FileTree;

    fn with_entry<R>(
        tree: &FileTree,
        dir: &str,
        name: &str,
        file_type: u8,
        f: impl FnOnce(&FileSystemEntry<'_>) -> R,
    ) -> R {
        let directory = tree.join(dir);
        let handle = DirectoryHandle::open(&directory).expect("open");
        let mut buf = [0u8; 512];
        encode_record(&mut buf, 1, 1, file_type, name.as_bytes()).expect("encode");
        let record = RawRecord::parse(&buf).expect("parse");
        let original = Path::new("rel");
        let entry = FileSystemEntry::new(record, &directory, tree.path(), original, &handle);
        f(&entry)
    }

    #[test]
    fn dot_entries_are_recognised() {
        let tree = FileTree::new();
        assert!(with_entry(&tree, "", ".", DT_DIR, |e| e.is_dot_or_dotdot()));
        assert!(with_entry(&tree, "", "..", DT_DIR, |e| e.is_dot_or_dotdot()));
        assert!(!with_entry(&tree, "", "...", DT_DIR, |e| e.is_dot_or_dotdot()));
        assert!(!with_entry(&tree, "", ".", DT_DIR, |e| e.is_hidden()));
    }

    #[test]
    fn hidden_and_directory_attributes() {
        let tree = FileTree::new().dir(".cache");
        let attrs = with_entry(&tree, "", ".cache", DT_DIR, |e| e.attributes());
        assert_eq!(attrs, FileAttributes::DIRECTORY | FileAttributes::HIDDEN);
    }

    #[test]
    fn plain_file_is_normal() {
        let tree = FileTree::new().file("a.txt", "abc");
        with_entry(&tree, "", "a.txt", DT_REG, |entry| {
            assert_eq!(entry.attributes(), FileAttributes::NORMAL);
            assert_eq!(entry.len().expect("len"), 3);
            assert!(entry.modified().is_ok());
            assert!(!entry.is_directory());
        });
    }

    #[cfg(unix)]
    #[test]
    fn read_only_file_drops_normal() {
        use std::os::unix::fs::PermissionsExt;

        let tree = FileTree::new().file("ro.txt", "x");
        std::fs::set_permissions(tree.join("ro.txt"), std::fs::Permissions::from_mode(0o444))
            .expect("chmod");
        let attrs = with_entry(&tree, "", "ro.txt", DT_REG, |e| e.attributes());
        assert_eq!(attrs, FileAttributes::READ_ONLY);
    }

    #[test]
    fn unknown_type_is_resolved_by_stat() {
        let tree = FileTree::new().dir("sub");
        assert!(with_entry(&tree, "", "sub", DT_UNKNOWN, |e| e.is_directory()));
    }

    #[cfg(unix)]
    #[test]
    fn link_to_directory_reports_both_bits() {
        let tree = FileTree::new().dir("real").symlink("real", "link");
        with_entry(&tree, "", "link", DT_LNK, |entry| {
            assert!(entry.is_directory());
            assert!(entry.is_symlink());
            assert_eq!(entry.len().expect("len"), 0);
            assert_eq!(
                entry.attributes(),
                FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT
            );
        });
    }

    #[cfg(unix)]
    #[test]
    fn file_and_dangling_links_are_not_directories() {
        let tree = FileTree::new()
            .file("a.txt", "")
            .symlink("a.txt", "to-file")
            .symlink("missing", "dangling");
        for name in ["to-file", "dangling"] {
            let attrs = with_entry(&tree, "", name, DT_UNKNOWN, |entry| {
                assert!(!entry.is_directory());
                entry.attributes()
            });
            assert_eq!(attrs, FileAttributes::REPARSE_POINT);
        }
    }

    #[test]
    fn paths_are_projected_from_the_original_root() {
        let tree = FileTree::new().file("sub/b.txt", "");
        with_entry(&tree, "sub", "b.txt", DT_REG, |entry| {
            assert_eq!(entry.to_full_path(), tree.join("sub/b.txt"));
            assert_eq!(entry.relative_path(), PathBuf::from("sub/b.txt"));
            assert_eq!(entry.to_specified_full_path(), PathBuf::from("rel/sub/b.txt"));
            assert_eq!(entry.root_directory(), tree.path());
            assert_eq!(entry.original_root_directory(), Path::new("rel"));
            assert_eq!(entry.directory(), tree.join("sub"));
        });
    }
}
