use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

pub use pattern::MatchType;

/// Attribute bits reported for an entry, using the Windows numbering.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FileAttributes(u32);

impl FileAttributes {
    /// No write permission bit is set.
    pub const READ_ONLY: Self = Self(0x0001);
    /// Name starts with `.` (and is not `.` or `..`).
    pub const HIDDEN: Self = Self(0x0002);
    /// Reserved for system files; never computed on Unix.
    pub const SYSTEM: Self = Self(0x0004);
    /// The entry is a directory.
    pub const DIRECTORY: Self = Self(0x0010);
    /// Archive bit; never computed on Unix.
    pub const ARCHIVE: Self = Self(0x0020);
    /// Character or block device.
    pub const DEVICE: Self = Self(0x0040);
    /// No other attribute applies.
    pub const NORMAL: Self = Self(0x0080);
    /// Temporary file; never computed on Unix.
    pub const TEMPORARY: Self = Self(0x0100);
    /// Sparse file; never computed on Unix.
    pub const SPARSE_FILE: Self = Self(0x0200);
    /// Symbolic link.
    pub const REPARSE_POINT: Self = Self(0x0400);
    /// Compressed file; never computed on Unix.
    pub const COMPRESSED: Self = Self(0x0800);
    /// Offline storage; never computed on Unix.
    pub const OFFLINE: Self = Self(0x1000);
    /// Excluded from content indexing; never computed on Unix.
    pub const NOT_CONTENT_INDEXED: Self = Self(0x2000);
    /// Encrypted file; never computed on Unix.
    pub const ENCRYPTED: Self = Self(0x4000);

    const NAMES: [(Self, &'static str); 14] = [
        (Self::READ_ONLY, "READ_ONLY"),
        (Self::HIDDEN, "HIDDEN"),
        (Self::SYSTEM, "SYSTEM"),
        (Self::DIRECTORY, "DIRECTORY"),
        (Self::ARCHIVE, "ARCHIVE"),
        (Self::DEVICE, "DEVICE"),
        (Self::NORMAL, "NORMAL"),
        (Self::TEMPORARY, "TEMPORARY"),
        (Self::SPARSE_FILE, "SPARSE_FILE"),
        (Self::REPARSE_POINT, "REPARSE_POINT"),
        (Self::COMPRESSED, "COMPRESSED"),
        (Self::OFFLINE, "OFFLINE"),
        (Self::NOT_CONTENT_INDEXED, "NOT_CONTENT_INDEXED"),
        (Self::ENCRYPTED, "ENCRYPTED"),
    ];

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates attributes from a raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw attribute value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// No bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for FileAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FileAttributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("FileAttributes(empty)");
        }

        f.write_str("FileAttributes(")?;
        let mut first = true;
        let mut known = 0;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
                known |= flag.0;
            }
        }
        let unknown = self.0 & !known;
        if unknown != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{unknown:#x}")?;
        }
        f.write_str(")")
    }
}

/// Tuning for one enumeration.
///
/// [`Default`] turns every switch off: no recursion, errors on inaccessible
/// directories, the standard buffer size, nothing skipped, Simple matching
/// ignoring case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnumerationOptions {
    recurse: bool,
    ignore_inaccessible: bool,
    buffer_size_hint: usize,
    attributes_to_skip: FileAttributes,
    match_type: MatchType,
    case_sensitive: bool,
    avoid_locking: bool,
}

impl EnumerationOptions {
    /// Options with every switch off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recurse: false,
            ignore_inaccessible: false,
            buffer_size_hint: 0,
            attributes_to_skip: FileAttributes::empty(),
            match_type: MatchType::Simple,
            case_sensitive: false,
            avoid_locking: false,
        }
    }

    /// Legacy-compatible options: [`MatchType::Dos`] with everything else off.
    #[must_use]
    pub const fn compatible() -> Self {
        Self::new().with_match_type(MatchType::Dos)
    }

    /// Descend into subdirectories.
    #[must_use]
    pub const fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Treat directories that cannot be opened for lack of permission as
    /// empty instead of failing.
    #[must_use]
    pub const fn with_ignore_inaccessible(mut self, ignore: bool) -> Self {
        self.ignore_inaccessible = ignore;
        self
    }

    /// Suggested listing buffer size in bytes; `0` selects the default.
    #[must_use]
    pub const fn with_buffer_size_hint(mut self, hint: usize) -> Self {
        self.buffer_size_hint = hint;
        self
    }

    /// Entries carrying any of these attributes are neither yielded nor
    /// recursed into.
    #[must_use]
    pub const fn with_attributes_to_skip(mut self, attributes: FileAttributes) -> Self {
        self.attributes_to_skip = attributes;
        self
    }

    /// Wildcard dialect applied to the search expression.
    #[must_use]
    pub const fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Compare names case-sensitively in Simple mode. Dos matching always
    /// ignores case.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Skip per-advance locking.
    ///
    /// Advancing requires `&mut` access, so an enumerator can never be
    /// advanced from two threads at once; the flag is accepted for
    /// configuration parity and has no further effect.
    #[must_use]
    pub const fn with_avoid_locking(mut self, avoid: bool) -> Self {
        self.avoid_locking = avoid;
        self
    }

    /// See [`with_recurse`](Self::with_recurse).
    #[must_use]
    pub const fn recurse(&self) -> bool {
        self.recurse
    }

    /// See [`with_ignore_inaccessible`](Self::with_ignore_inaccessible).
    #[must_use]
    pub const fn ignore_inaccessible(&self) -> bool {
        self.ignore_inaccessible
    }

    /// See [`with_buffer_size_hint`](Self::with_buffer_size_hint).
    #[must_use]
    pub const fn buffer_size_hint(&self) -> usize {
        self.buffer_size_hint
    }

    /// See [`with_attributes_to_skip`](Self::with_attributes_to_skip).
    #[must_use]
    pub const fn attributes_to_skip(&self) -> FileAttributes {
        self.attributes_to_skip
    }

    /// See [`with_match_type`](Self::with_match_type).
    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// See [`with_case_sensitive`](Self::with_case_sensitive).
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// See [`with_avoid_locking`](Self::with_avoid_locking).
    #[must_use]
    pub const fn avoid_locking(&self) -> bool {
        self.avoid_locking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_all_off() {
        let options = EnumerationOptions::default();
        assert_eq!(options, EnumerationOptions::new());
        assert!(!options.recurse());
        assert!(!options.ignore_inaccessible());
        assert_eq!(options.buffer_size_hint(), 0);
        assert!(options.attributes_to_skip().is_empty());
        assert_eq!(options.match_type(), MatchType::Simple);
        assert!(!options.case_sensitive());
        assert!(!options.avoid_locking());
    }

    #[test]
    fn compatible_options_use_dos_matching() {
        assert_eq!(EnumerationOptions::compatible().match_type(), MatchType::Dos);
    }

    #[test]
    fn attribute_set_operations() {
        let mut attrs = FileAttributes::DIRECTORY | FileAttributes::HIDDEN;
        assert!(attrs.contains(FileAttributes::DIRECTORY));
        assert!(attrs.intersects(FileAttributes::HIDDEN | FileAttributes::READ_ONLY));
        assert!(!attrs.contains(FileAttributes::HIDDEN | FileAttributes::READ_ONLY));

        attrs.remove(FileAttributes::HIDDEN);
        assert_eq!(attrs, FileAttributes::DIRECTORY);
        assert_eq!(attrs.as_raw(), 0x10);
        assert_eq!(
            (attrs & FileAttributes::HIDDEN),
            FileAttributes::empty()
        );
    }

    #[test]
    fn attributes_debug_lists_names() {
        let attrs = FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT;
        assert_eq!(
            format!("{attrs:?}"),
            "FileAttributes(DIRECTORY | REPARSE_POINT)"
        );
        assert_eq!(
            format!("{:?}", FileAttributes::from_raw(0x8_0000)),
            "FileAttributes(0x80000)"
        );
        assert_eq!(format!("{:?}", FileAttributes::empty()), "FileAttributes(empty)");
    }
}
