//! Numeric property identifiers understood by the engine.

use std::fmt;

macro_rules! property_ids {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)+) => {
        /// Identifier of an archive-level or item-level property.
        ///
        /// Values are the engine's numeric identifiers and form a contiguous
        /// ascending range from [`PropertyId::NoProperty`] to
        /// [`PropertyId::CopyLink`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u32)]
        pub enum PropertyId {
            $($(#[$meta])* $name = $value,)+
        }

        impl PropertyId {
            /// Every known identifier, in ascending numeric order.
            pub const ALL: &'static [Self] = &[$(Self::$name,)+];

            /// Looks up an identifier by its numeric value.
            #[must_use]
            pub const fn from_u32(value: u32) -> Option<Self> {
                match value {
                    $($value => Some(Self::$name),)+
                    _ => None,
                }
            }

            /// Returns the identifier's name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)+
                }
            }
        }
    };
}

property_ids! {
    /// Placeholder identifier; engines report nothing for it.
    NoProperty = 0,
    /// Index of the main sub-file.
    MainSubfile = 1,
    /// Handler-specific item index.
    HandlerItemIndex = 2,
    /// Item path relative to the archive root.
    Path = 3,
    /// Item name.
    Name = 4,
    /// Item extension.
    Extension = 5,
    /// Whether the item is a directory.
    IsDir = 6,
    /// Uncompressed size.
    Size = 7,
    /// Packed size.
    PackSize = 8,
    /// File attributes.
    Attrib = 9,
    /// Creation time.
    CTime = 10,
    /// Last access time.
    ATime = 11,
    /// Last modification time.
    MTime = 12,
    /// Whether the archive or item is solid.
    Solid = 13,
    /// Whether the item carries a comment.
    Commented = 14,
    /// Whether the item is encrypted.
    Encrypted = 15,
    /// Item continues from a previous volume.
    SplitBefore = 16,
    /// Item continues in the next volume.
    SplitAfter = 17,
    /// Dictionary size.
    DictionarySize = 18,
    /// CRC checksum.
    Crc = 19,
    /// Archive type.
    Type = 20,
    /// Anti-item (deletion marker).
    IsAnti = 21,
    /// Compression method.
    Method = 22,
    /// Host operating system.
    HostOs = 23,
    /// File system.
    FileSystem = 24,
    /// Owner user.
    User = 25,
    /// Owner group.
    Group = 26,
    /// Block index.
    Block = 27,
    /// Comment.
    Comment = 28,
    /// Position.
    Position = 29,
    /// Path prefix.
    Prefix = 30,
    /// Number of sub-directories.
    NumSubDirs = 31,
    /// Number of sub-files.
    NumSubFiles = 32,
    /// Version needed to unpack.
    UnpackVer = 33,
    /// Volume.
    Volume = 34,
    /// Whether the archive is a volume.
    IsVolume = 35,
    /// Offset.
    Offset = 36,
    /// Link count.
    Links = 37,
    /// Number of blocks.
    NumBlocks = 38,
    /// Number of volumes.
    NumVolumes = 39,
    /// Timestamp type.
    TimeType = 40,
    /// 64-bit flag.
    Bit64 = 41,
    /// Big-endian flag.
    BigEndian = 42,
    /// CPU.
    Cpu = 43,
    /// Physical size.
    PhySize = 44,
    /// Headers size.
    HeadersSize = 45,
    /// Checksum.
    Checksum = 46,
    /// Characteristics.
    Characts = 47,
    /// Virtual address.
    Va = 48,
    /// Identifier.
    Id = 49,
    /// Short name.
    ShortName = 50,
    /// Creator application.
    CreatorApp = 51,
    /// Sector size.
    SectorSize = 52,
    /// POSIX attributes.
    PosixAttrib = 53,
    /// Symbolic link target.
    SymLink = 54,
    /// Error.
    Error = 55,
    /// Total size.
    TotalSize = 56,
    /// Free space.
    FreeSpace = 57,
    /// Cluster size.
    ClusterSize = 58,
    /// Volume name.
    VolumeName = 59,
    /// Local name.
    LocalName = 60,
    /// Provider.
    Provider = 61,
    /// NT security descriptor.
    NtSecure = 62,
    /// Alternate stream flag.
    IsAltStream = 63,
    /// Auxiliary item flag.
    IsAux = 64,
    /// Deleted item flag.
    IsDeleted = 65,
    /// Tree flag.
    IsTree = 66,
    /// SHA-1 digest.
    Sha1 = 67,
    /// SHA-256 digest.
    Sha256 = 68,
    /// Error type.
    ErrorType = 69,
    /// Number of errors.
    NumErrors = 70,
    /// Error flags.
    ErrorFlags = 71,
    /// Warning flags.
    WarningFlags = 72,
    /// Warning.
    Warning = 73,
    /// Number of streams.
    NumStreams = 74,
    /// Number of alternate streams.
    NumAltStreams = 75,
    /// Alternate streams size.
    AltStreamsSize = 76,
    /// Virtual size.
    VirtualSize = 77,
    /// Unpacked size.
    UnpackSize = 78,
    /// Total physical size.
    TotalPhySize = 79,
    /// Volume index.
    VolumeIndex = 80,
    /// Sub-type.
    SubType = 81,
    /// Short comment.
    ShortComment = 82,
    /// Code page.
    CodePage = 83,
    /// Not-an-archive-type flag.
    IsNotArcType = 84,
    /// Physical size cannot be detected.
    PhySizeCantBeDetected = 85,
    /// Zero tail is allowed.
    ZerosTailIsAllowed = 86,
    /// Tail size.
    TailSize = 87,
    /// Embedded stub size.
    EmbeddedStubSize = 88,
    /// NT reparse data.
    NtReparse = 89,
    /// Hard link target.
    HardLink = 90,
    /// Inode number.
    INode = 91,
    /// Stream identifier.
    StreamId = 92,
    /// Read-only flag.
    ReadOnly = 93,
    /// Output name.
    OutName = 94,
    /// Copy link.
    CopyLink = 95,
}

impl PropertyId {
    /// Returns the numeric identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
