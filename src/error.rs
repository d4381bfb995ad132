//! The closed error taxonomy, as a `thiserror` enum.
//!
//! Library code returns `Result<T, Error>` throughout; the CLI boundary
//! (`cli`/`main`) wraps these in `anyhow::Result` at the edge.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("truncated or non-conforming bytes")]
    MalformedInput,

    #[error("bad magic bytes, expected \"TEVd\"")]
    BadMagic,

    #[error("archive-level CRC mismatch")]
    ArchiveCorrupt,

    #[error("entry {0} failed its CRC check")]
    EntryCorrupt(i32),

    #[error("unknown entry kind byte 0x{0:02x}")]
    UnknownEntryKind(u8),

    #[error("directory cannot hold more than 65535 children")]
    DirectoryFull,

    #[error("payload length exceeds 2^48-1 bytes")]
    PayloadTooLarge,

    #[error("path already exists: {0}")]
    AlreadyExists(String),

    #[error("path component {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("handle {0} does not exist")]
    NoSuchHandle(i32),

    #[error("io failure: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("commit failed: {0}")]
    CommitFailed(String),
}
