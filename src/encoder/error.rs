use thiserror::Error;

/// Possible errors that can arise during encoding.
///
/// Any failure aborts the whole encode; no partial byte sequence is ever
/// returned to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncoderError {
    /// A key or cstring payload contained an embedded null byte, which the
    /// null-terminated wire representation cannot carry.
    #[error("cstrings cannot contain null bytes: {0:?}")]
    InvalidCString(String),

    /// Growing the output buffer failed because the allocation could not be
    /// satisfied.
    #[error("failed to allocate encode buffer")]
    OutOfMemory,

    /// The encoded form of a document would exceed `i32::MAX` bytes, which
    /// its length prefix cannot express.
    #[error("document of size {size} exceeds the maximum encodable size")]
    DocumentTooLarge { size: usize },
}

/// Alias for `Result<T, EncoderError>`.
pub type EncoderResult<T> = Result<T, EncoderError>;
