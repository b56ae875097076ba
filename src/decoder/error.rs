use thiserror::Error;

/// Possible errors that can arise during decoding.
///
/// Any failure aborts the whole decode; no partial document is ever
/// returned. Malformed input will not become valid on retry, so nothing is
/// retried internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecoderError {
    /// The length prefix of a document (or of one of its elements) is
    /// inconsistent with the actual content, or the input is truncated.
    #[error("malformed BSON document: {message}")]
    MalformedDocument { message: String },

    /// A tag byte outside the known set was encountered. The payload layout
    /// of an unknown tag is unknowable, so decoding cannot continue.
    #[error("unrecognized element type tag {tag:#04x}")]
    UnrecognizedElementType { tag: u8 },

    /// Documents were nested more deeply than the configured limit allows.
    #[error("document exceeds the maximum nesting depth of {max_depth}")]
    TooDeeplyNested { max_depth: usize },

    /// The document's declared size exceeds the configured maximum.
    #[error("document of size {size} exceeds the maximum of {max_size}")]
    DocumentTooLarge { size: usize, max_size: usize },

    /// An array element's key was not its decimal 0-based position.
    #[error("invalid array key: expected index {expected}, got {got:?}")]
    InvalidArrayKey { expected: usize, got: String },

    /// A key or string payload contained invalid UTF-8.
    #[error("invalid UTF-8")]
    Utf8,
}

/// Alias for `Result<T, DecoderError>`.
pub type DecoderResult<T> = Result<T, DecoderError>;

impl DecoderError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        DecoderError::MalformedDocument {
            message: message.into(),
        }
    }
}
