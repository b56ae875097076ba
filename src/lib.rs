//! BSON is a binary format in which zero or more key/value pairs are stored
//! as a single entity, called a document. This library implements version
//! 1.0 of the [BSON standard](http://bsonspec.org/spec.html): an ordered
//! [`Document`] value model, a single-pass encoder, and a validating
//! decoder.
//!
//! ## Basic usage
//!
//! ```rust
//! use bsonlite::{decode_document, doc, encode_document};
//!
//! let doc = doc! {
//!     "name" => "example",
//!     "count" => 42,
//!     "tags" => ["a", "b"],
//! };
//!
//! let bytes = encode_document(&doc).unwrap();
//! let decoded = decode_document(&bytes).unwrap();
//! assert_eq!(decoded, doc);
//! ```
//!
//! ## Untrusted input
//!
//! The decoder validates every length prefix, rejects unknown type tags, and
//! bounds both nesting depth and total document size; see [`DecodeOptions`]
//! for the knobs. Callers wanting bounded decode latency should additionally
//! cap the size of the byte buffers they feed in.

pub use self::{
    bson::{Array, Binary, Bson, DbPointer, Regex, Timestamp},
    datetime::DateTime,
    decoder::{
        decode_document,
        decode_document_with_options,
        DecodeOptions,
        DecoderError,
        DecoderResult,
    },
    document::{Document, ValueAccessError, ValueAccessResult},
    encoder::{encode_document, EncoderError, EncoderResult},
};

#[macro_use]
pub mod macros;
mod bson;
mod buffer;
pub mod datetime;
mod decoder;
mod document;
mod encoder;
pub mod oid;
pub mod spec;
