//! Decoder

mod error;

pub use self::error::{DecoderError, DecoderResult};

use crate::{
    bson::{Array, Bson, Regex},
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
    Document,
};

/// The smallest valid document: a length prefix of exactly 5 and the
/// trailing null.
pub(crate) const MIN_BSON_DOCUMENT_SIZE: usize = 5;

const DEFAULT_MAX_DEPTH: usize = 100;

/// Default maximum declared document size: the 16 MiB cap used by the wire
/// protocol this format usually travels over.
const DEFAULT_MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Limits applied while decoding untrusted input.
///
/// Both limits exist to bound resource use on adversarial input: the size
/// limit rejects documents before anything is parsed, and the depth limit
/// stops deeply nested documents from exhausting the stack.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// Maximum nesting depth of embedded documents and arrays. The top-level
    /// document is depth 0. Defaults to 100.
    pub max_depth: usize,

    /// Maximum declared size of the top-level document in bytes. Defaults to
    /// 16 MiB.
    pub max_document_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

/// Attempt to decode a `Document` from its BSON byte representation, using
/// the default [`DecodeOptions`].
///
/// ```
/// use bsonlite::{decode_document, doc, encode_document};
///
/// let doc = doc! { "hi" => 5 };
/// let bytes = encode_document(&doc).unwrap();
/// assert_eq!(decode_document(&bytes).unwrap(), doc);
/// ```
pub fn decode_document(bytes: &[u8]) -> DecoderResult<Document> {
    decode_document_with_options(bytes, &DecodeOptions::default())
}

/// Attempt to decode a `Document` from its BSON byte representation.
///
/// Input past the document's declared length is ignored, so a document can be
/// decoded out of a larger message buffer. Any inconsistency between the
/// declared lengths and the actual content fails the whole decode; a partial
/// document is never returned.
pub fn decode_document_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> DecoderResult<Document> {
    let mut reader = Reader::new(bytes);
    decode_document_inner(&mut reader, 0, options)
}

/// A read cursor over the input slice. All multi-byte reads are checked and
/// convert from little-endian wire order in this one place.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> DecoderResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                DecoderError::malformed(format!(
                    "needed {} bytes but only {} remain",
                    n,
                    self.remaining()
                ))
            })?;

        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> DecoderResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_i32(&mut self) -> DecoderResult<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().expect("4 bytes")))
    }

    fn read_i64(&mut self) -> DecoderResult<i64> {
        let bytes = self.read_bytes(8)?;
        Ok(i64::from_le_bytes(bytes.try_into().expect("8 bytes")))
    }

    fn read_f64(&mut self) -> DecoderResult<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().expect("8 bytes")))
    }

    fn read_objectid(&mut self) -> DecoderResult<ObjectId> {
        let bytes = self.read_bytes(12)?;
        Ok(ObjectId::from_bytes(bytes.try_into().expect("12 bytes")))
    }

    /// Reads a null-terminated UTF-8 string, consuming the terminator.
    fn read_cstring(&mut self) -> DecoderResult<&'a str> {
        let start = self.pos;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| DecoderError::malformed("unterminated cstring"))?;

        let s = simdutf8::basic::from_utf8(&self.bytes[start..start + len])
            .map_err(|_| DecoderError::Utf8)?;
        self.pos = start + len + 1;
        Ok(s)
    }

    /// Reads a length-prefixed string, validating that the declared length
    /// matches the actual null-terminated extent.
    fn read_string(&mut self) -> DecoderResult<&'a str> {
        let len = self.read_i32()?;
        if len < 1 {
            return Err(DecoderError::malformed(format!(
                "invalid string length {}",
                len
            )));
        }

        let bytes = self.read_bytes(len as usize)?;
        if bytes[bytes.len() - 1] != 0 {
            return Err(DecoderError::malformed(
                "string not null terminated at its declared length",
            ));
        }

        simdutf8::basic::from_utf8(&bytes[..bytes.len() - 1]).map_err(|_| DecoderError::Utf8)
    }
}

/// Reads and validates a document's length prefix, returning the position
/// just past the document's declared end.
fn read_document_header(
    reader: &mut Reader<'_>,
    depth: usize,
    options: &DecodeOptions,
) -> DecoderResult<usize> {
    if depth > options.max_depth {
        return Err(DecoderError::TooDeeplyNested {
            max_depth: options.max_depth,
        });
    }

    let start = reader.pos;
    let length = reader.read_i32()?;
    if length < MIN_BSON_DOCUMENT_SIZE as i32 {
        return Err(DecoderError::malformed(format!(
            "document length {} is below the 5-byte minimum",
            length
        )));
    }

    let length = length as usize;
    if depth == 0 && length > options.max_document_size {
        return Err(DecoderError::DocumentTooLarge {
            size: length,
            max_size: options.max_document_size,
        });
    }

    let end = start
        .checked_add(length)
        .ok_or_else(|| DecoderError::malformed("document length overflows"))?;
    if end > reader.bytes.len() {
        return Err(DecoderError::malformed(format!(
            "document length {} exceeds the {} remaining input bytes",
            length,
            reader.bytes.len() - start
        )));
    }

    Ok(end)
}

/// Verifies that element parsing consumed exactly the declared extent.
fn check_document_end(reader: &Reader<'_>, end: usize) -> DecoderResult<()> {
    if reader.pos != end {
        return Err(DecoderError::malformed(format!(
            "parsing ended at byte {} but the declared length ends at byte {}",
            reader.pos, end
        )));
    }
    Ok(())
}

fn decode_document_inner(
    reader: &mut Reader<'_>,
    depth: usize,
    options: &DecodeOptions,
) -> DecoderResult<Document> {
    let end = read_document_header(reader, depth, options)?;
    let mut doc = Document::new();

    loop {
        let tag = reader.read_u8()?;
        if tag == 0 {
            break;
        }

        let key = reader.read_cstring()?;
        let val = decode_bson(reader, tag, depth, options)?;
        doc.insert(key, val);
    }

    check_document_end(reader, end)?;
    Ok(doc)
}

fn decode_array_inner(
    reader: &mut Reader<'_>,
    depth: usize,
    options: &DecodeOptions,
) -> DecoderResult<Array> {
    let end = read_document_header(reader, depth, options)?;
    let mut arr = Array::new();

    loop {
        let tag = reader.read_u8()?;
        if tag == 0 {
            break;
        }

        // array keys must be the canonical decimal element index, in order;
        // signs and leading zeros are not valid index keys
        let key = reader.read_cstring()?;
        if key != arr.len().to_string() {
            return Err(DecoderError::InvalidArrayKey {
                expected: arr.len(),
                got: key.to_owned(),
            });
        }

        arr.push(decode_bson(reader, tag, depth, options)?);
    }

    check_document_end(reader, end)?;
    Ok(arr)
}

fn decode_bson(
    reader: &mut Reader<'_>,
    tag: u8,
    depth: usize,
    options: &DecodeOptions,
) -> DecoderResult<Bson> {
    use self::ElementType::*;

    let element_type =
        ElementType::from(tag).ok_or(DecoderError::UnrecognizedElementType { tag })?;

    Ok(match element_type {
        Double => Bson::Double(reader.read_f64()?),
        String => Bson::String(reader.read_string()?.to_owned()),
        EmbeddedDocument => Bson::Document(decode_document_inner(reader, depth + 1, options)?),
        Array => Bson::Array(decode_array_inner(reader, depth + 1, options)?),
        Binary => {
            let len = reader.read_i32()?;
            if len < 0 {
                return Err(DecoderError::malformed(format!(
                    "invalid binary length {}",
                    len
                )));
            }

            let subtype = BinarySubtype::from(reader.read_u8()?);
            let bytes = reader.read_bytes(len as usize)?.to_vec();
            Bson::Binary(crate::bson::Binary { subtype, bytes })
        }
        Undefined => Bson::Undefined,
        ObjectId => Bson::ObjectId(reader.read_objectid()?),
        Boolean => Bson::Boolean(reader.read_u8()? != 0),
        DateTime => Bson::DateTime(crate::datetime::DateTime::from_millis(reader.read_i64()?)),
        Null => Bson::Null,
        RegularExpression => {
            let pattern = reader.read_cstring()?.to_owned();
            let options = reader.read_cstring()?.to_owned();
            Bson::RegularExpression(Regex { pattern, options })
        }
        DbPointer => {
            let namespace = reader.read_string()?.to_owned();
            let id = reader.read_objectid()?;
            Bson::DbPointer(crate::bson::DbPointer { namespace, id })
        }
        LegacyJavaScriptCode => Bson::LegacyJavaScriptCode(reader.read_string()?.to_owned()),
        JavaScriptCode => Bson::JavaScriptCode(reader.read_string()?.to_owned()),
        Int32 => Bson::Int32(reader.read_i32()?),
        Timestamp => Bson::Timestamp(crate::bson::Timestamp::from_i64(reader.read_i64()?)),
        Int64 => Bson::Int64(reader.read_i64()?),
        MaxKey => Bson::MaxKey,
        MinKey => Bson::MinKey,
    })
}
