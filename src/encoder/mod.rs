//! Encoder

mod error;

pub use self::error::{EncoderError, EncoderResult};

use crate::{
    bson::{Binary, Bson, DbPointer, Regex},
    buffer::BsonBuf,
    Document,
};

/// Writes a length-prefixed string: an int32 of the UTF-8 byte length plus
/// one for the trailing null, then the bytes, then the null.
///
/// Unlike keys, string payloads may contain null bytes; the length prefix
/// disambiguates them.
fn write_string(buf: &mut BsonBuf, s: &str) -> EncoderResult<()> {
    if s.len() >= i32::MAX as usize {
        return Err(EncoderError::DocumentTooLarge { size: s.len() });
    }

    buf.write_i32(s.len() as i32 + 1)?;
    buf.append(s.as_bytes())?;
    buf.push(0)
}

/// Writes a null-terminated string, rejecting embedded null bytes.
fn write_cstring(buf: &mut BsonBuf, s: &str) -> EncoderResult<()> {
    if s.as_bytes().contains(&0) {
        return Err(EncoderError::InvalidCString(s.to_owned()));
    }

    buf.append(s.as_bytes())?;
    buf.push(0)
}

/// Attempt to encode a `Document` into its BSON byte representation.
///
/// The returned vector is wholly owned by the caller. On error nothing is
/// returned; there are no partial encodes.
///
/// ```
/// use bsonlite::{doc, encode_document};
///
/// let bytes = encode_document(&doc! { "hi" => 5 }).unwrap();
/// assert_eq!(i32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize, bytes.len());
/// ```
pub fn encode_document(doc: &Document) -> EncoderResult<Vec<u8>> {
    let mut buf = BsonBuf::new();
    encode_document_into(&mut buf, doc)?;
    Ok(buf.into_vec())
}

/// Encodes one document (or array body) at the buffer's write position.
///
/// The total length of a nested structure is only known after recursing into
/// it, so a placeholder length is written up front and backpatched once the
/// trailing null is down. This keeps encoding single-pass for arbitrarily
/// nested documents, with no separate size-calculation traversal.
fn encode_document_into(buf: &mut BsonBuf, doc: &Document) -> EncoderResult<()> {
    let length_slot = buf.len();
    buf.write_i32(0)?;

    for (key, val) in doc.iter() {
        encode_bson(buf, key, val)?;
    }

    buf.push(0)?;
    backpatch_length(buf, length_slot)
}

fn encode_array_into(buf: &mut BsonBuf, arr: &[Bson]) -> EncoderResult<()> {
    let length_slot = buf.len();
    buf.write_i32(0)?;

    for (index, val) in arr.iter().enumerate() {
        encode_bson(buf, &index.to_string(), val)?;
    }

    buf.push(0)?;
    backpatch_length(buf, length_slot)
}

fn backpatch_length(buf: &mut BsonBuf, length_slot: usize) -> EncoderResult<()> {
    let size = buf.len() - length_slot;
    if size > i32::MAX as usize {
        return Err(EncoderError::DocumentTooLarge { size });
    }

    buf.patch_i32_at(length_slot, size as i32);
    Ok(())
}

fn encode_bson(buf: &mut BsonBuf, key: &str, val: &Bson) -> EncoderResult<()> {
    buf.push(val.element_type() as u8)?;
    write_cstring(buf, key)?;

    match *val {
        Bson::Double(v) => buf.write_f64(v),
        Bson::String(ref v) => write_string(buf, v),
        Bson::Array(ref v) => encode_array_into(buf, v),
        Bson::Document(ref v) => encode_document_into(buf, v),
        Bson::Boolean(v) => buf.push(v as u8),
        Bson::RegularExpression(Regex {
            ref pattern,
            ref options,
        }) => {
            write_cstring(buf, pattern)?;
            write_cstring(buf, options)
        }
        Bson::JavaScriptCode(ref code) | Bson::LegacyJavaScriptCode(ref code) => {
            write_string(buf, code)
        }
        Bson::ObjectId(ref id) => buf.append(&id.bytes()),
        Bson::Int32(v) => buf.write_i32(v),
        Bson::Int64(v) => buf.write_i64(v),
        Bson::Timestamp(ts) => buf.write_i64(ts.to_i64()),
        Bson::Binary(Binary { subtype, ref bytes }) => {
            if bytes.len() > i32::MAX as usize {
                return Err(EncoderError::DocumentTooLarge { size: bytes.len() });
            }
            buf.write_i32(bytes.len() as i32)?;
            buf.push(subtype.into())?;
            buf.append(bytes)
        }
        Bson::DateTime(dt) => buf.write_i64(dt.timestamp_millis()),
        Bson::Null | Bson::Undefined | Bson::MinKey | Bson::MaxKey => Ok(()),
        Bson::DbPointer(DbPointer {
            ref namespace,
            ref id,
        }) => {
            write_string(buf, namespace)?;
            buf.append(&id.bytes())
        }
    }
}
