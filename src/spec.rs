//! BSON element types and binary subtypes.

/// All available BSON element types.
///
/// Each variant's discriminant is the tag byte that precedes the element's
/// key on the wire. The deprecated kinds are kept so that documents produced
/// by old writers still decode.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    /// 64-bit binary floating point
    Double = 0x01,
    /// UTF-8 string
    String = 0x02,
    /// Embedded document
    EmbeddedDocument = 0x03,
    /// Array
    Array = 0x04,
    /// Binary data
    Binary = 0x05,
    /// Deprecated. Undefined (value)
    Undefined = 0x06,
    /// ObjectId
    ObjectId = 0x07,
    /// Boolean value
    Boolean = 0x08,
    /// UTC datetime
    DateTime = 0x09,
    /// Null value
    Null = 0x0A,
    /// Regular expression
    RegularExpression = 0x0B,
    /// Deprecated. DBPointer
    DbPointer = 0x0C,
    /// Deprecated. JavaScript code stored without a scope document
    LegacyJavaScriptCode = 0x0D,
    /// JavaScript code
    JavaScriptCode = 0x0F,
    /// 32-bit signed integer
    Int32 = 0x10,
    /// Timestamp (internal replication format, seconds + increment)
    Timestamp = 0x11,
    /// 64-bit signed integer
    Int64 = 0x12,
    /// Max key
    MaxKey = 0x7F,
    /// Min key (tag byte -1 when read as a signed byte)
    MinKey = 0xFF,
}

impl ElementType {
    /// Attempt to convert from the wire tag byte. Returns `None` for tags
    /// outside the known set; the decoder turns that into an
    /// unrecognized-type error rather than guessing at a payload layout.
    pub fn from(tag: u8) -> Option<ElementType> {
        use self::ElementType::*;
        Some(match tag {
            0x01 => Double,
            0x02 => String,
            0x03 => EmbeddedDocument,
            0x04 => Array,
            0x05 => Binary,
            0x06 => Undefined,
            0x07 => ObjectId,
            0x08 => Boolean,
            0x09 => DateTime,
            0x0A => Null,
            0x0B => RegularExpression,
            0x0C => DbPointer,
            0x0D => LegacyJavaScriptCode,
            0x0F => JavaScriptCode,
            0x10 => Int32,
            0x11 => Timestamp,
            0x12 => Int64,
            0x7F => MaxKey,
            0xFF => MinKey,
            _ => return None,
        })
    }
}

const BINARY_SUBTYPE_GENERIC: u8 = 0x00;
const BINARY_SUBTYPE_FUNCTION: u8 = 0x01;
const BINARY_SUBTYPE_BINARY_OLD: u8 = 0x02;
const BINARY_SUBTYPE_UUID_OLD: u8 = 0x03;
const BINARY_SUBTYPE_UUID: u8 = 0x04;
const BINARY_SUBTYPE_MD5: u8 = 0x05;
const BINARY_SUBTYPE_USER_DEFINED: u8 = 0x80;

/// The subtype byte carried by a binary element, immediately after its
/// length prefix.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinarySubtype {
    Generic,
    Function,
    BinaryOld,
    UuidOld,
    Uuid,
    Md5,
    UserDefined(u8),
    Reserved(u8),
}

impl From<BinarySubtype> for u8 {
    fn from(t: BinarySubtype) -> u8 {
        match t {
            BinarySubtype::Generic => BINARY_SUBTYPE_GENERIC,
            BinarySubtype::Function => BINARY_SUBTYPE_FUNCTION,
            BinarySubtype::BinaryOld => BINARY_SUBTYPE_BINARY_OLD,
            BinarySubtype::UuidOld => BINARY_SUBTYPE_UUID_OLD,
            BinarySubtype::Uuid => BINARY_SUBTYPE_UUID,
            BinarySubtype::Md5 => BINARY_SUBTYPE_MD5,
            BinarySubtype::UserDefined(x) => x,
            BinarySubtype::Reserved(x) => x,
        }
    }
}

impl From<u8> for BinarySubtype {
    fn from(t: u8) -> BinarySubtype {
        match t {
            BINARY_SUBTYPE_GENERIC => BinarySubtype::Generic,
            BINARY_SUBTYPE_FUNCTION => BinarySubtype::Function,
            BINARY_SUBTYPE_BINARY_OLD => BinarySubtype::BinaryOld,
            BINARY_SUBTYPE_UUID_OLD => BinarySubtype::UuidOld,
            BINARY_SUBTYPE_UUID => BinarySubtype::Uuid,
            BINARY_SUBTYPE_MD5 => BinarySubtype::Md5,
            _ if t >= BINARY_SUBTYPE_USER_DEFINED => BinarySubtype::UserDefined(t),
            _ => BinarySubtype::Reserved(t),
        }
    }
}
