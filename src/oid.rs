//! Module containing functionality related to BSON ObjectIds.

use std::fmt;

use thiserror::Error;

const TIMESTAMP_SIZE: usize = 4;
const MACHINE_ID_SIZE: usize = 3;
const PROCESS_ID_SIZE: usize = 2;
const COUNTER_SIZE: usize = 3;

const TIMESTAMP_OFFSET: usize = 0;
const MACHINE_ID_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const PROCESS_ID_OFFSET: usize = MACHINE_ID_OFFSET + MACHINE_ID_SIZE;
const COUNTER_OFFSET: usize = PROCESS_ID_OFFSET + PROCESS_ID_SIZE;

/// Errors that can occur during ObjectId construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invalid character was found in the provided hex string. Valid
    /// characters are: `0...9`, `a...f`, or `A...F`.
    #[error("invalid character '{c}' in ObjectId hex string at index {index}")]
    InvalidHexStringCharacter { c: char, index: usize },

    /// An `ObjectId`'s hex string representation must be an exactly 12-byte
    /// (24-char) hexadecimal string.
    #[error("invalid hex string length {length}, expected 24")]
    InvalidHexStringLength { length: usize },
}

/// Alias for `Result<T, oid::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// A wrapper around a raw 12-byte ObjectId.
///
/// The codec treats the 12 bytes as opaque; how new ids are generated is the
/// caller's concern. The byte layout (4-byte big-endian seconds since the
/// epoch, 3-byte machine id, 2-byte process id, 3-byte counter) is exposed
/// through read-only accessors.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ObjectId {
    id: [u8; 12],
}

impl ObjectId {
    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Creates an ObjectId from a 24-character hexadecimal string. Input is
    /// accepted in either case; the canonical output form is lowercase.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();

        if s.len() != 24 {
            return Err(Error::InvalidHexStringLength { length: s.len() });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                Error::InvalidHexStringCharacter { c, index }
            }
            // Length was checked above; odd-length and invalid-length cases
            // cannot be reached with a 24-char input.
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                Error::InvalidHexStringLength { length: s.len() }
            }
        })?;

        Ok(ObjectId::from_bytes(bytes))
    }

    /// Returns the raw byte representation of this ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Converts this ObjectId to its canonical 24-character lowercase hex
    /// string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }

    /// Retrieves the timestamp (seconds since the epoch) from this ObjectId.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.id[0], self.id[1], self.id[2], self.id[3]])
    }

    /// Retrieves the machine id associated with this ObjectId.
    pub fn machine_id(&self) -> u32 {
        let b = &self.id[MACHINE_ID_OFFSET..MACHINE_ID_OFFSET + MACHINE_ID_SIZE];
        u32::from_le_bytes([b[0], b[1], b[2], 0])
    }

    /// Retrieves the process id associated with this ObjectId.
    pub fn process_id(&self) -> u16 {
        let b = &self.id[PROCESS_ID_OFFSET..PROCESS_ID_OFFSET + PROCESS_ID_SIZE];
        u16::from_le_bytes([b[0], b[1]])
    }

    /// Retrieves the increment counter from this ObjectId.
    pub fn counter(&self) -> u32 {
        let b = &self.id[COUNTER_OFFSET..COUNTER_OFFSET + COUNTER_SIZE];
        u32::from_be_bytes([0, b[0], b[1], b[2]])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        ObjectId::from_bytes(bytes)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}
