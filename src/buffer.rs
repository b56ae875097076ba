//! The growable byte buffer backing one encode operation.

use crate::encoder::{EncoderError, EncoderResult};

/// Past this capacity, growth switches from doubling to exact-fit so that a
/// very large document does not strand almost as much memory again in slack.
const LARGE_BUFFER_THRESHOLD: usize = 1024 * 1024;

/// Smallest capacity the first reservation will allocate.
const MIN_CAPACITY: usize = 64;

/// An append-only byte buffer with explicit, fallible capacity management
/// and random-access patching of already-written bytes.
///
/// The write position is the current length; previously written bytes are
/// only revisited through [`patch_i32_at`](BsonBuf::patch_i32_at), which the
/// encoder uses to backpatch document length prefixes once the full extent
/// of a (possibly nested) document is known.
///
/// A `BsonBuf` is exclusively owned by one encode operation; the finished
/// bytes transfer to the caller via [`into_vec`](BsonBuf::into_vec).
#[derive(Debug, Default)]
pub(crate) struct BsonBuf {
    data: Vec<u8>,
}

impl BsonBuf {
    pub(crate) fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// The current write position, measured from the start of the buffer.
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Ensures capacity for at least `additional` more bytes.
    ///
    /// Doubles the current capacity until it covers the requested size; once
    /// the needed size crosses [`LARGE_BUFFER_THRESHOLD`] the new capacity is
    /// exactly the needed size instead. A failed allocation is reported as
    /// [`EncoderError::OutOfMemory`], never a partial or silent failure.
    pub(crate) fn reserve(&mut self, additional: usize) -> EncoderResult<()> {
        let needed = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(EncoderError::OutOfMemory)?;
        if needed <= self.data.capacity() {
            return Ok(());
        }

        let mut new_cap = self.data.capacity().max(MIN_CAPACITY);
        while new_cap < needed {
            new_cap = new_cap.saturating_mul(2);
        }
        if needed > LARGE_BUFFER_THRESHOLD {
            new_cap = needed;
        }

        self.data
            .try_reserve_exact(new_cap - self.data.len())
            .map_err(|_| EncoderError::OutOfMemory)
    }

    /// Appends `bytes` at the write position and advances it.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> EncoderResult<()> {
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends a single byte.
    pub(crate) fn push(&mut self, byte: u8) -> EncoderResult<()> {
        self.reserve(1)?;
        self.data.push(byte);
        Ok(())
    }

    pub(crate) fn write_i32(&mut self, val: i32) -> EncoderResult<()> {
        self.append(&val.to_le_bytes())
    }

    pub(crate) fn write_i64(&mut self, val: i64) -> EncoderResult<()> {
        self.append(&val.to_le_bytes())
    }

    pub(crate) fn write_f64(&mut self, val: f64) -> EncoderResult<()> {
        self.append(&val.to_le_bytes())
    }

    /// Overwrites the 4 bytes at `offset` with `val` in little-endian order.
    ///
    /// `offset + 4` must not exceed the current write position.
    pub(crate) fn patch_i32_at(&mut self, offset: usize, val: i32) {
        self.data[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Consumes the buffer, handing the finished bytes to the caller.
    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
