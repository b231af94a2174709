use std::borrow::Cow;
use std::fmt;

/// Fixed-capacity, zero-initialised byte buffer handed to the driver as a
/// C string output argument.
///
/// The capacity includes the terminator, so at most `capacity - 1` content
/// bytes are ever held. `len` always points at the first zero byte.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundedBuf {
    bytes: Box<[u8]>,
    len: usize,
}

impl BoundedBuf {
    /// # Panics
    ///
    /// If `capacity` is zero; a C string buffer needs room for the terminator.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must leave room for the terminator");
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zeroes the whole buffer.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.len = 0;
    }

    /// Replaces the contents with `src`, cut to `capacity - 1` bytes, and
    /// terminates. Returns the number of bytes kept.
    pub fn write_truncated(&mut self, src: &[u8]) -> usize {
        let copy_len = std::cmp::min(src.len(), self.capacity() - 1);
        self.bytes[..copy_len].copy_from_slice(&src[..copy_len]);
        self.bytes[copy_len..].fill(0);
        self.len = copy_len;
        copy_len
    }

    /// Whole backing storage, for a driver to write into. Call [`seal`]
    /// afterwards.
    ///
    /// [`seal`]: BoundedBuf::seal
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Re-derives the length after a foreign write. The last byte is forced to
    /// zero so a driver that filled the buffer without a terminator still
    /// yields a bounded string.
    pub fn seal(&mut self) {
        let last = self.capacity() - 1;
        self.bytes[last] = 0;
        self.len = self.bytes.iter().position(|&b| b == 0).unwrap_or(last);
    }

    /// Content bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl fmt::Debug for BoundedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuf")
            .field("capacity", &self.capacity())
            .field("contents", &self.to_string_lossy())
            .finish()
    }
}
