//! Binary-encoded automaton positions.
//!
//! A `State` is a growable byte buffer written and read at explicit offsets.
//! Handlers define fixed layouts on top of it (an index byte, a bitset, a tag
//! name...). Equality, ordering and hashing are byte-wise, so a `State` is
//! directly usable as a frontier key; its lowercase hex rendering is the
//! canonical textual form.
//!
//! Layout conventions:
//! - multi-byte numbers are little-endian
//! - strings are a `u32` count of UTF-16 code units followed by the units
//! - bitsets occupy `ceil(bits / 8)` bytes, bit `i` lives in byte `i / 8`
//!
//! Reads past the logical end yield zeroes. Offsets are trusted: only handler
//! code builds states, and each handler validates its own layout.

use std::fmt;
use std::str::FromStr;

/// Default initial capacity of a fresh state, in bytes.
pub const DEFAULT_CAPACITY: usize = 16;

/// Opaque, growable, byte-wise comparable automaton position.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    bytes: Vec<u8>,
}

impl State {
    /// Create an empty state with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty state able to hold `capacity` bytes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Create a state holding exactly `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Logical size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reset the logical size to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Overwrite every logical byte with `value`.
    pub fn fill(&mut self, value: u8) {
        self.bytes.fill(value);
    }

    /// Replace this state's content with a copy of `other`.
    pub fn copy_from(&mut self, other: &State) {
        self.bytes.clear();
        self.bytes.extend_from_slice(&other.bytes);
    }

    /// Lowercase hexadecimal rendering, two digits per byte.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Make `[offset, offset + size)` addressable, zero-filling new bytes.
    ///
    /// Growth doubles the allocation so repeated pushes stay amortized O(1).
    fn reserve_range(&mut self, offset: usize, size: usize) -> &mut [u8] {
        let end = offset + size;
        if end > self.bytes.len() {
            if end > self.bytes.capacity() {
                let doubled = self.bytes.capacity().max(1) * 2;
                self.bytes.reserve(doubled.max(end) - self.bytes.len());
            }
            self.bytes.resize(end, 0);
        }
        &mut self.bytes[offset..end]
    }

    fn read<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if offset < self.bytes.len() {
            let available = (self.bytes.len() - offset).min(N);
            out[..available].copy_from_slice(&self.bytes[offset..offset + available]);
        }
        out
    }

    // ------------------------------------------------------------------
    // Bits
    // ------------------------------------------------------------------

    /// Append a zeroed bitset able to hold `bits` bits. Returns its offset.
    pub fn push_bitset(&mut self, bits: usize) -> usize {
        let offset = self.bytes.len();
        self.reserve_range(offset, bitset_size(bits));
        offset
    }

    /// Set bit `bit` of the bitset starting at `cursor`.
    pub fn enable(&mut self, cursor: usize, bit: usize) {
        self.reserve_range(cursor + bit / 8, 1)[0] |= 1 << (bit % 8);
    }

    /// Clear bit `bit` of the bitset starting at `cursor`.
    pub fn disable(&mut self, cursor: usize, bit: usize) {
        self.reserve_range(cursor + bit / 8, 1)[0] &= !(1 << (bit % 8));
    }

    pub fn set_bit(&mut self, cursor: usize, bit: usize, value: bool) {
        if value {
            self.enable(cursor, bit);
        } else {
            self.disable(cursor, bit);
        }
    }

    pub fn get_bit(&self, cursor: usize, bit: usize) -> bool {
        self.get_u8(cursor + bit / 8) & (1 << (bit % 8)) != 0
    }

    // ------------------------------------------------------------------
    // Booleans and integers
    // ------------------------------------------------------------------

    pub fn push_bool(&mut self, value: bool) -> usize {
        self.push_u8(value as u8)
    }

    pub fn set_bool(&mut self, offset: usize, value: bool) {
        self.set_u8(offset, value as u8);
    }

    pub fn get_bool(&self, offset: usize) -> bool {
        self.get_u8(offset) != 0
    }

    pub fn push_u8(&mut self, value: u8) -> usize {
        let offset = self.bytes.len();
        self.set_u8(offset, value);
        offset
    }

    pub fn set_u8(&mut self, offset: usize, value: u8) {
        self.reserve_range(offset, 1)[0] = value;
    }

    pub fn get_u8(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    pub fn push_u16(&mut self, value: u16) -> usize {
        let offset = self.bytes.len();
        self.set_u16(offset, value);
        offset
    }

    pub fn set_u16(&mut self, offset: usize, value: u16) {
        self.reserve_range(offset, 2)
            .copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.read(offset))
    }

    pub fn push_u32(&mut self, value: u32) -> usize {
        let offset = self.bytes.len();
        self.set_u32(offset, value);
        offset
    }

    pub fn set_u32(&mut self, offset: usize, value: u32) {
        self.reserve_range(offset, 4)
            .copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.read(offset))
    }

    // ------------------------------------------------------------------
    // Floats
    // ------------------------------------------------------------------

    pub fn push_f32(&mut self, value: f32) -> usize {
        let offset = self.bytes.len();
        self.set_f32(offset, value);
        offset
    }

    pub fn set_f32(&mut self, offset: usize, value: f32) {
        self.reserve_range(offset, 4)
            .copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_f32(&self, offset: usize) -> f32 {
        f32::from_le_bytes(self.read(offset))
    }

    pub fn push_f64(&mut self, value: f64) -> usize {
        let offset = self.bytes.len();
        self.set_f64(offset, value);
        offset
    }

    pub fn set_f64(&mut self, offset: usize, value: f64) {
        self.reserve_range(offset, 8)
            .copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_f64(&self, offset: usize) -> f64 {
        f64::from_le_bytes(self.read(offset))
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Append a length-prefixed UTF-16 string. Returns its offset.
    pub fn push_string(&mut self, value: &str) -> usize {
        let offset = self.bytes.len();
        self.set_string(offset, value);
        offset
    }

    /// Write a length-prefixed UTF-16 string at `offset`.
    ///
    /// Bytes following a shorter previous string are left as they were.
    pub fn set_string(&mut self, offset: usize, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.set_u32(offset, units.len() as u32);
        let payload = self.reserve_range(offset + 4, units.len() * 2);
        for (chunk, unit) in payload.chunks_exact_mut(2).zip(&units) {
            chunk.copy_from_slice(&unit.to_le_bytes());
        }
    }

    /// Decode the string stored at `offset`. Unpaired surrogates are replaced.
    pub fn get_string(&self, offset: usize) -> String {
        let count = self.get_u32(offset) as usize;
        let units: Vec<u16> = (0..count)
            .map(|i| self.get_u16(offset + 4 + i * 2))
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Bytes occupied by the string record at `offset`, prefix included.
    pub fn string_size(&self, offset: usize) -> usize {
        4 + self.get_u32(offset) as usize * 2
    }
}

/// Number of bytes needed to store `bits` bits.
#[inline]
pub fn bitset_size(bits: usize) -> usize {
    bits.div_ceil(8)
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({self})")
    }
}

/// Error returned when parsing a state from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseStateError {
    #[error("state hex has odd length {0}")]
    OddLength(usize),

    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() % 2 != 0 {
            return Err(ParseStateError::OddLength(s.len()));
        }
        let digits: Vec<u8> = s
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(ParseStateError::InvalidDigit(c))
            })
            .collect::<Result<_, _>>()?;
        let bytes: Vec<u8> = digits
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        Ok(Self { bytes })
    }
}
