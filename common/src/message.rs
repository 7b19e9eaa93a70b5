//! Inbound configuration messages.
//!
//! Messages from the companion app arrive as a packed dictionary:
//!
//! ```text
//! u8 count
//! count x { u32 key (LE) | u8 type | u16 length (LE) | length value bytes }
//! ```
//!
//! Tuple types: 0 byte array, 1 C string (NUL terminated, NUL counted in
//! `length`), 2 unsigned integer, 3 signed integer. Integers are 1, 2 or 4
//! bytes, little-endian.
//!
//! Parsing borrows from the input buffer and never allocates.

use core::fmt;

use heapless::Vec;

/// Maximum number of tuples accepted in one message.
pub const MAX_TUPLES: usize = 8;

/// Size of a tuple header (key + type + length).
const TUPLE_HEADER_LEN: usize = 7;

// =============================================================================
// Errors
// =============================================================================

/// Why a message could not be decoded or encoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictError {
    /// Input ended inside a header or value.
    Truncated,
    /// Tuple type byte is not one of the four known types.
    UnknownType(u8),
    /// Integer tuple with a length other than 1, 2 or 4.
    BadIntWidth(u16),
    /// C string without a terminating NUL or with invalid UTF-8.
    InvalidString,
    /// More tuples than [`MAX_TUPLES`], or the output buffer is full.
    Overflow,
}

impl fmt::Display for DictError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "message truncated"),
            Self::UnknownType(t) => write!(f, "unknown tuple type {t}"),
            Self::BadIntWidth(len) => write!(f, "integer tuple of {len} bytes"),
            Self::InvalidString => write!(f, "malformed string tuple"),
            Self::Overflow => write!(f, "too many tuples"),
        }
    }
}

impl core::error::Error for DictError {}

// =============================================================================
// Tuples
// =============================================================================

/// Decoded value of one tuple.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TupleValue<'a> {
    Bytes(&'a [u8]),
    Str(&'a str),
    Uint(u32),
    Int(i32),
}

impl TupleValue<'_> {
    /// Integer payload reinterpreted as `i32`; `None` for bytes and strings.
    pub const fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::Uint(v) => Some(v as i32),
            Self::Int(v) => Some(v),
            Self::Bytes(_) | Self::Str(_) => None,
        }
    }

    const fn type_byte(&self) -> u8 {
        match self {
            Self::Bytes(_) => 0,
            Self::Str(_) => 1,
            Self::Uint(_) => 2,
            Self::Int(_) => 3,
        }
    }
}

/// One key/value pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: TupleValue<'a>,
}

// =============================================================================
// Decoding
// =============================================================================

/// A decoded message.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Dictionary<'a> {
    tuples: Vec<Tuple<'a>, MAX_TUPLES>,
}

impl<'a> Dictionary<'a> {
    /// Decode a packed message. Trailing bytes after the last tuple are ignored.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DictError> {
        let (&count, mut rest) = bytes.split_first().ok_or(DictError::Truncated)?;
        let mut tuples = Vec::new();

        for _ in 0..count {
            let (header, tail) = rest.split_at_checked(TUPLE_HEADER_LEN).ok_or(DictError::Truncated)?;
            let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let kind = header[4];
            let len = u16::from_le_bytes([header[5], header[6]]);
            let (raw, tail) = tail.split_at_checked(usize::from(len)).ok_or(DictError::Truncated)?;

            let value = decode_value(kind, raw)?;
            tuples.push(Tuple { key, value }).map_err(|_| DictError::Overflow)?;
            rest = tail;
        }

        Ok(Self { tuples })
    }

    /// First tuple with the given key.
    pub fn find(
        &self,
        key: u32,
    ) -> Option<&Tuple<'a>> {
        self.tuples.iter().find(|t| t.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple<'a>> { self.tuples.iter() }

    #[inline]
    pub fn len(&self) -> usize { self.tuples.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.tuples.is_empty() }
}

fn decode_value(
    kind: u8,
    raw: &[u8],
) -> Result<TupleValue<'_>, DictError> {
    match kind {
        0 => Ok(TupleValue::Bytes(raw)),
        1 => {
            let (&last, text) = raw.split_last().ok_or(DictError::InvalidString)?;
            if last != 0 {
                return Err(DictError::InvalidString);
            }
            core::str::from_utf8(text)
                .map(TupleValue::Str)
                .map_err(|_| DictError::InvalidString)
        }
        2 => match *raw {
            [a] => Ok(TupleValue::Uint(u32::from(a))),
            [a, b] => Ok(TupleValue::Uint(u32::from(u16::from_le_bytes([a, b])))),
            [a, b, c, d] => Ok(TupleValue::Uint(u32::from_le_bytes([a, b, c, d]))),
            _ => Err(DictError::BadIntWidth(raw.len() as u16)),
        },
        3 => match *raw {
            [a] => Ok(TupleValue::Int(i32::from(a as i8))),
            [a, b] => Ok(TupleValue::Int(i32::from(i16::from_le_bytes([a, b])))),
            [a, b, c, d] => Ok(TupleValue::Int(i32::from_le_bytes([a, b, c, d]))),
            _ => Err(DictError::BadIntWidth(raw.len() as u16)),
        },
        other => Err(DictError::UnknownType(other)),
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Builds a packed message into a fixed-capacity buffer of `N` bytes.
pub struct DictionaryBuilder<const N: usize> {
    buf: Vec<u8, N>,
    count: u8,
}

impl<const N: usize> DictionaryBuilder<N> {
    /// Start an empty message.
    pub fn new() -> Self {
        let mut buf = Vec::new();
        // count placeholder, patched on every push
        buf.push(0).ok();
        Self { buf, count: 0 }
    }

    /// Append a tuple. Integers are always written as 4 bytes. A tuple that
    /// does not fit leaves the message unchanged.
    pub fn push(
        &mut self,
        key: u32,
        value: TupleValue<'_>,
    ) -> Result<&mut Self, DictError> {
        if self.buf.is_empty() || usize::from(self.count) >= MAX_TUPLES {
            return Err(DictError::Overflow);
        }
        let len = match value {
            TupleValue::Bytes(b) => b.len(),
            TupleValue::Str(s) => s.len() + 1,
            TupleValue::Uint(_) | TupleValue::Int(_) => 4,
        };
        if self.buf.len() + TUPLE_HEADER_LEN + len > N {
            return Err(DictError::Overflow);
        }
        let len = u16::try_from(len).map_err(|_| DictError::Overflow)?;

        self.extend(&key.to_le_bytes())?;
        self.extend(&[value.type_byte()])?;
        self.extend(&len.to_le_bytes())?;
        match value {
            TupleValue::Bytes(b) => self.extend(b)?,
            TupleValue::Str(s) => {
                self.extend(s.as_bytes())?;
                self.extend(&[0])?;
            }
            TupleValue::Uint(v) => self.extend(&v.to_le_bytes())?,
            TupleValue::Int(v) => self.extend(&v.to_le_bytes())?,
        }

        self.count += 1;
        self.buf[0] = self.count;
        Ok(self)
    }

    /// Append a signed integer tuple.
    pub fn push_int(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<&mut Self, DictError> {
        self.push(key, TupleValue::Int(value))
    }

    /// The encoded bytes so far.
    pub fn as_bytes(&self) -> &[u8] { &self.buf }

    fn extend(
        &mut self,
        bytes: &[u8],
    ) -> Result<(), DictError> {
        self.buf.extend_from_slice(bytes).map_err(|_| DictError::Overflow)
    }
}

impl<const N: usize> Default for DictionaryBuilder<N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_int() {
        let bytes = [1, 0, 0, 0, 0, 3, 4, 0, 0x55, 0xAA, 0xFF, 0x00];
        let dict = Dictionary::parse(&bytes).unwrap();
        assert_eq!(dict.len(), 1);
        let tuple = dict.find(0).unwrap();
        assert_eq!(tuple.value, TupleValue::Int(0x00FF_AA55));
        assert_eq!(tuple.value.as_i32(), Some(0xFFAA55));
    }

    #[test]
    fn test_parse_narrow_integers() {
        let bytes = [
            3, //
            1, 0, 0, 0, 3, 1, 0, 0xFF, // int8 -1
            2, 0, 0, 0, 2, 2, 0, 0x34, 0x12, // uint16
            3, 0, 0, 0, 3, 2, 0, 0x00, 0x80, // int16 min
        ];
        let dict = Dictionary::parse(&bytes).unwrap();
        assert_eq!(dict.find(1).unwrap().value, TupleValue::Int(-1));
        assert_eq!(dict.find(2).unwrap().value, TupleValue::Uint(0x1234));
        assert_eq!(dict.find(3).unwrap().value, TupleValue::Int(-32768));
    }

    #[test]
    fn test_parse_string_and_bytes() {
        let bytes = [2, 7, 0, 0, 0, 1, 3, 0, b'h', b'i', 0, 8, 0, 0, 0, 0, 2, 0, 9, 9];
        let dict = Dictionary::parse(&bytes).unwrap();
        assert_eq!(dict.find(7).unwrap().value, TupleValue::Str("hi"));
        assert_eq!(dict.find(8).unwrap().value, TupleValue::Bytes(&[9, 9]));
        assert_eq!(dict.find(7).unwrap().value.as_i32(), None);
    }

    #[test]
    fn test_parse_empty_message() {
        let dict = Dictionary::parse(&[0]).unwrap();
        assert!(dict.is_empty());
        assert!(dict.find(0).is_none());
        assert_eq!(Dictionary::parse(&[]), Err(DictError::Truncated));
    }

    #[test]
    fn test_parse_errors() {
        // header cut short
        assert_eq!(Dictionary::parse(&[1, 0, 0, 0]), Err(DictError::Truncated));
        // value shorter than declared
        assert_eq!(Dictionary::parse(&[1, 0, 0, 0, 0, 3, 4, 0, 1, 2]), Err(DictError::Truncated));
        assert_eq!(Dictionary::parse(&[1, 0, 0, 0, 0, 9, 0, 0]), Err(DictError::UnknownType(9)));
        assert_eq!(Dictionary::parse(&[1, 0, 0, 0, 0, 3, 3, 0, 1, 2, 3]), Err(DictError::BadIntWidth(3)));
        assert_eq!(Dictionary::parse(&[1, 0, 0, 0, 0, 1, 2, 0, b'a', b'b']), Err(DictError::InvalidString));
    }

    #[test]
    fn test_parse_too_many_tuples() {
        let mut bytes = [0u8; 1 + (MAX_TUPLES + 1) * 7];
        bytes[0] = (MAX_TUPLES + 1) as u8;
        assert_eq!(Dictionary::parse(&bytes), Err(DictError::Overflow));
    }

    #[test]
    fn test_builder_output_parses() {
        let mut builder = DictionaryBuilder::<64>::new();
        builder.push_int(0, 0x00AA_FF).unwrap();
        builder.push(5, TupleValue::Str("red")).unwrap();
        let dict = Dictionary::parse(builder.as_bytes()).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.find(0).unwrap().value.as_i32(), Some(0x00AA_FF));
        assert_eq!(dict.find(5).unwrap().value, TupleValue::Str("red"));
    }

    #[test]
    fn test_builder_overflow() {
        let mut builder = DictionaryBuilder::<10>::new();
        assert_eq!(builder.push_int(0, 1).err(), Some(DictError::Overflow));
    }

    #[test]
    fn test_first_duplicate_key_wins() {
        let mut builder = DictionaryBuilder::<32>::new();
        builder.push_int(0, 1).unwrap().push_int(0, 2).unwrap();
        let dict = Dictionary::parse(builder.as_bytes()).unwrap();
        assert_eq!(dict.find(0).unwrap().value, TupleValue::Int(1));
    }
}
