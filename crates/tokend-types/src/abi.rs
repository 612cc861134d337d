//! Binary ABI codec.
//!
//! Little-endian encoding compatible with the ledger's action and table
//! serializer. Types opt in through [`AbiEncode`] and [`AbiDecode`]; the
//! free functions [`encode`] and [`decode`] cover the common case of a
//! single top-level value.

use tokend_error::{Result, TokenError};

/// Maximum number of bytes a `varuint32` may occupy.
const MAX_VARUINT32_BYTES: usize = 5;

/// Types that can be written in the ledger's binary format
pub trait AbiEncode {
    /// Appends the binary form of `self` to the encoder
    fn abi_encode(&self, encoder: &mut Encoder);
}

/// Types that can be read back from the ledger's binary format
pub trait AbiDecode: Sized {
    /// Reads one value from the decoder
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self>;
}

/// Encodes a value into a fresh byte vector
pub fn encode<T: AbiEncode + ?Sized>(value: &T) -> Vec<u8> {
    let mut encoder = Encoder::new();
    value.abi_encode(&mut encoder);
    encoder.into_bytes()
}

/// Decodes a value, rejecting trailing bytes
pub fn decode<T: AbiDecode>(bytes: &[u8]) -> Result<T> {
    let mut decoder = Decoder::new(bytes);
    let value = T::abi_decode(&mut decoder)?;
    if decoder.remaining() != 0 {
        return Err(TokenError::AbiError(format!(
            "{} trailing bytes after value",
            decoder.remaining()
        )));
    }
    Ok(value)
}

/// Growable output buffer
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates an empty encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a single byte
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Writes a little-endian u32
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian u64
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian i64
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a LEB128 varuint32
    pub fn write_varuint32(&mut self, mut value: u32) {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    /// Writes length-prefixed raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_varuint32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a length-prefixed UTF-8 string
    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the encoder, returning the bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over encoded input
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(TokenError::AbiError(format!(
                "unexpected end of input: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Reads a little-endian u64
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Reads a little-endian i64
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Reads a LEB128 varuint32
    pub fn read_varuint32(&mut self) -> Result<u32> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARUINT32_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return u32::try_from(value)
                    .map_err(|_| TokenError::AbiError("varuint32 out of range".to_string()));
            }
        }
        Err(TokenError::AbiError("varuint32 too long".to_string()))
    }

    /// Reads length-prefixed raw bytes
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varuint32()? as usize;
        self.take(len)
    }

    /// Reads a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

impl AbiEncode for u8 {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(*self);
    }
}

impl AbiDecode for u8 {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.read_u8()
    }
}

impl AbiEncode for u32 {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u32(*self);
    }
}

impl AbiDecode for u32 {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.read_u32()
    }
}

impl AbiEncode for u64 {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_u64(*self);
    }
}

impl AbiDecode for u64 {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.read_u64()
    }
}

impl AbiEncode for i64 {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_i64(*self);
    }
}

impl AbiDecode for i64 {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.read_i64()
    }
}

impl AbiEncode for str {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_str(self);
    }
}

impl AbiEncode for String {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_str(self);
    }
}

impl AbiDecode for String {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.read_string()
    }
}

impl<T: AbiEncode> AbiEncode for Vec<T> {
    fn abi_encode(&self, encoder: &mut Encoder) {
        encoder.write_varuint32(self.len() as u32);
        for item in self {
            item.abi_encode(encoder);
        }
    }
}

impl<T: AbiDecode> AbiDecode for Vec<T> {
    fn abi_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let len = decoder.read_varuint32()? as usize;
        // every item takes at least one byte, so a larger count is corrupt
        if len > decoder.remaining() {
            return Err(TokenError::AbiError(format!(
                "vector length {} exceeds remaining {} bytes",
                len,
                decoder.remaining()
            )));
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::abi_decode(decoder)?);
        }
        Ok(items)
    }
}

impl<T: AbiEncode + ?Sized> AbiEncode for &T {
    fn abi_encode(&self, encoder: &mut Encoder) {
        (**self).abi_encode(encoder);
    }
}
