//! Incremental base64url decoding.
//!
//! Bodies arrive in arbitrary network chunks that rarely line up with the
//! 4-character groups of base64. The decoder keeps at most three leftover
//! characters between chunks and decodes everything else immediately, so
//! memory use follows the chunk size rather than the payload size.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{Error, Result};

/// Standard alphabet, accepting both padded and unpadded final groups.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Stateful base64url decoder driven by [`decode_chunk`](Self::decode_chunk)
/// for every incoming chunk and [`finish`](Self::finish) once at stream end.
///
/// Incoming bytes are base64url text. `-` and `_` are mapped back onto the
/// standard alphabet and line breaks are dropped before decoding.
///
/// # Examples
///
/// ```
/// use weft_fetch::Base64UrlDecoder;
///
/// let mut decoder = Base64UrlDecoder::new();
/// let mut out = decoder.decode_chunk(b"aGVsbG8").unwrap();
/// assert_eq!(decoder.pending_tail(), "bG8");
/// out.extend(decoder.finish().unwrap());
/// assert_eq!(out, b"hello");
/// ```
#[derive(Debug, Default)]
pub struct Base64UrlDecoder {
    pending_tail:    String,
    bytes_processed: u64,
}

impl Base64UrlDecoder {
    pub fn new() -> Self { Self::default() }

    /// Decode every complete 4-character group available after prepending the
    /// previous tail, holding back the rest.
    pub fn decode_chunk(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let mut combined = String::with_capacity(self.pending_tail.len() + chunk.len());
        combined.push_str(&self.pending_tail);

        for (offset, &byte) in chunk.iter().enumerate() {
            match byte {
                b'\r' | b'\n' => {}
                b'-' => combined.push('+'),
                b'_' => combined.push('/'),
                byte if byte.is_ascii() => combined.push(char::from(byte)),
                byte => return Err(base64::DecodeError::InvalidByte(offset, byte).into()),
            }
        }

        self.bytes_processed += chunk.len() as u64;

        let remainder = combined.len() % 4;
        let split = combined.len() - remainder;
        let decoded = STANDARD_LENIENT.decode(&combined[..split])?;
        self.pending_tail = combined.split_off(split);

        Ok(decoded)
    }

    /// Decode the held-back tail as the final, possibly unpadded, fragment.
    pub fn finish(self) -> Result<Vec<u8>> {
        match self.pending_tail.len() {
            0 => Ok(Vec::new()),
            1 => Err(Error::InvalidBase64Tail(1)),
            _ => Ok(STANDARD_LENIENT.decode(&self.pending_tail)?),
        }
    }

    /// Decode a complete base64url payload held in memory.
    pub fn decode_all(input: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = Self::new();
        let mut out = decoder.decode_chunk(input)?;
        out.extend(decoder.finish()?);
        Ok(out)
    }

    /// Raw input bytes consumed so far, line breaks included.
    pub fn bytes_processed(&self) -> u64 { self.bytes_processed }

    /// Characters carried over to the next chunk. Always shorter than 4.
    pub fn pending_tail(&self) -> &str { &self.pending_tail }
}
