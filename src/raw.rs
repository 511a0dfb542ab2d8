//! The headerless codec: the same engine with sizes passed out of band.
//!
//! Nothing on the wire records sizes; the caller must carry the coded
//! length and the original length beside the payload. A coded payload is
//! always strictly smaller than its source, so a payload exactly as long
//! as its source is a verbatim copy.

#[cfg(feature = "decoder")]
use std::cmp::Ordering;

#[cfg(feature = "decoder")]
use crate::decoder_error::DecoderError;
#[cfg(feature = "encoder")]
use crate::encoder_error::EncoderError;
#[cfg(any(feature = "decoder", feature = "encoder"))]
use crate::model::FreqTable;
#[cfg(feature = "encoder")]
use crate::range_coder::compress;
#[cfg(feature = "decoder")]
use crate::range_coder::decompress;

/// Encodes `src` into `dst` without framing, returning the coded size.
///
/// `dst` must have room for `src.len()` bytes: when the model cannot
/// shrink the payload it is copied verbatim and the returned size equals
/// `src.len()`. Decoding needs both sizes, which never travel on the
/// wire.
///
/// # Arguments
/// * `src`   - Payload to compress.
/// * `dst`   - Destination buffer for the coded bytes.
/// * `table` - Probability model; the decoder must be given the same one.
///
#[cfg(feature = "encoder")]
pub fn encode(src: &[u8], dst: &mut [u8], table: &FreqTable) -> Result<usize, EncoderError> {
    if dst.len() < src.len() {
        return Err(EncoderError::BufferTooSmall {
            required: src.len(),
            available: dst.len(),
        });
    }

    if !src.is_empty() {
        let window = &mut dst[..src.len() - 1];
        if let Ok(coded) = compress(src, window, table) {
            return Ok(coded);
        }
    }

    dst[..src.len()].copy_from_slice(src);
    Ok(src.len())
}

/// Decodes `input` into all of `out`.
///
/// `input.len()` is the coded size and `out.len()` the original size, as
/// returned by and passed to `encode`. Equal sizes mean a verbatim
/// payload; a coded size above the original is rejected.
///
/// # Arguments
/// * `input` - Coded (or verbatim) payload bytes.
/// * `out`   - Destination buffer, sized to the original payload.
/// * `table` - Probability model the payload was encoded with.
///
#[cfg(feature = "decoder")]
pub fn decode(input: &[u8], out: &mut [u8], table: &FreqTable) -> Result<(), DecoderError> {
    match input.len().cmp(&out.len()) {
        Ordering::Greater => Err(DecoderError::InvalidFrame),
        Ordering::Equal => {
            out.copy_from_slice(input);
            Ok(())
        }
        Ordering::Less => decompress(input, out, table),
    }
}
