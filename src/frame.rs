//! The framed codec: a two-byte header in front of the payload.
//!
//! The header records the original size and the stored size, each as one
//! byte. A stored size of `0xFF` marks a verbatim payload, taken whenever
//! arithmetic coding cannot shrink the source. A coded payload is
//! therefore always strictly smaller than the data it decodes to, and
//! the frame never exceeds the source by more than the header.

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

/// Bytes of framing in front of the payload.
pub const HEADER_LEN: usize = 2;

/// Longest payload a frame can describe.
pub const MAX_PAYLOAD: usize = 0xFF;

/// Marker in the stored-size field of a frame whose payload is verbatim.
const LITERAL: u8 = 0xFF;

/// Encodes `src` into a framed packet in `dst`, returning the frame
/// length.
///
/// `src` may hold at most [`MAX_PAYLOAD`] bytes and `dst` must have room
/// for `src.len() + HEADER_LEN`, the worst case, reached whenever the
/// payload is stored verbatim. That fallback is taken when a source byte
/// has a zero frequency in the model, when the coded payload would not be
/// smaller than the source, or when the source is no longer than one
/// byte.
///
/// # Arguments
/// * `src`   - Payload to compress.
/// * `dst`   - Destination buffer for the frame.
/// * `table` - Probability model; the decoder must be given the same one.
///
#[cfg(feature = "encoder")]
pub fn encode(src: &[u8], dst: &mut [u8], table: &FreqTable) -> Result<usize, EncoderError> {
    if src.len() > MAX_PAYLOAD {
        return Err(EncoderError::PayloadTooLarge { size: src.len() });
    }
    let worst_case = src.len() + HEADER_LEN;
    if dst.len() < worst_case {
        return Err(EncoderError::BufferTooSmall {
            required: worst_case,
            available: dst.len(),
        });
    }

    dst[0] = src.len() as u8;

    if src.len() > 1 {
        // The window is one byte short of the source on purpose: a frame
        // only counts as coded when the payload shrank.
        let window = &mut dst[HEADER_LEN..HEADER_LEN + src.len() - 1];
        if let Ok(coded) = compress(src, window, table) {
            dst[1] = coded as u8;
            return Ok(HEADER_LEN + coded);
        }
    }

    dst[1] = LITERAL;
    dst[HEADER_LEN..worst_case].copy_from_slice(src);
    Ok(worst_case)
}

/// Decodes a framed packet into `out`, returning the original size.
///
/// A failed decode leaves unspecified bytes in `out`, but never any
/// beyond the declared original size.
///
/// # Arguments
/// * `frame` - The packet, starting with its header.
/// * `out`   - Destination buffer, at least as large as the original
///             payload.
/// * `table` - Probability model the frame was encoded with.
///
#[cfg(feature = "decoder")]
pub fn decode(frame: &[u8], out: &mut [u8], table: &FreqTable) -> Result<usize, DecoderError> {
    if frame.len() < HEADER_LEN {
        return Err(DecoderError::Truncated);
    }
    let original = usize::from(frame[0]);
    let stored = frame[1];

    if out.len() < original {
        return Err(DecoderError::OutputBufferTooSmall {
            required: original,
            available: out.len(),
        });
    }

    if stored == LITERAL {
        let payload = frame
            .get(HEADER_LEN..HEADER_LEN + original)
            .ok_or(DecoderError::Truncated)?;
        out[..original].copy_from_slice(payload);
        return Ok(original);
    }

    let stored = usize::from(stored);
    if stored >= original {
        return Err(DecoderError::InvalidFrame);
    }
    let payload = frame
        .get(HEADER_LEN..HEADER_LEN + stored)
        .ok_or(DecoderError::Truncated)?;
    decompress(payload, &mut out[..original], table)?;
    Ok(original)
}

/// Returns the original payload size recorded in a frame.
///
/// The frame must hold at least a header.
///
/// # Arguments
/// * `frame` - A packet produced by `encode`.
///
pub fn query_original_size(frame: &[u8]) -> usize {
    debug_assert!(frame.len() >= HEADER_LEN);

    usize::from(frame[0])
}

/// Returns the total length of a frame, header included.
///
/// This is the value `encode` returned for the frame; for a verbatim
/// frame the payload length is the original size, not the marker byte.
/// The frame must hold at least a header.
///
/// # Arguments
/// * `frame` - A packet produced by `encode`.
///
pub fn query_frame_size(frame: &[u8]) -> usize {
    debug_assert!(frame.len() >= HEADER_LEN);

    if frame[1] == LITERAL {
        HEADER_LEN + usize::from(frame[0])
    } else {
        HEADER_LEN + usize::from(frame[1])
    }
}
