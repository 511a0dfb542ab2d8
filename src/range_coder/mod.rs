//! Implements the range coder.
//!
//! A range coder represents a whole payload as one sub-interval of
//! `[0, 2^32)`; every coded byte narrows the interval in proportion to its
//! model probability. The denominator of all probabilities is fixed at
//! `2^11`, so the one division the algorithm calls for degenerates into a
//! right shift; the engine runs on 16x32-bit multiplies and is usable on
//! cores clocked in the tens of MHz.
//!
//! Both halves renormalize by moving the top octet of the state out of
//! (encoder) or into (decoder) the 32-bit window whenever `range` drops
//! below `2^24`.
//!
//! The encoder owns the hard part: a carry out of the 32-bit window must
//! ripple through the bytes it already emitted. The decoder recovers each
//! byte with a fixed eight-step descent over the cumulative frequency
//! bounds, one step per bit of the byte value.

#[cfg(feature = "decoder")]
pub(crate) use decoder::RangeDecoder;
#[cfg(feature = "encoder")]
pub(crate) use encoder::RangeEncoder;

#[cfg(feature = "decoder")]
mod decoder;
#[cfg(feature = "encoder")]
mod encoder;

#[cfg(feature = "decoder")]
use crate::decoder_error::DecoderError;
#[cfg(any(feature = "decoder", feature = "encoder"))]
use crate::model::FreqTable;

/// Number of bits in the probability denominator; dividing the range by
/// the frequency total is a right shift by this amount.
pub(crate) const RANGE_SHIFT: u32 = 11;
/// Initial width of the coding interval.
#[cfg(any(feature = "decoder", feature = "encoder"))]
const FIRST_RANGE: u32 = 0xFFFF_FFFF;
/// Renormalization threshold: below this the top octet of the state is
/// settled and can leave (or enter) the 32-bit window.
#[cfg(any(feature = "decoder", feature = "encoder"))]
const RENORM_LIMIT: u32 = 1 << 24;

/// Why the coder gave up on a payload.
///
/// Every variant is recovered from locally: the caller stores the payload
/// verbatim instead.
#[cfg(feature = "encoder")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoderError {
    /// A source byte has a zero frequency in the model.
    ZeroFrequency,
    /// The coded output caught up with the size of the source.
    OutputFull,
    /// A carry would have rippled past the first coded byte, which only a
    /// table violating the model invariants can produce.
    CarryOverflow,
}

/// Codes `src` into `window`, returning the number of bytes written.
///
/// The window acts as the output budget: callers size it one byte short
/// of the source, so success implies the payload actually shrank.
#[cfg(feature = "encoder")]
pub(crate) fn compress(
    src: &[u8],
    window: &mut [u8],
    table: &FreqTable,
) -> Result<usize, CoderError> {
    let mut enc = RangeEncoder::new(window);
    for &byte in src {
        enc.encode_symbol(table.entry(byte))?;
    }
    enc.finish()
}

/// Decodes `out.len()` bytes from `payload`, the bare coder bytes without
/// any framing.
#[cfg(feature = "decoder")]
pub(crate) fn decompress(
    payload: &[u8],
    out: &mut [u8],
    table: &FreqTable,
) -> Result<(), DecoderError> {
    let mut dec = RangeDecoder::new(payload);
    for slot in out.iter_mut() {
        *slot = dec.decode_symbol(table)?;
    }
    Ok(())
}

#[cfg(all(test, feature = "decoder", feature = "encoder"))]
mod tests {
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use nanorand::{WyRand, RNG};

    use crate::model::{FreqTable, MAX_TOTAL_FREQ};
    use crate::{frame, raw};

    const MARGIN: usize = 4;

    fn table_from(freqs: &[(u8, u16)]) -> FreqTable {
        let mut all = [0_u16; 256];
        for &(byte, freq) in freqs {
            all[usize::from(byte)] = freq;
        }
        FreqTable::from_freqs(&all)
    }

    /// Runs `src` through the framed and the headerless codec, checking
    /// size bounds, the header queries, the decoded bytes, and that
    /// neither side touches the canary bytes planted after its buffer.
    fn check_round_trip(src: &[u8], table: &FreqTable) {
        // Framed.
        let mut packet = [0xAA_u8; frame::MAX_PAYLOAD + frame::HEADER_LEN + MARGIN];
        let sent = frame::encode(src, &mut packet[..src.len() + frame::HEADER_LEN], table).unwrap();
        assert!(sent >= frame::HEADER_LEN);
        assert!(
            sent <= src.len() + frame::HEADER_LEN,
            "frame expanded past the bound: {} bytes for {}",
            sent,
            src.len()
        );
        assert_eq!(frame::query_original_size(&packet), src.len());
        assert_eq!(frame::query_frame_size(&packet), sent);
        assert!(
            packet[sent..sent + MARGIN].iter().all(|&b| b == 0xAA),
            "encoder wrote past the {} bytes it reported",
            sent
        );

        let mut out = [0x55_u8; frame::MAX_PAYLOAD + MARGIN];
        let size = frame::decode(&packet[..sent], &mut out, table).unwrap();
        assert_eq!(size, src.len());
        assert_eq!(&out[..size], src, "framed round trip mismatch");
        assert!(
            out[size..size + MARGIN].iter().all(|&b| b == 0x55),
            "decoder wrote past the declared original size"
        );

        // Headerless.
        let mut coded = [0xAA_u8; frame::MAX_PAYLOAD + MARGIN];
        let sent = raw::encode(src, &mut coded[..src.len()], table).unwrap();
        assert!(sent <= src.len());
        assert!(
            coded[sent..sent + MARGIN].iter().all(|&b| b == 0xAA),
            "headerless encoder wrote past the {} bytes it reported",
            sent
        );

        let mut out = [0x55_u8; frame::MAX_PAYLOAD + MARGIN];
        raw::decode(&coded[..sent], &mut out[..src.len()], table).unwrap();
        assert_eq!(&out[..src.len()], src, "headerless round trip mismatch");
        assert!(
            out[src.len()..src.len() + MARGIN].iter().all(|&b| b == 0x55),
            "headerless decoder wrote past the original size"
        );
    }

    #[test]
    fn test_empty_and_tiny_payloads() {
        let table = table_from(&[(0, 1024), (1, 1024)]);
        check_round_trip(&[], &table);
        check_round_trip(&[0], &table);
        check_round_trip(&[1], &table);
        check_round_trip(&[0, 1], &table);
        check_round_trip(&[1, 1, 0], &table);
    }

    #[test]
    fn test_alternating_two_symbol_payload() {
        let table = table_from(&[(0, MAX_TOTAL_FREQ / 2), (1, MAX_TOTAL_FREQ / 2)]);
        let src: Vec<u8> = (0..255_u8).map(|i| i & 1).collect();
        check_round_trip(&src, &table);

        let mut packet = [0_u8; 255 + frame::HEADER_LEN];
        let sent = frame::encode(&src, &mut packet, &table).unwrap();
        // One bit of entropy per source byte plus header and drain.
        assert!(sent < 45, "expected heavy compression, got {} bytes", sent);
    }

    #[test]
    fn test_uniform_model_random_payload() {
        let table = FreqTable::from_freqs(&[8_u16; 256]);
        let mut rnd = WyRand::new_seed(42);
        let mut src = [0_u8; 255];

        for _ in 0..64 {
            for byte in src.iter_mut() {
                *byte = rnd.generate_range::<u32>(0, 256) as u8;
            }
            let size = rnd.generate_range::<usize>(1, 256);
            check_round_trip(&src[..size], &table);
        }
    }

    #[test]
    fn test_single_symbol_payload() {
        let table = table_from(&[(42, MAX_TOTAL_FREQ)]);
        let src = [42_u8; 10];
        check_round_trip(&src, &table);

        let mut packet = [0_u8; 12];
        let sent = frame::encode(&src, &mut packet, &table).unwrap();
        // The whole payload collapses into the initial coder state.
        assert_eq!(sent, frame::HEADER_LEN);
    }

    #[test]
    fn test_every_byte_value_alone() {
        for byte in (0..=255_u8).step_by(5) {
            for &freq in &[1_u16, 2, 700, MAX_TOTAL_FREQ] {
                let table = table_from(&[(byte, freq)]);
                let src = [byte; 255];
                for &size in &[1_usize, 2, 3, 40, 254, 255] {
                    check_round_trip(&src[..size], &table);
                }
            }
        }
    }

    #[test]
    fn test_rare_byte_placements() {
        for &(dominant, rare) in &[(0_u8, 255_u8), (255, 0), (7, 8), (200, 100)] {
            for &rare_freq in &[1_u16, 3] {
                let table =
                    table_from(&[(dominant, MAX_TOTAL_FREQ - rare_freq), (rare, rare_freq)]);
                let mut src = [dominant; 255];
                for &size in &[2_usize, 3, 17, 128, 255] {
                    for &pos in &[0_usize, 1, size / 2, size - 2, size - 1] {
                        src[pos] = rare;
                        check_round_trip(&src[..size], &table);
                        src[pos] = dominant;
                    }
                }
            }
        }
    }

    #[test]
    fn test_two_symbol_frequency_splits() {
        let mut rnd = WyRand::new_seed(7);
        for &(first, second) in &[(0_u8, 1_u8), (0, 255), (64, 65), (254, 255)] {
            for &split in &[1_u16, 13, 1024, 2040, 2047] {
                let table = table_from(&[(first, split), (second, MAX_TOTAL_FREQ - split)]);
                let mut src = [0_u8; 255];
                for byte in src.iter_mut() {
                    let roll = rnd.generate_range::<u32>(0, u32::from(MAX_TOTAL_FREQ));
                    *byte = if roll < u32::from(split) { first } else { second };
                }
                for &size in &[1_usize, 2, 100, 255] {
                    check_round_trip(&src[..size], &table);
                }
            }
        }
    }

    #[test]
    fn test_random_tables_and_payloads() {
        let mut rnd = WyRand::new_seed(42);
        let mut used = [0_u8; 256];
        for (i, byte) in used.iter_mut().enumerate() {
            *byte = i as u8;
        }

        for _ in 0..100 {
            for i in (1..256_usize).rev() {
                let j = rnd.generate_range::<usize>(0, i + 1);
                used.swap(i, j);
            }
            let n_used = rnd.generate_range::<usize>(1, 256);

            // Random frequencies, halved until the total fits the model.
            let mut freqs = [0_u16; 256];
            let mut total: u32 = 0;
            for &byte in &used[..n_used] {
                let freq = rnd.generate_range::<u32>(1, u32::from(MAX_TOTAL_FREQ) + 1) as u16;
                freqs[usize::from(byte)] = freq;
                total += u32::from(freq);
            }
            while total > u32::from(MAX_TOTAL_FREQ) {
                total = 0;
                for &byte in &used[..n_used] {
                    let freq = &mut freqs[usize::from(byte)];
                    *freq = (*freq / 2).max(1);
                    total += u32::from(*freq);
                }
            }
            let table = FreqTable::from_freqs(&freqs);

            // Payload bytes drawn from the table's own distribution.
            let mut src = [0_u8; 255];
            for &size in &[1_usize, 16, 61, 255] {
                for slot in src[..size].iter_mut() {
                    let target = rnd.generate_range::<u32>(0, total);
                    *slot = sample_byte(&freqs, target as u16);
                }
                check_round_trip(&src[..size], &table);
            }
        }
    }

    fn sample_byte(freqs: &[u16; 256], target: u16) -> u8 {
        let mut acc = 0_u16;
        for (byte, &freq) in freqs.iter().enumerate() {
            acc += freq;
            if target < acc {
                return byte as u8;
            }
        }
        255
    }

    #[test]
    fn test_encode_is_deterministic() {
        let table = table_from(&[(3, 1024), (9, 512), (200, 512)]);
        let src = [3_u8, 9, 3, 200, 3, 3, 9, 9, 200, 3, 9, 3, 3, 3, 200, 9];

        let mut first = [0_u8; 18];
        let mut second = [0_u8; 18];
        let sent_first = frame::encode(&src, &mut first, &table).unwrap();
        let sent_second = frame::encode(&src, &mut second, &table).unwrap();
        assert_eq!(sent_first, sent_second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_perturbed_frames_never_overflow_output() {
        let table = table_from(&[(0, 1024), (1, 1024)]);
        let src: Vec<u8> = (0..255_u8).map(|i| i & 1).collect();
        let mut packet = [0_u8; 257];
        let sent = frame::encode(&src, &mut packet, &table).unwrap();

        let mut rnd = WyRand::new_seed(1);
        for pos in 0..sent {
            for _ in 0..4 {
                let mut mangled = packet;
                mangled[pos] ^= rnd.generate_range::<u32>(1, 256) as u8;

                let mut out = [0x55_u8; 255 + MARGIN];
                // A mangled frame may decode to anything or fail; it must
                // never write past the declared original size.
                let _ = frame::decode(&mangled[..sent], &mut out, &table);
                assert!(out[255..].iter().all(|&b| b == 0x55));
            }
        }
    }
}
