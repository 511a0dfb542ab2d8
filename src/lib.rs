#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
//! A range coder for packets of up to 255 bytes.
//!
//! Entropy coding pays off on short packets only when the probability
//! model does not travel with the data: both ends agree on a fixed
//! byte-frequency table up front (baked into firmware, typically) and
//! every packet is coded against it. The coder is built for small
//! machines. It performs no division, since the probability denominator
//! is a power of two and dividing is a right shift, allocates nothing,
//! and needs about 1 KiB for the model table; the output never exceeds
//! the input by more than the two framing bytes.
//!
//! When coding cannot help, because a byte has zero frequency in the
//! model or the payload will not shrink, the payload is stored verbatim
//! inside the frame instead, so encoding never fails on data.
//!
//! The [`frame`] module carries sizes in a two-byte header; the [`raw`]
//! module produces the bare coder bytes and leaves the sizes to the
//! caller.
//!
//! # Example
//! ```
//! use rangepack::{frame, FreqTable, MAX_TOTAL_FREQ};
//!
//! // Both ends agree on the model up front: here, two byte values that
//! // are equally likely.
//! let mut freqs = [0_u16; 256];
//! freqs[0] = MAX_TOTAL_FREQ / 2;
//! freqs[1] = MAX_TOTAL_FREQ / 2;
//! let table = FreqTable::from_freqs(&freqs);
//!
//! let payload: Vec<u8> = (0..255_u8).map(|i| i & 1).collect();
//! let mut packet = [0_u8; 255 + frame::HEADER_LEN];
//! let sent = frame::encode(&payload, &mut packet, &table).unwrap();
//! assert!(sent < 45); // one bit of entropy per source byte
//!
//! let mut decoded = [0_u8; 255];
//! let size = frame::decode(&packet[..sent], &mut decoded, &table).unwrap();
//! assert_eq!(&decoded[..size], &payload[..]);
//! ```

#[cfg(feature = "decoder")]
pub use decoder_error::DecoderError;
#[cfg(feature = "encoder")]
pub use encoder_error::EncoderError;
pub use model::{FreqEntry, FreqTable, MAX_TOTAL_FREQ};

#[cfg(feature = "decoder")]
mod decoder_error;
#[cfg(feature = "encoder")]
mod encoder_error;
pub mod frame;
mod model;
pub(crate) mod range_coder;
pub mod raw;
