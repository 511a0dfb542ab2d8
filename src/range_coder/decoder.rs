//! Implements the range decoder.

use crate::decoder_error::DecoderError;
use crate::model::FreqTable;
use crate::range_coder::{FIRST_RANGE, RANGE_SHIFT, RENORM_LIMIT};

/// Steps of the symbol descent, one per bit of a byte value.
const DESCENT_STEPS: [usize; 8] = [128, 64, 32, 16, 8, 4, 2, 1];

/// The range decoder.
///
/// Reads past the end of the payload yield zero: the encoder drops the
/// trailing zero octets of its final state, and renormalization may look
/// further still.
pub(crate) struct RangeDecoder<'d> {
    /// Coded input bytes.
    payload: &'d [u8],
    /// Offset at which the next coded byte will be read.
    offs: usize,
    /// Coded value, relative to the low end of the current interval.
    low: u32,
    /// Width of the coding interval.
    range: u32,
}

impl<'d> RangeDecoder<'d> {
    /// Creates a new decoder over the given payload.
    pub(crate) fn new(payload: &'d [u8]) -> Self {
        let mut dec = Self {
            payload,
            offs: 0,
            low: 0,
            range: FIRST_RANGE,
        };
        for _ in 0..4 {
            dec.low = dec.low << 8 | u32::from(dec.read_byte());
        }
        dec
    }

    /// Next coded byte, or zero past the end of the payload.
    fn read_byte(&mut self) -> u8 {
        if self.offs < self.payload.len() {
            let byte = self.payload[self.offs];
            self.offs += 1;
            byte
        } else {
            0
        }
    }

    /// Decodes one symbol and advances the interval past it.
    pub(crate) fn decode_symbol(&mut self, table: &FreqTable) -> Result<u8, DecoderError> {
        self.range >>= RANGE_SHIFT;

        // The cumulative bounds are non-decreasing, so the byte is the
        // largest value whose scaled lower bound does not exceed the coded
        // value. The fixed descent settles one bit per step; the table's
        // padding entry keeps every probe in bounds.
        let mut byte = 0_usize;
        for &step in DESCENT_STEPS.iter() {
            if u32::from(table.lower_at(byte + step)) * self.range <= self.low {
                byte += step;
            }
        }

        let entry = table.entry(byte as u8);
        if entry.freq == 0 {
            // The encoder never emits a zero-frequency byte; accepting one
            // would zero the range and hang renormalization.
            return Err(DecoderError::Corrupt);
        }

        self.low -= self.range * u32::from(entry.lower);
        self.range *= u32::from(entry.freq);
        if self.range < self.low {
            return Err(DecoderError::Corrupt);
        }

        while self.range < RENORM_LIMIT {
            self.range <<= 8;
            self.low = self.low << 8 | u32::from(self.read_byte());
        }

        Ok(byte as u8)
    }
}
