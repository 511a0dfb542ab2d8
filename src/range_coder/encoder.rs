//! Implements the range encoder.

use crate::model::FreqEntry;
use crate::range_coder::{CoderError, FIRST_RANGE, RANGE_SHIFT, RENORM_LIMIT};

/// The range encoder.
///
/// Writes into a caller-owned output window that doubles as the hard
/// output budget: the moment a coded byte would not fit, the encoder
/// reports [`CoderError::OutputFull`] and the caller falls back to
/// storing the payload verbatim.
pub(crate) struct RangeEncoder<'e> {
    /// Output window for the coded bytes.
    window: &'e mut [u8],
    /// Offset at which the next coded byte will be written.
    offs: usize,
    /// Low end of the coding interval.
    low: u32,
    /// Width of the coding interval.
    range: u32,
}

impl<'e> RangeEncoder<'e> {
    /// Creates a new encoder writing into the given window.
    pub(crate) fn new(window: &'e mut [u8]) -> Self {
        Self {
            window,
            offs: 0,
            low: 0,
            range: FIRST_RANGE,
        }
    }

    /// Appends one coded byte.
    fn write_byte(&mut self, value: u8) -> Result<(), CoderError> {
        if self.offs >= self.window.len() {
            return Err(CoderError::OutputFull);
        }
        self.window[self.offs] = value;
        self.offs += 1;
        Ok(())
    }

    /// Adds one to the last coded byte, rippling over bytes that wrap.
    ///
    /// The interval invariant `low + range <= 2^32` (scaled through every
    /// renormalization) keeps the ripple inside the bytes this encoder
    /// emitted; only a table that breaks the model invariants can push it
    /// further, and then the whole encode is abandoned.
    fn propagate_carry(&mut self) -> Result<(), CoderError> {
        for byte in self.window[..self.offs].iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                return Ok(());
            }
        }
        Err(CoderError::CarryOverflow)
    }

    /// Moves settled top octets of `low` into the window until `range` is
    /// back in the working band. At most two octets per symbol.
    fn renormalize(&mut self) -> Result<(), CoderError> {
        while self.range < RENORM_LIMIT {
            self.write_byte((self.low >> 24) as u8)?;
            self.low <<= 8;
            self.range <<= 8;
        }
        Ok(())
    }

    /// Narrows the interval by one symbol.
    pub(crate) fn encode_symbol(&mut self, entry: FreqEntry) -> Result<(), CoderError> {
        if entry.freq == 0 {
            return Err(CoderError::ZeroFrequency);
        }
        self.renormalize()?;

        let r = self.range >> RANGE_SHIFT;
        self.range = r * u32::from(entry.freq);

        let (low, carry) = self.low.overflowing_add(r * u32::from(entry.lower));
        self.low = low;
        if carry {
            self.propagate_carry()?;
        }
        Ok(())
    }

    /// Drains the remaining state and returns the number of coded bytes.
    ///
    /// At most four octets follow the last symbol; trailing zero octets
    /// are not written, the decoder pads them back in.
    pub(crate) fn finish(mut self) -> Result<usize, CoderError> {
        for _ in 0..4 {
            if self.low == 0 {
                break;
            }
            self.write_byte((self.low >> 24) as u8)?;
            self.low <<= 8;
        }
        Ok(self.offs)
    }
}
