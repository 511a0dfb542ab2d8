//! Decoder errors.

/// Errors thrown by the decoder.
///
/// An undamaged frame produced by the encoder under the same model always
/// decodes; a damaged one fails with one of these, though not every form
/// of damage is detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderError {
    /// The input ends before its header or declared payload does.
    Truncated,
    /// The stored sizes are inconsistent: a coded payload must be
    /// strictly smaller than the data it decodes to.
    InvalidFrame,
    /// The coder state became inconsistent while decoding.
    Corrupt,
    /// The output buffer is smaller than the decoded payload.
    OutputBufferTooSmall {
        /// Bytes the decoded payload needs.
        required: usize,
        /// Bytes the caller provided.
        available: usize,
    },
}

impl std::fmt::Display for DecoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderError::Truncated => {
                write!(f, "input ends before the declared payload")
            }
            DecoderError::InvalidFrame => {
                write!(f, "stored sizes are inconsistent")
            }
            DecoderError::Corrupt => {
                write!(f, "coder state became inconsistent")
            }
            DecoderError::OutputBufferTooSmall {
                required,
                available,
            } => {
                write!(
                    f,
                    "output buffer holds {} bytes but the payload needs {}",
                    available, required
                )
            }
        }
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
