//! Encoder errors.

/// Errors thrown by the encoder.
///
/// Both variants report a broken caller contract; running out of coding
/// precision or hitting an uncodable byte is not an error, the encoder
/// stores the payload verbatim instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError {
    /// The source is longer than a frame can describe.
    PayloadTooLarge {
        /// Size of the source.
        size: usize,
    },
    /// The destination cannot hold the worst-case output.
    BufferTooSmall {
        /// Bytes the encoder may have to write.
        required: usize,
        /// Bytes the caller provided.
        available: usize,
    },
}

impl std::fmt::Display for EncoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncoderError::PayloadTooLarge { size } => {
                write!(f, "payload of {} bytes does not fit a frame", size)
            }
            EncoderError::BufferTooSmall {
                required,
                available,
            } => {
                write!(
                    f,
                    "output buffer holds {} bytes but the encoder may write {}",
                    available, required
                )
            }
        }
    }
}

impl std::error::Error for EncoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
