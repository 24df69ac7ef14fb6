use thiserror::Error;

use super::frame_rate::FrameRate;

/// Errors produced while building or combining timecodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimecodeError {
    #[error("Invalid timecode format: {0}")]
    Format(String),

    #[error("Timecode out of range: {0}")]
    Range(String),

    #[error("Unsupported frame rate: {0}")]
    UnsupportedRate(String),

    #[error("Frame rate mismatch: {left} vs {right}")]
    FrameRateMismatch { left: FrameRate, right: FrameRate },

    #[error("Subtraction would produce a negative timecode ({minuend} - {subtrahend} frames)")]
    NegativeResult { minuend: u64, subtrahend: u64 },
}
