use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use super::error::TimecodeError;
use super::frame_rate::FrameRate;

/// Longest digit buffer accepted by [`TimeCode::from_digits`] (`HHMMSSFF`).
pub const MAX_DIGITS: usize = 8;

/// A frame-accurate `HH:MM:SS:FF` instant or duration at a fixed frame rate.
///
/// The frame count is the only stored position; the four display fields are always derived
/// from it, so they can never disagree with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeCode {
    frame_rate: FrameRate,
    total_frames: u64,
}

impl TimeCode {
    /// Build a timecode from a rate label such as `"29.97"` and a canonical string.
    pub fn new(frame_rate: &str, timecode: &str) -> Result<Self, TimecodeError> {
        Self::parse(FrameRate::parse(frame_rate)?, timecode)
    }

    /// Parse the canonical `HH:MM:SS:FF` form.
    ///
    /// Minutes, seconds and frames must be exactly two digits. Hours take two or more
    /// digits so that anything [`Display`](fmt::Display) renders parses back; a wider hours
    /// field must not start with `0`.
    pub fn parse(frame_rate: FrameRate, timecode: &str) -> Result<Self, TimecodeError> {
        let parts: Vec<&str> = timecode.split(':').collect();
        if parts.len() != 4 {
            return Err(TimecodeError::Format(format!(
                "expected HH:MM:SS:FF, got {timecode:?}"
            )));
        }

        // Hours grow past two digits, but never with a leading zero.
        if parts[0].len() > 2 && parts[0].starts_with('0') {
            return Err(TimecodeError::Format(format!(
                "hours field {:?} has extra leading zeros",
                parts[0]
            )));
        }
        let hours = parse_field(parts[0], "hours", 2..=usize::MAX)?;
        let minutes = parse_field(parts[1], "minutes", 2..=2)?;
        let seconds = parse_field(parts[2], "seconds", 2..=2)?;
        let frames = parse_field(parts[3], "frames", 2..=2)?;

        Self::from_fields(frame_rate, hours, minutes, seconds, frames)
    }

    /// Build a timecode from a calculator digit buffer, right-aligned into `HHMMSSFF`.
    ///
    /// `"1023"` is `00:00:10:23` and the empty buffer is `00:00:00:00`.
    pub fn from_digits(frame_rate: FrameRate, digits: &str) -> Result<Self, TimecodeError> {
        if digits.len() > MAX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimecodeError::Format(format!(
                "expected up to {MAX_DIGITS} digits, got {digits:?}"
            )));
        }

        let padded = format!("{digits:0>width$}", width = MAX_DIGITS);
        let canonical = format!(
            "{}:{}:{}:{}",
            &padded[0..2],
            &padded[2..4],
            &padded[4..6],
            &padded[6..8]
        );
        Self::parse(frame_rate, &canonical)
    }

    pub fn from_frame_count(
        frame_rate: FrameRate,
        total_frames: i64,
    ) -> Result<Self, TimecodeError> {
        let total_frames = u64::try_from(total_frames).map_err(|_| {
            TimecodeError::Range(format!("frame count must not be negative, got {total_frames}"))
        })?;
        Ok(Self {
            frame_rate,
            total_frames,
        })
    }

    pub fn from_fields(
        frame_rate: FrameRate,
        hours: u64,
        minutes: u64,
        seconds: u64,
        frames: u64,
    ) -> Result<Self, TimecodeError> {
        let timebase = frame_rate.timebase();
        if minutes >= 60 {
            return Err(TimecodeError::Range(format!(
                "minutes must be below 60, got {minutes}"
            )));
        }
        if seconds >= 60 {
            return Err(TimecodeError::Range(format!(
                "seconds must be below 60, got {seconds}"
            )));
        }
        if frames >= timebase {
            return Err(TimecodeError::Range(format!(
                "frames must be below {timebase} at {frame_rate} fps, got {frames}"
            )));
        }

        let total_frames = hours
            .checked_mul(3600)
            .and_then(|s| s.checked_add(minutes * 60 + seconds))
            .and_then(|s| s.checked_mul(timebase))
            .and_then(|f| f.checked_add(frames))
            .ok_or_else(|| {
                TimecodeError::Range(format!("{hours} hours overflows the frame counter"))
            })?;

        Ok(Self {
            frame_rate,
            total_frames,
        })
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn hours(&self) -> u64 {
        self.total_seconds() / 3600
    }

    pub fn minutes(&self) -> u64 {
        self.total_seconds() / 60 % 60
    }

    pub fn seconds(&self) -> u64 {
        self.total_seconds() % 60
    }

    pub fn frames(&self) -> u64 {
        self.total_frames % self.frame_rate.timebase()
    }

    /// Labelled seconds, i.e. the timecode with the frames field dropped.
    fn total_seconds(&self) -> u64 {
        self.total_frames / self.frame_rate.timebase()
    }

    /// Elapsed wall-clock time, using the true rate for fractional frame rates.
    pub fn to_seconds(&self) -> f64 {
        self.total_frames as f64 / self.frame_rate.fps()
    }

    /// The canonical string without separators, as a calculator buffer holds it.
    pub fn to_digits(&self) -> String {
        self.to_string().replace(':', "")
    }

    pub fn try_add(&self, other: &TimeCode) -> Result<TimeCode, TimecodeError> {
        self.ensure_same_rate(other)?;
        let total_frames = self
            .total_frames
            .checked_add(other.total_frames)
            .ok_or_else(|| TimecodeError::Range("sum overflows the frame counter".to_string()))?;
        Ok(Self {
            frame_rate: self.frame_rate,
            total_frames,
        })
    }

    /// Subtract `other`, failing rather than clamping when the result would be negative.
    pub fn try_sub(&self, other: &TimeCode) -> Result<TimeCode, TimecodeError> {
        self.ensure_same_rate(other)?;
        let total_frames = self.total_frames.checked_sub(other.total_frames).ok_or(
            TimecodeError::NegativeResult {
                minuend: self.total_frames,
                subtrahend: other.total_frames,
            },
        )?;
        Ok(Self {
            frame_rate: self.frame_rate,
            total_frames,
        })
    }

    /// Order two timecodes, which is only meaningful at a shared frame rate.
    pub fn try_cmp(&self, other: &TimeCode) -> Result<Ordering, TimecodeError> {
        self.ensure_same_rate(other)?;
        Ok(self.total_frames.cmp(&other.total_frames))
    }

    fn ensure_same_rate(&self, other: &TimeCode) -> Result<(), TimecodeError> {
        if self.frame_rate != other.frame_rate {
            return Err(TimecodeError::FrameRateMismatch {
                left: self.frame_rate,
                right: other.frame_rate,
            });
        }
        Ok(())
    }
}

fn parse_field(
    text: &str,
    name: &str,
    width: std::ops::RangeInclusive<usize>,
) -> Result<u64, TimecodeError> {
    if !width.contains(&text.len()) || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimecodeError::Format(format!(
            "{name} field {text:?} is not a two-digit number"
        )));
    }
    // Only the unbounded hours field can fail here.
    text.parse()
        .map_err(|_| TimecodeError::Range(format!("{name} value {text} is too large")))
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.frames()
        )
    }
}

impl PartialOrd for TimeCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Add for TimeCode {
    type Output = Result<TimeCode, TimecodeError>;

    fn add(self, rhs: TimeCode) -> Self::Output {
        self.try_add(&rhs)
    }
}

impl Sub for TimeCode {
    type Output = Result<TimeCode, TimecodeError>;

    fn sub(self, rhs: TimeCode) -> Self::Output {
        self.try_sub(&rhs)
    }
}
