//! Frame-accurate `HH:MM:SS:FF` timecode arithmetic for video and film production.

pub use calculator::{evaluate, Calculator, CalculatorState, Key, Operation, Readout, Tone};
pub use config::{ConfigError, ConfigFile, ConfigManager, ConfigOption, ConfigSchema, Settings};
pub use timecode::error::TimecodeError;
pub use timecode::frame_rate::FrameRate;
pub use timecode::timecode::{TimeCode, MAX_DIGITS};

mod calculator;
mod config;
mod timecode;
