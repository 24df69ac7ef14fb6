pub mod error;
pub mod frame_rate;
pub mod timecode;
