use crate::timecode::error::TimecodeError;
use crate::timecode::frame_rate::FrameRate;
use crate::timecode::timecode::TimeCode;

use super::calculator::Operation;

/// Evaluate `TC (('+'|'-') TC)*` left to right. Tokens are separated by whitespace.
pub fn evaluate(frame_rate: FrameRate, expression: &str) -> Result<TimeCode, TimecodeError> {
    let mut tokens = expression.split_whitespace();

    let first = tokens
        .next()
        .ok_or_else(|| TimecodeError::Format("empty expression".to_string()))?;
    let mut total = TimeCode::parse(frame_rate, first)?;

    while let Some(symbol) = tokens.next() {
        let op = Operation::from_symbol(symbol).ok_or_else(|| {
            TimecodeError::Format(format!("expected '+' or '-', got {symbol:?}"))
        })?;
        let operand = tokens
            .next()
            .ok_or_else(|| TimecodeError::Format(format!("missing operand after '{op}'")))?;
        total = op.apply(&total, &TimeCode::parse(frame_rate, operand)?)?;
    }

    Ok(total)
}
