use std::fmt;

use crate::timecode::error::TimecodeError;
use crate::timecode::frame_rate::FrameRate;
use crate::timecode::timecode::{TimeCode, MAX_DIGITS};

/// Arithmetic the calculator can queue between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operation::Add),
            "-" => Some(Operation::Subtract),
            _ => None,
        }
    }

    pub fn apply(&self, lhs: &TimeCode, rhs: &TimeCode) -> Result<TimeCode, TimecodeError> {
        match self {
            Operation::Add => lhs.try_add(rhs),
            Operation::Subtract => lhs.try_sub(rhs),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorState {
    /// Typing the first operand.
    Entering,
    /// An operator has been pressed; typing goes to the second operand.
    OperatorPending,
    /// A result is on screen. Digits start over, operators continue from it.
    ShowingResult,
}

/// How the readout should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Entry,
    Pending,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    DoubleZero,
    Operator(Operation),
    Enter,
    Clear,
}

impl Key {
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Key::Digit(d as u8)),
            '+' => Some(Key::Operator(Operation::Add)),
            '-' => Some(Key::Operator(Operation::Subtract)),
            '=' | '\n' | '\r' => Some(Key::Enter),
            'c' | 'C' | '\x08' | '\x7f' | '\x1b' => Some(Key::Clear),
            _ => None,
        }
    }
}

/// Keypad timecode calculator.
///
/// Digits fill an eight-digit `HHMMSSFF` buffer from the right. Every transition that needs
/// arithmetic goes through [`TimeCode`]; failures leave the state untouched and put an
/// error on the readout.
#[derive(Debug, Clone)]
pub struct Calculator {
    frame_rate: FrameRate,
    state: CalculatorState,
    buffer: String,
    pending: Option<(TimeCode, Operation)>,
    result: Option<TimeCode>,
    readout: Readout,
}

impl Calculator {
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            frame_rate,
            state: CalculatorState::Entering,
            buffer: String::new(),
            pending: None,
            result: None,
            readout: Readout {
                text: buffer_label(""),
                tone: Tone::Entry,
            },
        }
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Change the rate used for operands built from now on. Queued operands keep theirs.
    pub fn set_frame_rate(&mut self, frame_rate: FrameRate) {
        log::debug!("Frame rate changed from {} to {}", self.frame_rate, frame_rate);
        self.frame_rate = frame_rate;
    }

    pub fn state(&self) -> CalculatorState {
        self.state
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn pending(&self) -> Option<(TimeCode, Operation)> {
        self.pending
    }

    pub fn last_result(&self) -> Option<TimeCode> {
        self.result
    }

    /// The value currently on screen, if it is a valid timecode at the current rate.
    pub fn value(&self) -> Option<TimeCode> {
        match (self.state, self.pending) {
            // Right after an operator the readout still shows the queued operand.
            (CalculatorState::OperatorPending, Some((lhs, _))) if self.buffer.is_empty() => {
                Some(lhs)
            }
            _ => self.current_operand().ok(),
        }
    }

    pub fn press(&mut self, key: Key) -> Result<(), TimecodeError> {
        match key {
            Key::Digit(d) => {
                self.push_digits(&d.min(9).to_string());
                Ok(())
            }
            Key::DoubleZero => {
                self.push_digits("00");
                Ok(())
            }
            Key::Operator(op) => self.press_operator(op),
            Key::Enter => self.press_enter(),
            Key::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    pub fn push_digits(&mut self, digits: &str) {
        if self.state == CalculatorState::ShowingResult {
            self.buffer.clear();
            self.result = None;
            self.state = CalculatorState::Entering;
        }

        for digit in digits.chars().filter(|c| c.is_ascii_digit()) {
            if self.buffer.len() >= MAX_DIGITS {
                break;
            }
            self.buffer.push(digit);
        }

        self.show(buffer_label(&self.buffer), Tone::Entry);
    }

    pub fn press_operator(&mut self, op: Operation) -> Result<(), TimecodeError> {
        let operand = match self.current_operand() {
            Ok(operand) => operand,
            Err(e) => return Err(self.fail("operator", e)),
        };

        log::debug!("Queued {} {}", operand, op);
        self.pending = Some((operand, op));
        self.buffer.clear();
        self.result = None;
        self.state = CalculatorState::OperatorPending;
        self.readout.tone = Tone::Pending;
        Ok(())
    }

    pub fn press_enter(&mut self) -> Result<(), TimecodeError> {
        let Some((lhs, op)) = self.pending else {
            return Ok(());
        };

        let outcome = TimeCode::from_digits(self.frame_rate, &self.buffer)
            .and_then(|rhs| op.apply(&lhs, &rhs));
        let result = match outcome {
            Ok(result) => result,
            Err(e) => return Err(self.fail("calculation", e)),
        };

        log::debug!("{} {} {} = {}", lhs, op, buffer_label(&self.buffer), result);
        self.pending = None;
        self.result = Some(result);
        self.buffer = result.to_digits();
        self.state = CalculatorState::ShowingResult;
        self.show(result.to_string(), Tone::Result);
        Ok(())
    }

    pub fn clear(&mut self) {
        let frame_rate = self.frame_rate;
        *self = Self::new(frame_rate);
    }

    fn current_operand(&self) -> Result<TimeCode, TimecodeError> {
        match (self.state, self.result) {
            // Re-read the result at the current rate, which may have changed since.
            (CalculatorState::ShowingResult, Some(result)) => {
                TimeCode::parse(self.frame_rate, &result.to_string())
            }
            _ => TimeCode::from_digits(self.frame_rate, &self.buffer),
        }
    }

    fn fail(&mut self, stage: &str, error: TimecodeError) -> TimecodeError {
        log::warn!("Rejected {}: {}", stage, error);
        let text = match error {
            TimecodeError::FrameRateMismatch { .. } | TimecodeError::UnsupportedRate(_) => {
                "ERROR: FPS"
            }
            TimecodeError::NegativeResult { .. } => "ERROR: NEGATIVE",
            TimecodeError::Format(_) | TimecodeError::Range(_) => "ERROR: RANGE",
        };
        self.show(text.to_string(), Tone::Error);
        error
    }

    fn show(&mut self, text: String, tone: Tone) {
        self.readout = Readout { text, tone };
    }
}

/// Render a digit buffer as `HH:MM:SS:FF` without validating the fields.
fn buffer_label(buffer: &str) -> String {
    let padded = format!("{buffer:0>width$}", width = MAX_DIGITS);
    let split = padded.len() - 6;
    format!(
        "{}:{}:{}:{}",
        &padded[..split],
        &padded[split..split + 2],
        &padded[split + 2..split + 4],
        &padded[split + 4..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(calc: &mut Calculator, digits: &str) {
        for c in digits.chars() {
            calc.press(Key::from_char(c).unwrap()).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let calc = Calculator::new(FrameRate::Fps24);
        assert_eq!(calc.state(), CalculatorState::Entering);
        assert_eq!(calc.readout().text, "00:00:00:00");
        assert_eq!(calc.readout().tone, Tone::Entry);
        assert!(calc.pending().is_none());
    }

    #[test]
    fn test_digits_fill_from_the_right() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "1023");
        assert_eq!(calc.readout().text, "00:00:10:23");
        assert_eq!(calc.value().unwrap().total_frames(), 10 * 24 + 23);
    }

    #[test]
    fn test_buffer_caps_at_eight_digits() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "1234567");
        calc.press(Key::DoubleZero).unwrap();
        assert_eq!(calc.buffer(), "12345670");
        type_digits(&mut calc, "9");
        assert_eq!(calc.readout().text, "12:34:56:70");
        // 70 frames is out of range at 24 fps
        assert!(calc.value().is_none());
    }

    #[test]
    fn test_addition_flow() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "1000000");
        calc.press(Key::Operator(Operation::Add)).unwrap();
        assert_eq!(calc.state(), CalculatorState::OperatorPending);
        assert_eq!(calc.readout().tone, Tone::Pending);
        assert_eq!(calc.buffer(), "");

        type_digits(&mut calc, "1000");
        assert_eq!(calc.readout().tone, Tone::Entry);
        calc.press(Key::Enter).unwrap();

        assert_eq!(calc.state(), CalculatorState::ShowingResult);
        assert_eq!(calc.readout().text, "01:00:10:00");
        assert_eq!(calc.readout().tone, Tone::Result);
        assert!(calc.pending().is_none());
    }

    #[test]
    fn test_result_feeds_next_operation() {
        let mut calc = Calculator::new(FrameRate::Fps25);
        type_digits(&mut calc, "500");
        calc.press(Key::Operator(Operation::Add)).unwrap();
        type_digits(&mut calc, "500");
        calc.press(Key::Enter).unwrap();
        assert_eq!(calc.readout().text, "00:00:10:00");

        calc.press(Key::Operator(Operation::Subtract)).unwrap();
        type_digits(&mut calc, "1");
        calc.press(Key::Enter).unwrap();
        assert_eq!(calc.readout().text, "00:00:09:24");
    }

    #[test]
    fn test_value_while_operator_pending() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "1000000");
        calc.press(Key::Operator(Operation::Add)).unwrap();

        assert_eq!(calc.readout().text, "01:00:00:00");
        assert_eq!(calc.value().unwrap().total_frames(), 86_400);

        type_digits(&mut calc, "2");
        assert_eq!(calc.value().unwrap().total_frames(), 2);
    }

    #[test]
    fn test_digit_after_result_starts_over() {
        let mut calc = Calculator::new(FrameRate::Fps25);
        type_digits(&mut calc, "1");
        calc.press(Key::Operator(Operation::Add)).unwrap();
        type_digits(&mut calc, "1");
        calc.press(Key::Enter).unwrap();

        type_digits(&mut calc, "7");
        assert_eq!(calc.state(), CalculatorState::Entering);
        assert_eq!(calc.readout().text, "00:00:00:07");
        assert!(calc.last_result().is_none());
    }

    #[test]
    fn test_enter_without_operator_is_noop() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "12");
        calc.press(Key::Enter).unwrap();
        assert_eq!(calc.state(), CalculatorState::Entering);
        assert_eq!(calc.readout().text, "00:00:00:12");
    }

    #[test]
    fn test_negative_result_shows_error() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "1");
        calc.press(Key::Operator(Operation::Subtract)).unwrap();
        type_digits(&mut calc, "2");
        let err = calc.press(Key::Enter).unwrap_err();

        assert!(matches!(err, TimecodeError::NegativeResult { .. }));
        assert_eq!(calc.readout().tone, Tone::Error);
        assert_eq!(calc.state(), CalculatorState::OperatorPending);
        assert!(calc.pending().is_some());
    }

    #[test]
    fn test_out_of_range_operand_is_rejected() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "99");
        let err = calc.press(Key::Operator(Operation::Add)).unwrap_err();
        assert!(matches!(err, TimecodeError::Range(_)));
        assert_eq!(calc.readout().text, "ERROR: RANGE");
        assert_eq!(calc.state(), CalculatorState::Entering);
        assert!(calc.pending().is_none());
    }

    #[test]
    fn test_rate_change_mid_calculation() {
        let mut calc = Calculator::new(FrameRate::Fps24);
        type_digits(&mut calc, "100");
        calc.press(Key::Operator(Operation::Add)).unwrap();
        calc.set_frame_rate(FrameRate::Fps25);
        type_digits(&mut calc, "100");

        let err = calc.press(Key::Enter).unwrap_err();
        assert!(matches!(err, TimecodeError::FrameRateMismatch { .. }));
        assert_eq!(calc.readout().text, "ERROR: FPS");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut calc = Calculator::new(FrameRate::Fps30);
        type_digits(&mut calc, "123");
        calc.press(Key::Operator(Operation::Add)).unwrap();
        type_digits(&mut calc, "4");
        calc.press(Key::Clear).unwrap();

        assert_eq!(calc.state(), CalculatorState::Entering);
        assert_eq!(calc.buffer(), "");
        assert!(calc.pending().is_none());
        assert_eq!(calc.readout().text, "00:00:00:00");
        assert_eq!(calc.frame_rate(), FrameRate::Fps30);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_char('7'), Some(Key::Digit(7)));
        assert_eq!(Key::from_char('+'), Some(Key::Operator(Operation::Add)));
        assert_eq!(Key::from_char('-'), Some(Key::Operator(Operation::Subtract)));
        assert_eq!(Key::from_char('='), Some(Key::Enter));
        assert_eq!(Key::from_char('\x1b'), Some(Key::Clear));
        assert_eq!(Key::from_char('x'), None);
    }

    #[test]
    fn test_buffer_label_for_long_results() {
        assert_eq!(buffer_label(""), "00:00:00:00");
        assert_eq!(buffer_label("1023"), "00:00:10:23");
        assert_eq!(buffer_label("100000001"), "100:00:00:01");
    }
}
