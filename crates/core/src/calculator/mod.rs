pub mod calculator;
pub mod expression;

pub use calculator::{Calculator, CalculatorState, Key, Operation, Readout, Tone};
pub use expression::evaluate;
