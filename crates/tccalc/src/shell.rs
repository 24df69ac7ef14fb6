use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::queue;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use tccalc_core::{Calculator, FrameRate, Key, Tone};

/// Restores the terminal even if the shell bails out early.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

enum Command {
    Press(Key),
    CycleFrameRate,
    Quit,
}

fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match (code, modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
            Some(Command::Quit)
        }
        (KeyCode::Tab, _) => Some(Command::CycleFrameRate),
        (KeyCode::Char('.'), _) => Some(Command::Press(Key::DoubleZero)),
        (KeyCode::Enter, _) => Some(Command::Press(Key::Enter)),
        (KeyCode::Backspace | KeyCode::Delete | KeyCode::Esc, _) => {
            Some(Command::Press(Key::Clear))
        }
        (KeyCode::Char(c), _) => Key::from_char(c).map(Command::Press),
        _ => None,
    }
}

const HELP: &str = "digits, . for 00, + - Enter, Esc clears, Tab changes fps, q quits";

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Entry => Color::Cyan,
        Tone::Pending => Color::Yellow,
        Tone::Result => Color::Green,
        Tone::Error => Color::Red,
    }
}

/// Single-line keypad front end for [`Calculator`].
pub struct Shell {
    calculator: Calculator,
    show_frame_count: bool,
    show_wall_clock: bool,
}

impl Shell {
    pub fn new(frame_rate: FrameRate, show_frame_count: bool, show_wall_clock: bool) -> Self {
        Self {
            calculator: Calculator::new(frame_rate),
            show_frame_count,
            show_wall_clock,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(HELP),
            ResetColor,
            Print("\r\n")
        )?;

        let _guard = RawModeGuard::enable()?;
        self.render(&mut stdout)?;

        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            else {
                continue;
            };

            match command_for(code, modifiers) {
                Some(Command::Quit) => break,
                Some(Command::CycleFrameRate) => {
                    let next = self.calculator.frame_rate().next();
                    self.calculator.set_frame_rate(next);
                }
                Some(Command::Press(key)) => {
                    // Failures are already on the readout.
                    let _ = self.calculator.press(key);
                }
                None => continue,
            }

            self.render(&mut stdout)?;
        }

        queue!(stdout, Print("\r\n"))?;
        stdout.flush()
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let readout = self.calculator.readout();
        let pending = self
            .calculator
            .pending()
            .map(|(lhs, op)| format!("{} {} ", lhs, op))
            .unwrap_or_default();

        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("[{:>6} fps] {}", self.calculator.frame_rate(), pending)),
            SetForegroundColor(tone_color(readout.tone)),
            Print(&readout.text),
            ResetColor
        )?;

        if readout.tone != Tone::Error {
            if let Some(value) = self.calculator.value() {
                if self.show_frame_count {
                    queue!(out, Print(format!("  {} frames", value.total_frames())))?;
                }
                if self.show_wall_clock {
                    queue!(out, Print(format!("  {:.3}s", value.to_seconds())))?;
                }
            }
        }

        out.flush()
    }
}
