use std::fmt;

use exam_core::model::{DetailKind, Direction, OptionLabel};

/// One line typed by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    Answer(OptionLabel),
    Move(Direction),
    /// Zero-based target; typed one-based.
    Jump(usize),
    Submit,
    Detail(DetailKind),
    Retry,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputError {
    Unknown(String),
    InvalidJump { raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unknown(raw) => write!(f, "unknown command: {raw} (type ? for help)"),
            InputError::InvalidJump { raw } => {
                write!(f, "invalid question number: {raw} (expected 1 or more)")
            }
        }
    }
}

impl std::error::Error for InputError {}

pub(crate) fn parse_input(line: &str) -> Result<Input, InputError> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(Input::Show);
    };

    if let Ok(label) = command.parse::<OptionLabel>() {
        return Ok(Input::Answer(label));
    }

    match command.to_ascii_lowercase().as_str() {
        "n" | "next" => Ok(Input::Move(Direction::Next)),
        "p" | "prev" => Ok(Input::Move(Direction::Prev)),
        "g" | "go" => {
            let raw = parts.next().unwrap_or_default();
            match raw.parse::<usize>() {
                Ok(number) if number >= 1 => Ok(Input::Jump(number - 1)),
                _ => Err(InputError::InvalidJump {
                    raw: raw.to_owned(),
                }),
            }
        }
        "s" | "submit" => Ok(Input::Submit),
        "ok" | "right" => Ok(Input::Detail(DetailKind::Correct)),
        "wrong" => Ok(Input::Detail(DetailKind::Incorrect)),
        "r" | "retry" => Ok(Input::Retry),
        "?" | "h" | "help" => Ok(Input::Help),
        "q" | "quit" => Ok(Input::Quit),
        _ => Err(InputError::Unknown(trimmed.to_owned())),
    }
}

pub(crate) const HELP: &str = "\
Commands:
  a | b | c | d   answer the current question
  n / p           next / previous question
  g <number>      go to question <number>
  s               submit
  ok / wrong      toggle correctly / incorrectly answered review (after submit)
  r               retry (after submit)
  <enter>         show the current state
  q               quit";
