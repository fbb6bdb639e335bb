//! Discrete commands accepted by the engine
//!
//! Input layers convert pointer drags and key presses into whole-cell commands
//! before they reach the engine. Commands also have a compact text form used by
//! scripts and the runner: `tick`, `shift:-2`, `drop:3`, `hard_drop`, `hold`,
//! `start`, `pause`, `resume`, `reset`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Tick,
    /// Shift the ground by whole cells; positive moves it left
    ShiftGround(i32),
    /// Soft drop by up to this many rows
    Drop(u32),
    HardDrop,
    Hold,
    Start,
    Pause,
    Resume,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("command '{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("command '{0}' takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Tick => "tick",
            Command::ShiftGround(_) => "shift",
            Command::Drop(_) => "drop",
            Command::HardDrop => "hard_drop",
            Command::Hold => "hold",
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
        }
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CommandParseError::Empty);
        }

        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim().to_ascii_lowercase(), Some(arg.trim())),
            None => (s.to_ascii_lowercase(), None),
        };

        let bare = |command: Command| match arg {
            None => Ok(command),
            Some(_) => Err(CommandParseError::UnexpectedArgument(command.name())),
        };

        match name.as_str() {
            "tick" => bare(Command::Tick),
            "hard_drop" | "harddrop" => bare(Command::HardDrop),
            "hold" => bare(Command::Hold),
            "start" => bare(Command::Start),
            "pause" => bare(Command::Pause),
            "resume" => bare(Command::Resume),
            "reset" => bare(Command::Reset),
            "shift" => {
                let value = arg.ok_or(CommandParseError::MissingArgument("shift"))?;
                value
                    .parse::<i32>()
                    .map(Command::ShiftGround)
                    .map_err(|_| CommandParseError::InvalidArgument {
                        command: "shift",
                        value: value.to_string(),
                    })
            }
            "drop" => {
                let value = arg.ok_or(CommandParseError::MissingArgument("drop"))?;
                match value.parse::<u32>() {
                    Ok(cells) if cells > 0 => Ok(Command::Drop(cells)),
                    _ => Err(CommandParseError::InvalidArgument {
                        command: "drop",
                        value: value.to_string(),
                    }),
                }
            }
            _ => Err(CommandParseError::Unknown(name)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ShiftGround(delta) => write!(f, "shift:{}", delta),
            Command::Drop(cells) => write!(f, "drop:{}", cells),
            other => f.write_str(other.name()),
        }
    }
}
