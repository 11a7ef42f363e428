//! Animation scripts
//!
//! A script is a comma-separated list of actions, for example
//! `face:happy, look:TR:fast, blink, wait:2s, curious:on`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::face::Face;
use super::motion::{Direction, Speed};
use super::state::EyeSelection;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Empty animation script")]
    Empty,

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Invalid argument in '{action}': {reason}")]
    InvalidArgument { action: String, reason: String },
}

/// A single animation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Face(Face),
    Look(Direction, Speed),
    Blink(EyeSelection, Speed),
    Close(EyeSelection, Speed),
    Open(EyeSelection, Speed),
    Curious(bool),
    Wait(Duration),
}

impl FromStr for Action {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut parts = token.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let invalid = |reason: String| ScriptError::InvalidArgument {
            action: token.to_string(),
            reason,
        };
        let too_many = |max: usize| {
            if args.len() > max {
                Err(invalid(format!("expected at most {} argument(s)", max)))
            } else {
                Ok(())
            }
        };
        let arg = |index: usize| args.get(index).copied().filter(|a| !a.is_empty());

        match name.as_str() {
            "face" => {
                too_many(1)?;
                let face = arg(0).ok_or_else(|| invalid("missing face name".to_string()))?;
                Ok(Action::Face(face.parse().map_err(invalid)?))
            }
            "look" => {
                too_many(2)?;
                let direction = arg(0).ok_or_else(|| invalid("missing direction".to_string()))?;
                let speed = arg(1).map(str::parse::<Speed>).transpose().map_err(invalid)?;
                Ok(Action::Look(
                    direction.parse().map_err(invalid)?,
                    speed.unwrap_or(Speed::Medium),
                ))
            }
            "blink" | "close" | "open" => {
                too_many(2)?;
                let eye = arg(0)
                    .map(str::parse::<EyeSelection>)
                    .transpose()
                    .map_err(invalid)?
                    .unwrap_or(EyeSelection::Both);
                let default_speed = if name == "blink" { Speed::Fast } else { Speed::Medium };
                let speed = arg(1)
                    .map(str::parse::<Speed>)
                    .transpose()
                    .map_err(invalid)?
                    .unwrap_or(default_speed);
                Ok(match name.as_str() {
                    "blink" => Action::Blink(eye, speed),
                    "close" => Action::Close(eye, speed),
                    _ => Action::Open(eye, speed),
                })
            }
            "curious" => {
                too_many(1)?;
                match arg(0).map(str::to_ascii_lowercase).as_deref() {
                    Some("on") | Some("true") => Ok(Action::Curious(true)),
                    Some("off") | Some("false") => Ok(Action::Curious(false)),
                    _ => Err(invalid("expected 'on' or 'off'".to_string())),
                }
            }
            "wait" | "sleep" => {
                too_many(1)?;
                let text = arg(0).ok_or_else(|| invalid("missing duration".to_string()))?;
                let duration = humantime::parse_duration(text)
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Action::Wait(duration))
            }
            _ => Err(ScriptError::UnknownAction(token.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Face(face) => write!(f, "face:{}", face),
            Action::Look(direction, speed) => write!(f, "look:{}:{}", direction, speed),
            Action::Blink(eye, speed) => write!(f, "blink:{}:{}", eye, speed),
            Action::Close(eye, speed) => write!(f, "close:{}:{}", eye, speed),
            Action::Open(eye, speed) => write!(f, "open:{}:{}", eye, speed),
            Action::Curious(on) => write!(f, "curious:{}", if *on { "on" } else { "off" }),
            Action::Wait(duration) => write!(f, "wait:{}", humantime::format_duration(*duration)),
        }
    }
}

/// Ordered list of actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    actions: Vec<Action>,
}

impl Script {
    pub fn new(actions: Vec<Action>) -> Result<Self, ScriptError> {
        if actions.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { actions })
    }

    /// Built-in demonstration: expressions, gaze sweep and blinks
    pub fn demo() -> Result<Self, ScriptError> {
        let actions = [
            "face:default",
            "wait:2s",
            "curious:on",
            "look:TR:fast",
            "face:happy",
            "blink",
            "wait:2s",
            "look:BL:medium",
            "face:angry",
            "curious:off",
            "wait:2s",
            "face:tired",
            "look:T:fast",
            "wait:2s",
            "face:default",
            "look:L:medium",
            "look:R:medium",
            "blink",
            "look:B:slow",
            "look:C:slow",
            "blink:left:medium",
            "wait:1s",
            "blink:right:slow",
            "wait:1s",
        ];
        let actions = actions
            .iter()
            .map(|token| token.parse::<Action>())
            .collect::<Result<Vec<Action>, _>>()?;
        Self::new(actions)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .map(str::parse::<Action>)
            .collect::<Result<Vec<Action>, _>>()?;
        Self::new(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("face:happy".parse::<Action>(), Ok(Action::Face(Face::Happy)));
        assert_eq!(
            "look:TR:fast".parse::<Action>(),
            Ok(Action::Look(Direction::TopRight, Speed::Fast))
        );
        assert_eq!(
            "look:bl".parse::<Action>(),
            Ok(Action::Look(Direction::BottomLeft, Speed::Medium))
        );
        assert_eq!(
            "blink".parse::<Action>(),
            Ok(Action::Blink(EyeSelection::Both, Speed::Fast))
        );
        assert_eq!(
            "close:left:slow".parse::<Action>(),
            Ok(Action::Close(EyeSelection::Left, Speed::Slow))
        );
        assert_eq!("curious:on".parse::<Action>(), Ok(Action::Curious(true)));
        assert_eq!(
            "wait:1500ms".parse::<Action>(),
            Ok(Action::Wait(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn test_reject_invalid_actions() {
        assert!(matches!(
            "dance".parse::<Action>(),
            Err(ScriptError::UnknownAction(_))
        ));
        assert!(matches!(
            "look:north".parse::<Action>(),
            Err(ScriptError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "face".parse::<Action>(),
            Err(ScriptError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "wait:soon".parse::<Action>(),
            Err(ScriptError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "blink:both:fast:twice".parse::<Action>(),
            Err(ScriptError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_script() {
        let script: Script = " face:tired , blink:right ,wait:1s,".parse().unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.actions()[1], Action::Blink(EyeSelection::Right, Speed::Fast));

        assert_eq!("".parse::<Script>(), Err(ScriptError::Empty));
    }

    #[test]
    fn test_display_round_trips() {
        let action = Action::Look(Direction::BottomRight, Speed::Slow);
        assert_eq!(action.to_string().parse::<Action>(), Ok(action));
    }

    #[test]
    fn test_demo_script_parses_completely() {
        assert_eq!(Script::demo().unwrap().len(), 24);
    }
}
