//! Facial expressions

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::state::Eyelids;
use crate::config::EyesConfig;

/// Expression formed by the eyelids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Default,
    Happy,
    Angry,
    Tired,
}

impl Face {
    pub fn as_str(&self) -> &'static str {
        match self {
            Face::Default => "default",
            Face::Happy => "happy",
            Face::Angry => "angry",
            Face::Tired => "tired",
        }
    }

    /// Eyelid heights that produce this expression
    ///
    /// Happy raises the bottom lids by a third of the eye, angry drops the
    /// inner top lids by half, tired drops the outer top lids by half.
    pub fn eyelid_targets(&self, eyes: &EyesConfig) -> Eyelids {
        let left = eyes.left.height;
        let right = eyes.right.height;

        match self {
            Face::Default => Eyelids::default(),
            Face::Happy => Eyelids {
                bottom_left: left / 3,
                bottom_right: right / 3,
                ..Eyelids::default()
            },
            Face::Angry => Eyelids {
                top_inner_left: left / 2,
                top_inner_right: right / 2,
                ..Eyelids::default()
            },
            Face::Tired => Eyelids {
                top_outer_left: left / 2,
                top_outer_right: right / 2,
                ..Eyelids::default()
            },
        }
    }
}

impl FromStr for Face {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "neutral" => Ok(Face::Default),
            "happy" => Ok(Face::Happy),
            "angry" => Ok(Face::Angry),
            "tired" => Ok(Face::Tired),
            other => Err(format!("unknown face '{}'", other)),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
