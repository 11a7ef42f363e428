//! Eye Animation Module
//!
//! Expression, gaze and blink animations plus the per-frame geometry derived
//! from them.

pub mod animator;
pub mod face;
pub mod geometry;
pub mod motion;
pub mod script;
pub mod state;

pub use animator::{Animator, SharedEyeState};
pub use face::Face;
pub use geometry::{compose, EyeRect, FrameLayout, Lid};
pub use motion::{Constraints, Direction, Speed};
pub use script::{Action, Script, ScriptError};
pub use state::{EyeSelection, EyeState, Eyelids};
