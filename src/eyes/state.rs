//! Animation state shared between the animator and the renderer
//!
//! Each `step_*` method advances one frame and reports whether the target
//! has been reached. The animator calls them once per frame interval.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::face::Face;
use crate::config::EyesConfig;

/// Height of an eye that counts as closed
pub const CLOSED_HEIGHT: i32 = 1;

/// Eyelid movement in pixels per frame while changing faces
pub const EYELID_STEP: i32 = 2;

/// Which eye(s) an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSelection {
    Left,
    Right,
    Both,
}

impl EyeSelection {
    pub fn includes_left(&self) -> bool {
        matches!(self, EyeSelection::Left | EyeSelection::Both)
    }

    pub fn includes_right(&self) -> bool {
        matches!(self, EyeSelection::Right | EyeSelection::Both)
    }

    fn from_flags(left: bool, right: bool) -> Option<Self> {
        match (left, right) {
            (true, true) => Some(EyeSelection::Both),
            (true, false) => Some(EyeSelection::Left),
            (false, true) => Some(EyeSelection::Right),
            (false, false) => None,
        }
    }

    /// Union of two optional selections
    pub fn merge(current: Option<Self>, other: Self) -> Self {
        let left = current.is_some_and(|c| c.includes_left()) || other.includes_left();
        let right = current.is_some_and(|c| c.includes_right()) || other.includes_right();
        Self::from_flags(left, right).unwrap_or(other)
    }

    /// What remains of `current` once `other` is removed
    pub fn remove(current: Option<Self>, other: Self) -> Option<Self> {
        let current = current?;
        Self::from_flags(
            current.includes_left() && !other.includes_left(),
            current.includes_right() && !other.includes_right(),
        )
    }
}

impl FromStr for EyeSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(EyeSelection::Left),
            "right" => Ok(EyeSelection::Right),
            "both" => Ok(EyeSelection::Both),
            other => Err(format!("unknown eye '{}'", other)),
        }
    }
}

impl fmt::Display for EyeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EyeSelection::Left => "left",
            EyeSelection::Right => "right",
            EyeSelection::Both => "both",
        })
    }
}

/// Heights of the six eyelids in configured-eye pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Eyelids {
    pub top_inner_left: i32,
    pub top_outer_left: i32,
    pub bottom_left: i32,
    pub top_inner_right: i32,
    pub top_outer_right: i32,
    pub bottom_right: i32,
}

impl Eyelids {
    fn fields_mut(&mut self) -> [&mut i32; 6] {
        [
            &mut self.top_inner_left,
            &mut self.top_outer_left,
            &mut self.bottom_left,
            &mut self.top_inner_right,
            &mut self.top_outer_right,
            &mut self.bottom_right,
        ]
    }

    fn fields(&self) -> [i32; 6] {
        [
            self.top_inner_left,
            self.top_outer_left,
            self.bottom_left,
            self.top_inner_right,
            self.top_outer_right,
            self.bottom_right,
        ]
    }

    /// Move every lid toward `target` by at most `step`
    pub fn step_toward(&mut self, target: &Eyelids, step: i32) -> bool {
        for (current, goal) in self.fields_mut().into_iter().zip(target.fields()) {
            *current = approach(*current, goal, step);
        }
        self == target
    }
}

/// Complete animation state of both eyes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EyeState {
    pub face: Face,
    pub curious: bool,
    pub closed: Option<EyeSelection>,
    pub offset_x: f32,
    pub offset_y: f32,
    pub eyelids: Eyelids,
    pub height_left: i32,
    pub height_right: i32,
}

impl EyeState {
    /// Open eyes looking straight ahead with the default face
    pub fn new(eyes: &EyesConfig) -> Self {
        Self {
            face: Face::Default,
            curious: false,
            closed: None,
            offset_x: 0.0,
            offset_y: 0.0,
            eyelids: Eyelids::default(),
            height_left: eyes.left.height,
            height_right: eyes.right.height,
        }
    }

    pub fn step_eyelids(&mut self, target: &Eyelids) -> bool {
        self.eyelids.step_toward(target, EYELID_STEP)
    }

    pub fn step_gaze(&mut self, target: (f32, f32), step: f32) -> bool {
        self.offset_x = approach_f32(self.offset_x, target.0, step);
        self.offset_y = approach_f32(self.offset_y, target.1, step);
        self.offset_x == target.0 && self.offset_y == target.1
    }

    /// Shrink the selected eyes; records them as closed once they reach 1 px
    pub fn step_close(&mut self, eye: EyeSelection, step: i32) -> bool {
        if eye.includes_left() {
            self.height_left = (self.height_left - step).max(CLOSED_HEIGHT);
        }
        if eye.includes_right() {
            self.height_right = (self.height_right - step).max(CLOSED_HEIGHT);
        }

        let left_done = !eye.includes_left() || self.height_left <= CLOSED_HEIGHT;
        let right_done = !eye.includes_right() || self.height_right <= CLOSED_HEIGHT;
        if left_done && right_done {
            self.closed = Some(EyeSelection::merge(self.closed, eye));
            true
        } else {
            false
        }
    }

    /// Prepare an opening animation. Returns the eyes that will actually open,
    /// or `None` when none of the selected eyes are closed.
    pub fn begin_open(&mut self, eye: EyeSelection, eyes: &EyesConfig) -> Option<EyeSelection> {
        let closed = self.closed?;
        let opening = EyeSelection::from_flags(
            eye.includes_left() && closed.includes_left(),
            eye.includes_right() && closed.includes_right(),
        )?;

        if opening.includes_left() {
            self.height_left = CLOSED_HEIGHT;
        }
        if opening.includes_right() {
            self.height_right = CLOSED_HEIGHT;
        }
        self.height_left = self.height_left.min(eyes.left.height);
        self.height_right = self.height_right.min(eyes.right.height);
        Some(opening)
    }

    /// Grow the selected eyes back to their configured height
    pub fn step_open(&mut self, eye: EyeSelection, eyes: &EyesConfig, step: i32) -> bool {
        if eye.includes_left() {
            self.height_left = (self.height_left + step).min(eyes.left.height);
        }
        if eye.includes_right() {
            self.height_right = (self.height_right + step).min(eyes.right.height);
        }

        let left_done = !eye.includes_left() || self.height_left >= eyes.left.height;
        let right_done = !eye.includes_right() || self.height_right >= eyes.right.height;
        if left_done && right_done {
            self.closed = EyeSelection::remove(self.closed, eye);
            true
        } else {
            false
        }
    }
}

fn approach(current: i32, target: i32, step: i32) -> i32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

fn approach_f32(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<F: FnMut(&mut EyeState) -> bool>(state: &mut EyeState, mut step: F) -> usize {
        let mut frames = 1;
        while !step(state) {
            frames += 1;
            assert!(frames < 1000, "animation did not converge");
        }
        frames
    }

    #[test]
    fn test_eyelids_converge_in_steps_of_two() {
        let eyes = EyesConfig::default();
        let mut state = EyeState::new(&eyes);
        let target = Face::Angry.eyelid_targets(&eyes);

        let frames = run(&mut state, |s| s.step_eyelids(&target));
        assert_eq!(state.eyelids, target);
        // 16 px at 2 px per frame
        assert_eq!(frames, 8);

        let back = Eyelids::default();
        run(&mut state, |s| s.step_eyelids(&back));
        assert_eq!(state.eyelids, back);
    }

    #[test]
    fn test_odd_targets_are_reached_exactly() {
        let mut lids = Eyelids::default();
        let target = Eyelids {
            bottom_left: 5,
            ..Eyelids::default()
        };
        assert!(!lids.step_toward(&target, 2));
        assert!(!lids.step_toward(&target, 2));
        assert!(lids.step_toward(&target, 2));
        assert_eq!(lids.bottom_left, 5);
    }

    #[test]
    fn test_gaze_half_pixel_steps() {
        let mut state = EyeState::new(&EyesConfig::default());
        let frames = run(&mut state, |s| s.step_gaze((-3.0, 2.0), 0.5));
        assert_eq!(frames, 6);
        assert_eq!((state.offset_x, state.offset_y), (-3.0, 2.0));
    }

    #[test]
    fn test_close_and_open_both() {
        let eyes = EyesConfig::default();
        let mut state = EyeState::new(&eyes);

        run(&mut state, |s| s.step_close(EyeSelection::Both, 4));
        assert_eq!(state.closed, Some(EyeSelection::Both));
        assert_eq!((state.height_left, state.height_right), (1, 1));

        let opening = state.begin_open(EyeSelection::Both, &eyes).unwrap();
        run(&mut state, |s| s.step_open(opening, &eyes, 4));
        assert_eq!(state.closed, None);
        assert_eq!((state.height_left, state.height_right), (32, 32));
    }

    #[test]
    fn test_open_one_of_two_closed_eyes() {
        let eyes = EyesConfig::default();
        let mut state = EyeState::new(&eyes);
        run(&mut state, |s| s.step_close(EyeSelection::Both, 2));

        let opening = state.begin_open(EyeSelection::Left, &eyes).unwrap();
        assert_eq!(opening, EyeSelection::Left);
        run(&mut state, |s| s.step_open(opening, &eyes, 2));
        assert_eq!(state.closed, Some(EyeSelection::Right));
        assert_eq!(state.height_left, 32);
        assert_eq!(state.height_right, 1);
    }

    #[test]
    fn test_closing_second_eye_merges_closed_state() {
        let eyes = EyesConfig::default();
        let mut state = EyeState::new(&eyes);
        run(&mut state, |s| s.step_close(EyeSelection::Left, 4));
        assert_eq!(state.closed, Some(EyeSelection::Left));
        run(&mut state, |s| s.step_close(EyeSelection::Right, 4));
        assert_eq!(state.closed, Some(EyeSelection::Both));
    }

    #[test]
    fn test_open_when_not_closed_is_noop() {
        let eyes = EyesConfig::default();
        let mut state = EyeState::new(&eyes);
        assert_eq!(state.begin_open(EyeSelection::Both, &eyes), None);

        run(&mut state, |s| s.step_close(EyeSelection::Left, 4));
        assert_eq!(state.begin_open(EyeSelection::Right, &eyes), None);
        assert_eq!(state.height_left, 1);
    }

    #[test]
    fn test_selection_set_operations() {
        assert_eq!(EyeSelection::merge(None, EyeSelection::Left), EyeSelection::Left);
        assert_eq!(
            EyeSelection::merge(Some(EyeSelection::Right), EyeSelection::Left),
            EyeSelection::Both
        );
        assert_eq!(
            EyeSelection::remove(Some(EyeSelection::Both), EyeSelection::Right),
            Some(EyeSelection::Left)
        );
        assert_eq!(EyeSelection::remove(Some(EyeSelection::Left), EyeSelection::Both), None);
        assert_eq!(EyeSelection::remove(None, EyeSelection::Both), None);
    }
}
