//! Frame geometry
//!
//! Turns an [`EyeState`] into the shapes of one frame: two rounded eye
//! rectangles plus the eyelid masks drawn over them in the background color.

use serde::Serialize;

use super::state::EyeState;
use crate::config::EyesConfig;

/// Maximum growth of an eye in curious mode, as a fraction of its size
const CURIOUS_MAX_GROWTH: f32 = 0.4;

/// Smallest width or height an eye is drawn with
const MIN_EYE_SIZE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left and bottom-right corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EyeRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub radius: i32,
}

impl EyeRect {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

/// Background-colored shape masking part of an eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lid {
    /// Slanted top lid, corners in clockwise order starting top-left
    Top([Point; 4]),
    /// Bottom lid drawn with the eye's rounded corners
    Bottom(EyeRect),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub left: EyeRect,
    pub right: EyeRect,
    pub lids: Vec<Lid>,
}

/// Compute the layout of one frame on a canvas of the given size
pub fn compose(state: &EyeState, eyes: &EyesConfig, width: u32, height: u32) -> FrameLayout {
    let offset_x = state.offset_x.round() as i32;
    let offset_y = state.offset_y.round() as i32;

    let mut width_left = eyes.left.width;
    let mut width_right = eyes.right.width;
    let mut height_left = state.height_left;
    let mut height_right = state.height_right;

    if state.curious && offset_x != 0 {
        let scale = CURIOUS_MAX_GROWTH / (width / 2).max(1) as f32;
        let amount = scale * offset_x.unsigned_abs() as f32;
        let delta = |size: i32| (amount * size as f32) as i32;

        let (dw_left, dw_right) = (delta(eyes.left.width), delta(eyes.right.width));
        let (dh_left, dh_right) = (delta(height_left), delta(height_right));

        if offset_x < 0 {
            width_left += dw_left;
            width_right -= dw_right;
            height_left += dh_left;
            height_right -= dh_right;
        } else {
            width_left -= dw_left;
            width_right += dw_right;
            height_left -= dh_left;
            height_right += dh_right;
        }
    }

    let width_left = width_left.max(MIN_EYE_SIZE);
    let width_right = width_right.max(MIN_EYE_SIZE);
    let height_left = height_left.max(MIN_EYE_SIZE);
    let height_right = height_right.max(MIN_EYE_SIZE);

    let center_x = width as i32 / 2;
    let center_y = height as i32 / 2;
    let half_distance = eyes.distance / 2;

    let left = EyeRect {
        x0: center_x - width_left - half_distance + offset_x,
        y0: center_y - height_left / 2 + offset_y,
        x1: center_x - half_distance + offset_x,
        y1: center_y + height_left / 2 + offset_y,
        radius: eyes.left.roundness,
    };
    let right = EyeRect {
        x0: center_x + half_distance + offset_x,
        y0: center_y - height_right / 2 + offset_y,
        x1: center_x + width_right + half_distance + offset_x,
        y1: center_y + height_right / 2 + offset_y,
        radius: eyes.right.roundness,
    };

    // Lid heights are configured against the full eye, so scale them with
    // the eye's current height.
    let scale_left = |lid: i32| lid * height_left / eyes.left.height.max(1);
    let scale_right = |lid: i32| lid * height_right / eyes.right.height.max(1);
    let lids_state = &state.eyelids;
    let mut lids = Vec::new();

    if lids_state.top_inner_left > 0 || lids_state.top_outer_left > 0 {
        lids.push(Lid::Top([
            Point::new(left.x0, left.y0),
            Point::new(left.x1, left.y0),
            Point::new(left.x1, left.y0 + scale_left(lids_state.top_inner_left)),
            Point::new(left.x0, left.y0 + scale_left(lids_state.top_outer_left)),
        ]));
    }
    if lids_state.top_inner_right > 0 || lids_state.top_outer_right > 0 {
        lids.push(Lid::Top([
            Point::new(right.x0, right.y0),
            Point::new(right.x1, right.y0),
            Point::new(right.x1, right.y0 + scale_right(lids_state.top_outer_right)),
            Point::new(right.x0, right.y0 + scale_right(lids_state.top_inner_right)),
        ]));
    }
    if lids_state.bottom_left > 0 {
        lids.push(Lid::Bottom(EyeRect {
            y0: left.y1 - scale_left(lids_state.bottom_left),
            ..left
        }));
    }
    if lids_state.bottom_right > 0 {
        lids.push(Lid::Bottom(EyeRect {
            y0: right.y1 - scale_right(lids_state.bottom_right),
            ..right
        }));
    }

    FrameLayout {
        width,
        height,
        left,
        right,
        lids,
    }
}
