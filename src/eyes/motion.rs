//! Gaze directions, animation speeds and movement limits

use std::fmt;
use std::str::FromStr;

use crate::config::EyesConfig;

/// Where the eyes look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Center => "C",
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Top => "T",
            Direction::Bottom => "B",
            Direction::TopLeft => "TL",
            Direction::TopRight => "TR",
            Direction::BottomLeft => "BL",
            Direction::BottomRight => "BR",
        }
    }

    /// Target gaze offset for this direction
    pub fn target(&self, limits: &Constraints) -> (f32, f32) {
        let (x, y) = match self {
            Direction::Center => (0, 0),
            Direction::Left => (limits.min_x, 0),
            Direction::Right => (limits.max_x, 0),
            Direction::Top => (0, limits.min_y),
            Direction::Bottom => (0, limits.max_y),
            Direction::TopLeft => (limits.min_x, limits.min_y),
            Direction::TopRight => (limits.max_x, limits.min_y),
            Direction::BottomLeft => (limits.min_x, limits.max_y),
            Direction::BottomRight => (limits.max_x, limits.max_y),
        };
        (x as f32, y as f32)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CENTER" => Ok(Direction::Center),
            "L" | "LEFT" => Ok(Direction::Left),
            "R" | "RIGHT" => Ok(Direction::Right),
            "T" | "TOP" | "UP" => Ok(Direction::Top),
            "B" | "BOTTOM" | "DOWN" => Ok(Direction::Bottom),
            "TL" => Ok(Direction::TopLeft),
            "TR" => Ok(Direction::TopRight),
            "BL" => Ok(Direction::BottomLeft),
            "BR" => Ok(Direction::BottomRight),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    /// Gaze movement in pixels per frame
    pub fn gaze_step(&self) -> f32 {
        match self {
            Speed::Slow => 0.5,
            Speed::Medium => 1.0,
            Speed::Fast => 2.0,
        }
    }

    /// Eye opening/closing in pixels per frame
    pub fn lid_step(&self) -> i32 {
        match self {
            Speed::Slow => 1,
            Speed::Medium => 2,
            Speed::Fast => 4,
        }
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(Speed::Slow),
            "medium" => Ok(Speed::Medium),
            "fast" => Ok(Speed::Fast),
            other => Err(format!("unknown speed '{}'", other)),
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        })
    }
}

/// Growth applied to eye sizes when computing limits in curious mode
const CURIOUS_LIMIT_GROWTH: f32 = 0.2;

/// Range of gaze offsets that keeps both eyes on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Constraints {
    pub fn compute(eyes: &EyesConfig, canvas_width: u32, canvas_height: u32, curious: bool) -> Self {
        let grow = |value: i32| {
            if curious {
                (value as f32 * (1.0 + CURIOUS_LIMIT_GROWTH)) as i32
            } else {
                value
            }
        };

        let width_left = grow(eyes.left.width);
        let width_right = grow(eyes.right.width);
        let height_left = grow(eyes.left.height);
        let height_right = grow(eyes.right.height);

        let half_width = canvas_width as i32 / 2;
        let half_height = canvas_height as i32 / 2;
        let half_distance = eyes.distance / 2;

        Self {
            min_x: -(half_width - width_left - half_distance),
            max_x: half_width - width_right - half_distance,
            min_y: -(half_height - height_left / 2),
            max_y: half_height - height_right / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_default_eyes() {
        let limits = Constraints::compute(&EyesConfig::default(), 128, 64, false);
        assert_eq!(
            limits,
            Constraints {
                min_x: -27,
                max_x: 27,
                min_y: -16,
                max_y: 16,
            }
        );
    }

    #[test]
    fn test_curious_constraints_are_tighter() {
        let normal = Constraints::compute(&EyesConfig::default(), 128, 64, false);
        let curious = Constraints::compute(&EyesConfig::default(), 128, 64, true);
        assert!(curious.max_x < normal.max_x);
        assert!(curious.min_x > normal.min_x);
        // 32 * 1.2 = 38
        assert_eq!(curious.max_x, 64 - 38 - 5);
    }

    #[test]
    fn test_direction_targets() {
        let limits = Constraints {
            min_x: -10,
            max_x: 12,
            min_y: -4,
            max_y: 6,
        };
        assert_eq!(Direction::TopRight.target(&limits), (12.0, -4.0));
        assert_eq!(Direction::BottomLeft.target(&limits), (-10.0, 6.0));
        assert_eq!(Direction::Center.target(&limits), (0.0, 0.0));
    }

    #[test]
    fn test_parse_direction_and_speed() {
        assert_eq!("tr".parse::<Direction>(), Ok(Direction::TopRight));
        assert_eq!("C".parse::<Direction>(), Ok(Direction::Center));
        assert!("north".parse::<Direction>().is_err());

        assert_eq!("FAST".parse::<Speed>(), Ok(Speed::Fast));
        assert_eq!(Speed::Slow.gaze_step(), 0.5);
        assert_eq!(Speed::Fast.lid_step(), 4);
    }
}
