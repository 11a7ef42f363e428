//! Frame-paced eye animations
//!
//! The animator mutates the shared [`EyeState`] once per frame interval while
//! the renderer reads it on its own schedule.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::face::Face;
use super::motion::{Constraints, Direction, Speed};
use super::script::{Action, Script};
use super::state::{EyeSelection, EyeState};
use crate::config::{AppConfig, EyesConfig};

/// Shared handle to the animation state
pub type SharedEyeState = Arc<RwLock<EyeState>>;

/// Drives animations on the shared eye state
pub struct Animator {
    state: SharedEyeState,
    eyes: EyesConfig,
    canvas: (u32, u32),
    frame_interval: Duration,
}

impl Animator {
    pub fn new(state: SharedEyeState, config: &AppConfig) -> Self {
        Self {
            state,
            eyes: config.eyes.eye.clone(),
            canvas: config.screen.canvas_size(),
            frame_interval: config.eyes.render.frame_interval(),
        }
    }

    /// Create the shared state for a configuration, eyes open and centered
    pub fn initial_state(config: &AppConfig) -> SharedEyeState {
        Arc::new(RwLock::new(EyeState::new(&config.eyes.eye)))
    }

    pub fn state(&self) -> SharedEyeState {
        Arc::clone(&self.state)
    }

    /// Current gaze limits, which depend on curious mode
    pub async fn constraints(&self) -> Constraints {
        let curious = self.state.read().await.curious;
        Constraints::compute(&self.eyes, self.canvas.0, self.canvas.1, curious)
    }

    /// Step the state once per frame until `step` reports completion.
    /// Returns the number of frames taken.
    async fn animate<F>(&self, mut step: F) -> usize
    where
        F: FnMut(&mut EyeState) -> bool,
    {
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut frames = 0;
        loop {
            ticker.tick().await;
            frames += 1;
            let done = {
                let mut state = self.state.write().await;
                step(&mut state)
            };
            if done {
                return frames;
            }
        }
    }

    /// Move the eyelids to form a new expression
    pub async fn change_face(&self, face: Face) -> usize {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut state.face, face)
        };
        let target = face.eyelid_targets(&self.eyes);
        let frames = self.animate(|state| state.step_eyelids(&target)).await;
        debug!("Face changed from {} to {} in {} frames", previous, face, frames);
        frames
    }

    /// Move the gaze toward a direction
    pub async fn look(&self, direction: Direction, speed: Speed) -> usize {
        let target = direction.target(&self.constraints().await);
        let step = speed.gaze_step();
        let frames = self.animate(|state| state.step_gaze(target, step)).await;
        debug!("Looked {} ({}) in {} frames", direction, speed, frames);
        frames
    }

    pub async fn close_eyes(&self, eye: EyeSelection, speed: Speed) -> usize {
        let step = speed.lid_step();
        let frames = self.animate(|state| state.step_close(eye, step)).await;
        debug!("Closed {} eye(s) in {} frames", eye, frames);
        frames
    }

    /// Open closed eyes; does nothing when the selected eyes are already open
    pub async fn open_eyes(&self, eye: EyeSelection, speed: Speed) -> usize {
        let opening = {
            let mut state = self.state.write().await;
            state.begin_open(eye, &self.eyes)
        };
        let Some(opening) = opening else {
            warn!("Eyes are already open, skipping animation");
            return 0;
        };

        let step = speed.lid_step();
        let eyes = &self.eyes;
        let frames = self
            .animate(|state| state.step_open(opening, eyes, step))
            .await;
        debug!("Opened {} eye(s) in {} frames", opening, frames);
        frames
    }

    pub async fn blink(&self, eye: EyeSelection, speed: Speed) -> usize {
        self.close_eyes(eye, speed).await + self.open_eyes(eye, speed).await
    }

    /// Toggle the perspective effect, hidden behind a blink
    pub async fn set_curious(&self, curious: bool) -> usize {
        let mut frames = self.close_eyes(EyeSelection::Both, Speed::Medium).await;
        self.state.write().await.curious = curious;
        frames += self.open_eyes(EyeSelection::Both, Speed::Medium).await;
        debug!("Curious mode {}", if curious { "enabled" } else { "disabled" });
        frames
    }

    pub async fn perform(&self, action: &Action) {
        match *action {
            Action::Face(face) => {
                self.change_face(face).await;
            }
            Action::Look(direction, speed) => {
                self.look(direction, speed).await;
            }
            Action::Blink(eye, speed) => {
                self.blink(eye, speed).await;
            }
            Action::Close(eye, speed) => {
                self.close_eyes(eye, speed).await;
            }
            Action::Open(eye, speed) => {
                self.open_eyes(eye, speed).await;
            }
            Action::Curious(curious) => {
                self.set_curious(curious).await;
            }
            Action::Wait(duration) => tokio::time::sleep(duration).await,
        }
    }

    pub async fn run_script(&self, script: &Script) {
        info!("Running animation script with {} actions", script.len());
        for action in script.actions() {
            debug!("Action: {}", action);
            self.perform(action).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EyeConfig, ScreenConfig};

    fn fast_config() -> AppConfig {
        let mut eyes = EyeConfig::default();
        eyes.render.fps = 240;
        AppConfig {
            screen: ScreenConfig::default(),
            eyes,
        }
    }

    fn animator() -> Animator {
        let config = fast_config();
        Animator::new(Animator::initial_state(&config), &config)
    }

    #[tokio::test]
    async fn test_change_face_reaches_targets() {
        let animator = animator();
        let frames = animator.change_face(Face::Happy).await;
        assert_eq!(frames, 5);

        let state = animator.state();
        let state = state.read().await;
        assert_eq!(state.face, Face::Happy);
        assert_eq!(state.eyelids.bottom_left, 10);
    }

    #[tokio::test]
    async fn test_look_reaches_constraint() {
        let animator = animator();
        animator.look(Direction::Right, Speed::Fast).await;
        let limits = animator.constraints().await;

        let state = animator.state();
        let state = state.read().await;
        assert_eq!(state.offset_x, limits.max_x as f32);
        assert_eq!(state.offset_y, 0.0);
    }

    #[tokio::test]
    async fn test_blink_restores_open_eyes() {
        let animator = animator();
        let frames = animator.blink(EyeSelection::Both, Speed::Fast).await;
        assert!(frames > 0);

        let state = animator.state();
        let state = state.read().await;
        assert_eq!(state.closed, None);
        assert_eq!(state.height_left, 32);
        assert_eq!(state.height_right, 32);
    }

    #[tokio::test]
    async fn test_open_when_already_open_takes_no_frames() {
        let animator = animator();
        assert_eq!(animator.open_eyes(EyeSelection::Both, Speed::Slow).await, 0);
    }

    #[tokio::test]
    async fn test_curious_mode_toggles_behind_blink() {
        let animator = animator();
        animator.set_curious(true).await;
        {
            let state = animator.state();
            let state = state.read().await;
            assert!(state.curious);
            assert_eq!(state.closed, None);
        }
        let curious_limits = animator.constraints().await;
        animator.set_curious(false).await;
        let normal_limits = animator.constraints().await;
        assert!(curious_limits.max_x < normal_limits.max_x);
    }

    #[tokio::test]
    async fn test_run_script() {
        let animator = animator();
        let script: Script = "face:angry,look:L:fast,close:left:fast".parse().unwrap();
        animator.run_script(&script).await;

        let state = animator.state();
        let state = state.read().await;
        assert_eq!(state.face, Face::Angry);
        assert_eq!(state.closed, Some(EyeSelection::Left));
        assert!(state.offset_x < 0.0);
    }
}
