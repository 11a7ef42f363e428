//! Render loop
//!
//! Composes, paints and presents one frame per tick until shutdown.

use anyhow::Context;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::display::{DisplayError, DisplaySink};
use super::framebuffer::Framebuffer;
use super::painter::{paint, Palette};
use crate::config::{AppConfig, EyesConfig};
use crate::eyes::{compose, FrameLayout, SharedEyeState};
use crate::Result;

pub struct Renderer<S: DisplaySink> {
    sink: S,
    state: SharedEyeState,
    eyes: EyesConfig,
    monochrome: bool,
    palette: Palette,
    has_backlight: bool,
    frame_interval: Duration,
    framebuffer: Framebuffer,
    frames: u64,
}

impl<S: DisplaySink> Renderer<S> {
    /// Fails when the sink does not match the rotated canvas
    pub fn new(sink: S, state: SharedEyeState, config: &AppConfig) -> Result<Self> {
        let (width, height) = config.screen.canvas_size();
        let (sink_width, sink_height) = sink.size();
        if (sink_width, sink_height) != (width, height) {
            return Err(DisplayError::SizeMismatch {
                width: sink_width,
                height: sink_height,
                got_width: width,
                got_height: height,
            })
            .context("Display does not match the configured canvas");
        }
        let monochrome = config.screen.is_monochrome();

        Ok(Self {
            sink,
            state,
            eyes: config.eyes.eye.clone(),
            monochrome,
            palette: Palette::for_mode(monochrome, Palette::default()),
            has_backlight: config.screen.backlight_pin().is_some(),
            frame_interval: config.eyes.render.frame_interval(),
            framebuffer: Framebuffer::new(width, height),
            frames: 0,
        })
    }

    /// Use custom colors; ignored on monochrome panels
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Palette::for_mode(self.monochrome, palette);
        self
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render the current state once and present it
    pub async fn render_frame(&mut self) -> Result<FrameLayout> {
        let state = self.state.read().await.clone();
        let layout = compose(
            &state,
            &self.eyes,
            self.framebuffer.width(),
            self.framebuffer.height(),
        );

        match paint(&layout, &self.palette, &mut self.framebuffer) {
            Ok(()) => {}
            Err(never) => match never {},
        }

        self.sink
            .present(&self.framebuffer)
            .context("Failed to present frame")?;
        self.frames += 1;
        Ok(layout)
    }

    /// Run until a shutdown signal arrives, then hand the sink back
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<S> {
        if self.has_backlight {
            self.sink
                .set_backlight(true)
                .context("Failed to switch backlight on")?;
        }

        info!(
            "Render loop started at {:?} per frame ({}x{})",
            self.frame_interval,
            self.framebuffer.width(),
            self.framebuffer.height()
        );

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let outcome = loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!("Render loop received shutdown signal");
                    break Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.render_frame().await {
                        break Err(e);
                    }
                }
            }
        };

        if self.has_backlight {
            self.sink
                .set_backlight(false)
                .context("Failed to switch backlight off")?;
        }
        outcome?;

        info!("Render loop stopped after {} frames", self.frames);
        Ok(self.sink)
    }
}
