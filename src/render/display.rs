//! Display sinks
//!
//! A sink receives finished frames. Hardware sinks (SPI/I2C panels) live
//! outside this crate and implement [`DisplaySink`]; the headless sink here
//! keeps frames in memory.

use thiserror::Error;

use super::framebuffer::Framebuffer;

/// Errors that can occur when presenting frames
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Frame size {got_width}x{got_height} does not match display size {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

/// Destination for rendered frames
pub trait DisplaySink: Send {
    /// Canvas size the sink expects, after rotation
    fn size(&self) -> (u32, u32);

    /// Push a complete frame to the panel
    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError>;

    /// Switch the backlight, for panels that have one
    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError>;
}

/// In-memory display used for dry runs and tests
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    width: u32,
    height: u32,
    frames_presented: u64,
    last_frame: Option<Framebuffer>,
    backlight: bool,
}

impl HeadlessDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames_presented: 0,
            last_frame: None,
            backlight: false,
        }
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_frame(&self) -> Option<&Framebuffer> {
        self.last_frame.as_ref()
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }
}

impl DisplaySink for HeadlessDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError> {
        if (frame.width(), frame.height()) != (self.width, self.height) {
            return Err(DisplayError::SizeMismatch {
                width: self.width,
                height: self.height,
                got_width: frame.width(),
                got_height: frame.height(),
            });
        }

        self.frames_presented += 1;
        match &mut self.last_frame {
            Some(last) => last.clone_from(frame),
            None => self.last_frame = Some(frame.clone()),
        }
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        tracing::debug!("Backlight {}", if on { "on" } else { "off" });
        self.backlight = on;
        Ok(())
    }
}
