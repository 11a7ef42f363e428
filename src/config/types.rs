//! Configuration Types

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::eyes::EyeConfig;

/// Kind of display panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    Oled,
    Lcd,
}

impl ScreenKind {
    pub const ALLOWED: &'static str = "one of: oled, lcd";

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKind::Oled => "oled",
            ScreenKind::Lcd => "lcd",
        }
    }
}

impl FromStr for ScreenKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oled" => Ok(ScreenKind::Oled),
            "lcd" => Ok(ScreenKind::Lcd),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bus used to talk to the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    I2c,
    Spi,
}

impl Interface {
    pub const ALLOWED: &'static str = "one of: i2c, spi";

    pub fn as_str(&self) -> &'static str {
        match self {
            Interface::I2c => "i2c",
            Interface::Spi => "spi",
        }
    }
}

impl FromStr for Interface {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i2c" => Ok(Interface::I2c),
            "spi" => Ok(Interface::Spi),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALLOWED: &'static str = "one of: 0, 90, 180, 270";

    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn is_portrait_swap(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// SPI bus parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpiConfig {
    pub port: u32,
    pub device: u32,
    pub bus_speed_hz: u32,
}

/// GPIO control lines of an SPI-driven panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpioConfig {
    pub data_command: u32,
    pub chip_select: u32,
    pub reset: u32,
    pub backlight: Option<u32>,
}

/// I2C bus parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct I2cConfig {
    pub address: u8,
    pub port: u32,
}

/// Validated screen configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenConfig {
    #[serde(rename = "type")]
    pub kind: ScreenKind,
    pub driver: String,
    pub width: u32,
    pub height: u32,
    pub rotate: Rotation,
    pub interface: Interface,
    pub mode: String,
    pub spi: Option<SpiConfig>,
    pub gpio: Option<GpioConfig>,
    pub i2c: Option<I2cConfig>,
}

/// Color mode token meaning one bit per pixel
pub const MONOCHROME_MODE: &str = "1";

/// Largest width or height accepted for a panel
pub const MAX_DIMENSION: u32 = 4096;

impl ScreenConfig {
    pub fn is_monochrome(&self) -> bool {
        self.mode == MONOCHROME_MODE
    }

    /// Drawing surface size after rotation
    pub fn canvas_size(&self) -> (u32, u32) {
        if self.rotate.is_portrait_swap() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn backlight_pin(&self) -> Option<u32> {
        self.gpio.as_ref().and_then(|gpio| gpio.backlight)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            kind: ScreenKind::Oled,
            driver: "ssd1306".to_string(),
            width: 128,
            height: 64,
            rotate: Rotation::Deg0,
            interface: Interface::I2c,
            mode: MONOCHROME_MODE.to_string(),
            spi: None,
            gpio: None,
            i2c: Some(I2cConfig {
                address: 0x3c,
                port: 1,
            }),
        }
    }
}

/// Screen and eye configuration loaded together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub screen: ScreenConfig,
    #[serde(flatten)]
    pub eyes: EyeConfig,
}

// Raw document layer. Everything is optional or loosely typed here so that
// validation can report precise error kinds instead of serde messages.

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawDocument {
    pub screen: Option<RawScreen>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawScreen {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub driver: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub rotate: Option<i64>,
    pub interface: Option<String>,
    pub mode: Option<String>,
    pub spi: Option<RawSpi>,
    pub gpio: Option<RawGpio>,
    pub i2c: Option<RawI2c>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawSpi {
    #[serde(alias = "port")]
    pub spi_port: Option<i64>,
    #[serde(alias = "device")]
    pub spi_device: Option<i64>,
    #[serde(alias = "bus_speed_hz")]
    pub spi_bus_speed: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawGpio {
    #[serde(alias = "data_command")]
    pub gpio_data_command: Option<i64>,
    #[serde(alias = "chip_select")]
    pub gpio_chip_select: Option<i64>,
    #[serde(alias = "reset")]
    pub gpio_reset: Option<i64>,
    #[serde(alias = "backlight")]
    pub gpio_backlight: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawI2c {
    pub address: Option<RawAddress>,
    #[serde(alias = "port")]
    pub i2c_port: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAddress {
    Number(i64),
    Text(String),
}
