//! Configuration Manager

use super::error::ConfigError;
use super::eyes::EyeConfig;
use super::types::{
    AppConfig, GpioConfig, I2cConfig, Interface, RawAddress, RawDocument, RawGpio, RawI2c,
    RawScreen, RawSpi, Rotation, ScreenConfig, ScreenKind, SpiConfig, MAX_DIMENSION,
    MONOCHROME_MODE,
};
use std::io::ErrorKind;
use std::path::Path;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and validate the screen configuration from a file
    pub fn load_screen_config(path: &Path) -> Result<ScreenConfig, ConfigError> {
        tracing::info!("Loading screen configuration from: {}", path.display());
        let content = read_file(path)?;

        let document: RawDocument =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: Some(path.to_path_buf()),
                source,
            })?;

        let screen = ScreenConfig::from_raw(document)?;
        tracing::info!(
            "Screen configuration loaded: {} {} {}x{} over {}",
            screen.kind,
            screen.driver,
            screen.width,
            screen.height,
            screen.interface
        );
        Ok(screen)
    }

    /// Parse and validate a screen configuration held in memory
    pub fn parse_screen_config(content: &str) -> Result<ScreenConfig, ConfigError> {
        let document: RawDocument = toml::from_str(content)
            .map_err(|source| ConfigError::ParseError { path: None, source })?;
        ScreenConfig::from_raw(document)
    }

    /// Load the screen configuration, using the built-in display when the file is missing
    pub fn load_screen_config_or_default(path: &Path) -> Result<ScreenConfig, ConfigError> {
        match Self::load_screen_config(path) {
            Err(ConfigError::FileNotFound { .. }) => {
                tracing::warn!(
                    "Screen configuration not found at {}, using built-in defaults",
                    path.display()
                );
                Ok(ScreenConfig::default())
            }
            other => other,
        }
    }

    /// Load the eye configuration; a missing file yields the defaults
    pub fn load_eye_config(path: &Path) -> Result<EyeConfig, ConfigError> {
        let content = match read_file(path) {
            Ok(content) => content,
            Err(ConfigError::FileNotFound { .. }) => {
                tracing::warn!(
                    "Eye configuration not found at {}, using defaults",
                    path.display()
                );
                return Ok(EyeConfig::default());
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Loading eye configuration from: {}", path.display());
        let config: EyeConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: Some(path.to_path_buf()),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load both files and check that the eyes fit the screen
    pub fn load_app_config(
        screen_path: &Path,
        eye_path: &Path,
        fallback_to_default_screen: bool,
    ) -> Result<AppConfig, ConfigError> {
        let screen = if fallback_to_default_screen {
            Self::load_screen_config_or_default(screen_path)?
        } else {
            Self::load_screen_config(screen_path)?
        };
        let eyes = Self::load_eye_config(eye_path)?;

        let config = AppConfig { screen, eyes };
        config.validate()?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

impl ScreenConfig {
    /// Build a validated configuration from the raw document
    pub(crate) fn from_raw(document: RawDocument) -> Result<Self, ConfigError> {
        let raw = document.screen.ok_or_else(|| ConfigError::missing("screen"))?;
        let RawScreen {
            kind,
            driver,
            width,
            height,
            rotate,
            interface,
            mode,
            spi,
            gpio,
            i2c,
        } = raw;

        let kind_token = kind.ok_or_else(|| ConfigError::missing("screen.type"))?;
        let kind: ScreenKind = kind_token
            .parse()
            .map_err(|_| ConfigError::invalid("screen.type", &kind_token, ScreenKind::ALLOWED))?;

        let driver = driver.ok_or_else(|| ConfigError::missing("screen.driver"))?;
        if driver.trim().is_empty() {
            return Err(ConfigError::invalid(
                "screen.driver",
                &driver,
                "a controller name such as st7789 or ssd1306",
            ));
        }

        let width = width.ok_or_else(|| ConfigError::missing("screen.width"))?;
        let width = dimension("screen.width", width)?;
        let height = height.ok_or_else(|| ConfigError::missing("screen.height"))?;
        let height = dimension("screen.height", height)?;

        let degrees = rotate.unwrap_or(0);
        let rotate = Rotation::from_degrees(degrees)
            .ok_or_else(|| ConfigError::invalid("screen.rotate", degrees, Rotation::ALLOWED))?;

        let interface_token = interface.ok_or_else(|| ConfigError::missing("screen.interface"))?;
        let interface: Interface = interface_token.parse().map_err(|_| {
            ConfigError::invalid("screen.interface", &interface_token, Interface::ALLOWED)
        })?;

        match interface {
            Interface::Spi => {
                if spi.is_none() {
                    return Err(ConfigError::missing("screen.spi"));
                }
                if gpio.is_none() {
                    return Err(ConfigError::missing("screen.gpio"));
                }
            }
            Interface::I2c => {
                if i2c.is_none() {
                    return Err(ConfigError::missing("screen.i2c"));
                }
            }
        }

        // Sections for the other bus are ignored, even when incomplete
        let (spi, gpio, i2c) = match interface {
            Interface::Spi => {
                if i2c.is_some() {
                    tracing::debug!("Ignoring [screen.i2c] for an SPI screen");
                }
                (spi.map(build_spi).transpose()?, gpio.map(build_gpio).transpose()?, None)
            }
            Interface::I2c => {
                if spi.is_some() || gpio.is_some() {
                    tracing::debug!("Ignoring [screen.spi]/[screen.gpio] for an I2C screen");
                }
                (None, None, i2c.map(build_i2c).transpose()?)
            }
        };

        Ok(Self {
            kind,
            driver,
            width,
            height,
            rotate,
            interface,
            mode: mode.unwrap_or_else(|| MONOCHROME_MODE.to_string()),
            spi,
            gpio,
            i2c,
        })
    }

    /// Validate a typed configuration, for values changed after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        dimension("screen.width", i64::from(self.width))?;
        dimension("screen.height", i64::from(self.height))?;
        if self.driver.trim().is_empty() {
            return Err(ConfigError::invalid(
                "screen.driver",
                &self.driver,
                "a controller name such as st7789 or ssd1306",
            ));
        }

        match self.interface {
            Interface::Spi => {
                let spi = self.spi.as_ref().ok_or_else(|| ConfigError::missing("screen.spi"))?;
                if spi.bus_speed_hz == 0 {
                    return Err(ConfigError::out_of_range(
                        "screen.spi.spi_bus_speed",
                        0,
                        "a value greater than 0",
                    ));
                }
                if self.gpio.is_none() {
                    return Err(ConfigError::missing("screen.gpio"));
                }
            }
            Interface::I2c => {
                let i2c = self.i2c.as_ref().ok_or_else(|| ConfigError::missing("screen.i2c"))?;
                if i2c.address > MAX_I2C_ADDRESS {
                    return Err(ConfigError::out_of_range(
                        "screen.i2c.address",
                        i64::from(i2c.address),
                        "a 7-bit address (0x00-0x7f)",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn merge_with_cli_args(&mut self, rotate: Option<u16>) -> Result<(), ConfigError> {
        if let Some(degrees) = rotate {
            self.rotate = Rotation::from_degrees(i64::from(degrees)).ok_or_else(|| {
                ConfigError::invalid("--rotate", degrees, Rotation::ALLOWED)
            })?;
            tracing::info!("CLI override: rotation set to {}", self.rotate);
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.screen.validate()?;
        self.eyes.validate()?;
        let (width, height) = self.screen.canvas_size();
        self.eyes.validate_fits(width, height)
    }

    /// Apply command-line overrides, then re-validate
    pub fn merge_with_cli_args(
        &mut self,
        rotate: Option<u16>,
        fps: Option<i32>,
    ) -> Result<(), ConfigError> {
        self.screen.merge_with_cli_args(rotate)?;

        if let Some(fps) = fps {
            self.eyes.render.fps = fps;
            tracing::info!("CLI override: fps set to {}", fps);
        }

        self.validate()
    }
}

const MAX_I2C_ADDRESS: u8 = 0x7f;

fn positive(field: &str, value: i64) -> Result<u32, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::out_of_range(field, value, "a value greater than 0"));
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::out_of_range(field, value, "a value that fits in 32 bits"))
}

fn dimension(field: &str, value: i64) -> Result<u32, ConfigError> {
    let value = positive(field, value)?;
    if value > MAX_DIMENSION {
        return Err(ConfigError::out_of_range(
            field,
            i64::from(value),
            &format!("at most {}", MAX_DIMENSION),
        ));
    }
    Ok(value)
}

fn non_negative(field: &str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::out_of_range(field, value, "a non-negative value"));
    }
    u32::try_from(value)
        .map_err(|_| ConfigError::out_of_range(field, value, "a value that fits in 32 bits"))
}

fn required(field: &str, value: Option<i64>) -> Result<i64, ConfigError> {
    value.ok_or_else(|| ConfigError::missing(field))
}

fn build_spi(raw: RawSpi) -> Result<SpiConfig, ConfigError> {
    let port = required("screen.spi.spi_port", raw.spi_port)?;
    let device = required("screen.spi.spi_device", raw.spi_device)?;
    let bus_speed = required("screen.spi.spi_bus_speed", raw.spi_bus_speed)?;

    Ok(SpiConfig {
        port: non_negative("screen.spi.spi_port", port)?,
        device: non_negative("screen.spi.spi_device", device)?,
        bus_speed_hz: positive("screen.spi.spi_bus_speed", bus_speed)?,
    })
}

fn build_gpio(raw: RawGpio) -> Result<GpioConfig, ConfigError> {
    let data_command = required("screen.gpio.gpio_data_command", raw.gpio_data_command)?;
    let chip_select = required("screen.gpio.gpio_chip_select", raw.gpio_chip_select)?;
    let reset = required("screen.gpio.gpio_reset", raw.gpio_reset)?;

    Ok(GpioConfig {
        data_command: non_negative("screen.gpio.gpio_data_command", data_command)?,
        chip_select: non_negative("screen.gpio.gpio_chip_select", chip_select)?,
        reset: non_negative("screen.gpio.gpio_reset", reset)?,
        backlight: raw
            .gpio_backlight
            .map(|pin| non_negative("screen.gpio.gpio_backlight", pin))
            .transpose()?,
    })
}

fn build_i2c(raw: RawI2c) -> Result<I2cConfig, ConfigError> {
    let address = match raw.address.ok_or_else(|| ConfigError::missing("screen.i2c.address"))? {
        RawAddress::Number(value) => value,
        RawAddress::Text(text) => parse_address(&text)?,
    };
    if !(0..=i64::from(MAX_I2C_ADDRESS)).contains(&address) {
        return Err(ConfigError::out_of_range(
            "screen.i2c.address",
            address,
            "a 7-bit address (0x00-0x7f)",
        ));
    }

    let port = required("screen.i2c.i2c_port", raw.i2c_port)?;

    Ok(I2cConfig {
        address: address as u8,
        port: non_negative("screen.i2c.i2c_port", port)?,
    })
}

/// Accepts "0x3c", "0X3C" or plain decimal text
fn parse_address(text: &str) -> Result<i64, ConfigError> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => trimmed.parse::<i64>(),
    };
    parsed.map_err(|_| {
        ConfigError::invalid(
            "screen.i2c.address",
            text,
            "a hexadecimal address such as \"0x3c\"",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigErrorKind;

    const LCD_CONFIG: &str = r#"
[screen]
type = "lcd"
driver = "st7789"
width = 320
height = 240
rotate = 0
interface = "spi"
mode = "RGB"

[screen.spi]
spi_port = 0
spi_device = 0
spi_bus_speed = 52000000

[screen.gpio]
gpio_data_command = 25
gpio_chip_select = 8
gpio_reset = 27
gpio_backlight = 18
"#;

    const OLED_CONFIG: &str = r#"
[screen]
type = "oled"
driver = "ssd1306"
width = 128
height = 64
interface = "i2c"

[screen.i2c]
address = "0x3c"
i2c_port = 1
"#;

    fn kind_of(content: &str) -> ConfigErrorKind {
        ConfigManager::parse_screen_config(content).unwrap_err().kind()
    }

    #[test]
    fn test_parse_spi_lcd() {
        let screen = ConfigManager::parse_screen_config(LCD_CONFIG).unwrap();
        assert_eq!(screen.kind, ScreenKind::Lcd);
        assert_eq!(screen.driver, "st7789");
        assert_eq!(screen.interface, Interface::Spi);
        assert_eq!(screen.mode, "RGB");
        assert_eq!(
            screen.spi,
            Some(SpiConfig {
                port: 0,
                device: 0,
                bus_speed_hz: 52_000_000
            })
        );
        assert_eq!(screen.backlight_pin(), Some(18));
        assert!(screen.i2c.is_none());
    }

    #[test]
    fn test_parse_i2c_oled_with_hex_address() {
        let screen = ConfigManager::parse_screen_config(OLED_CONFIG).unwrap();
        assert_eq!(screen, ScreenConfig::default());
    }

    #[test]
    fn test_short_key_aliases() {
        let content = LCD_CONFIG
            .replace("spi_port", "port")
            .replace("spi_device", "device")
            .replace("spi_bus_speed", "bus_speed_hz")
            .replace("gpio_reset", "reset");
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert_eq!(screen.spi.unwrap().bus_speed_hz, 52_000_000);
        assert_eq!(screen.gpio.unwrap().reset, 27);
    }

    #[test]
    fn test_field_order_and_comments_do_not_matter() {
        let content = r#"
# panel on the hat
[screen.gpio]
gpio_reset = 27 # RST
gpio_chip_select = 8
gpio_data_command = 25

[screen.spi]
spi_bus_speed = 52000000
spi_device = 0
spi_port = 0

[screen]
mode = "RGB"
interface = "spi"
height = 240
width = 320
driver = "st7789"
type = "lcd"
"#;
        let screen = ConfigManager::parse_screen_config(content).unwrap();
        assert_eq!(screen.width, 320);
        assert_eq!(screen.backlight_pin(), None);
    }

    #[test]
    fn test_invalid_type() {
        let content = LCD_CONFIG.replace("type = \"lcd\"", "type = \"tft\"");
        assert_eq!(kind_of(&content), ConfigErrorKind::InvalidFieldValue);
    }

    #[test]
    fn test_invalid_interface() {
        let content = LCD_CONFIG.replace("interface = \"spi\"", "interface = \"uart\"");
        assert_eq!(kind_of(&content), ConfigErrorKind::InvalidFieldValue);
    }

    #[test]
    fn test_rotation_validation() {
        let content = LCD_CONFIG.replace("rotate = 0", "rotate = 45");
        assert_eq!(kind_of(&content), ConfigErrorKind::InvalidFieldValue);

        let content = LCD_CONFIG.replace("rotate = 0", "rotate = 270");
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert_eq!(screen.rotate, Rotation::Deg270);
        assert_eq!(screen.canvas_size(), (240, 320));
    }

    #[test]
    fn test_missing_rotate_defaults_to_zero() {
        let content = LCD_CONFIG.replace("rotate = 0\n", "");
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert_eq!(screen.rotate, Rotation::Deg0);
    }

    #[test]
    fn test_dimensions_must_be_positive() {
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("width = 320", "width = 0")),
            ConfigErrorKind::OutOfRange
        );
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("height = 240", "height = -240")),
            ConfigErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_dimensions_are_capped() {
        let content = LCD_CONFIG
            .replace("width = 320", "width = 4294967295")
            .replace("height = 240", "height = 4294967295");
        let err = ConfigManager::parse_screen_config(&content).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::OutOfRange);
        assert!(err.to_string().contains("screen.width"));

        assert_eq!(
            kind_of(&LCD_CONFIG.replace("height = 240", "height = 4097")),
            ConfigErrorKind::OutOfRange
        );
        let screen =
            ConfigManager::parse_screen_config(&LCD_CONFIG.replace("width = 320", "width = 4096"))
                .unwrap();
        assert_eq!(screen.width, MAX_DIMENSION);

        let mut screen = ConfigManager::parse_screen_config(LCD_CONFIG).unwrap();
        screen.height = u32::MAX;
        assert_eq!(screen.validate().unwrap_err().kind(), ConfigErrorKind::OutOfRange);
    }

    #[test]
    fn test_unused_bus_sections_are_ignored() {
        let content = format!(
            "{}\n[screen.gpio]\ngpio_reset = 4\n\n[screen.spi]\nspi_port = -1\n",
            OLED_CONFIG
        );
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert_eq!(screen, ScreenConfig::default());

        let content = format!("{}\n[screen.i2c]\naddress = \"zz\"\n", LCD_CONFIG);
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert!(screen.i2c.is_none());
        assert_eq!(screen.backlight_pin(), Some(18));
    }

    #[test]
    fn test_negative_pins_and_bus_parameters() {
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("gpio_reset = 27", "gpio_reset = -1")),
            ConfigErrorKind::OutOfRange
        );
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("spi_device = 0", "spi_device = -2")),
            ConfigErrorKind::OutOfRange
        );
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("spi_bus_speed = 52000000", "spi_bus_speed = 0")),
            ConfigErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_spi_requires_sections() {
        let without_gpio = LCD_CONFIG.split("[screen.gpio]").next().unwrap();
        let err = ConfigManager::parse_screen_config(without_gpio).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::MissingSection);
        assert!(err.to_string().contains("screen.gpio"));

        let without_reset = LCD_CONFIG.replace("gpio_reset = 27\n", "");
        let err = ConfigManager::parse_screen_config(&without_reset).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::MissingSection);
        assert!(err.to_string().contains("gpio_reset"));

        let without_speed = LCD_CONFIG.replace("spi_bus_speed = 52000000\n", "");
        assert_eq!(kind_of(&without_speed), ConfigErrorKind::MissingSection);
    }

    #[test]
    fn test_i2c_requires_section() {
        let content = OLED_CONFIG.split("[screen.i2c]").next().unwrap();
        assert_eq!(kind_of(content), ConfigErrorKind::MissingSection);
    }

    #[test]
    fn test_i2c_address_validation() {
        let content = OLED_CONFIG.replace("\"0x3c\"", "\"zz\"");
        assert_eq!(kind_of(&content), ConfigErrorKind::InvalidFieldValue);

        let content = OLED_CONFIG.replace("\"0x3c\"", "\"0x80\"");
        assert_eq!(kind_of(&content), ConfigErrorKind::OutOfRange);

        let content = OLED_CONFIG.replace("\"0x3c\"", "61");
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert_eq!(screen.i2c.unwrap().address, 61);
    }

    #[test]
    fn test_missing_screen_table_and_fields() {
        assert_eq!(kind_of("[display]\nwidth = 1\n"), ConfigErrorKind::MissingSection);

        let content = LCD_CONFIG.replace("driver = \"st7789\"\n", "");
        let err = ConfigManager::parse_screen_config(&content).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::MissingSection);
        assert!(err.to_string().contains("screen.driver"));
    }

    #[test]
    fn test_syntax_and_type_errors_are_parse_errors() {
        assert_eq!(kind_of("[screen\nwidth = "), ConfigErrorKind::ParseError);
        assert_eq!(
            kind_of(&LCD_CONFIG.replace("width = 320", "width = \"wide\"")),
            ConfigErrorKind::ParseError
        );
    }

    #[test]
    fn test_mode_defaults_to_monochrome() {
        let content = LCD_CONFIG.replace("mode = \"RGB\"\n", "");
        let screen = ConfigManager::parse_screen_config(&content).unwrap();
        assert!(screen.is_monochrome());
    }

    #[test]
    fn test_cli_rotation_override() {
        let mut screen = ConfigManager::parse_screen_config(LCD_CONFIG).unwrap();
        screen.merge_with_cli_args(Some(180)).unwrap();
        assert_eq!(screen.rotate, Rotation::Deg180);

        let err = screen.merge_with_cli_args(Some(100)).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::InvalidFieldValue);
        assert_eq!(screen.rotate, Rotation::Deg180);
    }

    #[test]
    fn test_app_config_overrides_are_revalidated() {
        let mut config = AppConfig {
            screen: ConfigManager::parse_screen_config(LCD_CONFIG).unwrap(),
            eyes: EyeConfig::default(),
        };
        config.merge_with_cli_args(None, Some(60)).unwrap();
        assert_eq!(config.eyes.render.fps, 60);

        let err = config.merge_with_cli_args(None, Some(0)).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::OutOfRange);
    }
}
