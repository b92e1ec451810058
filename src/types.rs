use core::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use thiserror::Error;

/// Error type for the display module
#[derive(Error, Debug)]
pub enum DisplaySettingsError {
    #[error("Error when calling the Windows API: {0}")]
    WinAPI(String),
    #[error("Apply failed, returned code: {0}")]
    ApplyFailed(String),
    #[error("Display settings are not available on this platform")]
    Unsupported,
}

pub type DisplaySettingsResult<T = ()> = std::result::Result<T, DisplaySettingsError>;

/// Contains the resolution of a display
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this resolution
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Refresh rate in Hz
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct RefreshRate(pub u32);

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolution together with a refresh rate, as reported by `EnumDisplaySettings`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DisplayMode {
    pub resolution: Resolution,
    pub refresh_rate: RefreshRate,
}

impl DisplayMode {
    /// Creates a new display mode
    pub fn new(width: u32, height: u32, frequency: u32) -> Self {
        Self {
            resolution: Resolution::new(width, height),
            refresh_rate: RefreshRate(frequency),
        }
    }

    pub fn area(&self) -> u64 {
        self.resolution.area()
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.resolution, self.refresh_rate)
    }
}

/// Errors that occur while parsing a display mode from a string
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseDisplayModeError {
    #[error("Error parsing integer")]
    IntError(#[from] std::num::ParseIntError),
    #[error("Refresh rate missing. Expected format: <width>x<height>@<frequency>")]
    FrequencyPart,
    #[error("Height missing. Expected format: <width>x<height>@<frequency>")]
    HeightPart,
    #[error("Width, height and frequency must be greater than zero")]
    Zero,
}

impl FromStr for DisplayMode {
    type Err = ParseDisplayModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (resolution, frequency) = s.split_once('@').ok_or(ParseDisplayModeError::FrequencyPart)?;
        let (width, height) = resolution
            .split_once('x')
            .ok_or(ParseDisplayModeError::HeightPart)?;

        let mode = Self::new(width.parse()?, height.parse()?, frequency.parse()?);
        if mode.resolution.width == 0 || mode.resolution.height == 0 || mode.refresh_rate.0 == 0 {
            return Err(ParseDisplayModeError::Zero);
        }
        Ok(mode)
    }
}

/// The `dmFields` change-mask of a native settings record.
///
/// Only the fields whose bit is set are honored when a record is submitted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FieldMask(pub u32);

impl FieldMask {
    pub const PELSWIDTH: Self = Self(0x0008_0000);
    pub const PELSHEIGHT: Self = Self(0x0010_0000);
    pub const DISPLAYFREQUENCY: Self = Self(0x0040_0000);

    /// Width, height and frequency.
    pub const MODE: Self = Self(Self::PELSWIDTH.0 | Self::PELSHEIGHT.0 | Self::DISPLAYFREQUENCY.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FieldMask {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOrAssign for FieldMask {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// The parts of a native settings record this crate reads or writes.
///
/// Every other native field is left to the OS, which keeps it as long as its bit is not in `fields`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModeRecord {
    /// Empty addresses the default device
    pub device_name: String,
    pub mode: DisplayMode,
    pub fields: FieldMask,
}

impl ModeRecord {
    /// A record for the default device that applies `mode` and nothing else.
    pub fn for_default_device(mode: DisplayMode) -> ModeRecord {
        ModeRecord {
            device_name: String::new(),
            mode,
            fields: FieldMask::MODE,
        }
    }

    /// Copies this record with a new mode; the mask is narrowed to the mode fields so nothing else
    /// is applied.
    pub fn with_mode(&self, mode: DisplayMode) -> ModeRecord {
        ModeRecord {
            mode,
            fields: FieldMask::MODE,
            ..self.clone()
        }
    }
}

impl fmt::Display for ModeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mode {{ device: {}, mode: {}, fields: {:#x} }}", self.device_name, self.mode, self.fields.0)
    }
}
