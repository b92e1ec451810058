//! A library to list and switch the display modes of the primary display.
//!
//! This library provides an abstraction around the `winuser.h` calls `EnumDisplaySettings` and
//! `ChangeDisplaySettingsEx`. The mode logic is written against [`DisplaySettingsApi`], so it can be
//! driven by the real Windows API or by any other implementation.

pub mod cli;
mod display;
mod types;

#[cfg(windows)]
mod win32;
#[cfg(not(windows))]
mod unsupported;

pub use display::*;
pub use types::*;

#[cfg(windows)]
pub use win32::Win32DisplaySettings as SystemDisplaySettings;
#[cfg(not(windows))]
pub use unsupported::UnsupportedDisplaySettings as SystemDisplaySettings;
