use log::debug;
use winsafe::{co, prelude::NativeBitflag, GmidxEnum};

use crate::{DisplayMode, DisplaySettingsApi, DisplaySettingsError, DisplaySettingsResult, FieldMask, ModeRecord};

/// Display settings of the default display device, backed by `winuser.h`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32DisplaySettings;

impl Win32DisplaySettings {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySettingsApi for Win32DisplaySettings {
    fn mode_at(&self, index: u32) -> Option<DisplayMode> {
        let mut devmode = winsafe::DEVMODE::default();
        // `None` addresses the default device
        winsafe::EnumDisplaySettings(None, GmidxEnum::Gmidx(index), &mut devmode).ok()?;
        Some(DisplayMode::new(devmode.dmPelsWidth, devmode.dmPelsHeight, devmode.dmDisplayFrequency))
    }

    fn current_settings(&self) -> DisplaySettingsResult<ModeRecord> {
        let mut devmode = winsafe::DEVMODE::default();
        winsafe::EnumDisplaySettings(None, GmidxEnum::Enum(co::ENUM_SETTINGS::CURRENT), &mut devmode)
            .map_err(|err| DisplaySettingsError::WinAPI(err.to_string()))?;

        Ok(ModeRecord {
            device_name: devmode.dmDeviceName(),
            mode: DisplayMode::new(devmode.dmPelsWidth, devmode.dmPelsHeight, devmode.dmDisplayFrequency),
            fields: field_mask_from_winsafe(devmode.dmFields),
        })
    }

    fn apply_settings(&self, record: &ModeRecord) -> DisplaySettingsResult {
        let mut devmode = to_devmode(record);
        debug!("ChangeDisplaySettingsEx({}, fields: {:#x})", record.mode, record.fields.0);

        // Applied immediately; neither a test run nor persisted to the registry.
        let result = winsafe::ChangeDisplaySettingsEx(None, Some(&mut devmode), co::CDS::DYNAMICALLY);
        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(DisplaySettingsError::ApplyFailed(err.to_string())),
        }
    }
}

/// Builds a native record holding the device name and the masked mode fields of `record`.
fn to_devmode(record: &ModeRecord) -> winsafe::DEVMODE {
    let mut devmode = winsafe::DEVMODE::default();
    devmode.set_dmDeviceName(&record.device_name);

    if record.fields.contains(FieldMask::PELSWIDTH) {
        devmode.dmPelsWidth = record.mode.resolution.width;
        devmode.dmFields |= co::DM::PELSWIDTH;
    }
    if record.fields.contains(FieldMask::PELSHEIGHT) {
        devmode.dmPelsHeight = record.mode.resolution.height;
        devmode.dmFields |= co::DM::PELSHEIGHT;
    }
    if record.fields.contains(FieldMask::DISPLAYFREQUENCY) {
        devmode.dmDisplayFrequency = record.mode.refresh_rate.0;
        devmode.dmFields |= co::DM::DISPLAYFREQUENCY;
    }
    devmode
}

fn field_mask_from_winsafe(dm: co::DM) -> FieldMask {
    [
        (co::DM::PELSWIDTH, FieldMask::PELSWIDTH),
        (co::DM::PELSHEIGHT, FieldMask::PELSHEIGHT),
        (co::DM::DISPLAYFREQUENCY, FieldMask::DISPLAYFREQUENCY),
    ]
    .into_iter()
    .filter(|(flag, _)| dm.has(*flag))
    .fold(FieldMask::default(), |mask, (_, field)| mask | field)
}
