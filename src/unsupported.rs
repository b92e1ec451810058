use log::warn;

use crate::{DisplayMode, DisplaySettingsApi, DisplaySettingsError, DisplaySettingsResult, ModeRecord};

/// Stand-in for hosts without the Windows display settings API.
///
/// Reports no modes and rejects every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDisplaySettings;

impl UnsupportedDisplaySettings {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySettingsApi for UnsupportedDisplaySettings {
    fn mode_at(&self, _index: u32) -> Option<DisplayMode> {
        warn!("{}", DisplaySettingsError::Unsupported);
        None
    }

    fn current_settings(&self) -> DisplaySettingsResult<ModeRecord> {
        Err(DisplaySettingsError::Unsupported)
    }

    fn apply_settings(&self, _record: &ModeRecord) -> DisplaySettingsResult {
        Err(DisplaySettingsError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{apply_mode, available_modes};

    #[test]
    fn lists_nothing_and_rejects_changes() {
        let api = UnsupportedDisplaySettings::new();
        assert!(available_modes(&api).is_empty());
        assert!(matches!(
            apply_mode(&api, DisplayMode::new(1920, 1080, 60)),
            Err(DisplaySettingsError::Unsupported)
        ));
    }
}
