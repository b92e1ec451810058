use std::collections::HashSet;

use log::{debug, info, warn};

use crate::{DisplayMode, DisplaySettingsResult, ModeRecord};

/// Access to the display settings of the default display device.
///
/// Implemented by the Windows backend and by in-memory fakes in tests.
pub trait DisplaySettingsApi {
    /// Returns the mode at `index` in the device's mode list, or `None` once the list is exhausted.
    fn mode_at(&self, index: u32) -> Option<DisplayMode>;

    /// Returns the currently active settings record.
    fn current_settings(&self) -> DisplaySettingsResult<ModeRecord>;

    /// Submits a settings record as the new active configuration.
    fn apply_settings(&self, record: &ModeRecord) -> DisplaySettingsResult;
}

/// Iterator over the raw mode list of a device, in the order the OS reports it.
pub struct Modes<'a, A: ?Sized> {
    api: &'a A,
    index: Option<u32>,
}

impl<A: DisplaySettingsApi + ?Sized> Iterator for Modes<'_, A> {
    type Item = DisplayMode;

    fn next(&mut self) -> Option<DisplayMode> {
        let index = self.index?;
        match self.api.mode_at(index) {
            Some(mode) => {
                self.index = index.checked_add(1);
                Some(mode)
            }
            None => {
                // A failed query ends the list, whatever the reason.
                debug!("Mode query stopped at index {}", index);
                self.index = None;
                None
            }
        }
    }
}

impl<A: DisplaySettingsApi + ?Sized> std::iter::FusedIterator for Modes<'_, A> {}

/// Returns a lazy iterator over all modes the OS reports, starting at index 0.
pub fn modes<A: DisplaySettingsApi + ?Sized>(api: &A) -> Modes<'_, A> {
    Modes { api, index: Some(0) }
}

/// Returns every distinct mode of the default display, largest area first and the highest refresh
/// rate first within the same area.
pub fn available_modes<A: DisplaySettingsApi + ?Sized>(api: &A) -> Vec<DisplayMode> {
    let raw: Vec<DisplayMode> = modes(api).collect();
    let mut seen = HashSet::new();
    let mut distinct: Vec<DisplayMode> = raw.iter().copied().filter(|mode| seen.insert(*mode)).collect();
    debug!("{} raw modes, {} distinct", raw.len(), distinct.len());

    distinct.sort_by(|a, b| {
        b.area()
            .cmp(&a.area())
            .then_with(|| b.refresh_rate.cmp(&a.refresh_rate))
    });
    distinct
}

/// Switches the default display to `mode`, keeping every other setting of the current record.
///
/// An unreadable current record does not stop the change; the mode is then submitted for the default
/// device. Only the OS rejecting the record is an error. Returns the record that was submitted.
pub fn apply_mode<A: DisplaySettingsApi + ?Sized>(api: &A, mode: DisplayMode) -> DisplaySettingsResult<ModeRecord> {
    let requested = match api.current_settings() {
        Ok(current) => {
            debug!("Current settings: {}", current);
            current.with_mode(mode)
        }
        Err(err) => {
            warn!("Could not read the current settings, using the default device: {}", err);
            ModeRecord::for_default_device(mode)
        }
    };

    match api.apply_settings(&requested) {
        Ok(()) => {
            info!("Applied {} on {}", mode, requested.device_name);
            Ok(requested)
        }
        Err(err) => {
            warn!("Changing to {} was rejected: {}", mode, err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{DisplaySettingsError, FieldMask};

    struct FakeApi {
        modes: Vec<DisplayMode>,
        queries: Cell<u32>,
        current: Option<ModeRecord>,
        accept: bool,
        submitted: RefCell<Vec<ModeRecord>>,
    }

    impl FakeApi {
        fn with_modes(modes: Vec<DisplayMode>) -> Self {
            Self {
                modes,
                queries: Cell::new(0),
                current: Some(current_record()),
                accept: true,
                submitted: RefCell::new(Vec::new()),
            }
        }
    }

    impl DisplaySettingsApi for FakeApi {
        fn mode_at(&self, index: u32) -> Option<DisplayMode> {
            self.queries.set(self.queries.get() + 1);
            self.modes.get(index as usize).copied()
        }

        fn current_settings(&self) -> DisplaySettingsResult<ModeRecord> {
            self.current.clone().ok_or(DisplaySettingsError::WinAPI("no current settings".to_string()))
        }

        fn apply_settings(&self, record: &ModeRecord) -> DisplaySettingsResult {
            self.submitted.borrow_mut().push(record.clone());
            if self.accept {
                Ok(())
            } else {
                Err(DisplaySettingsError::ApplyFailed("BADMODE".to_string()))
            }
        }
    }

    fn current_record() -> ModeRecord {
        ModeRecord {
            device_name: "\\\\.\\DISPLAY1".to_string(),
            mode: DisplayMode::new(2560, 1440, 144),
            fields: FieldMask(0x0004_0000) | FieldMask::MODE,
        }
    }

    #[test]
    fn iterator_stops_at_first_failure() {
        let api = FakeApi::with_modes(vec![DisplayMode::new(800, 600, 60), DisplayMode::new(1024, 768, 60)]);
        let mut iter = modes(&api);
        assert_eq!(iter.next(), Some(DisplayMode::new(800, 600, 60)));
        assert_eq!(iter.next(), Some(DisplayMode::new(1024, 768, 60)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
        assert_eq!(api.queries.get(), 3);
    }

    #[test]
    fn dedups_and_sorts() {
        let api = FakeApi::with_modes(vec![
            DisplayMode::new(1280, 720, 60),
            DisplayMode::new(1920, 1080, 60),
            DisplayMode::new(1920, 1080, 144),
            DisplayMode::new(1280, 720, 60),
            DisplayMode::new(1920, 1080, 60),
            DisplayMode::new(1080, 1920, 75),
            DisplayMode::new(2560, 1440, 60),
        ]);

        assert_eq!(
            available_modes(&api),
            vec![
                DisplayMode::new(2560, 1440, 60),
                DisplayMode::new(1920, 1080, 144),
                DisplayMode::new(1080, 1920, 75),
                DisplayMode::new(1920, 1080, 60),
                DisplayMode::new(1280, 720, 60),
            ]
        );
    }

    #[test]
    fn no_modes_is_empty() {
        let api = FakeApi::with_modes(Vec::new());
        assert!(available_modes(&api).is_empty());
        assert_eq!(api.queries.get(), 1);
    }

    #[test]
    fn apply_submits_current_record_with_new_mode() {
        let api = FakeApi::with_modes(Vec::new());
        let submitted = apply_mode(&api, DisplayMode::new(1920, 1080, 60)).unwrap();

        let expected = ModeRecord {
            mode: DisplayMode::new(1920, 1080, 60),
            fields: FieldMask::MODE,
            ..current_record()
        };
        assert_eq!(submitted, expected);
        assert_eq!(*api.submitted.borrow(), vec![expected]);
    }

    #[test]
    fn apply_reports_rejection() {
        let mut api = FakeApi::with_modes(Vec::new());
        api.accept = false;

        let result = apply_mode(&api, DisplayMode::new(7680, 4320, 240));
        assert!(matches!(result, Err(DisplaySettingsError::ApplyFailed(_))));
        assert_eq!(api.submitted.borrow().len(), 1);
    }

    #[test]
    fn apply_without_current_settings_targets_default_device() {
        let mut api = FakeApi::with_modes(Vec::new());
        api.current = None;

        let submitted = apply_mode(&api, DisplayMode::new(1920, 1080, 60)).unwrap();
        assert_eq!(submitted, ModeRecord::for_default_device(DisplayMode::new(1920, 1080, 60)));
        assert_eq!(*api.submitted.borrow(), vec![submitted]);
    }

    #[test]
    fn apply_without_current_settings_still_reports_rejection() {
        let mut api = FakeApi::with_modes(Vec::new());
        api.current = None;
        api.accept = false;

        assert!(matches!(
            apply_mode(&api, DisplayMode::new(1920, 1080, 60)),
            Err(DisplaySettingsError::ApplyFailed(_))
        ));
        assert_eq!(api.submitted.borrow().len(), 1);
    }
}
