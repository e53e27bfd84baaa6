use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    load_json_from,
    load_json_or_default,
    save_json_to,
};
use crate::core::{
    GoldlistError,
    VirtualClock,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_WORDS_PER_PAGE: u32 = 20;
pub const DEFAULT_REMINDER_HOUR_UTC: u32 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Words a page needs before its day counts as completed.
    pub words_per_page: u32,
    /// Days added to the real clock. Zero outside of previews.
    pub virtual_day_offset: i64,
    pub notifications_enabled: bool,
    pub reminder_hour_utc: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            words_per_page: DEFAULT_WORDS_PER_PAGE,
            virtual_day_offset: 0,
            notifications_enabled: true,
            reminder_hour_utc: DEFAULT_REMINDER_HOUR_UTC,
        }
    }
}

impl Settings {
    /// Settings from `path`, falling back to defaults when the file is unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        load_json_or_default::<Settings>(path).sanitized()
    }

    pub fn load_from(path: &Path) -> Result<Self, GoldlistError> {
        Ok(load_json_from::<Settings>(path)?.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GoldlistError> {
        save_json_to(self, path)
    }

    pub fn clock(&self) -> VirtualClock {
        VirtualClock::new(self.virtual_day_offset)
    }

    pub fn set_clock(&mut self, clock: VirtualClock) {
        self.virtual_day_offset = clock.offset_days();
    }

    fn sanitized(mut self) -> Self {
        if self.words_per_page == 0 {
            tracing::warn!("words_per_page of 0 in settings, using {}", DEFAULT_WORDS_PER_PAGE);
            self.words_per_page = DEFAULT_WORDS_PER_PAGE;
        }
        if self.reminder_hour_utc > 23 {
            tracing::warn!(
                "reminder_hour_utc of {} in settings, using {}",
                self.reminder_hour_utc,
                DEFAULT_REMINDER_HOUR_UTC
            );
            self.reminder_hour_utc = DEFAULT_REMINDER_HOUR_UTC;
        }
        if !VirtualClock::in_range(self.virtual_day_offset) {
            tracing::warn!(
                "virtual_day_offset of {} in settings is out of range, using 0",
                self.virtual_day_offset
            );
            self.virtual_day_offset = 0;
        }
        self
    }
}
