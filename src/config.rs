use std::env;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub page_size: usize,
    pub tz_offset_minutes: i32,
    // Whether flipping "show included only" counts as a configuration edit.
    pub included_only_marks_dirty: bool,
    pub catalog_path: Option<PathBuf>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            tz_offset_minutes: 0,
            included_only_marks_dirty: false,
            catalog_path: None,
        }
    }
}

impl WidgetSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let page_size = lookup("WIDGET_PAGE_SIZE")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let tz_offset_minutes = lookup("WIDGET_TZ_OFFSET_MINUTES")
            .and_then(|val| val.trim().parse::<i32>().ok())
            .unwrap_or(0)
            .clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES);
        let included_only_marks_dirty = lookup("WIDGET_INCLUDED_ONLY_MARKS_DIRTY")
            .map(|val| parse_flag(&val))
            .unwrap_or(false);
        let catalog_path = lookup("WIDGET_CATALOG_PATH")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);
        Self {
            page_size,
            tz_offset_minutes,
            included_only_marks_dirty,
            catalog_path,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
