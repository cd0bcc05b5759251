use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::render::PlanSettings;

use super::Result;

/// Viewer preferences, stored as a JSON document. Missing fields take
/// their defaults and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub first_to_last: bool,
    pub dark_mode: bool,
    pub anim_speed_ms: u64,
    pub hide_cursor: bool,
    pub unsafe_plotting: bool,
    pub line_limit: usize,
    pub max_file_size_gb: u64,
}

impl Default for Preferences {
    fn default() -> Preferences {
        Preferences {
            first_to_last: false,
            dark_mode: false,
            anim_speed_ms: 300,
            hide_cursor: false,
            unsafe_plotting: false,
            line_limit: 500,
            max_file_size_gb: 15,
        }
    }
}

impl Preferences {
    /// Reads preferences from `path`. A missing or malformed file falls
    /// back to the defaults instead of failing.
    pub fn load_or_default(path: Option<&Path>) -> Preferences {
        let Some(path) = path else {
            return Preferences::default();
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                warn!("preferences not read from {:?}: {error}", path.display());
                return Preferences::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(prefs) => prefs,
            Err(error) => {
                warn!("ignoring malformed preferences {:?}: {error}", path.display());
                Preferences::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_gb * 1_000_000_000
    }

    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            line_limit: self.line_limit,
            unsafe_plotting: self.unsafe_plotting,
        }
    }
}
