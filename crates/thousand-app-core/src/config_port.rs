// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port for the table's saved preferences.

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::TablePrefs;

/// Key under which [`TablePrefs`] are stored.
pub const PREFS_KEY: &str = "table_prefs";

/// Load/save port for table preferences.
pub trait ConfigPort {
    /// Load preferences (`None` if missing or unreadable).
    fn load_prefs(&self) -> Option<TablePrefs>;
    /// Persist preferences. Best effort.
    fn save_prefs(&self, prefs: &TablePrefs) -> bool;
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<TablePrefs> {
        self.load(PREFS_KEY).ok().flatten()
    }

    fn save_prefs(&self, prefs: &TablePrefs) -> bool {
        self.save(PREFS_KEY, prefs).is_ok()
    }
}
