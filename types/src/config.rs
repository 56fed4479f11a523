//! User-facing recap settings.
//!
//! Every field carries a serde default so partial config files (or files
//! written by an older version) still load.

use serde::{Deserialize, Serialize};

/// Which players get their deaths recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// The local player
    pub capture_self: bool,
    /// Members of the local player's party
    pub capture_party: bool,
    /// Anyone else the hook reports on
    pub capture_others: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            capture_self: true,
            capture_party: true,
            capture_others: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecapConfig {
    /// Upper bound on stored deaths per player; oldest are evicted first.
    pub max_deaths_per_player: usize,
    /// Deaths older than this are pruned when a new death is recorded.
    /// `0` keeps deaths until evicted by count or cleared.
    pub keep_deaths_for_minutes: u64,
    /// Length of the rolling pre-death event window.
    pub keep_events_secs: u64,
    /// Signals arriving this long after a death still belong to the death frame
    /// and are discarded instead of starting a new buffer.
    pub trailing_signal_grace_ms: u64,
    pub european_number_format: bool,
    pub capture: CaptureConfig,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            max_deaths_per_player: 10,
            keep_deaths_for_minutes: 60,
            keep_events_secs: 60,
            trailing_signal_grace_ms: 1500,
            european_number_format: false,
            capture: CaptureConfig::default(),
        }
    }
}
