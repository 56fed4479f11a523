//! Combat scripts for offline replay.
//!
//! A script is a TOML file with an optional `[roster]`, optional `[[status]]`
//! sheet entries and a list of `[[signal]]` entries. `at` is seconds on an
//! arbitrary clock; the replay anchors the last signal at the current time.
//!
//! ```toml
//! [roster]
//! local_player = 1
//! party = [1, 2]
//!
//! [[signal]]
//! at = 4.0
//! player = 1
//! type = "DamageTaken"
//! amount = 2000
//! hp = 1800
//! max_hp = 80000
//! flags = { critical = true }
//! ```

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use deathrecap_core::events::{Ability, DamageType, HitFlags, IconId, StateSnapshot, StatusId};
use deathrecap_core::game_data::{StatusEntry, StatusTableFile};
use deathrecap_core::{CombatSignal, PlayerId, StaticRoster};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub roster: ScriptRoster,
    #[serde(default, rename = "status")]
    pub statuses: Vec<StatusEntry>,
    #[serde(default, rename = "signal")]
    pub signals: Vec<ScriptSignal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptRoster {
    pub local_player: Option<PlayerId>,
    #[serde(default)]
    pub party: Vec<PlayerId>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptSignal {
    pub at: f64,
    pub player: PlayerId,
    #[serde(default)]
    pub hp: u32,
    pub max_hp: Option<u32>,
    pub barrier: Option<u8>,
    pub statuses: Option<Vec<StatusId>>,
    #[serde(flatten)]
    pub kind: ScriptKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ScriptKind {
    Death {
        name: String,
    },
    DamageTaken {
        amount: i64,
        #[serde(default)]
        damage_type: DamageType,
        #[serde(default)]
        flags: HitFlags,
        source: Option<String>,
        ability: Option<String>,
        icon: Option<IconId>,
        #[serde(default)]
        hide_ability_name: bool,
    },
    Healed {
        amount: i64,
        source: Option<String>,
        ability: Option<String>,
        icon: Option<IconId>,
    },
    DotTick {
        amount: i64,
    },
    HotTick {
        amount: i64,
    },
    StatusApplied {
        status_id: StatusId,
        icon: Option<IconId>,
        #[serde(default)]
        duration: f32,
        source: Option<String>,
    },
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        let script: Script = toml::from_str(&contents)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;

        if let Some(bad) = script.signals.iter().find(|s| !s.at.is_finite()) {
            return Err(format!("signal for player {} has a non-finite time", bad.player));
        }
        Ok(script)
    }

    pub fn roster(&self) -> StaticRoster {
        StaticRoster {
            local_player: self.roster.local_player,
            party: self.roster.party.clone(),
        }
    }

    pub fn status_sheet(&self) -> StatusTableFile {
        StatusTableFile {
            statuses: self.statuses.clone(),
        }
    }

    /// Signals in time order, with the last one landing at `now`.
    ///
    /// Fails when a signal's offset from the last one does not fit a timestamp.
    pub fn to_signals(&self, now: NaiveDateTime) -> Result<Vec<CombatSignal>, String> {
        let last_at = self
            .signals
            .iter()
            .map(|s| s.at)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut ordered: Vec<&ScriptSignal> = self.signals.iter().collect();
        ordered.sort_by(|a, b| a.at.total_cmp(&b.at));

        ordered
            .into_iter()
            .map(|signal| {
                let timestamp = offset_millis(signal.at - last_at)
                    .and_then(Duration::try_milliseconds)
                    .and_then(|offset| now.checked_add_signed(offset))
                    .ok_or_else(|| {
                        format!("signal at {} for player {} is out of range", signal.at, signal.player)
                    })?;
                Ok(signal.to_signal(timestamp))
            })
            .collect()
    }
}

impl ScriptSignal {
    fn to_signal(&self, timestamp: NaiveDateTime) -> CombatSignal {
        let player_id = self.player;
        let mut snapshot = StateSnapshot::new(timestamp, self.hp);
        if let Some(max_hp) = self.max_hp {
            snapshot = snapshot.with_max_hp(max_hp);
        }
        if let Some(barrier) = self.barrier {
            snapshot = snapshot.with_barrier_percent(barrier);
        }
        if let Some(statuses) = &self.statuses {
            snapshot = snapshot.with_status_effects(statuses.clone());
        }

        match &self.kind {
            ScriptKind::Death { name } => CombatSignal::Death {
                player_id,
                player_name: name.clone(),
                timestamp,
            },
            ScriptKind::DamageTaken {
                amount,
                damage_type,
                flags,
                source,
                ability,
                icon,
                hide_ability_name,
            } => CombatSignal::DamageTaken {
                player_id,
                snapshot,
                amount: *amount,
                damage_type: *damage_type,
                flags: *flags,
                source: source.clone(),
                ability: make_ability(ability, *icon),
                hide_ability_name: *hide_ability_name,
            },
            ScriptKind::Healed {
                amount,
                source,
                ability,
                icon,
            } => CombatSignal::Healed {
                player_id,
                snapshot,
                amount: *amount,
                source: source.clone(),
                ability: make_ability(ability, *icon),
            },
            ScriptKind::DotTick { amount } => CombatSignal::DotTick {
                player_id,
                snapshot,
                amount: *amount,
            },
            ScriptKind::HotTick { amount } => CombatSignal::HotTick {
                player_id,
                snapshot,
                amount: *amount,
            },
            ScriptKind::StatusApplied {
                status_id,
                icon,
                duration,
                source,
            } => CombatSignal::StatusApplied {
                player_id,
                snapshot,
                status_id: *status_id,
                icon: *icon,
                duration_secs: *duration,
                source: source.clone(),
            },
        }
    }
}

/// Seconds to whole milliseconds, or `None` if that overflows an `i64`.
fn offset_millis(secs: f64) -> Option<i64> {
    let millis = (secs * 1000.0).round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    (millis.is_finite() && millis >= i64::MIN as f64 && millis < i64::MAX as f64)
        .then_some(millis as i64)
}

fn make_ability(name: &Option<String>, icon: Option<IconId>) -> Option<Ability> {
    name.as_ref().map(|name| Ability {
        name: name.clone(),
        icon,
    })
}
