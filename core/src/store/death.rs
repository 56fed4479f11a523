use chrono::NaiveDateTime;
use deathrecap_types::formatting::format_time_ago;
use serde::Serialize;

use crate::events::{CombatEvent, PlayerId};

/// One death of one player and the events leading up to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Death {
    id: u64,
    player_id: PlayerId,
    player_name: String,
    time_of_death: NaiveDateTime,
    /// Chronological, oldest first
    events: Vec<CombatEvent>,
    sealed: bool,
}

impl Death {
    pub(crate) fn new(
        id: u64,
        player_id: PlayerId,
        player_name: String,
        time_of_death: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            player_id,
            player_name,
            time_of_death,
            events: Vec::new(),
            sealed: false,
        }
    }

    /// Store-assigned identity, unique for the lifetime of the store
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn time_of_death(&self) -> NaiveDateTime {
        self.time_of_death
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Relative label such as "about 2 minutes ago".
    ///
    /// Computed from `now` on every call; never store the result.
    pub fn title(&self, now: NaiveDateTime) -> String {
        format_time_ago(now.signed_duration_since(self.time_of_death).num_seconds())
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<CombatEvent> {
        &mut self.events
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }
}
