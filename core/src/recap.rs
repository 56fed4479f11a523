//! Single-owner death recap
//!
//! [`DeathRecap`] ties ingestion, storage and selection together behind one
//! `&mut self` value. Hosts that ingest and render on different threads wrap
//! it in [`crate::SharedDeathRecap`].

use chrono::NaiveDateTime;
use deathrecap_types::RecapConfig;

use crate::error::Result;
use crate::events::{CombatEvent, PlayerId};
use crate::game_data::{RosterLookup, StaticRoster, StatusLookup, StatusTable};
use crate::query::{DeathListEntry, PlayerSummary, RecapSelection};
use crate::signal_processor::{CombatSignal, SignalHandler, SignalProcessor};
use crate::store::{Death, DeathStore, EpisodeHandle};
use crate::timeline::TimelineRow;

pub struct DeathRecap {
    config: RecapConfig,
    store: DeathStore,
    selection: RecapSelection,
    processor: SignalProcessor,
    statuses: Box<dyn StatusLookup + Send>,
    roster: Box<dyn RosterLookup + Send>,
}

impl Default for DeathRecap {
    fn default() -> Self {
        Self::new(
            RecapConfig::default(),
            Box::new(StatusTable::new()),
            Box::new(StaticRoster::default()),
        )
    }
}

impl DeathRecap {
    pub fn new(
        config: RecapConfig,
        statuses: Box<dyn StatusLookup + Send>,
        roster: Box<dyn RosterLookup + Send>,
    ) -> Self {
        Self {
            store: DeathStore::new(config.max_deaths_per_player),
            selection: RecapSelection::new(),
            processor: SignalProcessor::new(&config),
            config,
            statuses,
            roster,
        }
    }

    // --- Configuration ---

    pub fn config(&self) -> &RecapConfig {
        &self.config
    }

    /// Apply new settings. A smaller per-player cap evicts immediately.
    pub fn apply_config(&mut self, config: RecapConfig) {
        if config.max_deaths_per_player != self.store.max_deaths_per_player() {
            self.store.set_max_deaths_per_player(config.max_deaths_per_player);
        }
        self.processor.apply_config(&config);
        self.config = config;
    }

    pub fn set_status_lookup(&mut self, statuses: Box<dyn StatusLookup + Send>) {
        self.statuses = statuses;
    }

    pub fn set_roster(&mut self, roster: Box<dyn RosterLookup + Send>) {
        self.roster = roster;
    }

    // --- Ingestion ---

    /// Feed one signal. Returns the sealed episode's handle when a death was recorded.
    pub fn record_signal(&mut self, signal: &CombatSignal) -> Option<EpisodeHandle> {
        self.processor
            .process_signal(signal, &mut self.store, self.roster.as_ref())
    }

    /// Drop buffered pre-death events, e.g. on zone change. Recorded deaths stay.
    pub fn reset_ingestion(&mut self) {
        self.processor.reset();
    }

    // --- Selection ---

    pub fn selected_player(&self) -> Option<PlayerId> {
        self.selection.selected_player(&self.store)
    }

    pub fn selected_episode(&self) -> usize {
        self.selection.effective_index(&self.store)
    }

    pub fn select_player(&mut self, player_id: PlayerId) {
        self.selection.select_player(player_id);
    }

    pub fn select_episode(&mut self, display_index: usize) {
        self.selection.select_episode(&self.store, display_index);
    }

    // --- Edits ---

    pub fn delete_episode(&mut self, display_index: usize) -> Option<Death> {
        self.selection.delete_episode(&mut self.store, display_index)
    }

    /// Delete one event by storage indices (oldest first).
    pub fn remove_event(
        &mut self,
        player_id: PlayerId,
        episode_index: usize,
        event_index: usize,
    ) -> Result<CombatEvent> {
        self.store.remove_event(player_id, episode_index, event_index)
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all(&mut self.store);
    }

    // --- Reads ---

    pub fn store(&self) -> &DeathStore {
        &self.store
    }

    pub fn timeline(&self, player_id: PlayerId, display_index: usize) -> Vec<TimelineRow> {
        RecapSelection::timeline(&self.store, self.statuses.as_ref(), player_id, display_index)
    }

    pub fn current_timeline(&self) -> Vec<TimelineRow> {
        self.selection
            .current_timeline(&self.store, self.statuses.as_ref())
    }

    pub fn current_death(&self) -> Option<&Death> {
        self.selection.current_death(&self.store)
    }

    pub fn death_list(&self, now: NaiveDateTime) -> Vec<DeathListEntry> {
        self.selection.death_list(&self.store, now)
    }

    pub fn player_summaries(&self, now: NaiveDateTime) -> Vec<PlayerSummary> {
        self.selection
            .player_summaries(&self.store, self.roster.as_ref(), now)
    }
}

impl SignalHandler for DeathRecap {
    fn handle_signal(&mut self, signal: &CombatSignal) {
        self.record_signal(signal);
    }
}
