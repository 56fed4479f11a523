//! Thread-safe handle over [`DeathRecap`]
//!
//! The ingest hook and the renderer usually run on different threads. Each
//! method takes the lock for exactly one operation, so an edit never lands in
//! the middle of a timeline rebuild.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use deathrecap_types::RecapConfig;

use crate::error::Result;
use crate::events::{CombatEvent, PlayerId};
use crate::query::{DeathListEntry, PlayerSummary};
use crate::recap::DeathRecap;
use crate::signal_processor::{CombatSignal, SignalHandler};
use crate::store::{Death, EpisodeHandle};
use crate::timeline::TimelineRow;

#[derive(Clone, Default)]
pub struct SharedDeathRecap {
    inner: Arc<Mutex<DeathRecap>>,
}

impl SharedDeathRecap {
    pub fn new(recap: DeathRecap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recap)),
        }
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut DeathRecap) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, DeathRecap> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Death recap lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    pub fn record_signal(&self, signal: &CombatSignal) -> Option<EpisodeHandle> {
        self.lock().record_signal(signal)
    }

    pub fn apply_config(&self, config: RecapConfig) {
        self.lock().apply_config(config);
    }

    pub fn select_player(&self, player_id: PlayerId) {
        self.lock().select_player(player_id);
    }

    pub fn select_episode(&self, display_index: usize) {
        self.lock().select_episode(display_index);
    }

    pub fn delete_episode(&self, display_index: usize) -> Option<Death> {
        self.lock().delete_episode(display_index)
    }

    pub fn remove_event(
        &self,
        player_id: PlayerId,
        episode_index: usize,
        event_index: usize,
    ) -> Result<CombatEvent> {
        self.lock().remove_event(player_id, episode_index, event_index)
    }

    pub fn clear_all(&self) {
        self.lock().clear_all();
    }

    pub fn timeline(&self, player_id: PlayerId, display_index: usize) -> Vec<TimelineRow> {
        self.lock().timeline(player_id, display_index)
    }

    pub fn current_timeline(&self) -> Vec<TimelineRow> {
        self.lock().current_timeline()
    }

    pub fn death_list(&self, now: NaiveDateTime) -> Vec<DeathListEntry> {
        self.lock().death_list(now)
    }

    pub fn player_summaries(&self, now: NaiveDateTime) -> Vec<PlayerSummary> {
        self.lock().player_summaries(now)
    }
}

impl SignalHandler for SharedDeathRecap {
    fn handle_signal(&mut self, signal: &CombatSignal) {
        self.record_signal(signal);
    }

    fn handle_signals(&mut self, signals: &[CombatSignal]) {
        let mut recap = self.lock();
        for signal in signals {
            recap.record_signal(signal);
        }
    }
}
