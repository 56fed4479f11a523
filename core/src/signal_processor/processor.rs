use chrono::{Duration, NaiveDateTime};
use deathrecap_types::{CaptureConfig, RecapConfig};
use hashbrown::HashMap;
use std::collections::VecDeque;

use super::CombatSignal;
use crate::error::RecapError;
use crate::events::{CombatEvent, PlayerId};
use crate::game_data::RosterLookup;
use crate::store::{DeathStore, EpisodeHandle};

/// Where a player's last death was recorded, for routing trailing signals.
#[derive(Debug, Clone, Copy)]
struct DeathMark {
    handle: EpisodeHandle,
    time_of_death: NaiveDateTime,
}

/// Buffers recent events per tracked player and records a death episode when
/// a death signal arrives.
#[derive(Debug, Clone)]
pub struct SignalProcessor {
    /// Rolling pre-death window, oldest first
    recent: HashMap<PlayerId, VecDeque<CombatEvent>>,
    death_marks: HashMap<PlayerId, DeathMark>,
    capture: CaptureConfig,
    keep_events: Duration,
    trailing_grace: Duration,
    retention: Option<Duration>,
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new(&RecapConfig::default())
    }
}

impl SignalProcessor {
    pub fn new(config: &RecapConfig) -> Self {
        let mut processor = Self {
            recent: HashMap::new(),
            death_marks: HashMap::new(),
            capture: config.capture,
            keep_events: Duration::zero(),
            trailing_grace: Duration::zero(),
            retention: None,
        };
        processor.apply_config(config);
        processor
    }

    /// Pick up changed settings. Buffered events are kept.
    pub fn apply_config(&mut self, config: &RecapConfig) {
        self.capture = config.capture;
        self.keep_events = seconds(config.keep_events_secs);
        self.trailing_grace = Duration::try_milliseconds(
            i64::try_from(config.trailing_signal_grace_ms).unwrap_or(i64::MAX),
        )
        .unwrap_or(Duration::MAX);
        self.retention = match config.keep_deaths_for_minutes {
            0 => None,
            minutes => Some(seconds(minutes.saturating_mul(60))),
        };
    }

    /// Whether deaths of `player_id` are recorded under the capture settings.
    pub fn is_tracked(&self, player_id: PlayerId, roster: &dyn RosterLookup) -> bool {
        if roster.local_player() == Some(player_id) {
            self.capture.capture_self
        } else if roster.is_party_member(player_id) {
            self.capture.capture_party
        } else {
            self.capture.capture_others
        }
    }

    /// Feed one signal. Returns the handle of the sealed episode when the
    /// signal recorded a death.
    pub fn process_signal(
        &mut self,
        signal: &CombatSignal,
        store: &mut DeathStore,
        roster: &dyn RosterLookup,
    ) -> Option<EpisodeHandle> {
        let player_id = signal.player_id();
        if !self.is_tracked(player_id, roster) {
            return None;
        }

        match signal {
            CombatSignal::Death {
                player_name,
                timestamp,
                ..
            } => Some(self.record_death(player_id, player_name, *timestamp, store)),
            _ => {
                match signal.to_event()? {
                    Ok(event) => self.buffer_event(player_id, event, store),
                    Err(err) => {
                        tracing::error!(player_id, "[INGEST] Dropping signal: {}", err);
                    }
                }
                None
            }
        }
    }

    /// Forget all buffered events and death marks.
    pub fn reset(&mut self) {
        self.recent.clear();
        self.death_marks.clear();
    }

    /// Number of events currently buffered for a player
    pub fn buffered_events(&self, player_id: PlayerId) -> usize {
        self.recent.get(&player_id).map_or(0, VecDeque::len)
    }

    // --- Buffering ---

    fn buffer_event(&mut self, player_id: PlayerId, event: CombatEvent, store: &mut DeathStore) {
        let timestamp = event.timestamp();

        if let Some(mark) = self.death_marks.get(&player_id).copied() {
            let grace_end = mark.time_of_death.checked_add_signed(self.trailing_grace);
            if grace_end.is_none_or(|end| timestamp <= end) {
                // Still part of the death frame; the sealed episode refuses it
                match store.append_event(mark.handle, event) {
                    Err(RecapError::StaleHandle { .. }) => {}
                    Err(err) => tracing::debug!(player_id, "[INGEST] Trailing signal: {}", err),
                    Ok(()) => {
                        tracing::warn!(player_id, "[INGEST] Trailing signal reopened a sealed death")
                    }
                }
                return;
            }
            self.death_marks.remove(&player_id);
        }

        let buffer = self.recent.entry(player_id).or_default();
        if let Some(last) = buffer.back() {
            if timestamp < last.timestamp() {
                tracing::warn!(
                    player_id,
                    "[INGEST] Dropping out-of-order signal at {} (last at {})",
                    timestamp,
                    last.timestamp()
                );
                return;
            }
        }
        buffer.push_back(event);

        if let Some(window_start) = timestamp.checked_sub_signed(self.keep_events) {
            while buffer
                .front()
                .is_some_and(|e| e.timestamp() < window_start)
            {
                buffer.pop_front();
            }
        }
    }

    // --- Deaths ---

    fn record_death(
        &mut self,
        player_id: PlayerId,
        player_name: &str,
        time_of_death: NaiveDateTime,
        store: &mut DeathStore,
    ) -> EpisodeHandle {
        let buffered = self.recent.remove(&player_id).unwrap_or_default();
        let window_start = time_of_death.checked_sub_signed(self.keep_events);

        let handle = store.begin_episode(player_id, player_name, time_of_death);
        let mut recorded = 0usize;
        for event in buffered {
            let timestamp = event.timestamp();
            let in_window = timestamp <= time_of_death
                && window_start.is_none_or(|start| timestamp >= start);
            if !in_window {
                continue;
            }
            match store.append_event(handle, event) {
                Ok(()) => recorded += 1,
                Err(err) => tracing::debug!(player_id, "[INGEST] Skipping buffered event: {}", err),
            }
        }
        if let Err(err) = store.seal_episode(handle) {
            tracing::debug!(player_id, "[INGEST] Episode closed before sealing: {}", err);
        }

        self.death_marks.insert(
            player_id,
            DeathMark {
                handle,
                time_of_death,
            },
        );

        tracing::info!(
            player_id,
            episode_id = handle.episode_id,
            "[DEATH] {} died at {} ({} events)",
            player_name,
            time_of_death,
            recorded
        );

        if let Some(cutoff) = self
            .retention
            .and_then(|keep| time_of_death.checked_sub_signed(keep))
        {
            store.prune_older_than(cutoff);
        }

        handle
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX)).unwrap_or(Duration::MAX)
}
