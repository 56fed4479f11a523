use chrono::NaiveDateTime;
use hashbrown::HashMap;
use std::collections::VecDeque;

use super::Death;
use crate::error::{RecapError, Result};
use crate::events::{CombatEvent, PlayerId};

pub const DEFAULT_MAX_DEATHS_PER_PLAYER: usize = 10;

/// Identifies one episode for appends and sealing.
///
/// Handles stay valid as other episodes come and go; once the episode is
/// evicted or sealed, operations through the handle fail with `StaleHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeHandle {
    pub player_id: PlayerId,
    pub episode_id: u64,
}

impl EpisodeHandle {
    fn stale(self) -> RecapError {
        RecapError::StaleHandle {
            player_id: self.player_id,
            episode_id: self.episode_id,
        }
    }
}

/// Per-player death history.
///
/// Each player's deaths are kept oldest first in a fixed-size window;
/// recording past the cap drops the oldest episode.
#[derive(Debug, Clone)]
pub struct DeathStore {
    histories: HashMap<PlayerId, VecDeque<Death>>,
    max_deaths_per_player: usize,
    next_episode_id: u64,
    /// Bumped on every mutation
    version: u64,
}

impl Default for DeathStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEATHS_PER_PLAYER)
    }
}

impl DeathStore {
    pub fn new(max_deaths_per_player: usize) -> Self {
        Self {
            histories: HashMap::new(),
            max_deaths_per_player: max_deaths_per_player.max(1),
            next_episode_id: 0,
            version: 0,
        }
    }

    // --- Episode Lifecycle ---

    /// Open a new episode for `player_id`.
    ///
    /// The caller must not hold another open episode for the same player.
    pub fn begin_episode(
        &mut self,
        player_id: PlayerId,
        player_name: impl Into<String>,
        time_of_death: NaiveDateTime,
    ) -> EpisodeHandle {
        let episode_id = self.next_episode_id;
        self.next_episode_id += 1;

        let history = self.histories.entry(player_id).or_default();
        history.push_back(Death::new(
            episode_id,
            player_id,
            player_name.into(),
            time_of_death,
        ));
        Self::trim_history(history, self.max_deaths_per_player);
        self.version += 1;

        EpisodeHandle {
            player_id,
            episode_id,
        }
    }

    /// Append an event to an open episode.
    ///
    /// Sealed or evicted episodes reject the event; this is the expected
    /// outcome for stray signals arriving just after the death frame.
    pub fn append_event(&mut self, handle: EpisodeHandle, event: CombatEvent) -> Result<()> {
        let Some(death) = self.find_mut(handle) else {
            tracing::debug!(
                player_id = handle.player_id,
                episode_id = handle.episode_id,
                "[STORE] Discarding event for evicted episode"
            );
            return Err(handle.stale());
        };

        if death.is_sealed() {
            tracing::debug!(
                player_id = handle.player_id,
                episode_id = handle.episode_id,
                "[STORE] Discarding event for sealed episode"
            );
            return Err(handle.stale());
        }

        if let Some(last) = death.events().last() {
            if event.timestamp() < last.timestamp() {
                tracing::warn!(
                    player_id = handle.player_id,
                    episode_id = handle.episode_id,
                    "[STORE] Rejecting out-of-order event at {} (last at {})",
                    event.timestamp(),
                    last.timestamp()
                );
                return Err(RecapError::invalid("event predates the episode's last event"));
            }
        }

        death.events_mut().push(event);
        self.version += 1;
        Ok(())
    }

    /// Close an episode to further appends. It stays readable and editable.
    pub fn seal_episode(&mut self, handle: EpisodeHandle) -> Result<()> {
        let death = self.find_mut(handle).ok_or_else(|| handle.stale())?;
        if death.is_sealed() {
            return Err(handle.stale());
        }
        death.seal();
        self.version += 1;
        Ok(())
    }

    // --- User Edits ---

    /// Delete one event. Indices are storage order (oldest first).
    ///
    /// Removing the last event leaves an empty episode in place.
    pub fn remove_event(
        &mut self,
        player_id: PlayerId,
        episode_index: usize,
        event_index: usize,
    ) -> Result<CombatEvent> {
        let death = self
            .histories
            .get_mut(&player_id)
            .and_then(|h| h.get_mut(episode_index))
            .ok_or_else(|| {
                RecapError::not_found(format!("episode {} of player {}", episode_index, player_id))
            })?;

        if event_index >= death.events().len() {
            return Err(RecapError::not_found(format!(
                "event {} in episode {}",
                event_index,
                death.id()
            )));
        }

        let removed = death.events_mut().remove(event_index);
        self.version += 1;
        Ok(removed)
    }

    /// Delete one episode. Index is storage order (oldest first).
    pub fn remove_episode(&mut self, player_id: PlayerId, episode_index: usize) -> Result<Death> {
        let history = self.histories.get_mut(&player_id).ok_or_else(|| {
            RecapError::not_found(format!("history of player {}", player_id))
        })?;

        let removed = history.remove(episode_index).ok_or_else(|| {
            RecapError::not_found(format!("episode {} of player {}", episode_index, player_id))
        })?;

        if history.is_empty() {
            self.histories.remove(&player_id);
        }
        self.version += 1;
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.histories.clear();
        self.version += 1;
    }

    // --- Retention ---

    /// Drop every episode whose time of death is before `cutoff`.
    /// Returns the number of episodes removed.
    pub fn prune_older_than(&mut self, cutoff: NaiveDateTime) -> usize {
        let mut removed = 0;
        for history in self.histories.values_mut() {
            let before = history.len();
            history.retain(|d| d.time_of_death() >= cutoff);
            removed += before - history.len();
        }
        self.histories.retain(|_, h| !h.is_empty());

        if removed > 0 {
            tracing::debug!(removed, "[STORE] Pruned deaths older than {}", cutoff);
            self.version += 1;
        }
        removed
    }

    /// Change the per-player cap, trimming existing histories to fit.
    pub fn set_max_deaths_per_player(&mut self, max: usize) {
        self.max_deaths_per_player = max.max(1);
        for history in self.histories.values_mut() {
            Self::trim_history(history, self.max_deaths_per_player);
        }
        self.version += 1;
    }

    fn trim_history(history: &mut VecDeque<Death>, max: usize) {
        while history.len() > max {
            if let Some(evicted) = history.pop_front() {
                tracing::debug!(
                    player_id = evicted.player_id(),
                    episode_id = evicted.id(),
                    "[STORE] Evicting oldest death"
                );
            }
        }
    }

    // --- Accessors ---

    /// Deaths of one player, oldest first. Empty for unknown players.
    pub fn deaths(&self, player_id: PlayerId) -> impl DoubleEndedIterator<Item = &Death> {
        self.histories.get(&player_id).into_iter().flatten()
    }

    pub fn death_count(&self, player_id: PlayerId) -> usize {
        self.histories.get(&player_id).map_or(0, VecDeque::len)
    }

    /// Episode by storage index (oldest first)
    pub fn episode(&self, player_id: PlayerId, episode_index: usize) -> Option<&Death> {
        self.histories.get(&player_id)?.get(episode_index)
    }

    pub fn episode_by_handle(&self, handle: EpisodeHandle) -> Option<&Death> {
        self.histories
            .get(&handle.player_id)?
            .iter()
            .find(|d| d.id() == handle.episode_id)
    }

    /// Players with at least one recorded death
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.histories.keys().copied()
    }

    /// Most recent death across all players
    pub fn latest_death(&self) -> Option<&Death> {
        self.histories
            .values()
            .filter_map(VecDeque::back)
            .max_by_key(|d| (d.time_of_death(), d.id()))
    }

    pub fn total_deaths(&self) -> usize {
        self.histories.values().map(VecDeque::len).sum()
    }

    pub fn max_deaths_per_player(&self) -> usize {
        self.max_deaths_per_player
    }

    /// Monotonic mutation counter, usable as a memoization key
    pub fn version(&self) -> u64 {
        self.version
    }

    fn find_mut(&mut self, handle: EpisodeHandle) -> Option<&mut Death> {
        self.histories
            .get_mut(&handle.player_id)?
            .iter_mut()
            .find(|d| d.id() == handle.episode_id)
    }
}
