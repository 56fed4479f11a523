use chrono::NaiveDateTime;
use hashbrown::HashSet;
use serde::Serialize;

use crate::events::PlayerId;
use crate::game_data::{RosterLookup, StatusLookup};
use crate::store::{Death, DeathStore};
use crate::timeline::{TimelineRow, build_timeline};

/// One entry of the death picker, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeathListEntry {
    pub display_index: usize,
    pub episode_id: u64,
    pub title: String,
    pub time_of_death: NaiveDateTime,
    pub event_count: usize,
    pub selected: bool,
}

/// One entry of the player picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub name: String,
    /// Title of the player's most recent death
    pub latest_title: String,
    pub death_count: usize,
    pub selected: bool,
}

/// Current player/death selection.
///
/// Holds identifiers only; every read goes back to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecapSelection {
    player: Option<PlayerId>,
    display_index: usize,
}

impl RecapSelection {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Selection ---

    /// The explicitly chosen player, else whoever died most recently.
    pub fn selected_player(&self, store: &DeathStore) -> Option<PlayerId> {
        self.player
            .or_else(|| store.latest_death().map(Death::player_id))
    }

    /// Selected death, 0 = newest, as last chosen.
    ///
    /// Pruning can shrink the history under a stored index; reads go through
    /// [`Self::effective_index`] instead.
    pub fn display_index(&self) -> usize {
        self.display_index
    }

    /// The stored index if the selected player still has that many deaths, else 0.
    pub fn effective_index(&self, store: &DeathStore) -> usize {
        let count = self
            .selected_player(store)
            .map_or(0, |id| store.death_count(id));
        if self.display_index < count {
            self.display_index
        } else {
            0
        }
    }

    /// Select a player. Ids without history are kept and yield an empty timeline.
    pub fn select_player(&mut self, player_id: PlayerId) {
        self.player = Some(player_id);
        self.display_index = 0;
    }

    /// Select a death by display index. Out-of-range indices fall back to 0.
    pub fn select_episode(&mut self, store: &DeathStore, display_index: usize) {
        let count = self
            .selected_player(store)
            .map_or(0, |id| store.death_count(id));
        self.display_index = if display_index < count {
            display_index
        } else {
            0
        };
    }

    // --- Edits ---

    /// Delete the selected player's death at `display_index`.
    ///
    /// Keeps the selection on the same death when an earlier entry (in
    /// display order) goes away; deleting the selected death falls back to
    /// the newest.
    pub fn delete_episode(&mut self, store: &mut DeathStore, display_index: usize) -> Option<Death> {
        let player_id = self.selected_player(store)?;
        let count = store.death_count(player_id);
        self.display_index = self.effective_index(store);
        if display_index >= count {
            tracing::debug!(
                player_id,
                display_index,
                count,
                "[STORE] Ignoring delete of missing death"
            );
            return None;
        }

        let removed = store
            .remove_episode(player_id, count - 1 - display_index)
            .ok()?;

        if display_index < self.display_index {
            self.display_index -= 1;
        } else if display_index == self.display_index {
            self.display_index = 0;
        }
        Some(removed)
    }

    /// Drop all history and reset both selection axes.
    pub fn clear_all(&mut self, store: &mut DeathStore) {
        store.clear_all();
        self.player = None;
        self.display_index = 0;
    }

    // --- Reads ---

    /// Aggregated timeline for one death. Unknown players or indices give an empty list.
    pub fn timeline(
        store: &DeathStore,
        statuses: &dyn StatusLookup,
        player_id: PlayerId,
        display_index: usize,
    ) -> Vec<TimelineRow> {
        Self::death_at(store, player_id, display_index)
            .map(|death| build_timeline(death, statuses))
            .unwrap_or_default()
    }

    pub fn current_timeline(
        &self,
        store: &DeathStore,
        statuses: &dyn StatusLookup,
    ) -> Vec<TimelineRow> {
        match self.selected_player(store) {
            Some(player_id) => {
                Self::timeline(store, statuses, player_id, self.effective_index(store))
            }
            None => Vec::new(),
        }
    }

    pub fn current_death<'a>(&self, store: &'a DeathStore) -> Option<&'a Death> {
        Self::death_at(store, self.selected_player(store)?, self.effective_index(store))
    }

    /// Deaths of the selected player, newest first.
    pub fn death_list(&self, store: &DeathStore, now: NaiveDateTime) -> Vec<DeathListEntry> {
        let Some(player_id) = self.selected_player(store) else {
            return Vec::new();
        };

        let current = self.effective_index(store);
        store
            .deaths(player_id)
            .rev()
            .enumerate()
            .map(|(display_index, death)| DeathListEntry {
                display_index,
                episode_id: death.id(),
                title: death.title(now),
                time_of_death: death.time_of_death(),
                event_count: death.events().len(),
                selected: display_index == current,
            })
            .collect()
    }

    /// Players with recorded deaths, in picker order.
    ///
    /// Party members come first in roster order; when solo, the local player
    /// does. Everyone else follows, most recent death first.
    pub fn player_summaries(
        &self,
        store: &DeathStore,
        roster: &dyn RosterLookup,
        now: NaiveDateTime,
    ) -> Vec<PlayerSummary> {
        let selected = self.selected_player(store);
        let mut processed = HashSet::new();
        let mut summaries = Vec::new();

        let mut push = |player_id: PlayerId, summaries: &mut Vec<PlayerSummary>| {
            if !processed.insert(player_id) {
                return;
            }
            let Some(latest) = store.deaths(player_id).next_back() else {
                return;
            };
            summaries.push(PlayerSummary {
                player_id,
                name: latest.player_name().to_string(),
                latest_title: latest.title(now),
                death_count: store.death_count(player_id),
                selected: selected == Some(player_id),
            });
        };

        let party = roster.current_party_members();
        if !party.is_empty() {
            for player_id in party {
                push(player_id, &mut summaries);
            }
        } else if let Some(local) = roster.local_player() {
            push(local, &mut summaries);
        }

        let mut others: Vec<&Death> = store
            .players()
            .filter_map(|id| store.deaths(id).next_back())
            .collect();
        others.sort_by_key(|d| std::cmp::Reverse((d.time_of_death(), d.id())));
        for death in others {
            push(death.player_id(), &mut summaries);
        }

        summaries
    }

    fn death_at(store: &DeathStore, player_id: PlayerId, display_index: usize) -> Option<&Death> {
        store.deaths(player_id).rev().nth(display_index)
    }
}
