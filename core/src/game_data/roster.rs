use crate::events::PlayerId;

/// Party composition as seen by the local client.
pub trait RosterLookup {
    /// Party members in display order. Empty when solo.
    fn current_party_members(&self) -> Vec<PlayerId>;

    /// The local player, if the client has one loaded.
    fn local_player(&self) -> Option<PlayerId>;

    fn is_party_member(&self, player_id: PlayerId) -> bool {
        self.current_party_members().contains(&player_id)
    }
}

/// Fixed roster, for replays and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoster {
    pub local_player: Option<PlayerId>,
    pub party: Vec<PlayerId>,
}

impl StaticRoster {
    pub fn solo(local_player: PlayerId) -> Self {
        Self {
            local_player: Some(local_player),
            party: Vec::new(),
        }
    }

    pub fn with_party(local_player: PlayerId, party: Vec<PlayerId>) -> Self {
        Self {
            local_player: Some(local_player),
            party,
        }
    }
}

impl RosterLookup for StaticRoster {
    fn current_party_members(&self) -> Vec<PlayerId> {
        self.party.clone()
    }

    fn local_player(&self) -> Option<PlayerId> {
        self.local_player
    }

    fn is_party_member(&self, player_id: PlayerId) -> bool {
        self.party.contains(&player_id)
    }
}
