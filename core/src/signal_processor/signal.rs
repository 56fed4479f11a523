use chrono::NaiveDateTime;

use crate::events::{
    Ability, CombatEvent, DamageTaken, DamageType, EventKind, Healed, HitFlags, IconId, PlayerId,
    StateSnapshot, StatusApplied, StatusId, checked_amount,
};
use crate::error::Result;

/// Raw signals reported by the game hook for a single player.
///
/// Amounts arrive signed, exactly as the hook reads them; they are range
/// checked when the signal is classified.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatSignal {
    Death {
        player_id: PlayerId,
        player_name: String,
        timestamp: NaiveDateTime,
    },
    DamageTaken {
        player_id: PlayerId,
        snapshot: StateSnapshot,
        amount: i64,
        damage_type: DamageType,
        flags: HitFlags,
        source: Option<String>,
        ability: Option<Ability>,
        hide_ability_name: bool,
    },
    Healed {
        player_id: PlayerId,
        snapshot: StateSnapshot,
        amount: i64,
        source: Option<String>,
        ability: Option<Ability>,
    },
    DotTick {
        player_id: PlayerId,
        snapshot: StateSnapshot,
        amount: i64,
    },
    HotTick {
        player_id: PlayerId,
        snapshot: StateSnapshot,
        amount: i64,
    },
    StatusApplied {
        player_id: PlayerId,
        snapshot: StateSnapshot,
        status_id: StatusId,
        icon: Option<IconId>,
        duration_secs: f32,
        source: Option<String>,
    },
}

impl CombatSignal {
    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::Death { player_id, .. }
            | Self::DamageTaken { player_id, .. }
            | Self::Healed { player_id, .. }
            | Self::DotTick { player_id, .. }
            | Self::HotTick { player_id, .. }
            | Self::StatusApplied { player_id, .. } => *player_id,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Death { timestamp, .. } => *timestamp,
            Self::DamageTaken { snapshot, .. }
            | Self::Healed { snapshot, .. }
            | Self::DotTick { snapshot, .. }
            | Self::HotTick { snapshot, .. }
            | Self::StatusApplied { snapshot, .. } => snapshot.timestamp(),
        }
    }

    /// Convert into a recordable event. `None` for death signals.
    pub fn to_event(&self) -> Option<Result<CombatEvent>> {
        let (snapshot, kind) = match self {
            Self::Death { .. } => return None,
            Self::DamageTaken {
                snapshot,
                amount,
                damage_type,
                flags,
                source,
                ability,
                hide_ability_name,
                ..
            } => (
                snapshot,
                checked_amount(*amount).map(|amount| {
                    EventKind::DamageTaken(DamageTaken {
                        amount,
                        damage_type: *damage_type,
                        flags: *flags,
                        source: source.clone(),
                        ability: ability.clone(),
                        hide_ability_name: *hide_ability_name,
                    })
                }),
            ),
            Self::Healed {
                snapshot,
                amount,
                source,
                ability,
                ..
            } => (
                snapshot,
                checked_amount(*amount).map(|amount| {
                    EventKind::Healed(Healed {
                        amount,
                        source: source.clone(),
                        ability: ability.clone(),
                    })
                }),
            ),
            Self::DotTick {
                snapshot, amount, ..
            } => (
                snapshot,
                checked_amount(*amount).map(|amount| EventKind::DamageOverTime { amount }),
            ),
            Self::HotTick {
                snapshot, amount, ..
            } => (
                snapshot,
                checked_amount(*amount).map(|amount| EventKind::HealOverTime { amount }),
            ),
            Self::StatusApplied {
                snapshot,
                status_id,
                icon,
                duration_secs,
                source,
                ..
            } => (
                snapshot,
                Ok(EventKind::StatusEffectApplied(StatusApplied {
                    status_id: *status_id,
                    icon: *icon,
                    duration_secs: *duration_secs,
                    source: source.clone(),
                })),
            ),
        };

        Some(kind.and_then(|kind| CombatEvent::new(snapshot.clone(), kind)))
    }
}
