use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{IconId, StateSnapshot, StatusId};
use crate::error::{RecapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Magic,
    #[default]
    Other,
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => write!(f, "Physical"),
            Self::Magic => write!(f, "Magic"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Hit modifiers reported with a damage signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HitFlags {
    pub critical: bool,
    pub direct_hit: bool,
    pub parried: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ability {
    pub name: String,
    pub icon: Option<IconId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageTaken {
    pub amount: u32,
    pub damage_type: DamageType,
    pub flags: HitFlags,
    pub source: Option<String>,
    pub ability: Option<Ability>,
    /// The game marks this hit's ability name as hidden
    pub hide_ability_name: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Healed {
    pub amount: u32,
    pub source: Option<String>,
    pub ability: Option<Ability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusApplied {
    pub status_id: StatusId,
    pub icon: Option<IconId>,
    pub duration_secs: f32,
    pub source: Option<String>,
}

/// The closed set of recorded event kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum EventKind {
    DamageTaken(DamageTaken),
    /// DoT tick; carries no ability identity
    DamageOverTime { amount: u32 },
    Healed(Healed),
    /// HoT/regen tick; carries no ability identity
    HealOverTime { amount: u32 },
    StatusEffectApplied(StatusApplied),
}

impl EventKind {
    /// Amount for damage/heal kinds, `None` for status applications.
    pub fn amount(&self) -> Option<u32> {
        match self {
            Self::DamageTaken(d) => Some(d.amount),
            Self::DamageOverTime { amount } | Self::HealOverTime { amount } => Some(*amount),
            Self::Healed(h) => Some(h.amount),
            Self::StatusEffectApplied(_) => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::StatusEffectApplied(status) = self {
            if !status.duration_secs.is_finite() || status.duration_secs < 0.0 {
                return Err(RecapError::invalid(format!(
                    "status {} has invalid duration {}",
                    status.status_id, status.duration_secs
                )));
            }
        }
        Ok(())
    }
}

/// A single recorded combat event. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatEvent {
    snapshot: StateSnapshot,
    kind: EventKind,
}

impl CombatEvent {
    pub fn new(snapshot: StateSnapshot, kind: EventKind) -> Result<Self> {
        snapshot.validate()?;
        kind.validate()?;
        Ok(Self { snapshot, kind })
    }

    pub fn snapshot(&self) -> &StateSnapshot {
        &self.snapshot
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.snapshot.timestamp()
    }

    pub fn is_heal_over_time(&self) -> bool {
        matches!(self.kind, EventKind::HealOverTime { .. })
    }
}

/// Convert a raw signed amount from the game hook into an event amount.
///
/// Upstream classification should never produce negatives, so a failure
/// here points at a bug in the hook rather than bad combat data.
pub fn checked_amount(raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| RecapError::invalid(format!("amount {} out of range", raw)))
}
