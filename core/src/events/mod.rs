//! Combat event model
//!
//! Every recorded signal becomes one [`CombatEvent`]: a [`StateSnapshot`] of
//! the player's vitals plus one variant of the closed [`EventKind`] set.
//! Events are write-once; consumers match on [`CombatEvent::kind`].

mod event;
mod snapshot;

pub use event::{
    Ability, CombatEvent, DamageTaken, DamageType, EventKind, Healed, HitFlags, StatusApplied,
    checked_amount,
};
pub use snapshot::StateSnapshot;

/// Game object id of a player.
pub type PlayerId = u32;
/// Status effect row id, resolved through [`crate::game_data::StatusLookup`].
pub type StatusId = u32;
/// Icon id, resolved to a texture by the presentation layer.
pub type IconId = u16;
