//! Death episode store
//!
//! Pure fact storage: per-player bounded histories of [`Death`] episodes.
//! Nothing derived (titles, merged timelines) is cached here; readers
//! recompute on every access.

mod death;
mod history;

pub use death::Death;
pub use history::{DEFAULT_MAX_DEATHS_PER_PLAYER, DeathStore, EpisodeHandle};
