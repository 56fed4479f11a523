pub mod context;
pub mod error;
pub mod events;
pub mod game_data;
pub mod query;
pub mod recap;
pub mod shared;
pub mod signal_processor;
pub mod store;
pub mod timeline;

// Re-exports for convenience
pub use error::{RecapError, Result};
pub use events::{CombatEvent, EventKind, PlayerId, StateSnapshot, StatusId};
pub use game_data::{RosterLookup, StaticRoster, StatusInfo, StatusLookup, StatusTable};
pub use query::{DeathListEntry, PlayerSummary, RecapSelection};
pub use recap::DeathRecap;
pub use shared::SharedDeathRecap;
pub use signal_processor::{CombatSignal, SignalHandler, SignalProcessor};
pub use store::{Death, DeathStore, EpisodeHandle};
pub use timeline::{RowKind, TimelineRow, build_timeline};

pub use deathrecap_types::{CaptureConfig, RecapConfig};
