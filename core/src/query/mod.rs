//! Recap query/selection layer
//!
//! Tracks which player and which death the consumer is looking at, and hands
//! out freshly aggregated timelines for that selection.
//!
//! ```text
//!   DeathStore ──► RecapSelection ──► build_timeline ──► Vec<TimelineRow>
//!                  (player, display index)
//! ```
//!
//! Display indices count from the newest death (0) backwards; storage
//! indices in [`crate::store::DeathStore`] count from the oldest.

mod selection;


pub use selection::{DeathListEntry, PlayerSummary, RecapSelection};
