//! Timeline aggregation
//!
//! Turns a stored death episode (oldest first) into display rows (newest
//! first), merging regen ticks and attaching relative times, HP gauges and
//! resolved status badges.
//!
//! ```text
//!   stored (oldest first)             displayed (newest first)
//!   HoT +50   @ -5.0s                 -2,000!  Auto-attack   @ -1.0s
//!   HoT +30   @ -3.0s       ──►       +80      Regen         @ -3.0s
//!   Hit -2000 @ -1.0s (crit)
//! ```

mod aggregate;
mod row;

#[cfg(test)]
mod aggregate_tests;

pub use aggregate::{build_timeline, resolve_badges};
pub use row::{HpGauge, RowKind, RowTone, StatusBadge, TimelineRow};
