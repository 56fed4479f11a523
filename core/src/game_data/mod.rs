//! Lookup services consumed by the recap core.
//!
//! Status metadata and the party roster come from the host game. The core
//! only needs these narrow traits; [`StatusTable`] and [`StaticRoster`] are
//! in-memory implementations for tools and tests.

mod roster;
mod status;

pub use roster::{RosterLookup, StaticRoster};
pub use status::{StatusEntry, StatusInfo, StatusLookup, StatusTable, StatusTableFile};
