//! Signal ingestion
//!
//! Turns raw combat signals from the game hook into recorded deaths:
//!
//! ```text
//!   CombatSignal ──► tracking filter ──► classify ──► rolling buffer (per player)
//!                                                        │
//!                                    Death signal ───────┘
//!                                        │
//!                                        ▼
//!                     begin_episode → append window → seal_episode
//! ```
//!
//! Signals trailing a death by less than the configured grace period still
//! belong to the death frame and are discarded; anything later starts a
//! fresh buffer.

mod handler;
mod processor;
mod signal;


pub use handler::SignalHandler;
pub use processor::SignalProcessor;
pub use signal::CombatSignal;
