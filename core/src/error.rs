//! Error types raised by the recap core.

use thiserror::Error;

use crate::events::PlayerId;

/// Errors surfaced by event construction, the death store and queries.
///
/// None of these are fatal to the host: ingestion logs and drops
/// `InvalidEvent`/`StaleHandle`, and read paths turn `NotFound` into an
/// empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecapError {
    #[error("invalid combat event: {reason}")]
    InvalidEvent { reason: String },

    #[error("episode {episode_id} for player {player_id} is sealed or evicted")]
    StaleHandle { player_id: PlayerId, episode_id: u64 },

    #[error("not found: {what}")]
    NotFound { what: String },
}

impl RecapError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, RecapError>;
