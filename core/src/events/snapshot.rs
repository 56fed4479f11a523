use chrono::NaiveDateTime;
use serde::Serialize;

use super::StatusId;
use crate::error::{RecapError, Result};

/// Player vitals captured at the instant of an event.
///
/// Built once by the ingestion hook and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    timestamp: NaiveDateTime,
    current_hp: u32,
    max_hp: Option<u32>,
    /// Barrier as a percentage of max HP (0..=100)
    barrier_percent: Option<u8>,
    /// Active status ids. May contain duplicates when several sources apply
    /// the same status, so this is deliberately not a set.
    status_effects: Option<Vec<StatusId>>,
}

impl StateSnapshot {
    pub fn new(timestamp: NaiveDateTime, current_hp: u32) -> Self {
        Self {
            timestamp,
            current_hp,
            max_hp: None,
            barrier_percent: None,
            status_effects: None,
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    pub fn with_barrier_percent(mut self, percent: u8) -> Self {
        self.barrier_percent = Some(percent);
        self
    }

    pub fn with_status_effects(mut self, status_effects: Vec<StatusId>) -> Self {
        self.status_effects = Some(status_effects);
        self
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> Option<u32> {
        self.max_hp
    }

    pub fn barrier_percent(&self) -> Option<u8> {
        self.barrier_percent
    }

    pub fn status_effects(&self) -> Option<&[StatusId]> {
        self.status_effects.as_deref()
    }

    /// `current / max`, clamped to `0.0..=1.0`. Unknown or zero max HP yields 0.
    pub fn hp_fraction(&self) -> f32 {
        match self.max_hp {
            Some(max) if max > 0 => (self.current_hp as f32 / max as f32).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Barrier as a fraction of max HP, if a barrier was recorded.
    pub fn barrier_fraction(&self) -> Option<f32> {
        self.barrier_percent.map(|pct| pct as f32 / 100.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(pct) = self.barrier_percent {
            if pct > 100 {
                return Err(RecapError::invalid(format!(
                    "barrier of {}% exceeds max HP",
                    pct
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(20, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_hp_fraction() {
        let snap = StateSnapshot::new(ts(), 25_000).with_max_hp(100_000);
        assert!((snap.hp_fraction() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hp_fraction_without_max_is_zero() {
        let snap = StateSnapshot::new(ts(), 25_000);
        assert_eq!(snap.hp_fraction(), 0.0);

        let snap = StateSnapshot::new(ts(), 25_000).with_max_hp(0);
        assert_eq!(snap.hp_fraction(), 0.0);
    }

    #[test]
    fn test_hp_fraction_is_clamped() {
        let snap = StateSnapshot::new(ts(), 120).with_max_hp(100);
        assert_eq!(snap.hp_fraction(), 1.0);
    }

    #[test]
    fn test_barrier_fraction() {
        let snap = StateSnapshot::new(ts(), 1).with_barrier_percent(40);
        assert_eq!(snap.barrier_fraction(), Some(0.4));
        assert_eq!(StateSnapshot::new(ts(), 1).barrier_fraction(), None);
    }

    #[test]
    fn test_status_effects_keep_duplicates() {
        let snap = StateSnapshot::new(ts(), 1).with_status_effects(vec![48, 48, 1191]);
        assert_eq!(snap.status_effects(), Some(&[48, 48, 1191][..]));
    }

    #[test]
    fn test_validate_rejects_oversized_barrier() {
        let snap = StateSnapshot::new(ts(), 1).with_barrier_percent(101);
        assert!(matches!(
            snap.validate(),
            Err(RecapError::InvalidEvent { .. })
        ));
        assert!(StateSnapshot::new(ts(), 1).with_barrier_percent(100).validate().is_ok());
    }
}
