use chrono::NaiveDateTime;
use deathrecap_types::formatting::{
    format_amount, format_duration_secs, format_relative_secs,
};
use serde::Serialize;

use crate::events::{
    CombatEvent, DamageTaken, DamageType, Healed, IconId, StateSnapshot, StatusApplied, StatusId,
};
use crate::game_data::StatusInfo;

/// Colour hint for the amount column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowTone {
    Healing,
    Damage,
    MagicDamage,
    PhysicalDamage,
    Neutral,
}

/// HP bar contents for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HpGauge {
    pub current_hp: u32,
    pub max_hp: Option<u32>,
    /// `0.0..=1.0`; 0 when max HP is unknown
    pub fraction: f32,
    /// Drawn over the trailing portion of the bar
    pub barrier_fraction: Option<f32>,
}

impl HpGauge {
    fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        Self {
            current_hp: snapshot.current_hp(),
            max_hp: snapshot.max_hp(),
            fraction: snapshot.hp_fraction(),
            barrier_fraction: snapshot.barrier_fraction(),
        }
    }
}

/// A resolved, displayable active status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status_id: StatusId,
    pub name: String,
    pub description: String,
    pub icon: Option<IconId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RowKind {
    Damage(DamageTaken),
    DamageOverTime {
        amount: u32,
    },
    Healed(Healed),
    /// One or more consecutive heal-over-time ticks, summed
    Regen {
        amount: u64,
    },
    StatusApplied {
        status: StatusApplied,
        info: Option<StatusInfo>,
    },
}

/// One display row of a death recap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub timestamp: NaiveDateTime,
    /// Seconds relative to the time of death; negative is before death
    pub relative_secs: f64,
    pub kind: RowKind,
    pub hp: HpGauge,
    /// Only populated for damage, heal and status rows
    pub status_effects: Vec<StatusBadge>,
    /// Number of stored events folded into this row
    pub merged_events: usize,
}

impl TimelineRow {
    pub(crate) fn new(
        event: &CombatEvent,
        time_of_death: NaiveDateTime,
        kind: RowKind,
        merged_events: usize,
        status_effects: Vec<StatusBadge>,
    ) -> Self {
        let timestamp = event.timestamp();
        Self {
            timestamp,
            relative_secs: timestamp
                .signed_duration_since(time_of_death)
                .num_milliseconds() as f64
                / 1000.0,
            kind,
            hp: HpGauge::from_snapshot(event.snapshot()),
            status_effects,
            merged_events,
        }
    }

    /// Healing is positive, damage negative, status rows have none.
    pub fn signed_amount(&self) -> Option<i64> {
        match &self.kind {
            RowKind::Damage(d) => Some(-i64::from(d.amount)),
            RowKind::DamageOverTime { amount } => Some(-i64::from(*amount)),
            RowKind::Healed(h) => Some(i64::from(h.amount)),
            RowKind::Regen { amount } => i64::try_from(*amount).ok(),
            RowKind::StatusApplied { .. } => None,
        }
    }

    pub fn time_text(&self, european: bool) -> String {
        format_relative_secs(self.relative_secs, european)
    }

    /// `-2,000!!` for a direct critical hit, `+80` for healing, `15s` for statuses.
    pub fn amount_text(&self, european: bool) -> String {
        match &self.kind {
            RowKind::Damage(d) => {
                let marker = match (d.flags.critical, d.flags.direct_hit) {
                    (true, true) => "!!",
                    (true, false) => "!",
                    _ => "",
                };
                format!("-{}{}", format_amount(u64::from(d.amount), european), marker)
            }
            RowKind::DamageOverTime { amount } => {
                format!("-{}", format_amount(u64::from(*amount), european))
            }
            RowKind::Healed(h) => format!("+{}", format_amount(u64::from(h.amount), european)),
            RowKind::Regen { amount } => format!("+{}", format_amount(*amount, european)),
            RowKind::StatusApplied { status, .. } => format_duration_secs(status.duration_secs),
        }
    }

    /// Ability column text. Empty when the game hides the name or none was reported.
    pub fn ability_label(&self) -> &str {
        match &self.kind {
            RowKind::Damage(d) if d.hide_ability_name => "",
            RowKind::Damage(d) => d.ability.as_ref().map_or("", |a| a.name.as_str()),
            RowKind::DamageOverTime { .. } => "DoT damage",
            RowKind::Healed(h) => h.ability.as_ref().map_or("", |a| a.name.as_str()),
            RowKind::Regen { .. } => "Regen",
            RowKind::StatusApplied { info, .. } => info.as_ref().map_or("", |i| i.name.as_str()),
        }
    }

    /// Icon next to the ability label, if any.
    pub fn ability_icon(&self) -> Option<IconId> {
        match &self.kind {
            RowKind::Damage(d) if d.hide_ability_name => None,
            RowKind::Damage(d) => d.ability.as_ref().and_then(|a| a.icon),
            RowKind::Healed(h) => h.ability.as_ref().and_then(|a| a.icon),
            RowKind::StatusApplied { status, info } => {
                status.icon.or_else(|| info.as_ref().and_then(|i| i.icon))
            }
            RowKind::DamageOverTime { .. } | RowKind::Regen { .. } => None,
        }
    }

    pub fn source_label(&self) -> &str {
        let source = match &self.kind {
            RowKind::Damage(d) => d.source.as_deref(),
            RowKind::Healed(h) => h.source.as_deref(),
            RowKind::StatusApplied { status, .. } => status.source.as_deref(),
            RowKind::DamageOverTime { .. } | RowKind::Regen { .. } => None,
        };
        source.unwrap_or("")
    }

    /// Hover text for the amount (damage) or ability (status) cell.
    pub fn tooltip_lines(&self) -> Vec<String> {
        match &self.kind {
            RowKind::Damage(d) => {
                let mut lines = vec![format!("{} Damage", d.damage_type)];
                if d.flags.critical {
                    lines.push("Critical Hit".to_string());
                }
                if d.flags.direct_hit {
                    lines.push("Direct Hit (+25%)".to_string());
                }
                if d.flags.parried {
                    lines.push("Parried (-20%)".to_string());
                }
                if d.flags.blocked {
                    lines.push("Blocked (-15%)".to_string());
                }
                lines
            }
            RowKind::StatusApplied {
                info: Some(info), ..
            } if !info.description.is_empty() => vec![info.description.clone()],
            _ => Vec::new(),
        }
    }

    pub fn tone(&self) -> RowTone {
        match &self.kind {
            RowKind::Healed(_) | RowKind::Regen { .. } => RowTone::Healing,
            RowKind::DamageOverTime { .. } => RowTone::Damage,
            RowKind::Damage(d) if d.damage_type == DamageType::Magic => RowTone::MagicDamage,
            RowKind::Damage(_) => RowTone::PhysicalDamage,
            RowKind::StatusApplied { .. } => RowTone::Neutral,
        }
    }

    /// Current HP as printed on the bar.
    pub fn hp_text(&self, european: bool) -> String {
        format_amount(u64::from(self.hp.current_hp), european)
    }
}
