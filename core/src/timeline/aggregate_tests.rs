//! Tests for timeline aggregation
//!
//! Covers regen merging, DoT pass-through, relative timing and status badge
//! filtering.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{RowKind, RowTone, build_timeline};
use crate::events::{
    Ability, CombatEvent, DamageTaken, DamageType, EventKind, Healed, HitFlags, StateSnapshot,
    StatusApplied,
};
use crate::game_data::{StatusInfo, StatusTable};
use crate::store::{Death, DeathStore};

const PLAYER: u32 = 0x1000_0001;

fn time_of_death() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(20, 15, 0)
        .unwrap()
}

/// Snapshot `secs` relative to the time of death (negative = before)
fn snap(secs: f64, hp: u32) -> StateSnapshot {
    let at = time_of_death() + Duration::milliseconds((secs * 1000.0) as i64);
    StateSnapshot::new(at, hp).with_max_hp(100_000)
}

fn hot(secs: f64, amount: u32) -> CombatEvent {
    CombatEvent::new(snap(secs, 50_000), EventKind::HealOverTime { amount }).unwrap()
}

fn dot(secs: f64, amount: u32) -> CombatEvent {
    CombatEvent::new(snap(secs, 50_000), EventKind::DamageOverTime { amount }).unwrap()
}

fn hit(secs: f64, amount: u32, flags: HitFlags) -> CombatEvent {
    CombatEvent::new(
        snap(secs, 2_000),
        EventKind::DamageTaken(DamageTaken {
            amount,
            damage_type: DamageType::Physical,
            flags,
            source: Some("Striking Dummy".to_string()),
            ability: Some(Ability {
                name: "Attack".to_string(),
                icon: Some(101),
            }),
            hide_ability_name: false,
        }),
    )
    .unwrap()
}

fn heal(secs: f64, amount: u32, ability: Option<&str>) -> CombatEvent {
    CombatEvent::new(
        snap(secs, 30_000),
        EventKind::Healed(Healed {
            amount,
            source: Some("White Mage".to_string()),
            ability: ability.map(|name| Ability {
                name: name.to_string(),
                icon: None,
            }),
        }),
    )
    .unwrap()
}

fn record(events: Vec<CombatEvent>) -> Death {
    let mut store = DeathStore::default();
    let handle = store.begin_episode(PLAYER, "Tank McTankface", time_of_death());
    for event in events {
        store.append_event(handle, event).unwrap();
    }
    store.seal_episode(handle).unwrap();
    store.episode(PLAYER, 0).unwrap().clone()
}

fn status_table() -> StatusTable {
    [
        (
            1191,
            StatusInfo {
                name: "Regen".to_string(),
                description: "Gradually restoring HP.".to_string(),
                icon: Some(12_511),
                is_fc_buff: false,
            },
        ),
        (
            353,
            StatusInfo {
                name: "The Heat of Battle".to_string(),
                description: String::new(),
                icon: Some(16_501),
                is_fc_buff: true,
            },
        ),
        (
            17,
            StatusInfo {
                name: "Vulnerability Up".to_string(),
                description: "Damage taken is increased.".to_string(),
                icon: Some(15_020),
                is_fc_buff: false,
            },
        ),
    ]
    .into_iter()
    .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Merging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_regen_run_merges_behind_killing_blow() {
    let crit = HitFlags {
        critical: true,
        ..Default::default()
    };
    let death = record(vec![hot(-5.0, 50), hot(-3.0, 30), hit(-1.0, 2_000, crit)]);

    let rows = build_timeline(&death, &StatusTable::new());
    assert_eq!(rows.len(), 2);

    let killing_blow = &rows[0];
    match &killing_blow.kind {
        RowKind::Damage(d) => {
            assert_eq!(d.amount, 2_000);
            assert!(d.flags.critical);
        }
        other => panic!("expected damage row, got {:?}", other),
    }
    assert_eq!(killing_blow.amount_text(false), "-2,000!");
    assert!(killing_blow.tooltip_lines().contains(&"Critical Hit".to_string()));
    assert_eq!(killing_blow.time_text(false), "-1.0s");

    let regen = &rows[1];
    assert_eq!(regen.kind, RowKind::Regen { amount: 80 });
    assert_eq!(regen.merged_events, 2);
    assert_eq!(regen.timestamp, time_of_death() - Duration::seconds(3));
    assert_eq!(regen.time_text(false), "-3.0s");
    assert_eq!(regen.amount_text(false), "+80");
    assert_eq!(regen.ability_label(), "Regen");
    assert_eq!(regen.tone(), RowTone::Healing);
}

#[test]
fn test_regen_row_uses_newest_snapshot() {
    let older = CombatEvent::new(snap(-4.0, 10_000), EventKind::HealOverTime { amount: 5 }).unwrap();
    let newer = CombatEvent::new(snap(-2.0, 20_000), EventKind::HealOverTime { amount: 5 }).unwrap();
    let death = record(vec![older, newer]);

    let rows = build_timeline(&death, &StatusTable::new());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hp.current_hp, 20_000);
    assert_eq!(rows[0].relative_secs, -2.0);
}

#[test]
fn test_dots_are_never_merged() {
    let death = record(vec![dot(-3.0, 100), dot(-2.0, 110), dot(-1.0, 120)]);

    let rows = build_timeline(&death, &StatusTable::new());
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.ability_label(), "DoT damage");
        assert_eq!(row.merged_events, 1);
        assert_eq!(row.tone(), RowTone::Damage);
    }
    assert_eq!(rows[0].amount_text(false), "-120");
    assert_eq!(rows[2].amount_text(false), "-100");
}

#[test]
fn test_interleaved_event_splits_regen_runs() {
    let death = record(vec![
        hot(-6.0, 10),
        hot(-5.0, 20),
        dot(-4.0, 500),
        hot(-3.0, 30),
        hot(-2.0, 40),
        hot(-1.0, 50),
    ]);

    let rows = build_timeline(&death, &StatusTable::new());
    let kinds: Vec<_> = rows.iter().map(|r| r.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Regen { amount: 120 },
            RowKind::DamageOverTime { amount: 500 },
            RowKind::Regen { amount: 30 },
        ]
    );
    assert_eq!(rows[0].merged_events, 3);
    assert_eq!(rows[2].merged_events, 2);
}

#[test]
fn test_single_regen_tick_is_its_own_row() {
    let death = record(vec![hot(-2.0, 75), dot(-1.0, 10)]);
    let rows = build_timeline(&death, &StatusTable::new());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].kind, RowKind::Regen { amount: 75 });
    assert_eq!(rows[1].merged_events, 1);
}

#[test]
fn test_row_count_never_exceeds_event_count() {
    let episodes = vec![
        vec![dot(-3.0, 1), heal(-2.0, 5, None), dot(-1.0, 1)],
        vec![hot(-3.0, 1), hot(-2.0, 1), dot(-1.0, 1)],
        vec![hot(-3.0, 1), dot(-2.0, 1), hot(-1.0, 1)],
        vec![hot(-3.0, 1), hot(-2.0, 1), hot(-1.0, 1)],
    ];

    for events in episodes {
        let count = events.len();
        let has_long_run = events
            .windows(2)
            .any(|w| w[0].is_heal_over_time() && w[1].is_heal_over_time());

        let rows = build_timeline(&record(events), &StatusTable::new());
        assert!(rows.len() <= count);
        assert_eq!(rows.len() == count, !has_long_run);
        assert_eq!(rows.iter().map(|r| r.merged_events).sum::<usize>(), count);
    }
}

#[test]
fn test_merging_sub_runs_matches_full_run() {
    let amounts = [13, 250, 7, 1_000, 42];
    let run = |range: std::ops::Range<usize>| {
        record(
            range
                .map(|i| hot(-10.0 + i as f64, amounts[i]))
                .collect(),
        )
    };

    let total = |death: &Death| -> u64 {
        build_timeline(death, &StatusTable::new())
            .iter()
            .map(|r| match r.kind {
                RowKind::Regen { amount } => amount,
                _ => 0,
            })
            .sum()
    };

    let full = total(&run(0..5));
    let split = total(&run(0..2)) + total(&run(2..5));
    assert_eq!(full, split);
    assert_eq!(full, amounts.iter().map(|&a| u64::from(a)).sum::<u64>());
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering and timing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_relative_times_never_ascend() {
    let death = record(vec![
        heal(-9.5, 3_000, Some("Cure II")),
        hot(-8.0, 10),
        hot(-7.0, 10),
        dot(-6.0, 250),
        dot(-6.0, 250),
        hit(-2.2, 9_000, HitFlags::default()),
        hit(-0.1, 12_000, HitFlags::default()),
    ]);

    let rows = build_timeline(&death, &StatusTable::new());
    assert!(rows.windows(2).all(|w| w[0].relative_secs >= w[1].relative_secs));
    assert_eq!(rows[0].time_text(false), "-0.1s");
}

#[test]
fn test_empty_episode_has_no_rows() {
    let death = record(Vec::new());
    assert!(build_timeline(&death, &status_table()).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Cell contents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_ability_renders_empty_cell() {
    let death = record(vec![heal(-1.0, 4_000, None)]);
    let rows = build_timeline(&death, &StatusTable::new());
    assert_eq!(rows[0].ability_label(), "");
    assert_eq!(rows[0].source_label(), "White Mage");
    assert_eq!(rows[0].amount_text(false), "+4,000");
}

#[test]
fn test_hidden_ability_name() {
    let event = CombatEvent::new(
        snap(-1.0, 100),
        EventKind::DamageTaken(DamageTaken {
            amount: 500,
            damage_type: DamageType::Magic,
            flags: HitFlags::default(),
            source: Some("Titan".to_string()),
            ability: Some(Ability {
                name: "Earthen Fury".to_string(),
                icon: Some(404),
            }),
            hide_ability_name: true,
        }),
    )
    .unwrap();

    let rows = build_timeline(&record(vec![event]), &StatusTable::new());
    assert_eq!(rows[0].ability_label(), "");
    assert_eq!(rows[0].ability_icon(), None);
    assert_eq!(rows[0].source_label(), "Titan");
    assert_eq!(rows[0].tone(), RowTone::MagicDamage);
}

#[test]
fn test_missing_max_hp_renders_zero_fraction() {
    let at = time_of_death() - Duration::seconds(1);
    let event =
        CombatEvent::new(StateSnapshot::new(at, 5_000), EventKind::DamageOverTime { amount: 1 })
            .unwrap();

    let rows = build_timeline(&record(vec![event]), &StatusTable::new());
    assert_eq!(rows[0].hp.fraction, 0.0);
    assert_eq!(rows[0].hp.max_hp, None);
    assert_eq!(rows[0].hp_text(false), "5,000");
}

#[test]
fn test_barrier_overlay() {
    let event = CombatEvent::new(
        snap(-1.0, 25_000).with_barrier_percent(30),
        EventKind::DamageOverTime { amount: 1 },
    )
    .unwrap();

    let rows = build_timeline(&record(vec![event]), &StatusTable::new());
    assert_eq!(rows[0].hp.fraction, 0.25);
    assert_eq!(rows[0].hp.barrier_fraction, Some(0.3));
}

#[test]
fn test_direct_crit_tooltip() {
    let flags = HitFlags {
        critical: true,
        direct_hit: true,
        parried: true,
        blocked: true,
    };
    let rows = build_timeline(&record(vec![hit(-1.0, 12_345, flags)]), &StatusTable::new());

    assert_eq!(rows[0].amount_text(false), "-12,345!!");
    assert_eq!(rows[0].amount_text(true), "-12.345!!");
    assert_eq!(
        rows[0].tooltip_lines(),
        vec![
            "Physical Damage",
            "Critical Hit",
            "Direct Hit (+25%)",
            "Parried (-20%)",
            "Blocked (-15%)",
        ]
    );
    assert_eq!(rows[0].tone(), RowTone::PhysicalDamage);
    assert_eq!(rows[0].ability_icon(), Some(101));
    assert_eq!(rows[0].signed_amount(), Some(-12_345));
}

#[test]
fn test_direct_hit_without_crit_has_no_marker() {
    let flags = HitFlags {
        direct_hit: true,
        ..Default::default()
    };
    let rows = build_timeline(&record(vec![hit(-1.0, 800, flags)]), &StatusTable::new());
    assert_eq!(rows[0].amount_text(false), "-800");
}

#[test]
fn test_status_row_resolves_name_and_description() {
    let event = CombatEvent::new(
        snap(-4.0, 60_000),
        EventKind::StatusEffectApplied(StatusApplied {
            status_id: 17,
            icon: None,
            duration_secs: 15.0,
            source: Some("Striking Dummy".to_string()),
        }),
    )
    .unwrap();

    let rows = build_timeline(&record(vec![event]), &status_table());
    let row = &rows[0];
    assert_eq!(row.ability_label(), "Vulnerability Up");
    assert_eq!(row.amount_text(false), "15s");
    assert_eq!(row.tooltip_lines(), vec!["Damage taken is increased."]);
    assert_eq!(row.ability_icon(), Some(15_020));
    assert_eq!(row.signed_amount(), None);
    assert_eq!(row.tone(), RowTone::Neutral);
}

#[test]
fn test_unknown_status_row_renders_blank_name() {
    let event = CombatEvent::new(
        snap(-4.0, 60_000),
        EventKind::StatusEffectApplied(StatusApplied {
            status_id: 99_999,
            icon: Some(7),
            duration_secs: 0.0,
            source: None,
        }),
    )
    .unwrap();

    let rows = build_timeline(&record(vec![event]), &status_table());
    assert_eq!(rows[0].ability_label(), "");
    assert_eq!(rows[0].ability_icon(), Some(7));
    assert!(rows[0].tooltip_lines().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Status badges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_badges_skip_fc_buffs_and_unknown_ids() {
    let snapshot = snap(-1.0, 1_000).with_status_effects(vec![1191, 353, 4242, 17, 1191]);
    let event = CombatEvent::new(
        snapshot,
        EventKind::Healed(Healed {
            amount: 10,
            source: None,
            ability: None,
        }),
    )
    .unwrap();

    let death = record(vec![event]);
    let rows = build_timeline(&death, &status_table());
    let ids: Vec<_> = rows[0].status_effects.iter().map(|b| b.status_id).collect();
    assert_eq!(ids, vec![1191, 17, 1191]);
    assert_eq!(rows[0].status_effects[0].name, "Regen");

    // Storage keeps every id, including the filtered ones
    assert_eq!(
        death.events()[0].snapshot().status_effects(),
        Some(&[1191, 353, 4242, 17, 1191][..])
    );
}

#[test]
fn test_tick_rows_carry_no_badges() {
    let hot_event = CombatEvent::new(
        snap(-2.0, 1_000).with_status_effects(vec![1191]),
        EventKind::HealOverTime { amount: 10 },
    )
    .unwrap();
    let dot_event = CombatEvent::new(
        snap(-1.0, 1_000).with_status_effects(vec![17]),
        EventKind::DamageOverTime { amount: 10 },
    )
    .unwrap();

    let rows = build_timeline(&record(vec![hot_event, dot_event]), &status_table());
    assert!(rows.iter().all(|r| r.status_effects.is_empty()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_rows_serialize_with_type_tag() {
    let crit = HitFlags {
        critical: true,
        ..Default::default()
    };
    let death = record(vec![hot(-3.0, 30), hot(-2.0, 20), hit(-1.0, 500, crit)]);
    let rows = build_timeline(&death, &StatusTable::new());

    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["kind"]["type"], "Damage");
    assert_eq!(json[0]["kind"]["flags"]["critical"], true);
    assert_eq!(json[1]["kind"]["type"], "Regen");
    assert_eq!(json[1]["kind"]["amount"], 50);
    assert_eq!(json[1]["merged_events"], 2);
    assert_eq!(json[1]["relative_secs"], -2.0);
}
