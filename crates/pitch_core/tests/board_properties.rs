//! Property tests over arbitrary board snapshots.
//!
//! Whatever the browser posts, analysis must stay total and keep every
//! synthesized or repositioned marker on the pitch.

use pitch_core::analysis::analyze;
use pitch_core::companion::reposition_companions;
use pitch_core::field::{COMPANION_BOUNDS, FIELD_LEFT, FIELD_TOP, OUTFIELD_BOUNDS};
use pitch_core::formation::{detect_formation, SIGNATURE_RULES};
use pitch_core::jitter::{FixedJitter, NoJitter, RngJitter};
use pitch_core::phase::Phase;
use pitch_core::point::Point;
use pitch_core::stats::PositionStats;
use pitch_core::synthesis::{build_counter_formation, JITTER_AMPLITUDE, KEEPER_ID};
use pitch_core::templates::FormationLibrary;
use pitch_test_utils::determinism::{fingerprint_points, fingerprint_report};
use pitch_test_utils::strategies::{arb_snapshot, arb_team, arb_valid_team};
use proptest::prelude::*;

fn is_known_label(label: &str) -> bool {
    SIGNATURE_RULES.iter().any(|r| r.formation == label)
}

proptest! {
    #[test]
    fn prop_red_team_stays_on_pitch(snapshot in arb_snapshot(), jitter in -6.0f64..=6.0) {
        let report = analyze(&snapshot, FormationLibrary::builtin(), &mut FixedJitter(jitter));

        prop_assert_eq!(report.red.len(), 11);
        let keeper = report.red[0];
        prop_assert_eq!(keeper.id, Some(KEEPER_ID));
        prop_assert_eq!(keeper.left, Some(600.0));
        let keeper_top = keeper.top.unwrap_or(f64::NAN);
        prop_assert!((FIELD_TOP + 30.0..=FIELD_TOP + 260.0).contains(&keeper_top));

        let page = OUTFIELD_BOUNDS.to_page();
        for p in &report.red[1..] {
            let (x, y) = p.position().unwrap_or((f64::NAN, f64::NAN));
            prop_assert!(page.contains(x, y), "off pitch: {:?}", p);
            prop_assert_eq!(x, x.round());
            prop_assert_eq!(y, y.round());
        }
    }

    #[test]
    fn prop_labels_are_always_known(snapshot in arb_snapshot()) {
        let report = analyze(&snapshot, FormationLibrary::builtin(), &mut NoJitter);
        prop_assert!(is_known_label(&report.detected_formation));
    }

    #[test]
    fn prop_thirds_partition_valid_markers(team in arb_team(14)) {
        let valid = team.iter().filter(|p| p.is_valid()).count();
        match PositionStats::from_team(&team) {
            None => prop_assert_eq!(valid, 0),
            Some(stats) => {
                prop_assert_eq!(stats.count, valid);
                prop_assert_eq!(stats.thirds.total(), valid);
                prop_assert!(stats.avg_x.is_finite() && stats.avg_y.is_finite());
                prop_assert!(stats.spread_x >= 0.0 && stats.spread_y >= 0.0);
            }
        }
    }

    #[test]
    fn prop_companions_pass_through_or_stay_in_bounds(
        green in arb_team(11),
        black in arb_team(11),
        phase in prop_oneof![
            Just(Phase::Attack),
            Just(Phase::Defense),
            Just(Phase::Advanced),
            Just(Phase::Neutral),
        ],
    ) {
        let out = reposition_companions(phase, &green, &black);
        if black.is_empty() {
            prop_assert_eq!(fingerprint_points(&out), fingerprint_points(&green));
        } else {
            prop_assert!(out.len() <= green.len().min(black.len()));
            for p in &out {
                let (x, y) = p.position().unwrap_or((f64::NAN, f64::NAN));
                prop_assert!(COMPANION_BOUNDS.contains(x, y), "out of bounds: {:?}", p);
            }
        }
    }

    #[test]
    fn prop_pinned_analysis_is_repeatable(snapshot in arb_snapshot()) {
        let lib = FormationLibrary::builtin();
        let a = analyze(&snapshot, lib, &mut NoJitter);
        let b = analyze(&snapshot, lib, &mut NoJitter);
        prop_assert_eq!(fingerprint_report(&a), fingerprint_report(&b));
    }

    #[test]
    fn prop_live_jitter_only_moves_outfield_tops(
        black in arb_valid_team(11),
        ball_left in 20.0f64..620.0,
        ball_top in 20.0f64..320.0,
    ) {
        let lib = FormationLibrary::builtin();
        let ball = Point::new(None, ball_left, ball_top);
        let stats = PositionStats::from_team(&black);
        let label = detect_formation(&black);

        let still = build_counter_formation(label, stats.as_ref(), Some(&ball), lib, &mut NoJitter);
        let live = build_counter_formation(
            label,
            stats.as_ref(),
            Some(&ball),
            lib,
            &mut RngJitter::thread_local(),
        );

        prop_assert_eq!(still.players[0], live.players[0]);
        for (a, b) in still.players.iter().zip(&live.players).skip(1) {
            prop_assert_eq!(a.id, b.id);
            prop_assert_eq!(a.left, b.left);
            let drift = (a.top.unwrap_or(0.0) - b.top.unwrap_or(0.0)).abs();
            prop_assert!(drift <= JITTER_AMPLITUDE, "drift {} at {:?}", drift, a.id);
        }
    }
}

#[test]
fn test_page_offsets_match_board_layout() {
    let page = OUTFIELD_BOUNDS.to_page();
    assert_eq!(page.min_x, OUTFIELD_BOUNDS.min_x + FIELD_LEFT);
    assert_eq!(page.max_y, OUTFIELD_BOUNDS.max_y + FIELD_TOP);
}
