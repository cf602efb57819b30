//! Full tactical read of a board snapshot.

use serde::{Deserialize, Serialize};

use crate::companion::reposition_companions;
use crate::formation::{detect_formation, formation_source};
use crate::jitter::JitterSource;
use crate::phase::{classify_phase, Phase};
use crate::point::{Point, Snapshot};
use crate::stats::PositionStats;
use crate::synthesis::build_counter_formation;
use crate::templates::FormationLibrary;

/// Formation and phase labels for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Detected formation label.
    pub formation_label: String,
    /// Phase label.
    pub phase_label: Phase,
}

/// Everything the board needs to redraw after an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalReport {
    /// Formation read from the opponent (or the tracked team).
    pub detected_formation: String,
    /// Phase of play.
    pub phase: Phase,
    /// Synthesized counter team, goalkeeper first.
    pub red: Vec<Point>,
    /// Tracked team repositioned against the opponent.
    pub green_adjusted: Vec<Point>,
}

impl TacticalReport {
    /// Labels only.
    #[must_use]
    pub fn classification(&self) -> Classification {
        Classification {
            formation_label: self.detected_formation.clone(),
            phase_label: self.phase,
        }
    }
}

/// Run every stage over a snapshot.
///
/// Never fails: missing or malformed data falls back to defaults.
pub fn analyze(
    snapshot: &Snapshot,
    library: &FormationLibrary,
    jitter: &mut dyn JitterSource,
) -> TacticalReport {
    let ball = snapshot.ball.as_ref();
    let detected_formation = detect_formation(formation_source(&snapshot.green, &snapshot.black));
    let stats = PositionStats::from_team(&snapshot.green);

    let counter = build_counter_formation(detected_formation, stats.as_ref(), ball, library, jitter);
    let phase = classify_phase(ball, &snapshot.green, &snapshot.black);
    let green_adjusted = reposition_companions(phase, &snapshot.green, &snapshot.black);

    tracing::debug!(
        green = snapshot.green.len(),
        black = snapshot.black.len(),
        has_ball = ball.is_some(),
        formation = detected_formation,
        %phase,
        "Analyzed snapshot"
    );

    TacticalReport {
        detected_formation: detected_formation.to_string(),
        phase,
        red: counter.players,
        green_adjusted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::NoJitter;

    #[test]
    fn test_empty_snapshot_uses_defaults() {
        let report = analyze(&Snapshot::default(), FormationLibrary::builtin(), &mut NoJitter);
        assert_eq!(report.detected_formation, "4-3-3");
        assert_eq!(report.phase, Phase::Neutral);
        assert_eq!(report.red.len(), 11);
        assert!(report.green_adjusted.is_empty());
    }

    #[test]
    fn test_report_serializes_with_board_field_names() {
        let report = analyze(&Snapshot::default(), FormationLibrary::builtin(), &mut NoJitter);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["detectedFormation"], "4-3-3");
        assert_eq!(json["phase"], "neutral");
        assert!(json["greenAdjusted"].is_array());
        assert_eq!(json["red"][0]["id"], 23);
    }

    #[test]
    fn test_classification_mirrors_report() {
        let snapshot = Snapshot {
            ball: Some(Point::new(None, 500.0, 100.0)),
            green: vec![Point::new(Some(1), 100.0, 100.0)],
            black: vec![Point::new(Some(2), 400.0, 100.0)],
        };
        let report = analyze(&snapshot, FormationLibrary::builtin(), &mut NoJitter);
        let labels = report.classification();
        assert_eq!(labels.phase_label, Phase::Defense);
        assert_eq!(labels.formation_label, report.detected_formation);
        assert_eq!(report.green_adjusted, vec![Point::new(Some(1), 340.0, 85.0)]);
    }
}
