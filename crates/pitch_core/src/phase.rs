//! Game phase classification.
//!
//! The phase is read from the ball's side of the center line and from where
//! each team's markers stand. Rules live in [`PHASE_RULES`] and are tried in
//! order; they overlap, so the order matters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::CENTER_X;
use crate::point::Point;

/// How far behind the center line a player counts as withdrawn.
pub const WITHDRAWN_MARGIN: f64 = 50.0;

/// Coarse game phase, from the tracked team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Tracked team has men forward with the ball on its side.
    Attack,
    /// Ball past center and the opponent is up the pitch.
    Defense,
    /// Opponent entirely withdrawn.
    Advanced,
    /// Nothing conclusive.
    Neutral,
}

impl Phase {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::Advanced => "advanced",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs a phase rule can look at.
#[derive(Debug, Clone, Copy)]
pub struct PhaseInput<'a> {
    /// Ball `left`, when usable.
    pub ball_left: Option<f64>,
    /// Tracked team.
    pub green: &'a [Point],
    /// Opponent team.
    pub black: &'a [Point],
}

impl<'a> PhaseInput<'a> {
    /// Collect inputs from a snapshot's parts.
    #[must_use]
    pub fn new(ball: Option<&Point>, green: &'a [Point], black: &'a [Point]) -> Self {
        Self {
            ball_left: ball.and_then(Point::valid_left),
            green,
            black,
        }
    }
}

/// A named predicate and the phase it yields.
#[derive(Clone, Copy)]
pub struct PhaseRule {
    /// Short name for logs and tests.
    pub name: &'static str,
    /// Whether the rule fires.
    pub applies: fn(&PhaseInput<'_>) -> bool,
    /// Phase reported when it fires.
    pub phase: Phase,
}

impl fmt::Debug for PhaseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseRule")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

fn lefts(team: &[Point]) -> impl Iterator<Item = f64> + '_ {
    team.iter().filter_map(Point::valid_left)
}

fn no_ball(input: &PhaseInput<'_>) -> bool {
    input.ball_left.is_none()
}

fn opponent_pressing(input: &PhaseInput<'_>) -> bool {
    input.ball_left.is_some_and(|b| b > CENTER_X)
        && lefts(input.black).any(|x| x > CENTER_X - WITHDRAWN_MARGIN)
}

fn tracked_building_up(input: &PhaseInput<'_>) -> bool {
    input.ball_left.is_some_and(|b| b < CENTER_X)
        && lefts(input.green).any(|x| x < CENTER_X - WITHDRAWN_MARGIN)
}

/// An empty black team counts as withdrawn; a marker without a usable
/// `left` does not.
fn opponent_withdrawn(input: &PhaseInput<'_>) -> bool {
    input
        .black
        .iter()
        .all(|p| p.valid_left().is_some_and(|x| x < CENTER_X - WITHDRAWN_MARGIN))
}

fn always(_: &PhaseInput<'_>) -> bool {
    true
}

/// Phase rules in priority order. The last rule always fires.
pub const PHASE_RULES: &[PhaseRule] = &[
    PhaseRule {
        name: "no-ball",
        applies: no_ball,
        phase: Phase::Neutral,
    },
    PhaseRule {
        name: "opponent-pressing",
        applies: opponent_pressing,
        phase: Phase::Defense,
    },
    PhaseRule {
        name: "tracked-building-up",
        applies: tracked_building_up,
        phase: Phase::Attack,
    },
    PhaseRule {
        name: "opponent-withdrawn",
        applies: opponent_withdrawn,
        phase: Phase::Advanced,
    },
    PhaseRule {
        name: "fallback",
        applies: always,
        phase: Phase::Neutral,
    },
];

/// Classify the phase of play.
///
/// Coordinates are compared as sent (page space) against [`CENTER_X`].
#[must_use]
pub fn classify_phase(ball: Option<&Point>, green: &[Point], black: &[Point]) -> Phase {
    let input = PhaseInput::new(ball, green, black);
    let rule = PHASE_RULES.iter().find(|rule| (rule.applies)(&input));
    let phase = rule.map_or(Phase::Neutral, |r| r.phase);
    tracing::debug!(rule = rule.map(|r| r.name), %phase, "Classified phase");
    phase
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64) -> Point {
        Point::new(None, x, 100.0)
    }

    #[test]
    fn test_missing_ball_is_neutral() {
        assert_eq!(classify_phase(None, &[at(10.0)], &[at(10.0)]), Phase::Neutral);
        let no_left = Point {
            id: None,
            left: None,
            top: Some(3.0),
        };
        assert_eq!(classify_phase(Some(&no_left), &[], &[at(10.0)]), Phase::Neutral);
    }

    #[test]
    fn test_defense_when_ball_past_center_and_opponent_up() {
        let ball = at(400.0);
        assert_eq!(classify_phase(Some(&ball), &[], &[at(260.0)]), Phase::Defense);
    }

    #[test]
    fn test_attack_when_ball_own_side_and_green_back() {
        let ball = at(100.0);
        assert_eq!(classify_phase(Some(&ball), &[at(200.0)], &[at(400.0)]), Phase::Attack);
    }

    #[test]
    fn test_advanced_when_opponent_all_withdrawn() {
        let ball = at(400.0);
        // Ball past center but nobody in black beyond 250.
        assert_eq!(
            classify_phase(Some(&ball), &[at(400.0)], &[at(100.0), at(249.0)]),
            Phase::Advanced
        );
    }

    #[test]
    fn test_empty_opponent_is_withdrawn() {
        let ball = at(400.0);
        assert_eq!(classify_phase(Some(&ball), &[at(400.0)], &[]), Phase::Advanced);
        // Still no ball, still neutral.
        assert_eq!(classify_phase(None, &[at(400.0)], &[]), Phase::Neutral);
    }

    #[test]
    fn test_invalid_opponent_marker_blocks_withdrawn() {
        let ball = at(400.0);
        let lost = Point {
            id: Some(7),
            left: None,
            top: Some(100.0),
        };
        assert_eq!(
            classify_phase(Some(&ball), &[at(400.0)], &[at(100.0), lost]),
            Phase::Neutral
        );
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = PHASE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["no-ball", "opponent-pressing", "tracked-building-up", "opponent-withdrawn", "fallback"]
        );
        let ball = at(500.0);
        assert_eq!(
            classify_phase(Some(&ball), &[at(100.0)], &[at(260.0), at(10.0)]),
            Phase::Defense
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Phase::Advanced.to_string(), "advanced");
        assert_eq!(Phase::Defense.as_str(), "defense");
    }
}
