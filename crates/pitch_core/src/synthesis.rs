//! Counter-formation placement.
//!
//! Builds the "red" team: eleven markers laid out from a formation template,
//! mirrored so they attack right to left, nudged towards the opponent's
//! centroid and the ball, then clamped onto the pitch.
//!
//! Steps, all in field-relative space until the last one:
//!
//! 1. resolve the template (unknown labels fall back to the default)
//! 2. take the opponent centroid, or the pitch center without data
//! 3. derive a local phase from the ball alone
//! 4. forward shift = phase push + centroid x deviation / 12
//! 5. lateral shift = centroid y deviation / 6, capped at ±25
//! 6. mirror each slot, apply the shifts and a ±6 px vertical jitter
//! 7. round and clamp into [`OUTFIELD_BOUNDS`]
//! 8. add page offsets
//! 9. prepend a goalkeeper on the right goal line tracking the ball

use serde::{Deserialize, Serialize};

use crate::field::{
    round_half_up, CENTER_X, FIELD_HEIGHT, FIELD_LEFT, FIELD_TOP, FIELD_WIDTH, KEEPER_GOAL_MARGIN,
    KEEPER_TRACK_BOUNDS, MID_Y, OUTFIELD_BOUNDS,
};
use crate::jitter::JitterSource;
use crate::point::Point;
use crate::stats::PositionStats;
use crate::templates::FormationLibrary;

/// Id of the synthesized goalkeeper.
pub const KEEPER_ID: i64 = 23;

/// Vertical jitter amplitude, in pixels.
pub const JITTER_AMPLITUDE: f64 = 6.0;

/// Mirrored slots are pulled back by this much.
pub const MIRROR_MARGIN: f64 = 30.0;

/// Largest lateral shift, either way.
pub const MAX_LATERAL_SHIFT: f64 = 25.0;

const FORWARD_DIVISOR: f64 = 12.0;
const LATERAL_DIVISOR: f64 = 6.0;

/// What the synthesized team should be doing, judged from the ball only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthPhase {
    /// Ball on the synthesized team's attacking half: push up.
    Attack,
    /// Ball past the center line on its defending side: drop back.
    Defense,
    /// No usable ball.
    Neutral,
}

impl SynthPhase {
    /// Classify from the ball marker.
    #[must_use]
    pub fn from_ball(ball: Option<&Point>) -> Self {
        match ball.and_then(Point::valid_left) {
            Some(left) if left - FIELD_LEFT > CENTER_X => Self::Defense,
            Some(_) => Self::Attack,
            None => Self::Neutral,
        }
    }

    /// Base forward push in pixels.
    #[must_use]
    pub const fn push(self) -> f64 {
        match self {
            Self::Attack => 30.0,
            Self::Defense => -20.0,
            Self::Neutral => 0.0,
        }
    }
}

/// Shifts applied to every outfield slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Added to mirrored x.
    pub forward: f64,
    /// Added to template y.
    pub lateral: f64,
}

impl Shift {
    /// Compute shifts from the local phase and the opponent centroid
    /// (field-relative).
    #[must_use]
    pub fn new(phase: SynthPhase, centroid: (f64, f64)) -> Self {
        let (cx, cy) = centroid;
        let forward = phase.push() + round_half_up((cx - CENTER_X) / FORWARD_DIVISOR);
        let lateral = round_half_up((cy - MID_Y) / LATERAL_DIVISOR)
            .max(-MAX_LATERAL_SHIFT)
            .min(MAX_LATERAL_SHIFT);
        Self { forward, lateral }
    }
}

/// Opponent centroid in field-relative space, rounded to whole pixels.
///
/// Falls back to the pitch center when there is nothing to average.
#[must_use]
pub fn relative_centroid(stats: Option<&PositionStats>) -> (f64, f64) {
    stats.map_or((CENTER_X, MID_Y), |s| {
        (
            round_half_up(s.avg_x - FIELD_LEFT),
            round_half_up(s.avg_y - FIELD_TOP),
        )
    })
}

/// Place the synthesized goalkeeper (page-absolute).
#[must_use]
pub fn place_keeper(ball: Option<&Point>) -> Point {
    let top = ball
        .and_then(Point::valid_top)
        .map_or(round_half_up(FIELD_HEIGHT / 2.0), |top| {
            KEEPER_TRACK_BOUNDS.clamp_y(round_half_up(top - FIELD_TOP))
        });
    Point::new(
        Some(KEEPER_ID),
        FIELD_LEFT + FIELD_WIDTH - KEEPER_GOAL_MARGIN,
        FIELD_TOP + top,
    )
}

/// The synthesized team plus the local phase it was built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterFormation {
    /// Goalkeeper first, then template slots in order.
    pub players: Vec<Point>,
    /// Local phase used for the forward push.
    pub phase: SynthPhase,
}

/// Build the counter team.
///
/// `opponent` is the statistics of the team being countered, `None` if it
/// has no usable markers.
pub fn build_counter_formation(
    formation: &str,
    opponent: Option<&PositionStats>,
    ball: Option<&Point>,
    library: &FormationLibrary,
    jitter: &mut dyn JitterSource,
) -> CounterFormation {
    let template = library.resolve(formation);
    let centroid = relative_centroid(opponent);
    let phase = SynthPhase::from_ball(ball);
    let shift = Shift::new(phase, centroid);

    tracing::debug!(
        requested = formation,
        template = %template.name,
        ?phase,
        forward = shift.forward,
        lateral = shift.lateral,
        "Building counter formation"
    );

    let mut players = Vec::with_capacity(template.slots.len() + 1);
    players.push(place_keeper(ball));

    for slot in &template.slots {
        let (zone_x, zone_y) = slot.zone;
        let rel_x = FIELD_WIDTH - zone_x + shift.forward - MIRROR_MARGIN;
        let rel_y = zone_y + shift.lateral + jitter.sample(JITTER_AMPLITUDE);

        let rel_x = OUTFIELD_BOUNDS.clamp_x(round_half_up(rel_x));
        let rel_y = OUTFIELD_BOUNDS.clamp_y(round_half_up(rel_y));

        players.push(Point::new(Some(slot.id), FIELD_LEFT + rel_x, FIELD_TOP + rel_y));
    }

    CounterFormation { players, phase }
}
