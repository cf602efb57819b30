//! Field geometry constants and coordinate helpers.
//!
//! The board renders the pitch as a fixed-size rectangle placed at a fixed
//! offset inside the page. Two coordinate frames are in play:
//!
//! - **page-absolute**: what the browser sends and receives (`left`/`top`
//!   in CSS pixels, offsets included)
//! - **field-relative**: origin at the pitch's own top-left corner
//!
//! All geometry here is read-only and process-wide.

use serde::{Deserialize, Serialize};

/// Pitch width in pixels.
pub const FIELD_WIDTH: f64 = 600.0;

/// Pitch height in pixels.
pub const FIELD_HEIGHT: f64 = 300.0;

/// Horizontal page offset of the pitch.
pub const FIELD_LEFT: f64 = 20.0;

/// Vertical page offset of the pitch.
pub const FIELD_TOP: f64 = 20.0;

/// Horizontal center line.
pub const CENTER_X: f64 = FIELD_WIDTH / 2.0;

/// Vertical mid line.
pub const MID_Y: f64 = FIELD_HEIGHT / 2.0;

/// Inclusive axis-aligned clamp region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest allowed x.
    pub min_x: f64,
    /// Largest allowed x.
    pub max_x: f64,
    /// Smallest allowed y.
    pub min_y: f64,
    /// Largest allowed y.
    pub max_y: f64,
}

impl Bounds {
    /// Create a new clamp region.
    #[must_use]
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Clamp an x coordinate into the region.
    #[must_use]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.max(self.min_x).min(self.max_x)
    }

    /// Clamp a y coordinate into the region.
    #[must_use]
    pub fn clamp_y(&self, y: f64) -> f64 {
        y.max(self.min_y).min(self.max_y)
    }

    /// Whether a coordinate pair lies inside the region (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Shift the region by the page offsets, turning a field-relative region
    /// into a page-absolute one.
    #[must_use]
    pub fn to_page(self) -> Self {
        Self::new(
            self.min_x + FIELD_LEFT,
            self.max_x + FIELD_LEFT,
            self.min_y + FIELD_TOP,
            self.max_y + FIELD_TOP,
        )
    }
}

/// Where synthesized outfield players may stand (field-relative).
pub const OUTFIELD_BOUNDS: Bounds = Bounds::new(20.0, FIELD_WIDTH - 30.0, 20.0, FIELD_HEIGHT - 20.0);

/// Vertical range the synthesized goalkeeper may track the ball through
/// (field-relative). Only the y range is meaningful.
pub const KEEPER_TRACK_BOUNDS: Bounds = Bounds::new(
    FIELD_WIDTH - KEEPER_GOAL_MARGIN,
    FIELD_WIDTH - KEEPER_GOAL_MARGIN,
    30.0,
    FIELD_HEIGHT - 40.0,
);

/// Distance between the synthesized goalkeeper and its goal line.
pub const KEEPER_GOAL_MARGIN: f64 = 20.0;

/// Where repositioned companion players may stand.
pub const COMPANION_BOUNDS: Bounds = Bounds::new(30.0, FIELD_WIDTH - 30.0, 30.0, FIELD_HEIGHT - 30.0);

/// Round half towards positive infinity.
///
/// Browsers round this way, so `-2.5` becomes `-2` rather than `-3`
/// (which is what [`f64::round`] would give).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Whether a value is usable as a coordinate.
#[must_use]
pub fn is_coordinate(value: f64) -> bool {
    value.is_finite()
}
