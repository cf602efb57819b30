//! Companion team repositioning.
//!
//! Each tracked player is shadowed onto the opponent marker at the same
//! index, shifted forward or back by phase and staggered vertically so pairs
//! do not overlap.

use crate::field::COMPANION_BOUNDS;
use crate::phase::Phase;
use crate::point::Point;

/// Vertical stagger applied to even indices (odd indices get the opposite).
pub const STAGGER: f64 = 15.0;

/// Horizontal offset for a phase.
#[must_use]
pub const fn phase_offset(phase: Phase) -> f64 {
    match phase {
        Phase::Defense => -60.0,
        Phase::Attack => 40.0,
        Phase::Advanced => 80.0,
        Phase::Neutral => 0.0,
    }
}

/// Reposition the tracked team against the opponent.
///
/// With no opponent markers the tracked team is returned untouched.
/// Otherwise only indices present in both teams are paired, and pairs whose
/// opponent marker has no usable coordinates are dropped.
#[must_use]
pub fn reposition_companions(phase: Phase, green: &[Point], black: &[Point]) -> Vec<Point> {
    if black.is_empty() {
        return green.to_vec();
    }

    let dx = phase_offset(phase);
    green
        .iter()
        .zip(black)
        .enumerate()
        .filter_map(|(i, (mate, opponent))| {
            let (x, y) = opponent.position()?;
            let dy = if i % 2 == 0 { -STAGGER } else { STAGGER };
            Some(Point::new(
                mate.id,
                COMPANION_BOUNDS.clamp_x(x + dx),
                COMPANION_BOUNDS.clamp_y(y + dy),
            ))
        })
        .collect()
}
