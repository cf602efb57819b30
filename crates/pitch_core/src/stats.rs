//! Per-team position statistics.

use serde::{Deserialize, Serialize};

use crate::field::FIELD_WIDTH;
use crate::point::{valid_positions, Point};

/// Player counts per vertical third of the pitch, by `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thirds {
    /// `left` in `[0, W/3)` (and anything below zero).
    pub defense: usize,
    /// `left` in `[W/3, 2W/3)`.
    pub middle: usize,
    /// `left` in `[2W/3, ∞)`.
    pub attack: usize,
}

impl Thirds {
    /// Total players counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.defense + self.middle + self.attack
    }

    fn record(&mut self, left: f64) {
        let third = FIELD_WIDTH / 3.0;
        if left < third {
            self.defense += 1;
        } else if left < 2.0 * third {
            self.middle += 1;
        } else {
            self.attack += 1;
        }
    }
}

/// Summary of one team's shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStats {
    /// Mean `left`.
    pub avg_x: f64,
    /// Mean `top`.
    pub avg_y: f64,
    /// `max(left) - min(left)`.
    pub spread_x: f64,
    /// `max(top) - min(top)`.
    pub spread_y: f64,
    /// Occupancy per third.
    pub thirds: Thirds,
    /// Number of valid points summarized.
    pub count: usize,
}

impl PositionStats {
    /// Summarize a team.
    ///
    /// Returns `None` when the team has no valid point, so callers never
    /// divide by zero.
    #[must_use]
    pub fn from_team(team: &[Point]) -> Option<Self> {
        let mut count = 0usize;
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        let mut thirds = Thirds::default();

        for (x, y) in valid_positions(team) {
            count += 1;
            sum_x += x;
            sum_y += y;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            thirds.record(x);
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            avg_x: sum_x / n,
            avg_y: sum_y / n,
            spread_x: max_x - min_x,
            spread_y: max_y - min_y,
            thirds,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(Some(i as i64), x, y))
            .collect()
    }

    #[test]
    fn test_empty_team_has_no_stats() {
        assert_eq!(PositionStats::from_team(&[]), None);
        assert_eq!(PositionStats::from_team(&[Point::default()]), None);
    }

    #[test]
    fn test_means_and_spreads() {
        let stats = PositionStats::from_team(&team(&[(100.0, 50.0), (300.0, 150.0)])).unwrap();
        assert_eq!(stats.avg_x, 200.0);
        assert_eq!(stats.avg_y, 100.0);
        assert_eq!(stats.spread_x, 200.0);
        assert_eq!(stats.spread_y, 100.0);
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn test_thirds_boundaries_are_half_open() {
        let stats =
            PositionStats::from_team(&team(&[(-5.0, 0.0), (199.9, 0.0), (200.0, 0.0), (399.9, 0.0), (400.0, 0.0), (900.0, 0.0)]))
                .unwrap();
        assert_eq!(
            stats.thirds,
            Thirds {
                defense: 2,
                middle: 2,
                attack: 2
            }
        );
        assert_eq!(stats.thirds.total(), stats.count);
    }

    #[test]
    fn test_invalid_points_are_ignored() {
        let mut players = team(&[(100.0, 100.0)]);
        players.push(Point {
            id: Some(9),
            left: Some(f64::NAN),
            top: Some(3.0),
        });
        let stats = PositionStats::from_team(&players).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.spread_x, 0.0);
    }
}
