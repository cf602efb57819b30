//! Test fixtures and helpers.
//!
//! Pre-built teams and snapshots for consistent testing. Coordinates are
//! page-absolute, like the board sends them.

use pitch_core::point::{Point, Snapshot};

/// Create a point without an id.
#[must_use]
pub fn point(left: f64, top: f64) -> Point {
    Point::new(None, left, top)
}

/// Create a player marker.
#[must_use]
pub fn player(id: i64, left: f64, top: f64) -> Point {
    Point::new(Some(id), left, top)
}

/// Build a team from coordinate pairs; ids count up from `first_id`.
#[must_use]
pub fn team(first_id: i64, coords: &[(f64, f64)]) -> Vec<Point> {
    (first_id..)
        .zip(coords)
        .map(|(id, &(left, top))| player(id, left, top))
        .collect()
}

/// Build a team laid out in horizontal lines.
///
/// Each `(top, count)` entry places `count` players 4 px apart around
/// `top`, all at `left`. Lines further apart than the detector's tolerance
/// come out as separate lines.
#[must_use]
pub fn lines_team(left: f64, lines: &[(f64, usize)]) -> Vec<Point> {
    let mut id = 1;
    let mut players = Vec::new();
    for &(top, count) in lines {
        for k in 0..count {
            players.push(player(id, left + 10.0 * k as f64, top + 4.0 * k as f64));
            id += 1;
        }
    }
    players
}

/// A 4-4-2 shape read top to bottom.
#[must_use]
pub fn four_four_two(left: f64) -> Vec<Point> {
    lines_team(left, &[(40.0, 4), (140.0, 4), (240.0, 2)])
}

/// A marker with no usable coordinates.
#[must_use]
pub fn invalid_point(id: i64) -> Point {
    Point {
        id: Some(id),
        left: None,
        top: None,
    }
}

/// Assemble a snapshot.
#[must_use]
pub fn snapshot(ball: Option<Point>, green: Vec<Point>, black: Vec<Point>) -> Snapshot {
    Snapshot { ball, green, black }
}

/// Both teams spread around midfield, ball just past the center line.
#[must_use]
pub fn midfield_snapshot() -> Snapshot {
    snapshot(
        Some(point(340.0, 160.0)),
        team(
            1,
            &[
                (60.0, 170.0),
                (120.0, 80.0),
                (120.0, 260.0),
                (200.0, 140.0),
                (200.0, 200.0),
                (260.0, 100.0),
                (260.0, 240.0),
                (300.0, 170.0),
            ],
        ),
        four_four_two(380.0),
    )
}

/// Parse a snapshot the way the server would receive it.
///
/// # Panics
///
/// Panics if `json` is not valid JSON for a snapshot.
#[must_use]
pub fn snapshot_from_json(json: &str) -> Snapshot {
    serde_json::from_str(json).expect("fixture JSON should parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_team_counts() {
        assert_eq!(four_four_two(100.0).len(), 10);
        let ids: Vec<_> = lines_team(0.0, &[(0.0, 2), (100.0, 1)])
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_snapshot_from_json_is_lenient() {
        let s = snapshot_from_json(
            r#"{"ball": {"left": "x"}, "green": [{"id": 1, "left": 5, "top": "7"}], "black": null}"#,
        );
        assert_eq!(s.ball.and_then(|b| b.left), None);
        assert_eq!(s.green.len(), 1);
        assert!(!s.green[0].is_valid());
        assert!(s.black.is_empty());
    }
}
