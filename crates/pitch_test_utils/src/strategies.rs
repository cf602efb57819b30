//! Proptest strategies for board inputs.
//!
//! These generate random but reproducible snapshots, including the junk a
//! browser can post: markers off the pitch, missing coordinates, no ball.

use proptest::prelude::*;

use pitch_core::point::{Point, Snapshot};

/// A coordinate well beyond the pitch on every side.
///
/// Range: -200 to 900 (pitch plus offsets spans 20 to 620)
pub fn arb_coordinate() -> impl Strategy<Value = f64> {
    -200.0f64..900.0
}

/// A marker with usable coordinates.
pub fn arb_valid_point() -> impl Strategy<Value = Point> {
    (proptest::option::of(0i64..40), arb_coordinate(), arb_coordinate())
        .prop_map(|(id, left, top)| Point::new(id, left, top))
}

/// A marker that may be missing one or both coordinates, or carry NaN.
pub fn arb_point() -> impl Strategy<Value = Point> {
    prop_oneof![
        8 => arb_valid_point(),
        1 => (proptest::option::of(0i64..40), proptest::option::of(arb_coordinate()))
            .prop_map(|(id, left)| Point { id, left, top: None }),
        1 => Just(Point {
            id: None,
            left: Some(f64::NAN),
            top: Some(100.0),
        }),
    ]
}

/// A team of up to `max_len` markers, possibly empty.
pub fn arb_team(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    proptest::collection::vec(arb_point(), 0..=max_len)
}

/// A team of 1 to `max_len` usable markers.
pub fn arb_valid_team(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    proptest::collection::vec(arb_valid_point(), 1..=max_len.max(1))
}

/// An optional ball.
pub fn arb_ball() -> impl Strategy<Value = Option<Point>> {
    proptest::option::of(arb_point())
}

/// A full snapshot.
pub fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (arb_ball(), arb_team(11), arb_team(11))
        .prop_map(|(ball, green, black)| Snapshot { ball, green, black })
}
