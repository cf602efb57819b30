//! Board positions as the browser sends them.
//!
//! The board posts whatever its DOM currently holds, so a coordinate may be
//! missing, `null`, or not a number at all. Those values deserialize to
//! `None` instead of failing the whole snapshot; downstream code only uses
//! points that pass [`Point::position`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::field::is_coordinate;

/// One marker on the board: a player or the ball.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Marker id. Not unique; order is the only correlation key.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    /// Horizontal page coordinate.
    #[serde(default, deserialize_with = "lenient_number")]
    pub left: Option<f64>,
    /// Vertical page coordinate.
    #[serde(default, deserialize_with = "lenient_number")]
    pub top: Option<f64>,
}

impl Point {
    /// Create a point with both coordinates set.
    #[must_use]
    pub const fn new(id: Option<i64>, left: f64, top: f64) -> Self {
        Self {
            id,
            left: Some(left),
            top: Some(top),
        }
    }

    /// Both coordinates, if both are finite numbers.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.left, self.top) {
            (Some(left), Some(top)) if is_coordinate(left) && is_coordinate(top) => Some((left, top)),
            _ => None,
        }
    }

    /// Whether the point carries usable coordinates.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position().is_some()
    }

    /// The horizontal coordinate on its own, if finite.
    #[must_use]
    pub fn valid_left(&self) -> Option<f64> {
        self.left.filter(|&v| is_coordinate(v))
    }

    /// The vertical coordinate on its own, if finite.
    #[must_use]
    pub fn valid_top(&self) -> Option<f64> {
        self.top.filter(|&v| is_coordinate(v))
    }
}

/// Iterate over the usable `(left, top)` pairs of a team.
pub fn valid_positions(team: &[Point]) -> impl Iterator<Item = (f64, f64)> + '_ {
    team.iter().filter_map(Point::position)
}

/// A single instant of the board, as posted by the client.
///
/// `green` is the team the user tracks, `black` its opponent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ball marker, if the board has one.
    #[serde(default, deserialize_with = "lenient_ball")]
    pub ball: Option<Point>,
    /// Tracked team.
    #[serde(default, deserialize_with = "lenient_team")]
    pub green: Vec<Point>,
    /// Opponent team.
    #[serde(default, deserialize_with = "lenient_team")]
    pub black: Vec<Point>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(serde::de::IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Other(_) => None,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient<f64>>::deserialize(deserializer)?.and_then(Lenient::into_option))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient<i64>>::deserialize(deserializer)?.and_then(Lenient::into_option))
}

fn lenient_ball<'de, D>(deserializer: D) -> Result<Option<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient<Point>>::deserialize(deserializer)?.and_then(Lenient::into_option))
}

// A team that is not an array counts as empty; entries that are not objects
// are dropped.
fn lenient_team<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Lenient<Vec<Lenient<Point>>>>::deserialize(deserializer)?
        .and_then(Lenient::into_option)
        .unwrap_or_default();
    Ok(entries.into_iter().filter_map(Lenient::into_option).collect())
}
