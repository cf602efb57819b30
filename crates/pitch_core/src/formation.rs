//! Formation detection from raw marker positions.
//!
//! Players are grouped into horizontal lines by their `top` coordinate, the
//! line sizes form a signature such as `4-4-2`, and the signature is matched
//! against [`SIGNATURE_RULES`] in order.
//!
//! This is a heuristic: line sizes are sorted largest first before
//! matching, so the signature loses the back-to-front order of the lines.

use crate::point::Point;

/// Label used when nothing can be detected.
pub const DEFAULT_FORMATION: &str = "4-3-3";

/// Max distance between a player and the running average of its line.
pub const LINE_TOLERANCE: f64 = 45.0;

/// One entry of the ordered signature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureRule {
    /// Signature prefix to look for.
    pub prefix: &'static str,
    /// Formation reported on match.
    pub formation: &'static str,
}

/// Signature rules in priority order. The first rule whose prefix the
/// signature starts with wins.
pub const SIGNATURE_RULES: &[SignatureRule] = &[
    SignatureRule {
        prefix: "4-4-2",
        formation: "4-4-2",
    },
    SignatureRule {
        prefix: "3-5-2",
        formation: "3-5-2",
    },
    SignatureRule {
        prefix: "5-3-2",
        formation: "5-3-2",
    },
    SignatureRule {
        prefix: "4-3-3",
        formation: "4-3-3",
    },
    SignatureRule {
        prefix: "4-2-3-1",
        formation: "4-2-3-1",
    },
    SignatureRule {
        prefix: "3-4-3",
        formation: "3-4-3",
    },
];

#[derive(Debug)]
struct Line {
    count: usize,
    avg: f64,
}

/// Group vertical coordinates into lines.
///
/// Values are sorted ascending; each one joins the current line unless it
/// sits more than [`LINE_TOLERANCE`] away from that line's running average.
/// Returns line sizes in top-to-bottom order.
#[must_use]
pub fn cluster_lines(tops: &[f64]) -> Vec<usize> {
    let mut sorted: Vec<f64> = tops.iter().copied().filter(|t| t.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut lines: Vec<Line> = Vec::new();
    for y in sorted {
        match lines.last_mut() {
            Some(line) if (y - line.avg).abs() <= LINE_TOLERANCE => {
                line.avg = (line.avg * line.count as f64 + y) / (line.count + 1) as f64;
                line.count += 1;
            }
            _ => lines.push(Line { count: 1, avg: y }),
        }
    }

    lines.into_iter().map(|line| line.count).collect()
}

/// Build the dash-joined signature from line sizes, largest first.
#[must_use]
pub fn signature(line_sizes: &[usize]) -> String {
    let mut sizes = line_sizes.to_vec();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("-")
}

/// Map a signature to a formation label via [`SIGNATURE_RULES`].
#[must_use]
pub fn match_signature(signature: &str) -> &'static str {
    SIGNATURE_RULES
        .iter()
        .find(|rule| signature.starts_with(rule.prefix))
        .map_or(DEFAULT_FORMATION, |rule| rule.formation)
}

/// Detect the formation of a team.
///
/// Points without a usable `top` are ignored; an empty team yields
/// [`DEFAULT_FORMATION`].
#[must_use]
pub fn detect_formation(team: &[Point]) -> &'static str {
    let tops: Vec<f64> = team.iter().filter_map(Point::valid_top).collect();
    if tops.is_empty() {
        return DEFAULT_FORMATION;
    }

    let lines = cluster_lines(&tops);
    let sig = signature(&lines);
    let formation = match_signature(&sig);
    tracing::debug!(signature = %sig, formation, "Detected formation");
    formation
}

/// Pick the team the formation should be read from: the opponent when it
/// has any markers, else the tracked team.
#[must_use]
pub fn formation_source<'a>(green: &'a [Point], black: &'a [Point]) -> &'a [Point] {
    if black.is_empty() {
        green
    } else {
        black
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(tops: &[f64]) -> Vec<Point> {
        tops.iter()
            .enumerate()
            .map(|(i, &t)| Point::new(Some(i as i64), 100.0, t))
            .collect()
    }

    #[test]
    fn test_empty_team_defaults() {
        assert_eq!(detect_formation(&[]), "4-3-3");
        assert_eq!(detect_formation(&[Point::default()]), "4-3-3");
    }

    #[test]
    fn test_cluster_uses_running_average() {
        // 0 and 40 join (avg 20), 64 is 44 away from 20 and joins too.
        assert_eq!(cluster_lines(&[0.0, 40.0, 64.0]), vec![3]);
        // 100 is more than 45 away from 0.
        assert_eq!(cluster_lines(&[100.0, 0.0]), vec![1, 1]);
    }

    #[test]
    fn test_four_four_two_detected() {
        let team = column(&[
            10.0, 12.0, 14.0, 16.0, // line of 4
            100.0, 102.0, 104.0, 106.0, // line of 4
            200.0, 202.0, // line of 2
        ]);
        assert_eq!(detect_formation(&team), "4-4-2");
    }

    #[test]
    fn test_signature_sorts_descending() {
        assert_eq!(signature(&[2, 4, 3, 1]), "4-3-2-1");
    }

    #[test]
    fn test_rule_order_is_first_match() {
        assert_eq!(match_signature("4-4-2-1"), "4-4-2");
        assert_eq!(match_signature("5-3-2"), "5-3-2");
        assert_eq!(match_signature("4-3-3"), "4-3-3");
        assert_eq!(match_signature("10"), DEFAULT_FORMATION);
        // "4-2-3-1" can never be produced by a descending sort; the rule
        // stays in the table for parity with the board's label set.
        assert_eq!(match_signature("4-2-3-1"), "4-2-3-1");
    }

    #[test]
    fn test_formation_source_prefers_opponent() {
        let green = column(&[1.0]);
        let black = column(&[2.0]);
        assert_eq!(formation_source(&green, &black), black.as_slice());
        assert_eq!(formation_source(&green, &[]), green.as_slice());
    }
}
