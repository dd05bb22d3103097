//! Leaderboard statistics over a game's recorded points.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{GameId, GameName, Points};

/// Mean, median, and mode of a set of point values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    /// Every value sharing the highest frequency, ascending.
    pub mode: Vec<u32>,
}

impl Statistics {
    /// Statistics of an empty sample.
    pub fn empty() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            mode: Vec::new(),
        }
    }
}

/// Statistics for one game's leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    pub game_id: GameId,
    pub game_name: GameName,
    pub sample_size: usize,
    #[serde(flatten)]
    pub statistics: Statistics,
}

/// Compute mean, median, and mode over `points`.
///
/// An empty sample yields zero mean and median and an empty mode rather
/// than an error.
///
/// # Examples
/// ```
/// use scoreboard::domain::compute_statistics;
///
/// let stats = compute_statistics(&[200, 100, 20, 20, 80]);
/// assert_eq!(stats.mean, 84.0);
/// assert_eq!(stats.median, 80.0);
/// assert_eq!(stats.mode, vec![20]);
/// ```
pub fn compute_statistics(points: &[u32]) -> Statistics {
    if points.is_empty() {
        return Statistics::empty();
    }

    let mut sorted = points.to_vec();
    sorted.sort_unstable();

    Statistics {
        mean: mean(&sorted),
        median: median(&sorted),
        mode: mode(&sorted),
    }
}

/// Convenience wrapper over [`compute_statistics`] for ledger values.
pub fn compute_points_statistics(points: impl IntoIterator<Item = Points>) -> Statistics {
    let raw: Vec<u32> = points.into_iter().map(Points::value).collect();
    compute_statistics(&raw)
}

fn mean(values: &[u32]) -> f64 {
    let sum: u64 = values.iter().copied().map(u64::from).sum();
    sum as f64 / values.len() as f64
}

fn median(sorted: &[u32]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        match (sorted.get(mid - 1), sorted.get(mid)) {
            (Some(lower), Some(upper)) => (f64::from(*lower) + f64::from(*upper)) / 2.0,
            _ => 0.0,
        }
    } else {
        sorted.get(mid).copied().map_or(0.0, f64::from)
    }
}

fn mode(values: &[u32]) -> Vec<u32> {
    let mut frequencies: BTreeMap<u32, usize> = BTreeMap::new();
    for value in values {
        *frequencies.entry(*value).or_default() += 1;
    }

    let Some(highest) = frequencies.values().copied().max() else {
        return Vec::new();
    };

    // BTreeMap iterates in ascending key order, so the result is sorted.
    frequencies
        .into_iter()
        .filter(|(_, count)| *count == highest)
        .map(|(value, _)| value)
        .collect()
}
