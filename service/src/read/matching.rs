//! Matching of requested periods to available [`Painter`]s.

use std::time::Duration;

use common::{DateTime, Period};
use itertools::Itertools as _;

use crate::domain::Painter;
#[cfg(doc)]
use crate::domain::{painter::Score, Slot};

use super::slot::Candidate;

/// Maximum number of [`Alternative`]s proposed when no [`Candidate`] covers
/// a requested period.
pub const MAX_ALTERNATIVES: usize = 5;

/// How far behind a requested start [`alternatives()`] are looked for.
pub const LOOKBEHIND: Duration = Duration::from_secs(24 * 60 * 60);

/// How far ahead of a requested start [`alternatives()`] are looked for.
pub const LOOKAHEAD: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Picks the [`Candidate`] with the highest [`Score`].
///
/// Ties are won by the [`Candidate`] coming first.
#[must_use]
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        if best
            .as_ref()
            .map_or(true, |b| candidate.painter.score() > b.painter.score())
        {
            best = Some(candidate);
        }
    }
    best
}

/// Proposed replacement for an unservable requested period.
#[derive(Clone, Debug)]
pub struct Alternative {
    /// [`Painter`] available within the proposed [`Period`].
    pub painter: Painter,

    /// Proposed [`Period`], as long as the requested one, starting when the
    /// [`Painter`]'s [`Slot`] does.
    pub window: Period,

    /// Distance between the proposed start and the requested one, in minutes
    /// rounded to the nearest one.
    pub distance_minutes: u64,
}

/// Ranks the given [`Candidate`]s as [`Alternative`]s to the requested
/// `window`.
///
/// Only [`Slot`]s long enough to fit the whole `window` are proposed,
/// nearest-starting first, [`MAX_ALTERNATIVES`] at most.
#[must_use]
pub fn alternatives(
    candidates: Vec<Candidate>,
    window: Period,
) -> Vec<Alternative> {
    let duration = window.duration();
    candidates
        .into_iter()
        .filter(|c| c.slot.window.duration() >= duration)
        .filter_map(|Candidate { painter, slot }| {
            let start = slot.window.start().coerce();
            Period::new(start, start + duration).map(|proposed| Alternative {
                painter,
                window: proposed,
                distance_minutes: distance_minutes(start, window.start()),
            })
        })
        .sorted_by_key(|a| a.distance_minutes)
        .take(MAX_ALTERNATIVES)
        .collect()
}

/// Returns the distance between the two [`DateTime`]s in minutes, rounded to
/// the nearest one.
fn distance_minutes(a: DateTime, b: DateTime) -> u64 {
    let diff = if a > b { a - b } else { b - a };
    (diff.as_secs() + 30) / 60
}
