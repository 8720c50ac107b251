//! Pairs a day's punches into work intervals and sums worked time.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::warn;

/// A closed work interval: an IN punch followed by the next OUT punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Pause between two consecutive intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// How much shorter than the minimum break this gap was (zero if compliant).
    pub shortfall: TimeDelta,
}

impl Gap {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkIntervals {
    pub intervals: Vec<Interval>,
    pub gaps: Vec<Gap>,
    /// Sum of interval durations before any break penalty.
    pub raw_worked: TimeDelta,
    /// Total deducted for breaks shorter than the minimum.
    pub break_penalty: TimeDelta,
    /// `raw_worked - break_penalty`. Not floored: it may go below zero.
    pub worked: TimeDelta,
    /// Set when the punch count was odd and the last punch was ignored.
    pub dropped: Option<NaiveDateTime>,
}

impl WorkIntervals {
    pub fn has_dropped_punch(&self) -> bool {
        self.dropped.is_some()
    }
}

/// Build intervals from punches already sorted ascending.
///
/// Punches are paired by position: (0,1), (2,3), ... An odd trailing punch is
/// dropped with a warning. Every gap between consecutive intervals shorter
/// than `min_break` deducts `min_break - gap` from the worked time.
pub fn compute(punches: &[NaiveDateTime], min_break: TimeDelta) -> WorkIntervals {
    if punches.is_empty() {
        return WorkIntervals::default();
    }

    let (paired, dropped) = if punches.len() % 2 != 0 {
        let last = punches[punches.len() - 1];
        warn!(
            date = %last.date(),
            count = punches.len(),
            "odd number of punches; ignoring the last one at {}",
            last.format("%H:%M")
        );
        (&punches[..punches.len() - 1], Some(last))
    } else {
        (punches, None)
    };

    let intervals: Vec<Interval> = paired
        .chunks_exact(2)
        .map(|p| Interval {
            start: p[0],
            end: p[1],
        })
        .collect();

    let raw_worked = intervals
        .iter()
        .fold(TimeDelta::zero(), |acc, i| acc + i.duration());

    let gaps: Vec<Gap> = intervals
        .windows(2)
        .map(|w| {
            let gap = w[1].start - w[0].end;
            let shortfall = if gap < min_break {
                min_break - gap
            } else {
                TimeDelta::zero()
            };
            Gap {
                start: w[0].end,
                end: w[1].start,
                shortfall,
            }
        })
        .collect();

    let break_penalty = gaps
        .iter()
        .fold(TimeDelta::zero(), |acc, g| acc + g.shortfall);

    WorkIntervals {
        intervals,
        gaps,
        raw_worked,
        break_penalty,
        worked: raw_worked - break_penalty,
        dropped,
    }
}
