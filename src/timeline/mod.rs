//! Timeline grouping and chart plumbing.
//!
//! Raw occupancy events are grouped into one series per train, which the
//! chart collaborator turns into a horizontal bar (Gantt) view.

pub mod chart;

pub use chart::{Chart, ChartFactory, ChartSlot, GanttChart, GanttFactory};

use crate::feed::TimelineEvent;
use serde::Serialize;

/// One bar: a train holding a block from `x[0]` to `x[1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub x: [f64; 2],
    pub y: String,
    pub block: u32,
}

impl BarSegment {
    pub fn start(&self) -> f64 {
        self.x[0]
    }

    pub fn end(&self) -> f64 {
        self.x[1]
    }

    /// Hover text, e.g. `Block 2 | 3.5 → 6.12`
    pub fn tooltip(&self) -> String {
        format!("Block {} | {} → {}", self.block, self.x[0], self.x[1])
    }
}

impl From<&TimelineEvent> for BarSegment {
    fn from(event: &TimelineEvent) -> Self {
        Self {
            x: [event.start, event.end],
            y: event.train.clone(),
            block: event.block,
        }
    }
}

/// All bars for one train, in the order the events arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainSeries {
    pub train: String,
    pub segments: Vec<BarSegment>,
}

/// Group events by train.
///
/// Series appear in first-seen order and keep their events in input order.
/// Events with `start > end` (or non-finite times) are dropped.
pub fn group_by_train(events: &[TimelineEvent]) -> Vec<TrainSeries> {
    let mut series: Vec<TrainSeries> = Vec::new();

    for event in events {
        if !event.start.is_finite() || !event.end.is_finite() || event.start > event.end {
            tracing::warn!(
                train = %event.train,
                block = event.block,
                start = event.start,
                end = event.end,
                "Dropping timeline event with invalid interval"
            );
            continue;
        }

        match series.iter_mut().find(|s| s.train == event.train) {
            Some(existing) => existing.segments.push(BarSegment::from(event)),
            None => series.push(TrainSeries {
                train: event.train.clone(),
                segments: vec![BarSegment::from(event)],
            }),
        }
    }

    series
}

/// Earliest start and latest end across all series.
pub fn time_span(series: &[TrainSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.segments.iter())
        .fold(None, |acc, seg| match acc {
            None => Some((seg.start(), seg.end())),
            Some((lo, hi)) => Some((lo.min(seg.start()), hi.max(seg.end()))),
        })
}
