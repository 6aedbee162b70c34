//! # Demo simulator
//!
//! A toy block-occupancy simulation that serves the same `/metrics` and
//! `/timeline` payloads the dashboard polls, so `tcc watch` has something to
//! talk to without a real control system.
//!
//! Trains enter at fixed times and traverse the track blocks in order. Each
//! block holds one train at a time; a train that finds its next block
//! occupied waits, and waiting trains are admitted in request order. Every
//! request to the server runs a fresh simulation.

pub mod handler;

pub use handler::create_router;

use crate::feed::{MetricsSnapshot, TimelineEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Mutex;

/// Number of track blocks
pub const BLOCK_COUNT: usize = 3;

/// Simulated time at which the run stops
pub const DEFAULT_HORIZON: f64 = 50.0;

/// Alerts attached to every simulated metrics payload
pub const FIXED_ALERTS: [&str; 2] = [
    "Congestion detected near Block 2",
    "Express T1 given priority over Freight T2",
];

/// One train in the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSpec {
    pub id: &'static str,
    pub kind: &'static str,
    /// km/h; a block takes `uniform(2, 4) * 60 / speed` time units
    pub speed: f64,
    pub entry_time: f64,
}

/// Express, freight and passenger trains entering at t=0, 2 and 4.
pub fn default_roster() -> Vec<TrainSpec> {
    vec![
        TrainSpec {
            id: "T1",
            kind: "Express",
            speed: 60.0,
            entry_time: 0.0,
        },
        TrainSpec {
            id: "T2",
            kind: "Freight",
            speed: 40.0,
            entry_time: 2.0,
        },
        TrainSpec {
            id: "T3",
            kind: "Passenger",
            speed: 50.0,
            entry_time: 4.0,
        },
    ]
}

/// A train asking for a block. Ordered so the heap pops the earliest
/// request first, ties broken by arrival order.
#[derive(Debug)]
struct Request {
    time: f64,
    seq: u64,
    train: usize,
    block: usize,
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Request {}

impl PartialOrd for Request {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Request {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run one simulation and return the occupancy log in completion order.
///
/// Only occupancies that finish before `horizon` are logged. Times are
/// rounded to two decimals and blocks are numbered from 1.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    trains: &[TrainSpec],
    blocks: usize,
    horizon: f64,
) -> Vec<TimelineEvent> {
    let mut queue = BinaryHeap::new();
    let mut seq = 0u64;
    for (train, spec) in trains.iter().enumerate() {
        queue.push(Request {
            time: spec.entry_time,
            seq,
            train,
            block: 0,
        });
        seq += 1;
    }

    let mut block_free = vec![0.0_f64; blocks];
    let mut completed: Vec<(f64, u64, TimelineEvent)> = Vec::new();

    while let Some(req) = queue.pop() {
        if req.block >= blocks || req.time >= horizon {
            continue;
        }
        let spec = &trains[req.train];
        let start = req.time.max(block_free[req.block]);
        if start >= horizon {
            continue;
        }
        let travel = rng.random_range(2.0..4.0) * (60.0 / spec.speed);
        let end = start + travel;
        block_free[req.block] = end;

        if end >= horizon {
            continue;
        }

        tracing::trace!(
            train = spec.id,
            kind = spec.kind,
            block = req.block + 1,
            start,
            end,
            waited = start - req.time,
            "Block occupied"
        );
        completed.push((
            end,
            req.seq,
            TimelineEvent {
                train: spec.id.to_string(),
                start: round2(start),
                end: round2(end),
                block: (req.block + 1) as u32,
            },
        ));

        queue.push(Request {
            time: end,
            seq,
            train: req.train,
            block: req.block + 1,
        });
        seq += 1;
    }

    completed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    completed.into_iter().map(|(_, _, event)| event).collect()
}

/// Derive the metrics payload from an occupancy log.
///
/// `avg_delay` is the mean total occupancy per train. The other KPIs are
/// drawn at random within plausible bands.
pub fn calculate_metrics<R: Rng + ?Sized>(log: &[TimelineEvent], rng: &mut R) -> MetricsSnapshot {
    let mut occupancy: HashMap<&str, f64> = HashMap::new();
    for event in log {
        *occupancy.entry(event.train.as_str()).or_default() += event.end - event.start;
    }

    let active_trains = occupancy.len();
    let avg_delay = if active_trains == 0 {
        0.0
    } else {
        round2(occupancy.values().sum::<f64>() / active_trains as f64)
    };

    MetricsSnapshot {
        active_trains: active_trains as u32,
        on_time: f64::from(rng.random_range(70u32..=100)),
        avg_speed: f64::from(rng.random_range(50u32..=90)),
        efficiency: f64::from(rng.random_range(70u32..=95)),
        avg_delay,
        alerts: FIXED_ALERTS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Shared state of the simulator server.
#[derive(Debug)]
pub struct SimState {
    rng: Mutex<StdRng>,
    trains: Vec<TrainSpec>,
    horizon: f64,
}

impl SimState {
    /// Seeded state gives reproducible payloads; `None` seeds from the OS.
    pub fn new(seed: Option<u64>, horizon: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            trains: default_roster(),
            horizon,
        }
    }

    pub fn trains(&self) -> &[TrainSpec] {
        &self.trains
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Run a fresh simulation.
    pub fn timeline(&self) -> Vec<TimelineEvent> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        simulate(&mut *rng, &self.trains, BLOCK_COUNT, self.horizon)
    }

    /// Run a fresh simulation and summarize it.
    pub fn metrics(&self) -> MetricsSnapshot {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let log = simulate(&mut *rng, &self.trains, BLOCK_COUNT, self.horizon);
        calculate_metrics(&log, &mut *rng)
    }
}
