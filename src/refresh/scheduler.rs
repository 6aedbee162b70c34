//! Recurring timers with cancellation and overlap control.
//!
//! Each timer runs its job on a separate task so a slow job never delays
//! the cadence. A per-timer gate enforces the [`OverlapPolicy`]: at most one
//! job per timer is in flight, and a tick that arrives while one is running
//! is either dropped or remembered once.

use crate::config::OverlapPolicy;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Counters for one timer
#[derive(Debug, Default)]
pub struct TimerStats {
    /// Jobs started
    pub runs: AtomicU64,
    /// Ticks dropped because a job was in flight
    pub skipped: AtomicU64,
    /// Ticks deferred until the running job finished
    pub queued: AtomicU64,
}

impl TimerStats {
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }
}

/// In-flight guard shared by a timer loop and its job tasks
#[derive(Debug)]
struct Gate {
    name: &'static str,
    policy: OverlapPolicy,
    in_flight: AtomicBool,
    pending: AtomicBool,
    stats: Arc<TimerStats>,
}

impl Gate {
    /// Try to claim the gate for a new run. Records skip/queue otherwise.
    fn claim(&self) -> bool {
        if !self.in_flight.swap(true, Ordering::AcqRel) {
            return true;
        }
        match self.policy {
            OverlapPolicy::Skip => {
                self.stats.skipped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(timer = self.name, "Previous run in flight, tick skipped");
            }
            OverlapPolicy::Queue => {
                if !self.pending.swap(true, Ordering::AcqRel) {
                    self.stats.queued.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(timer = self.name, "Previous run in flight, tick queued");
                }
            }
        }
        false
    }

    /// Called when a run ends. Returns true if a queued tick should run now.
    fn release(&self) -> bool {
        if self.pending.swap(false, Ordering::AcqRel) {
            return true;
        }
        self.in_flight.store(false, Ordering::Release);
        // A tick may have queued itself between the swap and the store.
        self.pending.swap(false, Ordering::AcqRel) && !self.in_flight.swap(true, Ordering::AcqRel)
    }
}

/// Handle to one running timer
#[derive(Debug)]
pub struct TimerHandle {
    name: &'static str,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    stats: Arc<TimerStats>,
}

impl TimerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stats(&self) -> &TimerStats {
        &self.stats
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Owns every recurring timer of the refresh loop.
#[derive(Debug)]
pub struct Scheduler {
    root: CancellationToken,
    tracker: TaskTracker,
    timers: Vec<TimerHandle>,
}

impl Scheduler {
    /// Create a scheduler whose timers stop when `root` is cancelled.
    pub fn new(root: CancellationToken) -> Self {
        Self {
            root,
            tracker: TaskTracker::new(),
            timers: Vec::new(),
        }
    }

    /// Run `job` every `period`, first immediately when `immediate` is set.
    pub fn every<F, Fut>(
        &mut self,
        name: &'static str,
        period: Duration,
        policy: OverlapPolicy,
        immediate: bool,
        job: F,
    ) -> &TimerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.root.child_token();
        let stats = Arc::new(TimerStats::default());
        let gate = Arc::new(Gate {
            name,
            policy,
            in_flight: AtomicBool::new(false),
            pending: AtomicBool::new(false),
            stats: Arc::clone(&stats),
        });
        let job = Arc::new(job);
        let tracker = self.tracker.clone();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            if !immediate {
                // First tick of a tokio interval completes immediately
                interval.tick().await;
            }

            tracing::debug!(timer = name, period_ms = period.as_millis() as u64, "Timer started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(timer = name, "Timer cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if gate.claim() {
                            spawn_run(&tracker, Arc::clone(&gate), Arc::clone(&job), token.clone());
                        }
                    }
                }
            }
        });

        self.timers.push(TimerHandle {
            name,
            cancel,
            handle,
            stats,
        });
        // Just pushed
        &self.timers[self.timers.len() - 1]
    }

    pub fn timers(&self) -> &[TimerHandle] {
        &self.timers
    }

    pub fn timer(&self, name: &str) -> Option<&TimerHandle> {
        self.timers.iter().find(|t| t.name == name)
    }

    /// Stop one timer. Its in-flight job is abandoned at its next await.
    pub fn cancel(&self, name: &str) -> bool {
        match self.timer(name) {
            Some(timer) => {
                timer.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel everything and wait for timer loops and in-flight jobs.
    pub async fn shutdown(self) {
        self.root.cancel();
        for timer in self.timers {
            if let Err(e) = timer.handle.await {
                tracing::warn!(timer = timer.name, error = %e, "Timer task ended abnormally");
            }
        }
        self.tracker.close();
        self.tracker.wait().await;
        tracing::debug!("Scheduler stopped");
    }
}

fn spawn_run<F, Fut>(
    tracker: &TaskTracker,
    gate: Arc<Gate>,
    job: Arc<F>,
    token: CancellationToken,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tracker.spawn(async move {
        loop {
            gate.stats.runs.fetch_add(1, Ordering::Relaxed);
            tokio::select! {
                _ = token.cancelled() => {
                    gate.in_flight.store(false, Ordering::Release);
                    return;
                }
                _ = (*job)() => {}
            }
            if !gate.release() {
                return;
            }
        }
    });
}
