//! Deferred execution for component timers.
//!
//! Components never sleep. They ask a [`Scheduler`] to deliver a [`Timer`] after a delay and
//! apply the resulting [`FiredTimer`] when the owner hands it back. Two schedulers exist:
//!
//! - [`TokioScheduler`] runs one sleep task per timer and delivers fired timers over a channel.
//! - [`ManualScheduler`] keeps a virtual clock for tests and frame-driven hosts.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::particle::ParticleId;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// What a timer means to its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Clear the pressed state.
    PressReset,
    /// A particle reached the end of its lifetime.
    ParticleComplete(ParticleId),
}

/// A timer whose deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub timer: Timer,
    /// Scheduler time the timer was due at.
    pub deadline: Duration,
}

/// Deferred-execution service used by components.
pub trait Scheduler: Send {
    /// Time since the scheduler's epoch.
    fn now(&self) -> Duration;

    /// Arranges for `timer` to fire `delay` from now.
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle;

    /// Cancels a pending timer. Cancelling a timer that already fired only drops bookkeeping.
    fn cancel(&mut self, handle: TimerHandle);

    /// Cancels every pending timer.
    fn cancel_all(&mut self);
}

/// Scheduler backed by Tokio's timer wheel.
///
/// Each timer is a spawned task racing `sleep_until` against a cancellation token. The tokens are
/// children of one root token, so teardown is a single cancel.
pub struct TokioScheduler {
    runtime: Handle,
    epoch: Instant,
    next_handle: u64,
    root: CancellationToken,
    tokens: HashMap<TimerHandle, CancellationToken>,
    fired: mpsc::UnboundedSender<FiredTimer>,
}

/// Receiving end of a [`TokioScheduler`].
pub struct FiredTimers {
    rx: mpsc::UnboundedReceiver<FiredTimer>,
}

impl TokioScheduler {
    /// Creates a scheduler on the current Tokio runtime.
    pub fn new() -> Result<(Self, FiredTimers)> {
        let runtime = Handle::try_current()?;
        let (fired, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            epoch: Instant::now(),
            next_handle: 0,
            root: CancellationToken::new(),
            tokens: HashMap::new(),
            fired,
        };
        Ok((scheduler, FiredTimers { rx }))
    }

    /// Number of timers scheduled and not yet cancelled or acknowledged.
    pub fn tracked(&self) -> usize {
        self.tokens.len()
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let due = self.now() + delay;
        let deadline = self.epoch + due;
        let token = self.root.child_token();
        self.tokens.insert(handle, token.clone());

        let fired = self.fired.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    let _ = fired.send(FiredTimer { handle, timer, deadline: due });
                }
            }
        });

        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(token) = self.tokens.remove(&handle) {
            token.cancel();
        }
    }

    fn cancel_all(&mut self) {
        self.root.cancel();
        self.tokens.clear();
        self.root = CancellationToken::new();
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl FiredTimers {
    /// Waits for the next fired timer.
    pub async fn recv(&mut self) -> Option<FiredTimer> {
        self.rx.recv().await
    }

    /// Returns a fired timer if one is already waiting.
    pub fn try_recv(&mut self) -> Option<FiredTimer> {
        self.rx.try_recv().ok()
    }
}

/// Virtual-clock scheduler. Time only moves when the owner moves it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_handle: u64,
    queue: BTreeMap<(Duration, TimerHandle), Timer>,
    deadlines: HashMap<TimerHandle, Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pops the earliest timer due at or before `until` and moves the clock to its deadline.
    /// Timers sharing a deadline come out in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<FiredTimer> {
        let (&(deadline, handle), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let timer = self.queue.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);
        self.now = self.now.max(deadline);
        Some(FiredTimer {
            handle,
            timer,
            deadline,
        })
    }

    /// Moves the clock forward to `now`. The clock never runs backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let deadline = self.now + delay;
        self.queue.insert((deadline, handle), timer);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(deadline) = self.deadlines.remove(&handle) {
            self.queue.remove(&(deadline, handle));
        }
    }

    fn cancel_all(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}
