//! Async driver for a heart counter on the Tokio runtime.
//!
//! The counter itself never awaits. The dispatcher owns it together with the receiving side of
//! its scheduler and feeds fired timers back in, so hosts only call [`Dispatcher::tap`] and keep
//! one of the pump methods running.

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_stream::wrappers::BroadcastStream;

use crate::config::MicroExpConfig;
use crate::counter::{CounterEvent, CounterSnapshot, HeartCounter};
use crate::error::Result;
use crate::haptics::Haptics;
use crate::particle::ParticleId;
use crate::random::DirectionSource;
use crate::scheduler::{FiredTimer, FiredTimers, TokioScheduler};

pub struct Dispatcher {
    counter: HeartCounter<TokioScheduler>,
    fired: FiredTimers,
}

impl Dispatcher {
    /// Creates a dispatcher on the current runtime. Fails outside a Tokio runtime.
    pub fn new(config: &MicroExpConfig) -> Result<Self> {
        let (scheduler, fired) = TokioScheduler::new()?;
        let counter = HeartCounter::new(config.counter, scheduler).with_timeline(config.timeline);
        Ok(Self { counter, fired })
    }

    pub fn with_direction_source(mut self, source: impl DirectionSource + 'static) -> Self {
        self.counter = self.counter.with_direction_source(source);
        self
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.counter = self.counter.with_haptics(haptics);
        self
    }

    pub fn tap(&mut self) -> ParticleId {
        self.counter.increment()
    }

    pub fn counter(&self) -> &HeartCounter<TokioScheduler> {
        &self.counter
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        self.counter.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CounterEvent> {
        self.counter.subscribe()
    }

    /// Event stream for render loops. Lagged receivers skip ahead instead of failing; the stream
    /// ends once the counter is gone.
    pub fn event_stream(&self) -> impl Stream<Item = CounterEvent> + Send + 'static {
        let rx_stream = BroadcastStream::new(self.counter.subscribe());
        stream::unfold(rx_stream, |mut stream| async move {
            while let Some(next) = stream.next().await {
                match next {
                    Ok(ev) => return Some((ev, stream)),
                    Err(_) => continue,
                }
            }
            None
        })
    }

    /// Waits for the next timer and applies it. Returns `None` when nothing is pending.
    pub async fn pump(&mut self) -> Option<FiredTimer> {
        if !self.counter.has_pending_timers() {
            return None;
        }
        let fired = self.fired.recv().await?;
        self.counter.handle_timer(fired);
        Some(fired)
    }

    /// Applies timers as they fire for `duration`, then returns.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                fired = self.fired.recv() => match fired {
                    Some(fired) => self.counter.handle_timer(fired),
                    None => break,
                },
            }
        }
    }

    /// Applies timers until none are pending.
    pub async fn settle(&mut self) {
        while self.pump().await.is_some() {}
    }

    /// Tears the counter down, cancelling all pending timers.
    pub fn teardown(self) {
        self.counter.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedDirections;

    #[tokio::test(start_paused = true)]
    async fn test_settle_returns_immediately_when_idle() {
        let mut dispatcher = Dispatcher::new(&MicroExpConfig::default()).unwrap();
        assert!(dispatcher.pump().await.is_none());
        dispatcher.settle().await;
        assert_eq!(dispatcher.counter().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_stream_ends_after_teardown() {
        let mut dispatcher = Dispatcher::new(&MicroExpConfig::default())
            .unwrap()
            .with_direction_source(ScriptedDirections::new([crate::particle::Direction::Left]));
        let events = dispatcher.event_stream();
        dispatcher.tap();
        dispatcher.teardown();

        let collected: Vec<_> = events.collect().await;
        assert_eq!(collected.first(), Some(&CounterEvent::CountChanged { count: 1 }));
        assert_eq!(collected.last(), Some(&CounterEvent::TornDown));
        assert_eq!(collected.len(), 4);
    }
}
