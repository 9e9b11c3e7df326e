//! Timers: periodic background work, countdowns and carousel rotation.
//!
//! A [`PeriodicTask`] owns its tokio task. Dropping the handle or calling
//! [`PeriodicTask::cancel`] aborts it, so no tick can run after the owner is
//! gone.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often clients should re-render a countdown.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Time each hero slide stays up before the carousel advances.
pub const CAROUSEL_INTERVAL: Duration = Duration::from_secs(5);

const SECONDS_PER_DAY: i64 = 86_400;

/// A repeating background job that stops when cancelled or dropped.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Run `tick` every `period`, starting one period from now.
    ///
    /// A tick that overruns delays the next one instead of bursting.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tracing::trace!(task = name, "Periodic tick");
                tick().await;
            }
        });
        tracing::debug!(task = name, ?period, "Periodic task started");
        Self { name, handle }
    }

    /// Stop the task. Safe to call more than once.
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            tracing::debug!(task = self.name, "Periodic task cancelled");
        }
    }

    /// Returns `true` once the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Time left until a deadline, broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub expired: bool,
}

/// Countdown to a fixed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    deadline: DateTime<Utc>,
}

impl Countdown {
    /// Count down to `deadline`.
    #[must_use]
    pub const fn new(deadline: DateTime<Utc>) -> Self {
        Self { deadline }
    }

    /// Count down to the next UTC midnight after `now`.
    #[must_use]
    pub fn until_end_of_day(now: DateTime<Utc>) -> Self {
        let next_midnight = (now.timestamp().div_euclid(SECONDS_PER_DAY) + 1) * SECONDS_PER_DAY;
        let deadline = DateTime::from_timestamp(next_midnight, 0)
            .unwrap_or_else(|| now + TimeDelta::days(1));
        Self::new(deadline)
    }

    /// The deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Remaining time at `now`, saturating at zero.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> CountdownSnapshot {
        let total = (self.deadline - now).num_seconds().max(0);
        CountdownSnapshot {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
            expired: total == 0,
        }
    }
}

/// Index of the visible slide in a rotating carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    /// A carousel over `len` slides, showing the first.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    /// Index of the visible slide; `None` when there are no slides.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        if self.len == 0 { None } else { Some(self.index) }
    }

    /// Move to the next slide, wrapping to the first after the last.
    pub const fn advance(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.index = (self.index + 1) % self.len;
        Some(self.index)
    }

    /// Jump to a slide; out-of-range indexes are ignored.
    pub const fn go_to(&mut self, index: usize) -> Option<usize> {
        if index < self.len {
            self.index = index;
        }
        self.current()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    use super::*;

    fn counting_task(period: Duration) -> (PeriodicTask, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let ticks = count.clone();
        let task = PeriodicTask::spawn("test", period, move || {
            let ticks = ticks.clone();
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, count)
    }

    #[tokio::test]
    async fn test_periodic_task_ticks() {
        let (task, count) = counting_task(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(count.load(Ordering::SeqCst) >= 2);
        task.cancel();
    }

    #[tokio::test]
    async fn test_cancelled_task_stops_ticking() {
        let (task, count) = counting_task(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(40)).await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let after_cancel = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
        assert!(task.is_finished());
    }

    #[tokio::test]
    async fn test_dropped_task_stops_ticking() {
        let (task, count) = counting_task(Duration::from_millis(10));
        drop(task);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_countdown_breakdown() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let deadline = now + TimeDelta::seconds(SECONDS_PER_DAY + 2 * 3_600 + 3 * 60 + 4);
        let snapshot = Countdown::new(deadline).remaining_at(now);
        assert_eq!(
            snapshot,
            CountdownSnapshot {
                days: 1,
                hours: 2,
                minutes: 3,
                seconds: 4,
                expired: false,
            }
        );
    }

    #[test]
    fn test_countdown_saturates_at_zero() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let snapshot = Countdown::new(now - TimeDelta::minutes(5)).remaining_at(now);
        assert!(snapshot.expired);
        assert_eq!(snapshot.seconds, 0);
        assert_eq!(snapshot.days, 0);
    }

    #[test]
    fn test_until_end_of_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 22, 30, 15).unwrap();
        let countdown = Countdown::until_end_of_day(now);
        assert_eq!(
            countdown.deadline(),
            Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
        );
        let snapshot = countdown.remaining_at(now);
        assert_eq!((snapshot.hours, snapshot.minutes, snapshot.seconds), (1, 29, 45));
    }

    #[test]
    fn test_carousel_wraps() {
        let mut carousel = Carousel::new(3);
        assert_eq!(carousel.current(), Some(0));
        assert_eq!(carousel.advance(), Some(1));
        assert_eq!(carousel.advance(), Some(2));
        assert_eq!(carousel.advance(), Some(0));
        assert_eq!(carousel.go_to(7), Some(0));
        assert_eq!(carousel.go_to(2), Some(2));
    }

    #[test]
    fn test_empty_carousel() {
        let mut carousel = Carousel::new(0);
        assert_eq!(carousel.current(), None);
        assert_eq!(carousel.advance(), None);
    }
}
