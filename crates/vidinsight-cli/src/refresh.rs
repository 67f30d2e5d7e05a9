//! Auto-refresh timer for the result page.
//!
//! The repeating timer is an owned [`tokio::time::Interval`]; turning auto-refresh
//! off, or dropping the owner, drops the interval. Nothing runs in the background.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct AutoRefresh {
    period: Duration,
    interval: Option<Interval>,
}

impl AutoRefresh {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking one period from now. No-op when already enabled.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn enable(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        tracing::debug!(period_secs = self.period.as_secs_f64(), "Auto-refresh enabled");
    }

    pub fn disable(&mut self) {
        if self.interval.take().is_some() {
            tracing::debug!("Auto-refresh disabled");
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Begin a fresh period if enabled.
    pub fn restart(&mut self) {
        if self.is_enabled() {
            self.disable();
            self.enable();
        }
    }

    /// Resolves at the next tick. Never resolves while disabled.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready};

    #[test]
    fn disabled_timer_never_ticks() {
        let mut refresh = AutoRefresh::new(Duration::from_secs(10));
        let mut tick = tokio_test::task::spawn(refresh.tick());
        assert_pending!(tick.poll());
        assert_pending!(tick.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_one_period_after_enable() {
        let mut refresh = AutoRefresh::new(Duration::from_secs(10));
        refresh.enable();
        let started = Instant::now();

        refresh.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(10));

        refresh.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn enabling_twice_keeps_one_timer() {
        let mut refresh = AutoRefresh::new(Duration::from_secs(10));
        refresh.enable();
        tokio::time::advance(Duration::from_secs(6)).await;
        refresh.enable();

        let started = Instant::now();
        refresh.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn disable_releases_timer() {
        let mut refresh = AutoRefresh::new(Duration::from_secs(10));
        refresh.enable();
        assert!(refresh.is_enabled());
        refresh.disable();
        assert!(!refresh.is_enabled());

        tokio::time::advance(Duration::from_secs(60)).await;
        let mut tick = tokio_test::task::spawn(refresh.tick());
        assert_pending!(tick.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_begins_new_period() {
        let mut refresh = AutoRefresh::new(Duration::from_secs(10));
        refresh.enable();
        tokio::time::advance(Duration::from_secs(7)).await;
        refresh.restart();

        let started = Instant::now();
        {
            let mut tick = tokio_test::task::spawn(refresh.tick());
            assert_pending!(tick.poll());
        }
        tokio::time::advance(Duration::from_secs(10)).await;
        let mut tick = tokio_test::task::spawn(refresh.tick());
        assert_ready!(tick.poll());
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }
}
