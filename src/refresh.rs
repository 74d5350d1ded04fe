//! Fixed-period quote refresh
//!
//! Driven from the UI frame loop: the app asks [`RefreshLoop::due`] every
//! frame, runs [`RefreshLoop::tick`] when it is, and sleeps the event loop
//! for [`RefreshLoop::time_until_next`]. There is no backoff; a failed tick
//! simply shows the placeholder until the next one.

use std::time::{Duration, Instant};

use tokio::runtime::Runtime;

use crate::core::{QuoteDisplay, TickerCode};
use crate::quote::{QuoteError, QuoteSource};

/// Delay between two refreshes
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

pub struct RefreshLoop {
    interval: Duration,
    next_due: Option<Instant>,
    display: QuoteDisplay,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            display: QuoteDisplay::Loading,
        }
    }

    /// What the overlay should show right now
    pub fn display(&self) -> &QuoteDisplay {
        &self.display
    }

    /// Whether a tick should run at `now`. True before the first tick.
    pub fn due(&self, now: Instant) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    /// Make the next call to [`due`](Self::due) return true
    pub fn force(&mut self) {
        self.next_due = None;
    }

    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }

    /// Fetch synchronously on the calling thread and render the outcome
    pub fn tick(
        &mut self,
        runtime: &Runtime,
        source: &dyn QuoteSource,
        ticker: &TickerCode,
        now: Instant,
    ) -> &QuoteDisplay {
        let outcome = runtime.block_on(source.fetch(ticker));
        self.record(ticker, outcome, now)
    }

    /// Render a fetch outcome and schedule the next tick
    pub fn record(
        &mut self,
        ticker: &TickerCode,
        outcome: Result<Option<f64>, QuoteError>,
        now: Instant,
    ) -> &QuoteDisplay {
        self.display = match outcome {
            Ok(Some(percent)) => QuoteDisplay::change(ticker, percent),
            Ok(None) => {
                tracing::debug!("No quote in response for {}", ticker);
                QuoteDisplay::Unavailable
            }
            Err(e) => {
                tracing::debug!("Quote refresh for {} failed: {}", ticker, e);
                QuoteDisplay::Unavailable
            }
        };
        self.next_due = Some(now + self.interval);
        &self.display
    }
}

impl Default for RefreshLoop {
    fn default() -> Self {
        Self::new(REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuoteSnapshot;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ticker() -> TickerCode {
        TickerCode::new("sh600000")
    }

    #[test]
    fn test_due_before_first_tick() {
        let refresh = RefreshLoop::default();
        assert!(refresh.due(Instant::now()));
        assert_eq!(refresh.display(), &QuoteDisplay::Loading);
        assert_eq!(refresh.time_until_next(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_record_schedules_next_tick() {
        let mut refresh = RefreshLoop::default();
        let now = Instant::now();

        refresh.record(&ticker(), Ok(Some(5.0)), now);

        assert!(!refresh.due(now));
        assert!(!refresh.due(now + Duration::from_millis(4999)));
        assert!(refresh.due(now + REFRESH_INTERVAL));
        assert_eq!(refresh.time_until_next(now), REFRESH_INTERVAL);
    }

    #[test]
    fn test_failure_shows_placeholder_and_still_reschedules() {
        let mut refresh = RefreshLoop::default();
        let now = Instant::now();

        let display = refresh.record(&ticker(), Err(QuoteError::Status(502)), now);
        assert_eq!(display.text(), "--");
        assert!(!refresh.due(now));

        let display = refresh.record(&ticker(), Ok(None), now);
        assert_eq!(display, &QuoteDisplay::Unavailable);
    }

    #[test]
    fn test_success_after_failure_recovers() {
        let mut refresh = RefreshLoop::default();
        let now = Instant::now();

        refresh.record(&ticker(), Err(QuoteError::Parse("bad".into())), now);
        let display = refresh.record(&ticker(), Ok(Some(-5.0)), now + REFRESH_INTERVAL);
        assert_eq!(display.text(), "600000\n#5.00^");
    }

    #[test]
    fn test_force_makes_tick_due() {
        let mut refresh = RefreshLoop::default();
        let now = Instant::now();
        refresh.record(&ticker(), Ok(Some(1.0)), now);

        refresh.force();
        assert!(refresh.due(now));
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteSource for CountingSource {
        async fn fetch_snapshot(&self, _ticker: &TickerCode) -> Result<Option<QuoteSnapshot>, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(QuoteSnapshot::new(10.5, 10.0)))
        }
    }

    #[test]
    fn test_tick_blocks_on_source() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let mut refresh = RefreshLoop::default();

        let display = refresh.tick(&runtime, &source, &ticker(), Instant::now());

        assert_eq!(display.text(), "600000\n*5.00^");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
