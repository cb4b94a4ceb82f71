//! Periodic refresh loop.
//!
//! Drives a refresh function on a fixed cadence with a little jitter so
//! several hearth instances behind one router do not stampede their
//! upstreams in lockstep. Failures are logged and counted; the loop never
//! stops on its own.

use std::time::Duration;

use tracing::{debug, info, warn};

/// Refresh loop configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Base interval between refreshes.
    pub interval: Duration,
    /// Maximum jitter to add to the interval (as fraction 0.0-1.0).
    pub jitter_fraction: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            jitter_fraction: 0.1,
        }
    }
}

impl RefreshConfig {
    /// Creates a config with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Builder: set jitter fraction.
    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Calculates the next delay with jitter applied.
    pub fn next_delay(&self) -> Duration {
        let base = self.interval.as_secs_f64();
        let jitter = rand_jitter(base * self.jitter_fraction);
        Duration::from_secs_f64((base + jitter).max(0.0))
    }
}

/// Simple pseudo-random jitter generator.
/// Uses the current time to generate a value in [-range, range].
fn rand_jitter(range: f64) -> f64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    let fraction = (nanos as f64) / 1_000_000_000.0;
    (fraction * 2.0 - 1.0) * range
}

/// A named periodic refresh driver.
pub struct RefreshLoop {
    name: &'static str,
    config: RefreshConfig,
    consecutive_failures: u32,
}

impl RefreshLoop {
    /// Creates a loop with the given name (for logs) and cadence.
    pub fn new(name: &'static str, config: RefreshConfig) -> Self {
        Self {
            name,
            config,
            consecutive_failures: 0,
        }
    }

    /// Runs forever: one refresh immediately, then one per interval.
    ///
    /// The refresh function reports failure as an error message; failures
    /// are logged and do not change the cadence, since the pipelines
    /// already degrade to smaller or staler results on their own.
    pub async fn run<F, Fut>(mut self, refresh_fn: F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        info!(
            task = self.name,
            interval_secs = self.config.interval.as_secs(),
            "refresh loop started"
        );

        loop {
            self.tick(&refresh_fn).await;

            let delay = self.config.next_delay();
            debug!(task = self.name, delay_secs = delay.as_secs(), "next refresh scheduled");
            tokio::time::sleep(delay).await;
        }
    }

    async fn tick<F, Fut>(&mut self, refresh_fn: &F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        match refresh_fn().await {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    info!(
                        task = self.name,
                        after_failures = self.consecutive_failures,
                        "refresh recovered"
                    );
                }
                self.consecutive_failures = 0;
            }
            Err(error) => {
                self.consecutive_failures += 1;
                warn!(
                    task = self.name,
                    failures = self.consecutive_failures,
                    error = %error,
                    "refresh failed"
                );
            }
        }
    }
}
