//! The keep-alive loop: ping, report, sleep, repeat until told to stop.
//! Used by: main.
//!
//! A cycle that ends with a failed ping waits the normal interval. A cycle
//! whose ping task errors or panics waits the shorter backoff. Only the
//! shutdown signal ends the loop, and it is honored mid-request and
//! mid-sleep.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Timing;
use crate::console;
use crate::error::{Error, Result};
use crate::shutdown::{ShutdownRx, Stop};

/// Something the loop can ping.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// The url the next ping will go to, for display.
    fn target(&self) -> String;

    /// `Ok(true)` when the target answered with success, `Ok(false)` for any
    /// expected failure. `Err` is reserved for the unexpected.
    async fn ping(&self) -> Result<bool>;
}

enum Step {
    Sleep(Duration),
    Stop(Stop),
}

pub struct Scheduler<P> {
    probe: Arc<P>,
    timing: Timing,
    shutdown: ShutdownRx,
    cycles: u64,
}

/// Resolves once a stop is published. Never resolves if the sender is gone
/// without having asked for one.
async fn shutdown_requested(rx: &mut ShutdownRx) -> Stop {
    let stop = match rx.wait_for(Option::is_some).await {
        Ok(stop) => *stop,
        Err(_) => None,
    };
    match stop {
        Some(stop) => stop,
        None => std::future::pending().await,
    }
}

impl<P: Probe> Scheduler<P> {
    pub fn new(probe: Arc<P>, timing: Timing, shutdown: ShutdownRx) -> Self {
        Self {
            probe,
            timing,
            shutdown,
            cycles: 0,
        }
    }

    /// Runs until shutdown is requested and returns what stopped it.
    pub async fn run_forever(mut self) -> Stop {
        // Resolved off-task like the ping, so a panicking probe cannot take
        // the loop down before it starts.
        let probe = Arc::clone(&self.probe);
        let target = match tokio::spawn(async move { probe.target() }).await {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(error = %e, "failed to resolve target for banner");
                "<unresolved>".into()
            }
        };
        console::print_banner(&target, self.timing.interval);
        tracing::info!(
            target_url = %target,
            interval_secs = self.timing.interval.as_secs(),
            "keep-alive started"
        );

        let stop = loop {
            let delay = match self.cycle().await {
                Step::Sleep(d) => d,
                Step::Stop(stop) => break stop,
            };
            if let Some(stop) = self.wait(delay).await {
                break stop;
            }
        };

        console::log_stopped(stop);
        tracing::info!(cycles = self.cycles, reason = ?stop, "keep-alive stopped");
        stop
    }

    async fn cycle(&mut self) -> Step {
        self.cycles += 1;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        console::log_cycle_start(&now, self.cycles);
        tracing::debug!(cycle = self.cycles, "cycle start");

        // The ping runs as its own task so a panic inside it is contained
        // and an in-flight request can be dropped on shutdown.
        let probe = Arc::clone(&self.probe);
        let mut task = tokio::spawn(async move { probe.ping().await });

        let joined = tokio::select! {
            res = &mut task => Ok(res),
            stop = shutdown_requested(&mut self.shutdown) => Err(stop),
        };
        let joined = match joined {
            Ok(joined) => joined,
            Err(stop) => {
                task.abort();
                return Step::Stop(stop);
            }
        };

        match joined.map_err(Error::from).and_then(|r| r) {
            Ok(true) => {
                console::log_kept_alive();
                console::log_sleeping(self.timing.interval);
                Step::Sleep(self.timing.interval)
            }
            Ok(false) => {
                console::log_failed_continuing();
                console::log_sleeping(self.timing.interval);
                Step::Sleep(self.timing.interval)
            }
            Err(e) => {
                tracing::error!(cycle = self.cycles, error = %e, "unexpected failure in keep-alive cycle");
                console::log_unexpected(&e.to_string());
                console::log_backoff(self.timing.backoff);
                Step::Sleep(self.timing.backoff)
            }
        }
    }

    /// Sleeps for `d`. Returns the stop request if it arrived first.
    async fn wait(&mut self, d: Duration) -> Option<Stop> {
        tokio::select! {
            _ = tokio::time::sleep(d) => None,
            stop = shutdown_requested(&mut self.shutdown) => Some(stop),
        }
    }
}
