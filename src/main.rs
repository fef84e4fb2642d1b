//! repl-keepalive: keeps a hosted web process awake by pinging its health
//! endpoint every few minutes.
//! Used by: binary entrypoint.

pub mod config;
pub mod console;
pub mod error;
pub mod payload;
pub mod pinger;
pub mod scheduler;
pub mod shutdown;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use config::{Env, Timing};
use pinger::KeepAlive;
use scheduler::Scheduler;

const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Progress lines go to stdout through `console`; tracing stays on stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let timing = Timing::default();
    let probe = KeepAlive::new(Env, timing.request_timeout)?;
    let shutdown = shutdown::setup_shutdown_handler();

    Scheduler::new(Arc::new(probe), timing, shutdown)
        .run_forever()
        .await;
    Ok(())
}
