//! Unified error types for the keep-alive loop.
//! Used by: config, pinger, scheduler, main.
//!
//! Only failures the loop does not expect reach the scheduler as an `Error`.
//! A non-200 status, a transport error or an unparseable target url is an
//! ordinary `PingOutcome`.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid target url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("ping task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
