//! One health-check request against the target and its interpretation.
//! Used by: scheduler, main.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::{resolve_url, ConfigSource, PING_PATH};
use crate::console;
use crate::error::Result;
use crate::payload::PingPayload;
use crate::scheduler::Probe;

const USER_AGENT: &str = concat!("repl-keepalive/", env!("CARGO_PKG_VERSION"));

/// What a single ping came back with. Every variant is an expected result.
#[derive(Debug, Clone, PartialEq)]
pub enum PingOutcome {
    Alive(PingPayload),
    Status(u16),
    Transport(String),
}

impl PingOutcome {
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive(_))
    }
}

/// Client shared by every cycle. `timeout` bounds connect plus response.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

fn ping_url(base_url: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        PING_PATH
    ))?)
}

fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".into()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

async fn request(client: &Client, base_url: &str) -> PingOutcome {
    // A target that cannot form a url is a misconfiguration the next
    // cycle may already have fixed, so it fails like any unreachable host.
    let url = match ping_url(base_url) {
        Ok(url) => url,
        Err(e) => return PingOutcome::Transport(e.to_string()),
    };
    console::log_ping_attempt(url.as_str());

    match client.get(url).send().await {
        Ok(resp) if resp.status() == StatusCode::OK => match resp.bytes().await {
            Ok(body) => PingOutcome::Alive(PingPayload::decode(&body)),
            Err(e) => PingOutcome::Transport(describe_transport(&e)),
        },
        Ok(resp) => PingOutcome::Status(resp.status().as_u16()),
        Err(e) => PingOutcome::Transport(describe_transport(&e)),
    }
}

/// Sends one GET to `<base_url>/ping` and reports the result on the console.
///
/// Never fails: a non-200 response, a transport error and a base url that
/// cannot be requested all come back as a failed outcome.
pub async fn ping_once(client: &Client, base_url: &str) -> PingOutcome {
    let outcome = request(client, base_url).await;

    match &outcome {
        PingOutcome::Alive(payload) => {
            tracing::info!(label = %payload.label, uptime = payload.uptime_secs, "ping ok");
            console::log_ping_ok(payload);
        }
        PingOutcome::Status(code) => {
            tracing::warn!(status = *code, "ping returned non-success status");
            console::log_http_status(*code);
        }
        PingOutcome::Transport(detail) => {
            tracing::warn!(error = %detail, "ping transport failure");
            console::log_ping_error(detail);
        }
    }

    outcome
}

/// Pings whatever target the config source names at call time.
pub struct KeepAlive<S> {
    client: Client,
    source: S,
}

impl<S: ConfigSource> KeepAlive<S> {
    pub fn new(source: S, request_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(request_timeout)?,
            source,
        })
    }
}

#[async_trait]
impl<S: ConfigSource + 'static> Probe for KeepAlive<S> {
    fn target(&self) -> String {
        resolve_url(&self.source)
    }

    async fn ping(&self) -> Result<bool> {
        let base = resolve_url(&self.source);
        Ok(ping_once(&self.client, &base).await.is_alive())
    }
}
