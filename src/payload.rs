//! Best-effort decoding of the `/ping` response body.
//! Used by: pinger.
//!
//! Nothing here fails. A body that is not JSON, or a field that is missing or
//! of an unexpected type, falls back to the default for display.

use serde::Deserialize;
use serde_json::Value;

const DEFAULT_LABEL: &str = "pong";

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    ping: Option<Value>,
    #[serde(default)]
    uptime: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    bot: Option<Value>,
}

/// Display fields pulled from a successful ping response.
#[derive(Debug, Clone, PartialEq)]
pub struct PingPayload {
    pub label: String,
    pub uptime_secs: u64,
    pub timestamp: Option<String>,
    pub bot: Option<String>,
}

impl Default for PingPayload {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.into(),
            uptime_secs: 0,
            timestamp: None,
            bot: None,
        }
    }
}

impl PingPayload {
    pub fn decode(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                if !body.is_empty() {
                    tracing::debug!(error = %e, "ping body is not json");
                }
                return Self::default();
            }
        };
        if !value.is_object() {
            tracing::debug!("ping body is not a json object");
            return Self::default();
        }
        let raw = match RawPayload::deserialize(value) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        Self {
            label: raw
                .ping
                .as_ref()
                .and_then(text)
                .unwrap_or_else(|| DEFAULT_LABEL.into()),
            uptime_secs: raw.uptime.as_ref().and_then(seconds).unwrap_or(0),
            timestamp: raw.timestamp.as_ref().and_then(text),
            bot: raw.bot.as_ref().and_then(text),
        }
    }
}

fn text(v: &Value) -> Option<String> {
    v.as_str().map(str::to_owned)
}

/// Non-negative numbers only; fractions are truncated.
fn seconds(v: &Value) -> Option<u64> {
    v.as_u64().or_else(|| {
        v.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_body() {
        let p = PingPayload::decode(br#"{"ping": "pong", "uptime": 123}"#);
        assert_eq!(p.label, "pong");
        assert_eq!(p.uptime_secs, 123);
    }

    #[test]
    fn empty_body_uses_defaults() {
        assert_eq!(PingPayload::decode(b""), PingPayload::default());
    }

    #[test]
    fn empty_object_uses_defaults() {
        let p = PingPayload::decode(b"{}");
        assert_eq!(p.label, "pong");
        assert_eq!(p.uptime_secs, 0);
    }

    #[test]
    fn non_json_uses_defaults() {
        assert_eq!(PingPayload::decode(b"OK"), PingPayload::default());
    }

    #[test]
    fn json_array_uses_defaults() {
        assert_eq!(PingPayload::decode(b"[1, 2]"), PingPayload::default());
    }

    #[test]
    fn custom_label() {
        let p = PingPayload::decode(br#"{"ping": "alive"}"#);
        assert_eq!(p.label, "alive");
        assert_eq!(p.uptime_secs, 0);
    }

    #[test]
    fn fractional_uptime_truncates() {
        let p = PingPayload::decode(br#"{"uptime": 12.9}"#);
        assert_eq!(p.uptime_secs, 12);
    }

    mod wrong_types {
        use super::*;

        #[test]
        fn uptime_as_string() {
            let p = PingPayload::decode(br#"{"uptime": "123"}"#);
            assert_eq!(p.uptime_secs, 0);
        }

        #[test]
        fn negative_uptime() {
            let p = PingPayload::decode(br#"{"uptime": -5}"#);
            assert_eq!(p.uptime_secs, 0);
        }

        #[test]
        fn ping_as_number() {
            let p = PingPayload::decode(br#"{"ping": 1}"#);
            assert_eq!(p.label, "pong");
        }

        #[test]
        fn null_fields() {
            let p = PingPayload::decode(br#"{"ping": null, "uptime": null}"#);
            assert_eq!(p, PingPayload::default());
        }
    }

    #[test]
    fn extra_fields_from_bot_endpoint() {
        let body = br#"{
            "ping": "pong",
            "timestamp": "2024-05-01T10:00:00.000Z",
            "uptime": 42,
            "bot": "Helper#1234"
        }"#;
        let p = PingPayload::decode(body);
        assert_eq!(p.uptime_secs, 42);
        assert_eq!(p.timestamp.as_deref(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(p.bot.as_deref(), Some("Helper#1234"));
    }
}
