//! Target resolution and timing configuration.
//! Used by: pinger, scheduler, main.

use std::collections::HashMap;
use std::time::Duration;

pub const SLUG_VAR: &str = "REPL_SLUG";
pub const OWNER_VAR: &str = "REPL_OWNER";

pub const DEFAULT_SLUG: &str = "discord-bot";
pub const DEFAULT_OWNER: &str = "tu-usuario";

const DOMAIN: &str = "repl.co";

/// Path of the health endpoint on the target.
pub const PING_PATH: &str = "/ping";

/// A source of named string settings.
///
/// Production reads the process environment on every call so that a change
/// takes effect on the next cycle; tests hand in a plain map.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env;

impl ConfigSource for Env {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

fn lookup(source: &dyn ConfigSource, key: &str, default: &str) -> String {
    source
        .get(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Builds `https://{slug}.{owner}.repl.co` from the two identifiers.
///
/// Never fails: missing or empty values fall back to the defaults and the
/// result is not checked for well-formedness here.
pub fn resolve_url(source: &dyn ConfigSource) -> String {
    let slug = lookup(source, SLUG_VAR, DEFAULT_SLUG);
    let owner = lookup(source, OWNER_VAR, DEFAULT_OWNER);
    format!("https://{}.{}.{}", slug, owner, DOMAIN)
}

/// Delays used by the loop and the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub interval: Duration,
    pub backoff: Duration,
    pub request_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            backoff: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Human phrasing of an interval for the banner, e.g. "5 minutes".
pub fn describe(d: Duration) -> String {
    let secs = d.as_secs();
    match secs {
        60 => "1 minute".into(),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".into(),
        s => format!("{} seconds", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    mod resolve {
        use super::*;

        #[test]
        fn uses_both_identifiers() {
            let s = source(&[(SLUG_VAR, "my-bot"), (OWNER_VAR, "alice")]);
            assert_eq!(resolve_url(&s), "https://my-bot.alice.repl.co");
        }

        #[test]
        fn defaults_when_unset() {
            let s = source(&[]);
            assert_eq!(resolve_url(&s), "https://discord-bot.tu-usuario.repl.co");
        }

        #[test]
        fn defaults_only_the_missing_one() {
            let s = source(&[(OWNER_VAR, "alice")]);
            assert_eq!(resolve_url(&s), "https://discord-bot.alice.repl.co");
        }

        #[test]
        fn empty_value_counts_as_unset() {
            let s = source(&[(SLUG_VAR, ""), (OWNER_VAR, "alice")]);
            assert_eq!(resolve_url(&s), "https://discord-bot.alice.repl.co");
        }

        #[test]
        fn deterministic() {
            let s = source(&[(SLUG_VAR, "a"), (OWNER_VAR, "b")]);
            assert_eq!(resolve_url(&s), resolve_url(&s));
        }

        #[test]
        fn each_input_changes_output() {
            let base = resolve_url(&source(&[(SLUG_VAR, "a"), (OWNER_VAR, "b")]));
            let slug = resolve_url(&source(&[(SLUG_VAR, "c"), (OWNER_VAR, "b")]));
            let owner = resolve_url(&source(&[(SLUG_VAR, "a"), (OWNER_VAR, "c")]));
            assert_ne!(base, slug);
            assert_ne!(base, owner);
        }

        #[test]
        fn unrelated_keys_ignored() {
            let a = source(&[(SLUG_VAR, "a"), (OWNER_VAR, "b")]);
            let b = source(&[(SLUG_VAR, "a"), (OWNER_VAR, "b"), ("PORT", "3000")]);
            assert_eq!(resolve_url(&a), resolve_url(&b));
        }

        #[test]
        fn no_validation() {
            let s = source(&[(SLUG_VAR, "has space"), (OWNER_VAR, "b")]);
            assert_eq!(resolve_url(&s), "https://has space.b.repl.co");
        }
    }

    #[test]
    fn default_timing() {
        let t = Timing::default();
        assert_eq!(t.interval, Duration::from_secs(300));
        assert_eq!(t.backoff, Duration::from_secs(30));
        assert_eq!(t.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn describe_intervals() {
        assert_eq!(describe(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe(Duration::from_secs(30)), "30 seconds");
        assert_eq!(describe(Duration::from_secs(1)), "1 second");
    }
}
