//! Server configuration from environment variables

use std::net::SocketAddr;
use std::str::FromStr;

use dash_core::retry::{RetryComposerConfig, DEFAULT_FEEDBACK_MAX_LEN};
use queue_feed::DEFAULT_FEED_CAPACITY;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub feed_capacity: usize,
    pub retry: RetryComposerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            feed_capacity: DEFAULT_FEED_CAPACITY,
            retry: RetryComposerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read `DASH_BIND_ADDR`, `DASH_FEED_CAPACITY` and `DASH_FEEDBACK_MAX_LEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_parse(&lookup, "DASH_BIND_ADDR", defaults.bind_addr),
            feed_capacity: env_parse(&lookup, "DASH_FEED_CAPACITY", DEFAULT_FEED_CAPACITY),
            retry: RetryComposerConfig {
                max_feedback_len: env_parse(
                    &lookup,
                    "DASH_FEEDBACK_MAX_LEN",
                    DEFAULT_FEEDBACK_MAX_LEN,
                ),
            },
        }
    }
}

fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
                default
            }
        },
        None => default,
    }
}
