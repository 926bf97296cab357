//! Process configuration, read once from the environment at start-up.

use core::str::FromStr;
use std::net::SocketAddr;

use anyhow::{Context, anyhow};
use axum::http::HeaderName;

/// How the guard reads a caller's ownership graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipReads {
    /// One read of workouts with nested exercises.
    #[default]
    Hierarchical,
    /// Workouts first, then exercises per workout.
    Sequential,
}

impl FromStr for OwnershipReads {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical" => Ok(OwnershipReads::Hierarchical),
            "sequential" => Ok(OwnershipReads::Sequential),
            other => Err(anyhow!(
                "OWNERSHIP_READS '{other}' must be 'hierarchical' or 'sequential'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `BIND_ADDR`, default `0.0.0.0:8080`.
    pub bind_addr: SocketAddr,
    /// `CALLER_HEADER`: header the upstream authenticator fills with the caller's id.
    pub caller_header: HeaderName,
    /// `OWNERSHIP_READS`
    pub ownership_reads: OwnershipReads,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            caller_header: HeaderName::from_static("x-caller-id"),
            ownership_reads: OwnershipReads::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults;
    /// set-but-invalid keys are an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BIND_ADDR") {
            config.bind_addr = raw
                .trim()
                .parse()
                .with_context(|| format!("BIND_ADDR '{raw}' is not a socket address"))?;
        } else {
            tracing::warn!("BIND_ADDR not set; using {}", config.bind_addr);
        }

        if let Some(raw) = lookup("CALLER_HEADER") {
            config.caller_header = HeaderName::from_bytes(raw.trim().to_ascii_lowercase().as_bytes())
                .with_context(|| format!("CALLER_HEADER '{raw}' is not a valid header name"))?;
        } else {
            tracing::warn!("CALLER_HEADER not set; using {}", config.caller_header);
        }

        if let Some(raw) = lookup("OWNERSHIP_READS") {
            config.ownership_reads = raw.parse()?;
        } else {
            tracing::warn!("OWNERSHIP_READS not set; using {:?}", config.ownership_reads);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.caller_header.as_str(), "x-caller-id");
        assert_eq!(config.ownership_reads, OwnershipReads::Hierarchical);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("CALLER_HEADER", "X-Authenticated-User"),
            ("OWNERSHIP_READS", "sequential"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.caller_header.as_str(), "x-authenticated-user");
        assert_eq!(config.ownership_reads, OwnershipReads::Sequential);
    }

    #[test]
    fn invalid_values_fail_start_up() {
        assert!(ApiConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("CALLER_HEADER", "bad header")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("OWNERSHIP_READS", "cached")])).is_err());
    }
}
