// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::logservice::ENDPOINT_SUFFIX;
use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Operator configuration loaded once from environment variables at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Log service region, e.g. `cn-shanghai`
    pub region: String,
    pub credentials: Credentials,
    /// `http` or `https`
    pub scheme: String,
    /// Log service endpoint without project prefix, e.g. `cn-shanghai.log.aliyuncs.com`
    pub endpoint: String,
    /// Only watch LogProjects in this namespace when set
    pub watch_namespace: Option<String>,
    /// Delay before a failed reconciliation is retried
    pub error_requeue: Duration,
    /// Periodic re-check of healthy LogProjects; `None` waits for changes
    pub resync_interval: Option<Duration>,
}

/// Access key pair for the log service
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("security_token", &self.security_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} environment variable not set", key))
        };

        let region = required("REGION")?;
        let credentials = Credentials {
            access_key_id: required("ALICLOUD_ACCESS_KEY")?,
            access_key_secret: required("ALICLOUD_SECRET_KEY")?,
            security_token: lookup("ALICLOUD_SECURITY_TOKEN").filter(|v| !v.is_empty()),
        };

        let (scheme, endpoint) = match lookup("LOGSERVICE_ENDPOINT").filter(|v| !v.is_empty()) {
            Some(endpoint) => split_endpoint(&endpoint),
            None => (
                "https".to_string(),
                format!("{}.{}", region, ENDPOINT_SUFFIX),
            ),
        };

        let error_requeue = match lookup("ERROR_REQUEUE_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("ERROR_REQUEUE_SECS is not a number: {}", v))?,
            None => DEFAULT_ERROR_REQUEUE_SECS,
        };

        let resync_interval = lookup("RESYNC_INTERVAL_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .with_context(|| format!("RESYNC_INTERVAL_SECS is not a number: {}", v))
            })
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Config {
            region,
            credentials,
            scheme,
            endpoint,
            watch_namespace: lookup("WATCH_NAMESPACE").filter(|v| !v.is_empty()),
            error_requeue: Duration::from_secs(error_requeue),
            resync_interval,
        })
    }
}

/// Split `scheme://host[:port]` into scheme and host, defaulting to https
fn split_endpoint(endpoint: &str) -> (String, String) {
    let endpoint = endpoint.trim_end_matches('/');
    match endpoint.split_once("://") {
        Some((scheme, host)) => (scheme.to_string(), host.to_string()),
        None => ("https".to_string(), endpoint.to_string()),
    }
}
