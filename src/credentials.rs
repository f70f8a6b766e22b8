use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::errors::ForwardError;

pub const REST_URL_VAR: &str = "SUPABASE_REST_URL";
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const TIMEOUT_VAR: &str = "SUPABASE_REST_TIMEOUT_SECS";

/// Endpoint and secret the forwarder authenticates with.
pub struct Credentials {
    pub rest_url: String,
    pub service_key: String,
}

// keep the key out of logs and panics
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("rest_url", &self.rest_url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Both values must be present and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, ForwardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rest_url = lookup(REST_URL_VAR).filter(|it| !it.is_empty());
        let service_key = lookup(SERVICE_KEY_VAR).filter(|it| !it.is_empty());
        match (rest_url, service_key) {
            (Some(rest_url), Some(service_key)) => Ok(Credentials { rest_url, service_key }),
            _ => Err(ForwardError::configuration(format!(
                "Missing {} or {}",
                REST_URL_VAR, SERVICE_KEY_VAR
            ))),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        return format!(
            "{}/{}",
            self.rest_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
    }
}

/// Knobs for the blocking client. The default never times out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn from_lookup<F>(lookup: F) -> Result<ClientOptions, ForwardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout = match lookup(TIMEOUT_VAR) {
            None => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ForwardError::configuration(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        TIMEOUT_VAR, raw
                    )))
                }
            },
        };
        Ok(ClientOptions { timeout })
    }
}
