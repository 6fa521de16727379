use std::time::Duration;

use crate::error::ClientError;

/// Backend used when `NOVACALL_BACKEND_URL` was not set at build time.
pub const FALLBACK_BACKEND_URL: &str = "http://localhost:8000";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TRANSCRIPT_LIMIT: usize = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend address baked in at compile time, falling back to the local dev server.
pub fn build_time_backend_url() -> &'static str {
    match option_env!("NOVACALL_BACKEND_URL") {
        Some(url) if !url.trim().is_empty() => url,
        _ => FALLBACK_BACKEND_URL,
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub transcript_limit: usize,
    pub timeout_secs: u64,
    pub max_consecutive_failures: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: build_time_backend_url().to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            transcript_limit: DEFAULT_TRANSCRIPT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_consecutive_failures: None,
        }
    }
}

impl ClientConfig {
    pub fn with_backend(mut self, url: &str) -> Self {
        if !url.trim().is_empty() {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval(),
            limit: self.transcript_limit,
            max_consecutive_failures: self.max_consecutive_failures,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ClientError::InvalidConfig("backend url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "backend url must start with http:// or https://: {}",
                url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ClientError::InvalidConfig("poll interval cannot be 0".to_string()));
        }
        if self.transcript_limit == 0 {
            return Err(ClientError::InvalidConfig("transcript limit cannot be 0".to_string()));
        }
        Ok(())
    }
}

/// The part of the configuration the transcript viewer needs.
#[derive(Clone, Debug)]
pub struct PollSettings {
    pub interval: Duration,
    pub limit: usize,
    pub max_consecutive_failures: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        ClientConfig::default().poll_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_polling_protocol() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert_eq!(cfg.transcript_limit, 200);
        assert!(cfg.max_consecutive_failures.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_override_keeps_current_backend() {
        let cfg = ClientConfig::default().with_backend("   ");
        assert_eq!(cfg.backend_url, build_time_backend_url());
        let cfg = cfg.with_backend(" http://calls.internal:9000 ");
        assert_eq!(cfg.backend_url, "http://calls.internal:9000");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = ClientConfig::default().with_backend("ftp://nope");
        assert!(matches!(cfg.validate(), Err(ClientError::InvalidConfig(_))));

        let cfg = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ClientConfig {
            transcript_limit: 0,
            ..ClientConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
