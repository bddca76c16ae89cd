use serde::Deserialize;
use std::time::Duration;

/// Link issuance and redirect configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Base URL for constructing short URLs (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Maximum number of attempts to generate a unique short code
    pub short_code_max_attempts: u32,

    /// Delay of the simulated fraud check run before each click is recorded
    pub fraud_check_delay_ms: u64,
}

impl LinkConfig {
    pub fn fraud_check_delay(&self) -> Duration {
        Duration::from_millis(self.fraud_check_delay_ms)
    }

    /// Validate link configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() || self.base_url.ends_with('/') {
            return Err("BASE_URL must be non-empty and must not end with '/'".to_string());
        }

        if self.short_code_max_attempts < 1 || self.short_code_max_attempts > 100 {
            return Err("SHORT_CODE_MAX_ATTEMPTS must be between 1 and 100".to_string());
        }

        if self.fraud_check_delay_ms > 10_000 {
            return Err("FRAUD_CHECK_DELAY_MS must be at most 10000".to_string());
        }

        Ok(())
    }
}
