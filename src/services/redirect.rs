use crate::error::{AppError, AppResult};
use crate::models::Link;
use crate::services::short_code::is_well_formed_code;
use crate::store::LinkStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of validating a click before it is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickVerdict {
    Approved,
    Rejected { reason: String },
}

/// Validation step run between resolving a link and recording its click.
///
/// This is the redirect path's only suspension point, so implementations must
/// wait asynchronously rather than block the worker thread.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickValidator: Send + Sync {
    async fn validate(&self, link: &Link) -> ClickVerdict;
}

/// Stand-in fraud check: waits a fixed delay, then approves every click.
#[derive(Debug, Clone)]
pub struct SimulatedFraudCheck {
    delay: Duration,
}

impl SimulatedFraudCheck {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedFraudCheck {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl ClickValidator for SimulatedFraudCheck {
    async fn validate(&self, _link: &Link) -> ClickVerdict {
        tokio::time::sleep(self.delay).await;
        ClickVerdict::Approved
    }
}

/// Resolves short codes and records a click for each successful redirect.
#[derive(Clone)]
pub struct RedirectService {
    store: Arc<dyn LinkStore>,
    validator: Arc<dyn ClickValidator>,
}

impl RedirectService {
    pub fn new(store: Arc<dyn LinkStore>, validator: Arc<dyn ClickValidator>) -> Self {
        Self { store, validator }
    }

    /// Look up `short_code`, validate the click, record it and return the
    /// target URL.
    ///
    /// # Errors
    ///
    /// * `AppError::LinkNotFound` for unknown or malformed codes.
    /// * `AppError::ValidationFailed` if the validator rejects the click; no
    ///   click is recorded.
    pub async fn resolve_and_record(&self, short_code: &str) -> AppResult<String> {
        if !is_well_formed_code(short_code) {
            return Err(AppError::LinkNotFound(short_code.to_string()));
        }

        let link = self
            .store
            .find_link_by_short_code(short_code)
            .await?
            .ok_or_else(|| AppError::LinkNotFound(short_code.to_string()))?;

        if let ClickVerdict::Rejected { reason } = self.validator.validate(&link).await {
            warn!(short_code = %link.short_code, reason = %reason, "Click rejected");
            return Err(AppError::ValidationFailed(reason));
        }

        let click = self.store.record_click(link.id, Utc::now()).await?;
        debug!(short_code = %link.short_code, click_id = %click.id, "Recorded click");

        Ok(link.target_url)
    }
}
