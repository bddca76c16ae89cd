use crate::config::LinkConfig;
use crate::services::{AnalyticsService, ClickValidator, LinkService, RedirectService};
use crate::store::LinkStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This struct is wrapped in `Arc` and shared across all request handlers
/// via Axum's State extraction. Every service holds the same injected store.
#[derive(Clone)]
pub struct AppState {
    /// Link issuance
    pub links: LinkService,

    /// Short code resolution and click recording
    pub redirects: RedirectService,

    /// Paginated click analytics
    pub analytics: AnalyticsService,

    /// Store handle, used directly by the health check
    pub store: Arc<dyn LinkStore>,

    /// Base URL for constructing short URLs (e.g., "http://localhost:3000")
    pub base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LinkStore>,
        validator: Arc<dyn ClickValidator>,
        config: &LinkConfig,
    ) -> Self {
        Self {
            links: LinkService::new(store.clone(), config.short_code_max_attempts),
            redirects: RedirectService::new(store.clone(), validator),
            analytics: AnalyticsService::new(store.clone()),
            store,
            base_url: config.base_url.clone(),
        }
    }
}
