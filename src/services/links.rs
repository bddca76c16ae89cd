use crate::error::{AppError, AppResult, UniqueField};
use crate::models::{Link, LinkCreation};
use crate::services::short_code::generate_code;
use crate::store::LinkStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Check a raw target URL at the service boundary.
///
/// Returns the trimmed URL. It must be non-empty, parse as a URL and use the
/// http or https scheme.
pub fn validate_target_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("target_url cannot be empty".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::InvalidUrl(format!("Invalid URL format: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl(
            "target_url must start with http:// or https://".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Issues short links, one per target URL.
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    max_attempts: u32,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    /// Return the link for `raw_url`, creating it if the URL is new.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidUrl` if the URL fails validation; nothing is written.
    /// * `AppError::ShortCodeGenerationFailed` if every generated code collided.
    pub async fn create_link(&self, raw_url: &str) -> AppResult<(Link, LinkCreation)> {
        let target_url = validate_target_url(raw_url)?;

        if let Some(existing) = self.store.find_link_by_target_url(&target_url).await? {
            debug!(short_code = %existing.short_code, "Returning existing link");
            return Ok((existing, LinkCreation::Existing));
        }

        for attempt in 1..=self.max_attempts {
            let short_code = generate_code();

            match self.store.insert_link(&short_code, &target_url).await {
                Ok(link) => {
                    info!(short_code = %link.short_code, target_url = %link.target_url, "Created link");
                    return Ok((link, LinkCreation::Created));
                }
                Err(AppError::UniquenessConflict(UniqueField::ShortCode)) => {
                    warn!(
                        "Short code collision (attempt {}/{}): {}",
                        attempt, self.max_attempts, short_code
                    );
                }
                Err(AppError::UniquenessConflict(UniqueField::TargetUrl)) => {
                    // Another request inserted the same URL first; its row wins.
                    debug!(target_url = %target_url, "Lost insert race, re-reading link");
                    let winner = self
                        .store
                        .find_link_by_target_url(&target_url)
                        .await?
                        .ok_or_else(|| {
                            AppError::Internal(format!(
                                "Link for {} vanished after uniqueness conflict",
                                target_url
                            ))
                        })?;
                    return Ok((winner, LinkCreation::Existing));
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::ShortCodeGenerationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockLinkStore};
    use chrono::Utc;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn link(short_code: &str, target_url: &str) -> Link {
        Link {
            id: Uuid::new_v4(),
            short_code: short_code.to_string(),
            target_url: target_url.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_target_url_accepts_http_and_https() {
        assert_eq!(
            validate_target_url("https://fiverr.com/a/b").unwrap(),
            "https://fiverr.com/a/b"
        );
        assert_eq!(
            validate_target_url("  http://localhost:3000/x  ").unwrap(),
            "http://localhost:3000/x"
        );
    }

    #[test]
    fn test_validate_target_url_rejects_bad_input() {
        for input in ["", "   ", "not-a-url", "ftp://example.com", "javascript:alert(1)"] {
            assert!(
                matches!(validate_target_url(input), Err(AppError::InvalidUrl(_))),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_url_never_touches_store() {
        // No expectations: any store call would panic.
        let service = LinkService::new(Arc::new(MockLinkStore::new()), 10);
        let result = service.create_link("not-a-url").await;
        assert!(matches!(result, Err(AppError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_existing_url_is_returned_without_insert() {
        let existing = link("abc123", "https://fiverr.com/a/b");
        let returned = existing.clone();

        let mut store = MockLinkStore::new();
        store
            .expect_find_link_by_target_url()
            .with(eq("https://fiverr.com/a/b"))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        store.expect_insert_link().never();

        let service = LinkService::new(Arc::new(store), 10);
        let (found, creation) = service.create_link("https://fiverr.com/a/b").await.unwrap();

        assert_eq!(found, existing);
        assert_eq!(creation, LinkCreation::Existing);
    }

    #[tokio::test]
    async fn test_short_code_collision_is_retried() {
        let mut store = MockLinkStore::new();
        store
            .expect_find_link_by_target_url()
            .returning(|_| Ok(None));

        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        store
            .expect_insert_link()
            .times(3)
            .returning(move |code, url| {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AppError::UniquenessConflict(UniqueField::ShortCode))
                } else {
                    Ok(link(code, url))
                }
            });

        let service = LinkService::new(Arc::new(store), 10);
        let (created, creation) = service.create_link("https://fiverr.com/a/b").await.unwrap();

        assert_eq!(creation, LinkCreation::Created);
        assert_eq!(created.target_url, "https://fiverr.com/a/b");
        assert_eq!(created.short_code.len(), 6);
    }

    #[tokio::test]
    async fn test_lost_race_returns_winning_row() {
        let winner = link("win123", "https://fiverr.com/a/b");
        let returned = winner.clone();

        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();

        let mut store = MockLinkStore::new();
        store
            .expect_find_link_by_target_url()
            .times(2)
            .returning(move |_| {
                // Empty before the insert, populated by the racing request after.
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(None)
                } else {
                    Ok(Some(returned.clone()))
                }
            });
        store
            .expect_insert_link()
            .times(1)
            .returning(|_, _| Err(AppError::UniquenessConflict(UniqueField::TargetUrl)));

        let service = LinkService::new(Arc::new(store), 10);
        let (found, creation) = service.create_link("https://fiverr.com/a/b").await.unwrap();

        assert_eq!(found, winner);
        assert_eq!(creation, LinkCreation::Existing);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut store = MockLinkStore::new();
        store
            .expect_find_link_by_target_url()
            .returning(|_| Ok(None));
        store
            .expect_insert_link()
            .times(3)
            .returning(|_, _| Err(AppError::UniquenessConflict(UniqueField::ShortCode)));

        let service = LinkService::new(Arc::new(store), 3);
        let result = service.create_link("https://fiverr.com/a/b").await;

        assert!(matches!(result, Err(AppError::ShortCodeGenerationFailed)));
    }

    #[tokio::test]
    async fn test_issuing_twice_returns_same_code() {
        let service = LinkService::new(Arc::new(MemoryStore::new()), 10);

        let (first, first_creation) = service.create_link("https://fiverr.com/a/b").await.unwrap();
        let (second, second_creation) = service.create_link("https://fiverr.com/a/b").await.unwrap();

        assert!(first_creation.is_new());
        assert!(!second_creation.is_new());
        assert_eq!(first.short_code, second.short_code);
    }

    #[tokio::test]
    async fn test_concurrent_issuance_yields_single_link() {
        let store = Arc::new(MemoryStore::new());
        let service = LinkService::new(store.clone(), 10);

        let (a, b) = tokio::join!(
            service.create_link("https://fiverr.com/race"),
            service.create_link("https://fiverr.com/race"),
        );
        let (a, _) = a.unwrap();
        let (b, _) = b.unwrap();

        assert_eq!(a.short_code, b.short_code);
        assert_eq!(store.count_links().await.unwrap(), 1);
    }
}
