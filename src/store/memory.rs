use super::LinkStore;
use crate::error::{AppError, AppResult, UniqueField};
use crate::models::{Click, Link, MonthlyClickCount};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    links: Vec<Link>,
    by_short_code: HashMap<String, usize>,
    by_target_url: HashMap<String, usize>,
    clicks: Vec<Click>,
}

/// In-process store with the same uniqueness rules as the database schema.
///
/// Every operation takes a single lock, so each insert is atomic with respect
/// to its uniqueness checks.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_link_by_target_url(&self, target_url: &str) -> AppResult<Option<Link>> {
        let state = self.lock()?;
        Ok(state
            .by_target_url
            .get(target_url)
            .map(|&idx| state.links[idx].clone()))
    }

    async fn find_link_by_short_code(&self, short_code: &str) -> AppResult<Option<Link>> {
        let state = self.lock()?;
        Ok(state
            .by_short_code
            .get(short_code)
            .map(|&idx| state.links[idx].clone()))
    }

    async fn insert_link(&self, short_code: &str, target_url: &str) -> AppResult<Link> {
        let mut state = self.lock()?;

        if state.by_short_code.contains_key(short_code) {
            return Err(AppError::UniquenessConflict(UniqueField::ShortCode));
        }
        if state.by_target_url.contains_key(target_url) {
            return Err(AppError::UniquenessConflict(UniqueField::TargetUrl));
        }

        let link = Link {
            id: Uuid::new_v4(),
            short_code: short_code.to_string(),
            target_url: target_url.to_string(),
            created_at: Utc::now(),
        };

        let idx = state.links.len();
        state.links.push(link.clone());
        state.by_short_code.insert(link.short_code.clone(), idx);
        state.by_target_url.insert(link.target_url.clone(), idx);

        Ok(link)
    }

    async fn record_click(&self, link_id: Uuid, clicked_at: DateTime<Utc>) -> AppResult<Click> {
        let mut state = self.lock()?;

        // Mirrors the foreign key on clicks.link_id
        if !state.links.iter().any(|link| link.id == link_id) {
            return Err(AppError::Internal(format!(
                "Click references unknown link {}",
                link_id
            )));
        }

        let click = Click {
            id: Uuid::new_v4(),
            link_id,
            clicked_at,
        };
        state.clicks.push(click.clone());

        Ok(click)
    }

    async fn count_links(&self) -> AppResult<i64> {
        Ok(self.lock()?.links.len() as i64)
    }

    async fn list_links(&self, limit: i64, offset: i64) -> AppResult<Vec<Link>> {
        let state = self.lock()?;

        let mut links = state.links.clone();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(links
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn monthly_click_counts(&self, link_ids: &[Uuid]) -> AppResult<Vec<MonthlyClickCount>> {
        let state = self.lock()?;

        let mut buckets: BTreeMap<(Uuid, String), i64> = BTreeMap::new();
        for click in state.clicks.iter().filter(|c| link_ids.contains(&c.link_id)) {
            let month = click.clicked_at.format("%Y-%m").to_string();
            *buckets.entry((click.link_id, month)).or_insert(0) += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|((link_id, month), clicks)| MonthlyClickCount {
                link_id,
                month,
                clicks,
            })
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        let link = store
            .insert_link("abc123", "https://fiverr.com/a/b")
            .await
            .unwrap();

        let by_code = store.find_link_by_short_code("abc123").await.unwrap();
        let by_url = store
            .find_link_by_target_url("https://fiverr.com/a/b")
            .await
            .unwrap();

        assert_eq!(by_code, Some(link.clone()));
        assert_eq!(by_url, Some(link));
        assert!(store.find_link_by_short_code("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = MemoryStore::new();
        store.insert_link("abc123", "https://a.example").await.unwrap();

        let err = store
            .insert_link("abc123", "https://b.example")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::UniquenessConflict(UniqueField::ShortCode)
        ));

        let err = store
            .insert_link("def456", "https://a.example")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::UniquenessConflict(UniqueField::TargetUrl)
        ));

        assert_eq!(store.count_links().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_click_requires_existing_link() {
        let store = MemoryStore::new();
        let result = store.record_click(Uuid::new_v4(), Utc::now()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_list_links_is_ordered_and_paged() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_link(&format!("code0{}", i), &format!("https://example.com/{}", i))
                .await
                .unwrap();
        }

        let all = store.list_links(10, 0).await.unwrap();
        assert_eq!(all.len(), 5);
        assert!(all
            .windows(2)
            .all(|w| (w[0].created_at, w[0].id) <= (w[1].created_at, w[1].id)));

        let page = store.list_links(2, 4).await.unwrap();
        assert_eq!(page.len(), 1);
        assert!(store.list_links(2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_monthly_click_counts_groups_by_utc_month() {
        let store = MemoryStore::new();
        let a = store.insert_link("aaaaaa", "https://a.example").await.unwrap();
        let b = store.insert_link("bbbbbb", "https://b.example").await.unwrap();

        let jan = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        store.record_click(a.id, feb).await.unwrap();
        store.record_click(a.id, jan).await.unwrap();
        store.record_click(a.id, feb).await.unwrap();
        store.record_click(b.id, jan).await.unwrap();

        let rows = store.monthly_click_counts(&[a.id]).await.unwrap();
        assert_eq!(
            rows,
            vec![
                MonthlyClickCount {
                    link_id: a.id,
                    month: "2024-01".to_string(),
                    clicks: 1,
                },
                MonthlyClickCount {
                    link_id: a.id,
                    month: "2024-02".to_string(),
                    clicks: 2,
                },
            ]
        );

        assert!(store.monthly_click_counts(&[]).await.unwrap().is_empty());
    }
}
