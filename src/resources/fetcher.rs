use std::sync::Arc;

use uuid::Uuid;

use super::{Page, PageRequest, Resource, ResourceError, ResourceStore};

/// Reads one page of an owner's rows: an exact count, then the inclusive
/// range `page_index * page_size ..= page_index * page_size + page_size - 1`.
pub struct PageFetcher<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
    max_page_size: u64,
}

impl<R: Resource> Clone for PageFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_page_size: self.max_page_size,
        }
    }
}

impl<R: Resource> PageFetcher<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>, max_page_size: u64) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    pub fn validate(&self, owner: Uuid, request: PageRequest) -> Result<(u64, u64), ResourceError> {
        if owner.is_nil() {
            return Err(ResourceError::validation("User ID is required"));
        }
        if request.page_size == 0 || request.page_size > self.max_page_size {
            return Err(ResourceError::validation(format!(
                "Page size must be between 1 and {}",
                self.max_page_size
            )));
        }
        let from = request
            .page_index
            .checked_mul(request.page_size)
            .ok_or_else(|| ResourceError::validation("Page index out of range"))?;
        let to = from
            .checked_add(request.page_size - 1)
            .ok_or_else(|| ResourceError::validation("Page index out of range"))?;
        Ok((from, to))
    }

    pub async fn fetch_page(
        &self,
        owner: Uuid,
        request: PageRequest,
    ) -> Result<Page<R::Listed>, ResourceError> {
        let (from, to) = self.validate(owner, request)?;
        let resource = R::KIND.plural();

        let total_count = self
            .store
            .count(owner)
            .await
            .map_err(|err| ResourceError::CountFailed {
                resource,
                message: err.message(),
            })?;

        let rows = self
            .store
            .range(owner, from, to)
            .await
            .map_err(|err| ResourceError::RangeFailed {
                resource,
                message: err.message(),
            })?;

        tracing::debug!(
            kind = %R::KIND,
            %owner,
            page_index = request.page_index,
            rows = rows.len(),
            total_count,
            "fetched page"
        );

        Ok(Page {
            rows,
            total_count,
            has_more: to.saturating_add(1) < total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, FixedOffset, TimeZone};
    use uuid::Uuid;

    use crate::{
        db::entities::partner_station,
        resources::{MemoryStore, PageRequest, PartnerStationResource, ResourceError, StoreOp},
    };

    use super::PageFetcher;

    fn station(owner: Uuid, minute: i64) -> partner_station::Model {
        let created = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 2, 1, 8, 0, 0)
            .single()
            .expect("timestamp should be valid")
            + Duration::minutes(minute);
        partner_station::Model {
            id: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
            user_id: Some(owner),
            name: format!("Station {minute}"),
            address: "Rue de la République".to_string(),
            max_slots: 8,
            filled_slots: 0,
            is_open: true,
        }
    }

    fn seeded(
        owner: Uuid,
        rows: i64,
    ) -> (
        Arc<MemoryStore<PartnerStationResource>>,
        PageFetcher<PartnerStationResource>,
    ) {
        let store = Arc::new(MemoryStore::<PartnerStationResource>::new());
        for minute in 0..rows {
            store.seed(station(owner, minute)).expect("seed should succeed");
        }
        store
            .seed(station(Uuid::new_v4(), 99))
            .expect("seed should succeed");
        let fetcher = PageFetcher::new(store.clone(), 100);
        (store, fetcher)
    }

    #[tokio::test]
    async fn pages_cover_every_row_once_newest_first() {
        let owner = Uuid::new_v4();
        let (_, fetcher) = seeded(owner, 25);

        let mut names = Vec::new();
        let mut flags = Vec::new();
        for page_index in 0..3 {
            let page = fetcher
                .fetch_page(owner, PageRequest::new(page_index, 10))
                .await
                .expect("page should load");
            assert_eq!(page.total_count, 25);
            flags.push((page.rows.len(), page.has_more));
            names.extend(page.rows.into_iter().map(|row| row.name));
        }

        assert_eq!(flags, vec![(10, true), (10, true), (5, false)]);
        let expected: Vec<String> = (0..25)
            .rev()
            .map(|minute| format!("Station {minute}"))
            .collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn consecutive_pages_equal_one_larger_page() {
        let owner = Uuid::new_v4();
        let (_, fetcher) = seeded(owner, 12);

        let first = fetcher
            .fetch_page(owner, PageRequest::new(0, 4))
            .await
            .expect("page should load");
        let second = fetcher
            .fetch_page(owner, PageRequest::new(1, 4))
            .await
            .expect("page should load");
        let combined = fetcher
            .fetch_page(owner, PageRequest::new(0, 8))
            .await
            .expect("page should load");

        let stitched: Vec<_> = first.rows.into_iter().chain(second.rows).collect();
        assert_eq!(stitched, combined.rows);
    }

    #[tokio::test]
    async fn empty_listing_is_a_valid_page() {
        let (_, fetcher) = seeded(Uuid::new_v4(), 0);

        let page = fetcher
            .fetch_page(Uuid::new_v4(), PageRequest::first(10))
            .await
            .expect("empty page should load");

        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 0);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn count_and_range_failures_are_distinct() {
        let owner = Uuid::new_v4();
        let (store, fetcher) = seeded(owner, 3);

        store.fail(StoreOp::Count).expect("toggle should succeed");
        let err = fetcher
            .fetch_page(owner, PageRequest::first(10))
            .await
            .expect_err("count failure should surface");
        assert!(matches!(err, ResourceError::CountFailed { .. }));
        assert!(err.to_string().starts_with("Failed to fetch partner stations count:"));

        store.heal().expect("toggle should succeed");
        store.fail(StoreOp::Range).expect("toggle should succeed");
        let err = fetcher
            .fetch_page(owner, PageRequest::first(10))
            .await
            .expect_err("range failure should surface");
        assert!(matches!(err, ResourceError::RangeFailed { .. }));
        assert!(err.to_string().starts_with("Failed to fetch partner stations:"));
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_store() {
        let (store, fetcher) = seeded(Uuid::new_v4(), 1);

        let nil = fetcher
            .fetch_page(Uuid::nil(), PageRequest::first(10))
            .await
            .expect_err("nil owner should fail");
        assert_eq!(nil, ResourceError::Validation("User ID is required".to_string()));

        let zero = fetcher
            .fetch_page(Uuid::new_v4(), PageRequest::first(0))
            .await
            .expect_err("zero page size should fail");
        assert!(matches!(zero, ResourceError::Validation(_)));

        let oversized = fetcher
            .fetch_page(Uuid::new_v4(), PageRequest::first(101))
            .await
            .expect_err("oversized page should fail");
        assert!(matches!(oversized, ResourceError::Validation(_)));

        let overflow = fetcher
            .fetch_page(Uuid::new_v4(), PageRequest::new(u64::MAX, 10))
            .await
            .expect_err("overflowing index should fail");
        assert!(matches!(overflow, ResourceError::Validation(_)));

        assert!(store.calls().expect("calls should read").is_empty());
    }
}
