use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockWriteGuard},
    time::{Duration, Instant},
};

use serde::Serialize;
use uuid::Uuid;

use super::{Invalidation, InvalidationSubscriber};
use crate::{
    config::CacheConfig,
    resources::{Page, PageFetcher, PageRequest, Resource, ResourceError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub owner_id: Uuid,
    pub page_size: u64,
}

/// Every loaded page of one listing, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub has_more: bool,
    pub pages_loaded: usize,
}

struct Entry<T> {
    pages: Vec<Page<T>>,
    loaded_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(first: Page<T>) -> Self {
        Self {
            pages: vec![first],
            loaded_at: Instant::now(),
        }
    }

    fn has_more(&self) -> bool {
        self.pages.last().is_some_and(|page| page.has_more)
    }

    fn view(&self) -> ListingView<T> {
        let (total_count, has_more) = self
            .pages
            .last()
            .map(|page| (page.total_count, page.has_more))
            .unwrap_or_default();
        ListingView {
            rows: self
                .pages
                .iter()
                .flat_map(|page| page.rows.iter().cloned())
                .collect(),
            total_count,
            has_more,
            pages_loaded: self.pages.len(),
        }
    }
}

/// Snapshot of the counters a fetch started under. The result is applied only
/// if neither moved while the fetch was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    epoch: u64,
    generation: u64,
}

struct State<T> {
    epoch: u64,
    generations: HashMap<ListingKey, u64>,
    entries: HashMap<ListingKey, Entry<T>>,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            epoch: 0,
            generations: HashMap::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T> State<T> {
    fn ticket(&self, key: &ListingKey) -> Ticket {
        Ticket {
            epoch: self.epoch,
            generation: self.generations.get(key).copied().unwrap_or_default(),
        }
    }

    /// Ticket for a fetch that may write back; the key stays tracked so a
    /// teardown before the first page lands still cancels it.
    fn track(&mut self, key: &ListingKey) -> Ticket {
        self.generations.entry(*key).or_default();
        self.ticket(key)
    }

    fn is_current(&self, key: &ListingKey, ticket: Ticket) -> bool {
        self.ticket(key) == ticket
    }

    /// Untracked keys have nothing cached and nothing in flight to cancel.
    fn drop_entry(&mut self, key: &ListingKey) {
        let had_entry = self.entries.remove(key).is_some();
        match self.generations.get_mut(key) {
            Some(generation) => *generation += 1,
            None if had_entry => {
                self.generations.insert(*key, 1);
            }
            None => {}
        }
    }

    /// The entry for `key`, dropping it first when it has gone stale.
    fn fresh_entry(&mut self, key: &ListingKey, stale_after: Duration) -> Option<&Entry<T>> {
        let stale = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.loaded_at.elapsed() >= stale_after);
        if stale {
            tracing::debug!(
                owner = %key.owner_id,
                page_size = key.page_size,
                "listing went stale"
            );
            self.drop_entry(key);
        }
        self.entries.get(key)
    }
}

enum NextStep<T> {
    LoadFirst,
    Exhausted(ListingView<T>),
    Fetch(u64),
}

/// Pages of one resource kind cached per `(owner, page size)`.
pub struct ListingCache<R: Resource> {
    fetcher: PageFetcher<R>,
    stale_after: Duration,
    max_attempts: u32,
    state: RwLock<State<R::Listed>>,
}

impl<R: Resource> ListingCache<R> {
    pub fn new(fetcher: PageFetcher<R>, cfg: &CacheConfig) -> Self {
        Self::with_settings(fetcher, cfg.stale_after(), cfg.max_fetch_attempts)
    }

    pub fn with_settings(
        fetcher: PageFetcher<R>,
        stale_after: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            fetcher,
            stale_after,
            max_attempts,
            state: RwLock::new(State::default()),
        }
    }

    fn lock(&self) -> Result<RwLockWriteGuard<'_, State<R::Listed>>, ResourceError> {
        self.state.write().map_err(|_| ResourceError::Store {
            context: format!("Listing cache for {} unavailable", R::KIND.plural()),
            message: "lock poisoned".to_string(),
        })
    }

    /// The cached listing, loading page 0 when it is absent or stale.
    pub async fn view(
        &self,
        owner: Uuid,
        page_size: u64,
    ) -> Result<ListingView<R::Listed>, ResourceError> {
        let key = ListingKey {
            owner_id: owner,
            page_size,
        };
        let first = PageRequest::first(page_size);
        self.fetcher.validate(owner, first)?;

        let mut discarded = None;
        for attempt in 0..self.max_attempts {
            let ticket = {
                let mut state = self.lock()?;
                if let Some(entry) = state.fresh_entry(&key, self.stale_after) {
                    return Ok(entry.view());
                }
                state.track(&key)
            };

            let page = self.fetcher.fetch_page(owner, first).await?;

            let mut state = self.lock()?;
            if state.is_current(&key, ticket) {
                let entry = Entry::new(page);
                let view = entry.view();
                state.entries.insert(key, entry);
                return Ok(view);
            }
            tracing::debug!(
                kind = %R::KIND,
                %owner,
                attempt,
                "discarded first page fetched across an invalidation"
            );
            discarded = Some(page);
        }

        // Invalidations kept outrunning the fetch; serve the latest page uncached.
        let page = match discarded {
            Some(page) => page,
            None => self.fetcher.fetch_page(owner, first).await?,
        };
        Ok(Entry::new(page).view())
    }

    /// Loads the page after the last cached one. `None` when the result was
    /// discarded because the listing was invalidated or torn down meanwhile.
    pub async fn fetch_next_page(
        &self,
        owner: Uuid,
        page_size: u64,
    ) -> Result<Option<ListingView<R::Listed>>, ResourceError> {
        let key = ListingKey {
            owner_id: owner,
            page_size,
        };

        let (step, ticket) = {
            let mut state = self.lock()?;
            let step = match state.fresh_entry(&key, self.stale_after) {
                None => NextStep::LoadFirst,
                Some(entry) if !entry.has_more() => NextStep::Exhausted(entry.view()),
                Some(entry) => NextStep::Fetch(entry.pages.len() as u64),
            };
            (step, state.track(&key))
        };
        let page_index = match step {
            NextStep::LoadFirst => return self.view(owner, page_size).await.map(Some),
            NextStep::Exhausted(view) => return Ok(Some(view)),
            NextStep::Fetch(page_index) => page_index,
        };

        let page = self
            .fetcher
            .fetch_page(owner, PageRequest::new(page_index, page_size))
            .await?;

        let mut state = self.lock()?;
        if !state.is_current(&key, ticket) {
            tracing::debug!(
                kind = %R::KIND,
                %owner,
                page_index,
                "discarded next page fetched across an invalidation"
            );
            return Ok(None);
        }
        match state.entries.get_mut(&key) {
            Some(entry) => {
                if entry.pages.len() as u64 == page_index {
                    entry.pages.push(page);
                }
                Ok(Some(entry.view()))
            }
            None => Ok(None),
        }
    }

    /// One page: served from the cache when loaded, appended when it is the
    /// next one, otherwise fetched without caching.
    pub async fn page(
        &self,
        owner: Uuid,
        request: PageRequest,
    ) -> Result<Page<R::Listed>, ResourceError> {
        self.fetcher.validate(owner, request)?;
        let key = ListingKey {
            owner_id: owner,
            page_size: request.page_size,
        };

        let (ticket, appendable) = {
            let mut state = self.lock()?;
            let cached = state.fresh_entry(&key, self.stale_after).map(|entry| {
                let next = entry.pages.len() as u64 == request.page_index && entry.has_more();
                (entry.pages.get(request.page_index as usize).cloned(), next)
            });
            let appendable = match cached {
                Some((Some(page), _)) => return Ok(page),
                Some((None, next)) => next,
                None => request.page_index == 0,
            };
            let ticket = if appendable {
                state.track(&key)
            } else {
                state.ticket(&key)
            };
            (ticket, appendable)
        };

        let page = self.fetcher.fetch_page(owner, request).await?;
        if !appendable {
            return Ok(page);
        }

        let mut state = self.lock()?;
        if state.is_current(&key, ticket) {
            if request.page_index == 0 {
                state.entries.insert(key, Entry::new(page.clone()));
            } else if let Some(entry) = state.entries.get_mut(&key) {
                if entry.pages.len() as u64 == request.page_index {
                    entry.pages.push(page.clone());
                }
            }
        }
        Ok(page)
    }

    /// Drops every listing of this kind; in-flight fetches are discarded.
    pub fn invalidate_all(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.epoch += 1;
        state.entries.clear();
        state.generations.clear();
        tracing::debug!(kind = %R::KIND, epoch = state.epoch, "listing cache invalidated");
    }

    /// The viewer of one listing went away.
    pub fn teardown(&self, owner: Uuid, page_size: u64) -> Result<(), ResourceError> {
        self.fetcher.validate(owner, PageRequest::first(page_size))?;
        let key = ListingKey {
            owner_id: owner,
            page_size,
        };
        self.lock()?.drop_entry(&key);
        Ok(())
    }

    pub fn is_cached(&self, owner: Uuid, page_size: u64) -> bool {
        let key = ListingKey {
            owner_id: owner,
            page_size,
        };
        self.state
            .read()
            .map(|state| state.entries.contains_key(&key))
            .unwrap_or(false)
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.state
            .read()
            .map(|state| state.generations.len())
            .unwrap_or_default()
    }
}

impl<R: Resource> InvalidationSubscriber for ListingCache<R> {
    fn on_invalidate(&self, event: Invalidation) {
        match event {
            Invalidation::Resource(kind) if kind == R::KIND => self.invalidate_all(),
            Invalidation::Session => self.invalidate_all(),
            Invalidation::Resource(_) | Invalidation::Profile => {}
        }
    }
}
