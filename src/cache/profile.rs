use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use uuid::Uuid;

use super::{Invalidation, InvalidationSubscriber};
use crate::db::entities::profile;

/// Current profile per `auth_user_id`.
pub struct ProfileCache {
    stale_after: Duration,
    epoch: AtomicU64,
    profiles: DashMap<Uuid, (profile::Model, Instant)>,
}

impl ProfileCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            epoch: AtomicU64::new(0),
            profiles: DashMap::new(),
        }
    }

    /// Epoch to hand back to [`ProfileCache::put`] once a lookup completes.
    pub fn ticket(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn get(&self, auth_user_id: &Uuid) -> Option<profile::Model> {
        if let Some(entry) = self.profiles.get(auth_user_id) {
            let (profile, loaded_at) = entry.value();
            if loaded_at.elapsed() < self.stale_after {
                return Some(profile.clone());
            }
            drop(entry);
            self.profiles.remove(auth_user_id);
        }
        None
    }

    /// Stores `profile` unless the cache was cleared after `ticket` was taken.
    pub fn put(&self, ticket: u64, profile: profile::Model) -> bool {
        let auth_user_id = profile.auth_user_id;
        if self.ticket() != ticket {
            tracing::debug!(%auth_user_id, "discarded profile loaded across an invalidation");
            return false;
        }
        self.profiles.insert(auth_user_id, (profile, Instant::now()));

        // a clear that landed between the check and the insert
        if self.ticket() != ticket {
            self.profiles.remove(&auth_user_id);
            return false;
        }
        true
    }

    /// Bumps the epoch before emptying the map, so a racing `put` either
    /// sees the new epoch or is emptied out.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.profiles.clear();
    }
}

impl InvalidationSubscriber for ProfileCache {
    fn on_invalidate(&self, event: Invalidation) {
        match event {
            Invalidation::Profile | Invalidation::Session => self.clear(),
            Invalidation::Resource(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    use crate::{
        cache::{Invalidation, InvalidationSubscriber},
        db::entities::profile,
        resources::ResourceKind,
    };

    use super::ProfileCache;

    fn profile_model(auth_user_id: Uuid) -> profile::Model {
        let ts = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("timestamp should be valid");
        profile::Model {
            id: Uuid::new_v4(),
            created_at: ts,
            updated_at: ts,
            auth_user_id,
            username: Some("rider".to_string()),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            address: None,
            is_partner: false,
        }
    }

    #[test]
    fn profile_is_served_until_invalidated() {
        let cache = ProfileCache::new(Duration::from_secs(300));
        let auth_user_id = Uuid::new_v4();
        let ticket = cache.ticket();
        assert!(cache.put(ticket, profile_model(auth_user_id)));

        assert!(cache.get(&auth_user_id).is_some());

        cache.on_invalidate(Invalidation::Resource(ResourceKind::PartnerStation));
        assert!(cache.get(&auth_user_id).is_some());

        cache.on_invalidate(Invalidation::Profile);
        assert!(cache.get(&auth_user_id).is_none());
    }

    #[test]
    fn lookups_finishing_after_a_clear_are_not_stored() {
        let cache = ProfileCache::new(Duration::from_secs(300));
        let auth_user_id = Uuid::new_v4();
        let ticket = cache.ticket();

        cache.on_invalidate(Invalidation::Session);

        assert!(!cache.put(ticket, profile_model(auth_user_id)));
        assert!(cache.get(&auth_user_id).is_none());
    }

    #[test]
    fn stale_profiles_are_misses() {
        let cache = ProfileCache::new(Duration::ZERO);
        let auth_user_id = Uuid::new_v4();
        let ticket = cache.ticket();
        cache.put(ticket, profile_model(auth_user_id));

        assert!(cache.get(&auth_user_id).is_none());
        assert!(cache.profiles.is_empty());
    }

    #[test]
    fn tickets_taken_after_a_clear_store_again() {
        let cache = ProfileCache::new(Duration::from_secs(300));
        let auth_user_id = Uuid::new_v4();
        let old = cache.ticket();
        cache.clear();

        assert!(!cache.put(old, profile_model(auth_user_id)));
        assert!(cache.put(cache.ticket(), profile_model(auth_user_id)));
        assert_eq!(
            cache.get(&auth_user_id).map(|profile| profile.auth_user_id),
            Some(auth_user_id)
        );
    }
}
