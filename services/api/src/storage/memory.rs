//! In-memory store backend
//!
//! Map-based variant of the store: monotonic per-entity ids starting at 1,
//! reset on process restart. Mirrors the browser local-storage behavior,
//! including the 100-entry cap on each user's conversion history.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use units::ConversionKind;

use crate::models::{
    Conversion, Favorite, NewConversion, NewFavorite, NewUser, UpdateUser, User,
};
use crate::storage::{Store, StoreError, StoreResult};

/// Most-recent entries kept per user, matching the local-storage variant
const HISTORY_CAP: usize = 100;

#[derive(Default)]
struct MemInner {
    users: HashMap<i64, User>,
    conversions: HashMap<i64, Conversion>,
    favorites: HashMap<i64, Favorite>,
    next_user_id: i64,
    next_conversion_id: i64,
    next_favorite_id: i64,
}

/// In-memory store
pub struct MemStore {
    inner: Mutex<MemInner>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemInner {
                next_user_id: 1,
                next_conversion_id: 1,
                next_favorite_id: 1,
                ..MemInner::default()
            }),
        }
    }
}

#[async_trait]
impl Store for MemStore {
    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn user_by_external_id(&self, external_auth_id: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.external_auth_id == external_auth_id)
            .cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User {
            id,
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            external_auth_id: new_user.external_auth_id.clone(),
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, updates: &UpdateUser) -> StoreResult<Option<User>> {
        let mut inner = self.inner.lock().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = &updates.email {
            user.email = email.clone();
        }
        if let Some(name) = &updates.name {
            user.name = name.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn conversions(&self, user_id: i64) -> StoreResult<Vec<Conversion>> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Conversion> = inner
            .conversions
            .values()
            .filter(|conversion| conversion.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn conversion_count(&self, user_id: i64) -> StoreResult<i64> {
        let inner = self.inner.lock().await;
        let count = inner
            .conversions
            .values()
            .filter(|conversion| conversion.user_id == user_id)
            .count();
        Ok(count as i64)
    }

    async fn create_conversion(
        &self,
        user_id: i64,
        new_conversion: &NewConversion,
    ) -> StoreResult<Conversion> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_conversion_id;
        inner.next_conversion_id += 1;

        let conversion = Conversion {
            id,
            user_id,
            kind: new_conversion.kind,
            from_unit: new_conversion.from_unit.clone(),
            to_unit: new_conversion.to_unit.clone(),
            from_value: new_conversion.from_value,
            to_value: new_conversion.to_value,
            exchange_rate: new_conversion.exchange_rate,
            created_at: Utc::now(),
        };
        inner.conversions.insert(id, conversion.clone());

        // Enforce the per-user history cap, dropping the oldest entries
        let mut owned: Vec<(chrono::DateTime<Utc>, i64)> = inner
            .conversions
            .values()
            .filter(|row| row.user_id == user_id)
            .map(|row| (row.created_at, row.id))
            .collect();
        if owned.len() > HISTORY_CAP {
            owned.sort_by(|a, b| b.cmp(a));
            for (_, stale_id) in owned.split_off(HISTORY_CAP) {
                inner.conversions.remove(&stale_id);
            }
        }

        Ok(conversion)
    }

    async fn clear_conversions(&self, user_id: i64) -> StoreResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.conversions.len();
        inner.conversions.retain(|_, conversion| conversion.user_id != user_id);
        Ok((before - inner.conversions.len()) as u64)
    }

    async fn favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Favorite> = inner
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn find_favorite(
        &self,
        user_id: i64,
        kind: ConversionKind,
        from_unit: &str,
        to_unit: &str,
    ) -> StoreResult<Option<Favorite>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .favorites
            .values()
            .find(|favorite| {
                favorite.user_id == user_id
                    && favorite.kind == kind
                    && favorite.from_unit == from_unit
                    && favorite.to_unit == to_unit
            })
            .cloned())
    }

    async fn create_favorite(
        &self,
        user_id: i64,
        new_favorite: &NewFavorite,
    ) -> StoreResult<Favorite> {
        let mut inner = self.inner.lock().await;

        let duplicate = inner.favorites.values().any(|favorite| {
            favorite.user_id == user_id
                && favorite.kind == new_favorite.kind
                && favorite.from_unit == new_favorite.from_unit
                && favorite.to_unit == new_favorite.to_unit
        });
        if duplicate {
            return Err(StoreError::DuplicateFavorite);
        }

        let id = inner.next_favorite_id;
        inner.next_favorite_id += 1;

        let favorite = Favorite {
            id,
            user_id,
            kind: new_favorite.kind,
            from_unit: new_favorite.from_unit.clone(),
            to_unit: new_favorite.to_unit.clone(),
            created_at: Utc::now(),
        };
        inner.favorites.insert(id, favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        match inner.favorites.get(&id) {
            Some(favorite) if favorite.user_id == user_id => {
                inner.favorites.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
