//! Persistence store interface and backends
//!
//! The API handlers only ever see the [`Store`] trait; the backend is
//! chosen once at startup. [`postgres::PgStore`] is the relational
//! backend, [`memory::MemStore`] the map-based variant used without a
//! configured database and by the test suite.

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;
use units::ConversionKind;

use crate::models::{
    Conversion, Favorite, NewConversion, NewFavorite, NewUser, UpdateUser, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The favorite pair already exists for the user
    #[error("favorite already exists")]
    DuplicateFavorite,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for users, conversions and favorites
///
/// Listings are sorted by creation time, newest first. Conversion and
/// favorite operations are always scoped to one user.
#[async_trait]
pub trait Store: Send + Sync {
    /// Find a user by id
    async fn user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Find a user by the identifier issued by the external identity provider
    async fn user_by_external_id(&self, external_auth_id: &str) -> StoreResult<Option<User>>;

    /// Create a new user
    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Update a user's email and/or name; `None` when the user is unknown
    async fn update_user(&self, id: i64, updates: &UpdateUser) -> StoreResult<Option<User>>;

    /// List a user's conversion history
    async fn conversions(&self, user_id: i64) -> StoreResult<Vec<Conversion>>;

    /// Count a user's conversion history entries
    async fn conversion_count(&self, user_id: i64) -> StoreResult<i64>;

    /// Append a conversion to a user's history
    async fn create_conversion(
        &self,
        user_id: i64,
        new_conversion: &NewConversion,
    ) -> StoreResult<Conversion>;

    /// Delete every conversion belonging to a user, returning how many
    async fn clear_conversions(&self, user_id: i64) -> StoreResult<u64>;

    /// List a user's favorites
    async fn favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>>;

    /// Find a favorite by its identifying unit pair
    async fn find_favorite(
        &self,
        user_id: i64,
        kind: ConversionKind,
        from_unit: &str,
        to_unit: &str,
    ) -> StoreResult<Option<Favorite>>;

    /// Create a favorite; fails with [`StoreError::DuplicateFavorite`] when
    /// the pair is already saved for the user
    async fn create_favorite(&self, user_id: i64, new_favorite: &NewFavorite)
        -> StoreResult<Favorite>;

    /// Delete one of the user's favorites by id; false when the id does not
    /// exist or belongs to another user
    async fn delete_favorite(&self, user_id: i64, id: i64) -> StoreResult<bool>;
}
