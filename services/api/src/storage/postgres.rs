//! PostgreSQL store backend
//!
//! Relational variant of the store, backed by the shared sqlx pool from
//! `common::database`. Favorite uniqueness is enforced by a database
//! constraint; everything else is a single statement per operation.

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::{PgPool, Row, postgres::PgRow};
use units::ConversionKind;

use crate::models::{
    Conversion, Favorite, NewConversion, NewFavorite, NewUser, UpdateUser, User,
};
use crate::storage::{Store, StoreError, StoreResult};

/// PostgreSQL store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store on top of an initialized connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: sqlx::Error) -> StoreError {
    StoreError::Database(DatabaseError::Query(error))
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        external_auth_id: row.get("external_auth_id"),
        created_at: row.get("created_at"),
    }
}

fn conversion_from_row(row: &PgRow) -> StoreResult<Conversion> {
    Ok(Conversion {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: parse_kind(row.get("type"))?,
        from_unit: row.get("from_unit"),
        to_unit: row.get("to_unit"),
        from_value: row.get("from_value"),
        to_value: row.get("to_value"),
        exchange_rate: row.get("exchange_rate"),
        created_at: row.get("created_at"),
    })
}

fn favorite_from_row(row: &PgRow) -> StoreResult<Favorite> {
    Ok(Favorite {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: parse_kind(row.get("type"))?,
        from_unit: row.get("from_unit"),
        to_unit: row.get("to_unit"),
        created_at: row.get("created_at"),
    })
}

fn parse_kind(raw: String) -> StoreResult<ConversionKind> {
    raw.parse::<ConversionKind>()
        .map_err(|e| query_error(sqlx::Error::Decode(Box::new(e))))
}

#[async_trait]
impl Store for PgStore {
    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, external_auth_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn user_by_external_id(&self, external_auth_id: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, external_auth_id, created_at
            FROM users
            WHERE external_auth_id = $1
            "#,
        )
        .bind(external_auth_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, external_auth_id)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, external_auth_id, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.external_auth_id)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(user_from_row(&row))
    }

    async fn update_user(&self, id: i64, updates: &UpdateUser) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name)
            WHERE id = $1
            RETURNING id, email, name, external_auth_id, created_at
            "#,
        )
        .bind(id)
        .bind(&updates.email)
        .bind(&updates.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn conversions(&self, user_id: i64) -> StoreResult<Vec<Conversion>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, type, from_unit, to_unit, from_value, to_value,
                   exchange_rate, created_at
            FROM conversions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        rows.iter().map(conversion_from_row).collect()
    }

    async fn conversion_count(&self, user_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM conversions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(query_error)?;

        Ok(count)
    }

    async fn create_conversion(
        &self,
        user_id: i64,
        new_conversion: &NewConversion,
    ) -> StoreResult<Conversion> {
        let row = sqlx::query(
            r#"
            INSERT INTO conversions (user_id, type, from_unit, to_unit, from_value,
                                     to_value, exchange_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, type, from_unit, to_unit, from_value, to_value,
                      exchange_rate, created_at
            "#,
        )
        .bind(user_id)
        .bind(new_conversion.kind.as_str())
        .bind(&new_conversion.from_unit)
        .bind(&new_conversion.to_unit)
        .bind(new_conversion.from_value)
        .bind(new_conversion.to_value)
        .bind(new_conversion.exchange_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;

        conversion_from_row(&row)
    }

    async fn clear_conversions(&self, user_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM conversions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, type, from_unit, to_unit, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        rows.iter().map(favorite_from_row).collect()
    }

    async fn find_favorite(
        &self,
        user_id: i64,
        kind: ConversionKind,
        from_unit: &str,
        to_unit: &str,
    ) -> StoreResult<Option<Favorite>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, type, from_unit, to_unit, created_at
            FROM favorites
            WHERE user_id = $1 AND type = $2 AND from_unit = $3 AND to_unit = $4
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(from_unit)
        .bind(to_unit)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        row.as_ref().map(favorite_from_row).transpose()
    }

    async fn create_favorite(
        &self,
        user_id: i64,
        new_favorite: &NewFavorite,
    ) -> StoreResult<Favorite> {
        let row = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, type, from_unit, to_unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, type, from_unit, to_unit, created_at
            "#,
        )
        .bind(user_id)
        .bind(new_favorite.kind.as_str())
        .bind(&new_favorite.from_unit)
        .bind(&new_favorite.to_unit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateFavorite
            }
            other => query_error(other),
        })?;

        favorite_from_row(&row)
    }

    async fn delete_favorite(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}
