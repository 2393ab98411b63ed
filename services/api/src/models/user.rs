//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
///
/// Created on first successful external-identity sign-in and never
/// hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub external_auth_id: String,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub external_auth_id: String,
}

/// User profile update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Body of the external-identity login request
///
/// Fields are optional at the serde level so missing values surface as a
/// 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginRequest {
    /// Identifier issued by the external identity provider
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}
