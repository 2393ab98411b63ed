//! Favorite conversion pair model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use units::ConversionKind;

/// A saved conversion unit pair, unique per user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
    pub created_at: DateTime<Utc>,
}

/// Favorite creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
}
