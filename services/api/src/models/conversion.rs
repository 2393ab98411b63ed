//! Conversion history model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use units::ConversionKind;

/// A stored conversion history row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: f64,
    pub to_value: f64,
    pub exchange_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Conversion creation payload
///
/// The owning user is resolved from the authenticated request, never from
/// the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversion {
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: f64,
    pub to_value: f64,
    pub exchange_rate: Option<f64>,
}
