//! Conversion kinds and history records shared across the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown conversion kind
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown conversion kind: {0}")]
pub struct UnknownKind(pub String);

/// The category a conversion or favorite belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
    Currency,
    Length,
    Weight,
    Clothing,
}

impl ConversionKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionKind::Currency => "currency",
            ConversionKind::Length => "length",
            ConversionKind::Weight => "weight",
            ConversionKind::Clothing => "clothing",
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "currency" => Ok(ConversionKind::Currency),
            "length" => Ok(ConversionKind::Length),
            "weight" => Ok(ConversionKind::Weight),
            "clothing" => Ok(ConversionKind::Clothing),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A single performed conversion, ready to be stored in the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub kind: ConversionKind,
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: f64,
    pub to_value: f64,
    pub exchange_rate: Option<f64>,
}
