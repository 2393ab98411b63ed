//! Conversion engine for the UnitHub application
//!
//! This crate holds the arithmetic behind every converter panel: fixed-factor
//! length and weight conversion, static clothing/shoe size tables, currency
//! amount arithmetic and the four-function calculator state machine. The API
//! service and any front end share this single implementation.

pub mod calculator;
pub mod currency;
pub mod length;
pub mod record;
pub mod sizes;
pub mod weight;

// Re-export for convenience
pub use record::{ConversionEntry, ConversionKind, UnknownKind};
