//! Length conversion with fixed multiplicative factors
//!
//! Centimetres are the base unit; every other unit is expressed as a fixed
//! number of units per centimetre, so any pair converts through the base.

use crate::record::{ConversionEntry, ConversionKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown length unit
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown length unit: {0}")]
pub struct UnknownLengthUnit(pub String);

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    M,
    In,
    Ft,
    Yd,
}

impl LengthUnit {
    /// All supported units, base first
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Cm,
        LengthUnit::M,
        LengthUnit::In,
        LengthUnit::Ft,
        LengthUnit::Yd,
    ];

    /// Units per centimetre
    pub fn factor(&self) -> f64 {
        match self {
            LengthUnit::Cm => 1.0,
            LengthUnit::M => 0.01,
            LengthUnit::In => 0.393701,
            LengthUnit::Ft => 0.0328084,
            LengthUnit::Yd => 0.0109361,
        }
    }

    /// Get the unit name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
            LengthUnit::Ft => "ft",
            LengthUnit::Yd => "yd",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthUnit {
    type Err = UnknownLengthUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            "in" => Ok(LengthUnit::In),
            "ft" => Ok(LengthUnit::Ft),
            "yd" => Ok(LengthUnit::Yd),
            other => Err(UnknownLengthUnit(other.to_string())),
        }
    }
}

/// Convert a value in `unit` to centimetres
pub fn to_base(value: f64, unit: LengthUnit) -> f64 {
    value / unit.factor()
}

/// Convert a value in centimetres to `unit`
pub fn from_base(cm: f64, unit: LengthUnit) -> f64 {
    cm * unit.factor()
}

/// Convert between two arbitrary length units through the base
pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    from_base(to_base(value, from), to)
}

/// Length converter panel state
///
/// Holds one display value per unit. Editing any field re-derives every
/// other field from the base value; the edited field keeps the user's
/// input verbatim.
#[derive(Debug, Clone)]
pub struct LengthPanel {
    values: HashMap<LengthUnit, String>,
    last_changed: LengthUnit,
}

impl Default for LengthPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LengthPanel {
    /// Create a panel with the default 100 cm preset
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(LengthUnit::Cm, "100".to_string());
        values.insert(LengthUnit::M, "1".to_string());
        values.insert(LengthUnit::In, "39.37".to_string());
        values.insert(LengthUnit::Ft, "3.28".to_string());
        values.insert(LengthUnit::Yd, "1.09".to_string());

        Self {
            values,
            last_changed: LengthUnit::Cm,
        }
    }

    /// Apply a user edit to one field and re-derive the others
    ///
    /// Returns the history entry for the edit (input unit converted to the
    /// base unit) when the entered value is positive; invalid or
    /// non-positive input produces no entry.
    pub fn set_value(&mut self, unit: LengthUnit, input: &str) -> Option<ConversionEntry> {
        let num = input.parse::<f64>().unwrap_or(0.0);
        self.last_changed = unit;

        let cm = to_base(num, unit);
        for other in LengthUnit::ALL {
            let derived = from_base(cm, other);
            let formatted = match other {
                LengthUnit::Cm => format!("{}", derived),
                _ => format!("{:.2}", derived),
            };
            self.values.insert(other, formatted);
        }
        // Keep the user's input as-is
        self.values.insert(unit, input.to_string());

        if num > 0.0 {
            Some(ConversionEntry {
                kind: ConversionKind::Length,
                from_unit: unit.as_str().to_string(),
                to_unit: LengthUnit::Cm.as_str().to_string(),
                from_value: num,
                to_value: cm,
                exchange_rate: None,
            })
        } else {
            None
        }
    }

    /// Get the display value for a unit
    pub fn value(&self, unit: LengthUnit) -> &str {
        self.values.get(&unit).map(String::as_str).unwrap_or("0")
    }

    /// The unit the user edited last
    pub fn last_changed(&self) -> LengthUnit {
        self.last_changed
    }
}
