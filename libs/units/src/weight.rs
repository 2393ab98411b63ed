//! Weight conversion with fixed multiplicative factors
//!
//! Kilograms are the base unit.

use crate::record::{ConversionEntry, ConversionKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown weight unit
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown weight unit: {0}")]
pub struct UnknownWeightUnit(pub String);

/// Supported weight units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
    G,
    Oz,
}

impl WeightUnit {
    /// All supported units, base first
    pub const ALL: [WeightUnit; 4] = [
        WeightUnit::Kg,
        WeightUnit::Lb,
        WeightUnit::G,
        WeightUnit::Oz,
    ];

    /// Units per kilogram
    pub fn factor(&self) -> f64 {
        match self {
            WeightUnit::Kg => 1.0,
            WeightUnit::Lb => 2.20462,
            WeightUnit::G => 1000.0,
            WeightUnit::Oz => 35.274,
        }
    }

    /// Get the unit name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
            WeightUnit::G => "g",
            WeightUnit::Oz => "oz",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = UnknownWeightUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(WeightUnit::Kg),
            "lb" => Ok(WeightUnit::Lb),
            "g" => Ok(WeightUnit::G),
            "oz" => Ok(WeightUnit::Oz),
            other => Err(UnknownWeightUnit(other.to_string())),
        }
    }
}

/// Convert a value in `unit` to kilograms
pub fn to_base(value: f64, unit: WeightUnit) -> f64 {
    value / unit.factor()
}

/// Convert a value in kilograms to `unit`
pub fn from_base(kg: f64, unit: WeightUnit) -> f64 {
    kg * unit.factor()
}

/// Convert between two arbitrary weight units through the base
pub fn convert(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    from_base(to_base(value, from), to)
}

/// Weight converter panel state, same editing model as the length panel
#[derive(Debug, Clone)]
pub struct WeightPanel {
    values: HashMap<WeightUnit, String>,
    last_changed: WeightUnit,
}

impl Default for WeightPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightPanel {
    /// Create a panel with the default 70 kg preset
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(WeightUnit::Kg, "70".to_string());
        values.insert(WeightUnit::Lb, "154.32".to_string());
        values.insert(WeightUnit::G, "70000".to_string());
        values.insert(WeightUnit::Oz, "2469.17".to_string());

        Self {
            values,
            last_changed: WeightUnit::Kg,
        }
    }

    /// Apply a user edit to one field and re-derive the others
    pub fn set_value(&mut self, unit: WeightUnit, input: &str) -> Option<ConversionEntry> {
        let num = input.parse::<f64>().unwrap_or(0.0);
        self.last_changed = unit;

        let kg = to_base(num, unit);
        for other in WeightUnit::ALL {
            let derived = from_base(kg, other);
            let formatted = match other {
                // Kilograms and grams are shown unrounded
                WeightUnit::Kg | WeightUnit::G => format!("{}", derived),
                _ => format!("{:.2}", derived),
            };
            self.values.insert(other, formatted);
        }
        self.values.insert(unit, input.to_string());

        if num > 0.0 {
            Some(ConversionEntry {
                kind: ConversionKind::Weight,
                from_unit: unit.as_str().to_string(),
                to_unit: WeightUnit::Kg.as_str().to_string(),
                from_value: num,
                to_value: kg,
                exchange_rate: None,
            })
        } else {
            None
        }
    }

    /// Get the display value for a unit
    pub fn value(&self, unit: WeightUnit) -> &str {
        self.values.get(&unit).map(String::as_str).unwrap_or("0")
    }

    /// The unit the user edited last
    pub fn last_changed(&self) -> WeightUnit {
        self.last_changed
    }
}
