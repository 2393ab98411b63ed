//! Clothing and shoe size conversion
//!
//! Sizing is a static lookup table keyed by the US size, not a formula.

use crate::record::{ConversionEntry, ConversionKind};
use serde::{Deserialize, Serialize};

/// Region labels for one size row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeRow {
    pub us: &'static str,
    pub uk: &'static str,
    pub eu: &'static str,
}

/// Which size chart to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKind {
    Clothing,
    Shoes,
}

impl SizeKind {
    /// Get the chart name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKind::Clothing => "clothing",
            SizeKind::Shoes => "shoes",
        }
    }
}

const CLOTHING_SIZES: &[(&str, SizeRow)] = &[
    ("XS", SizeRow { us: "XS", uk: "6", eu: "32" }),
    ("S", SizeRow { us: "S", uk: "8", eu: "34" }),
    ("M", SizeRow { us: "M", uk: "10", eu: "36" }),
    ("L", SizeRow { us: "L", uk: "12", eu: "38" }),
    ("XL", SizeRow { us: "XL", uk: "14", eu: "40" }),
    ("XXL", SizeRow { us: "XXL", uk: "16", eu: "42" }),
];

const SHOE_SIZES: &[(&str, SizeRow)] = &[
    ("6", SizeRow { us: "6", uk: "5.5", eu: "39" }),
    ("6.5", SizeRow { us: "6.5", uk: "6", eu: "39.5" }),
    ("7", SizeRow { us: "7", uk: "6.5", eu: "40" }),
    ("7.5", SizeRow { us: "7.5", uk: "7", eu: "40.5" }),
    ("8", SizeRow { us: "8", uk: "7.5", eu: "41" }),
    ("8.5", SizeRow { us: "8.5", uk: "8", eu: "42" }),
    ("9", SizeRow { us: "9", uk: "8.5", eu: "42.5" }),
    ("9.5", SizeRow { us: "9.5", uk: "9", eu: "43" }),
    ("10", SizeRow { us: "10", uk: "9.5", eu: "44" }),
    ("10.5", SizeRow { us: "10.5", uk: "10", eu: "44.5" }),
    ("11", SizeRow { us: "11", uk: "10.5", eu: "45" }),
    ("11.5", SizeRow { us: "11.5", uk: "11", eu: "45.5" }),
    ("12", SizeRow { us: "12", uk: "11.5", eu: "46" }),
];

fn chart(kind: SizeKind) -> &'static [(&'static str, SizeRow)] {
    match kind {
        SizeKind::Clothing => CLOTHING_SIZES,
        SizeKind::Shoes => SHOE_SIZES,
    }
}

/// Look up the UK/EU labels for a US size
pub fn lookup(kind: SizeKind, us_size: &str) -> Option<SizeRow> {
    chart(kind)
        .iter()
        .find(|(size, _)| *size == us_size)
        .map(|(_, row)| *row)
}

/// The US sizes available on a chart, in chart order
pub fn available_sizes(kind: SizeKind) -> Vec<&'static str> {
    chart(kind).iter().map(|(size, _)| *size).collect()
}

/// Build the history entry for selecting a size on a chart
///
/// Letter sizes have no numeric value and are recorded as 0, matching the
/// numeric columns of the conversion log.
pub fn conversion_entry(kind: SizeKind, us_size: &str) -> Option<ConversionEntry> {
    let row = lookup(kind, us_size)?;

    Some(ConversionEntry {
        kind: ConversionKind::Clothing,
        from_unit: format!("US-{}", kind.as_str()),
        to_unit: format!("UK-EU-{}", kind.as_str()),
        from_value: us_size.parse::<f64>().unwrap_or(0.0),
        to_value: row.eu.parse::<f64>().unwrap_or(0.0),
        exchange_rate: None,
    })
}
