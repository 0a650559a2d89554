//! Price fields as they appear in provider column labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the per-day fields a market-data response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    AdjustedClose,
    Close,
    Open,
    High,
    Low,
    Volume,
}

impl PriceField {
    pub const ALL: [PriceField; 6] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::AdjustedClose,
        PriceField::Volume,
    ];

    /// Label used when this crate writes a column.
    pub fn label(self) -> &'static str {
        match self {
            PriceField::AdjustedClose => "Adj Close",
            PriceField::Close => "Close",
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Volume => "Volume",
        }
    }

    /// Whether a column label names this field. Exact match: "Adj Close" is
    /// never mistaken for "Close".
    pub fn matches(self, label: &str) -> bool {
        match self {
            PriceField::AdjustedClose => label == "Adj Close" || label == "Adjusted Close",
            other => label == other.label(),
        }
    }

    /// The field a label names, if any.
    pub fn from_label(label: &str) -> Option<PriceField> {
        Self::ALL.into_iter().find(|f| f.matches(label))
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_close_accepts_both_spellings() {
        assert!(PriceField::AdjustedClose.matches("Adj Close"));
        assert!(PriceField::AdjustedClose.matches("Adjusted Close"));
        assert!(!PriceField::Close.matches("Adj Close"));
        assert!(!PriceField::Close.matches("close"));
    }

    #[test]
    fn from_label_roundtrips_every_field() {
        for field in PriceField::ALL {
            assert_eq!(PriceField::from_label(field.label()), Some(field));
        }
        assert_eq!(PriceField::from_label("Ticker"), None);
    }
}
