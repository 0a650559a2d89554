//! Arithmetic transforms over series tables.
//!
//! Every transform is a pure function of its inputs. Missing values are `NaN`
//! and propagate; nothing here fills gaps unless its name says so.

pub mod basis;
pub mod projection;
pub mod ratio;
pub mod rebase;
pub mod smc;
pub mod volatility;

pub use basis::{annualized_basis, days_to_expiry};
pub use projection::{extend_to, linear_path, linspace, ProjectionPath};
pub use ratio::{pair_mean, ratio, row_mean, to_sats, SATS_PER_BTC};
pub use rebase::{clean_and_rebase, rebase, rebase_at};
pub use smc::{fair_value_gaps, order_blocks, Zone};
pub use volatility::{pct_change, rolling_std, rolling_volatility, TRADING_DAYS};

use crate::domain::TableError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("cannot rebase an empty table")]
    EmptyTable,

    #[error("column '{column}' has an unusable base value {value}")]
    InvalidBase { column: String, value: f64 },

    #[error("no observation on or before {0}")]
    NoBaseline(NaiveDate),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
