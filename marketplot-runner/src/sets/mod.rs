//! Chart sets: one per article, each a fixed list of PNG files.
//!
//! A set builds every figure first and writes afterwards, so a failed download
//! leaves no partial set behind.

pub mod bitcoin_constant;
pub mod bitcoin_crash;
pub mod bitcoin_crash_deep;
pub mod debt;
pub mod everything_crash;
pub mod great_automation;
pub mod k_shaped_economy;
pub mod k_shaped_survival;
pub mod liquidity_rotation;

use crate::context::RunContext;
use crate::error::RunError;
use crate::output::{Chart, OutputDir};
use chrono::NaiveDate;
use marketplot_core::{AnnotationPoint, SeriesTable};
use marketplot_render::{date_x, Line, Rgb};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSet {
    BitcoinConstant,
    BitcoinCrash,
    BitcoinCrashDeep,
    EverythingCrash,
    KShapedEconomy,
    KShapedSurvival,
    LiquidityRotation,
    Debt,
    GreatAutomation,
}

impl ChartSet {
    pub const ALL: [ChartSet; 9] = [
        ChartSet::BitcoinConstant,
        ChartSet::BitcoinCrash,
        ChartSet::BitcoinCrashDeep,
        ChartSet::EverythingCrash,
        ChartSet::KShapedEconomy,
        ChartSet::KShapedSurvival,
        ChartSet::LiquidityRotation,
        ChartSet::Debt,
        ChartSet::GreatAutomation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartSet::BitcoinConstant => "bitcoin-constant",
            ChartSet::BitcoinCrash => "bitcoin-crash",
            ChartSet::BitcoinCrashDeep => "bitcoin-crash-deep",
            ChartSet::EverythingCrash => "everything-crash",
            ChartSet::KShapedEconomy => "k-shaped-economy",
            ChartSet::KShapedSurvival => "k-shaped-survival",
            ChartSet::LiquidityRotation => "liquidity-rotation",
            ChartSet::Debt => "debt",
            ChartSet::GreatAutomation => "great-automation",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            ChartSet::BitcoinConstant => "legacy assets priced in BTC, supply and purchasing power",
            ChartSet::BitcoinCrash => "IBIT against software and gold through the February 2026 crash",
            ChartSet::BitcoinCrashDeep => "CME basis, ETF volume and cross-asset volatility",
            ChartSet::EverythingCrash => "global indices and metals rebased to February 1",
            ChartSet::KShapedEconomy => "AI infrastructure against the broad market",
            ChartSet::KShapedSurvival => "asset divergence, the SaaS gap and monetary energy",
            ChartSet::LiquidityRotation => "bitcoin against safe havens, with a scenario projection",
            ChartSet::Debt => "AI leaders, treasury holdings and reserve shares",
            ChartSet::GreatAutomation => "AI cost scaling and BTC order blocks",
        }
    }

    /// The files this set writes, in order.
    pub fn files(self) -> &'static [&'static str] {
        match self {
            ChartSet::BitcoinConstant => &bitcoin_constant::FILES,
            ChartSet::BitcoinCrash => &bitcoin_crash::FILES,
            ChartSet::BitcoinCrashDeep => &bitcoin_crash_deep::FILES,
            ChartSet::EverythingCrash => &everything_crash::FILES,
            ChartSet::KShapedEconomy => &k_shaped_economy::FILES,
            ChartSet::KShapedSurvival => &k_shaped_survival::FILES,
            ChartSet::LiquidityRotation => &liquidity_rotation::FILES,
            ChartSet::Debt => &debt::FILES,
            ChartSet::GreatAutomation => &great_automation::FILES,
        }
    }

    /// Every figure of the set, without touching the filesystem.
    pub fn build(self, ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
        match self {
            ChartSet::BitcoinConstant => bitcoin_constant::build(ctx),
            ChartSet::BitcoinCrash => bitcoin_crash::build(ctx),
            ChartSet::BitcoinCrashDeep => bitcoin_crash_deep::build(ctx),
            ChartSet::EverythingCrash => everything_crash::build(ctx),
            ChartSet::KShapedEconomy => k_shaped_economy::build(ctx),
            ChartSet::KShapedSurvival => k_shaped_survival::build(ctx),
            ChartSet::LiquidityRotation => liquidity_rotation::build(ctx),
            ChartSet::Debt => debt::build(ctx),
            ChartSet::GreatAutomation => great_automation::build(ctx),
        }
    }

    /// Build the set and write its files into `out`.
    pub fn run(self, ctx: &RunContext<'_>, out: &OutputDir) -> Result<Vec<PathBuf>, RunError> {
        info!(set = self.name(), source = ctx.source.name(), "building chart set");
        let charts = self.build(ctx)?;
        let written = charts
            .iter()
            .map(|chart| out.write(chart))
            .collect::<Result<Vec<_>, _>>()?;
        info!(set = self.name(), files = written.len(), dir = %out.root().display(), "chart set done");
        Ok(written)
    }
}

impl fmt::Display for ChartSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartSet {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|set| set.name() == s)
            .ok_or_else(|| RunError::UnknownSet(s.to_string()))
    }
}

/// A dated line for one column, labelled with the column name.
pub(crate) fn column_line(table: &SeriesTable, column: &str, color: Rgb) -> Result<Line, RunError> {
    Ok(Line::dated(table.dates(), table.require(column)?, color).label(column))
}

/// `"Label (+12.3%)"` from the last value of a rebased column.
pub(crate) fn with_gain(label: &str, rebased_last: Option<f64>) -> String {
    match rebased_last {
        Some(v) if v.is_finite() => format!("{label} ({:+.1}%)", v - 100.0),
        _ => label.to_string(),
    }
}

/// Plot coordinates of a mark: its date, and the series value on that date or
/// the closest earlier session.
pub(crate) fn point_at(table: &SeriesTable, mark: &AnnotationPoint) -> Result<(f64, f64), RunError> {
    mark.resolve(table)
        .map(|(date, v)| (date_x(date), v))
        .ok_or_else(|| {
            RunError::Insufficient(format!(
                "no '{}' value on or before {} for \"{}\"",
                mark.series, mark.date, mark.label
            ))
        })
}

/// The date and value `back` rows from the end (`1` is the last row).
pub(crate) fn from_end(table: &SeriesTable, column: &str, back: usize) -> Option<(NaiveDate, f64)> {
    let i = table.len().checked_sub(back)?;
    Some((table.dates()[i], table.column(column)?[i]))
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn gain_label_carries_the_rounded_change(
            label in "[A-Za-z0-9&() ]{1,16}",
            rebased in -1.0e6f64..1.0e6,
        ) {
            let text = with_gain(&label, Some(rebased));
            let prefix = format!("{label} (");
            prop_assert!(text.starts_with(&prefix));
            prop_assert!(text.ends_with("%)"));

            let number = &text[prefix.len()..text.len() - 2];
            prop_assert!(number.starts_with('+') || number.starts_with('-'));
            let parsed: f64 = number.parse().unwrap();
            prop_assert!((parsed - (rebased - 100.0)).abs() <= 0.05 + 1e-9);
        }

        #[test]
        fn non_finite_gain_leaves_the_label_alone(label in "[A-Za-z ]{1,16}") {
            for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                prop_assert_eq!(with_gain(&label, Some(v)), label.clone());
            }
        }

        #[test]
        fn every_set_name_parses_back(i in 0..ChartSet::ALL.len()) {
            let set = ChartSet::ALL[i];
            prop_assert_eq!(set.name().parse::<ChartSet>().unwrap(), set);
        }
    }
}
