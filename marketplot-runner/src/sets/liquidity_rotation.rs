//! Bitcoin against the S&P 500, gold and the dollar since 2016, with the gap
//! to a gold/dollar safe-haven basket shaded. When real data stops short of
//! February 11, 2026 the series are extended along fixed scenario paths.

use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{events, rotation, ymd};
use crate::output::Chart;
use chrono::NaiveDate;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::{extend_to, pair_mean, rebase, ProjectionPath};
use marketplot_core::{DropRule, SeriesTable};
use marketplot_render::{
    date_x, palette, Axis, Fill, Figure, Line, Note, RefLine, Region, Rgb, XAxis,
};
use tracing::info;

pub const FILES: [&str; 2] = ["strength_overlap_macro.png", "strength_overlap_micro.png"];

const BITCOIN: &str = "Bitcoin";
const SP500: &str = "S&P 500";
const GOLD: &str = "Gold";
const USD: &str = "USD Index";

/// `(symbol, column name, color)`.
const ASSETS: [(&str, &str, Rgb); 4] = [
    ("BTC-USD", BITCOIN, palette::BITCOIN),
    ("SPY", SP500, palette::EQUITY),
    ("GC=F", GOLD, palette::GOLD),
    ("DX-Y.NYB", USD, palette::DOLLAR),
];

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let symbols: Vec<&str> = ASSETS.iter().map(|(s, _, _)| *s).collect();
    let request = FrameRequest::new(
        "liquidity-rotation",
        &symbols,
        FetchWindow::since(ymd(2016, 1, 1)),
    );
    let closes = ctx.closes(&request)?;
    let strength = with_projection(&named(&closes)?)?;

    Ok(vec![
        Chart::new(
            FILES[0],
            strength_chart(&strength, View::Macro, ctx.today)?,
        ),
        Chart::new(
            FILES[1],
            strength_chart(&strength, View::Micro, ctx.today)?,
        ),
    ])
}

/// Columns renamed from symbols to asset names, gaps filled, then trimmed to
/// rows where every asset has a value.
pub fn named(closes: &SeriesTable) -> Result<SeriesTable, RunError> {
    let mut t = closes.clone();
    for (symbol, name, _) in ASSETS {
        t = t.rename(symbol, name)?;
    }
    Ok(t.forward_fill().drop_missing(DropRule::Any))
}

/// Extend through the scenario target date if real data ends before it.
pub fn with_projection(table: &SeriesTable) -> Result<SeriesTable, RunError> {
    let target = events::rotation_target();
    match table.last_date() {
        Some(last) if last < target => {
            info!(%last, %target, "projecting rotation scenario");
            let paths = [
                (
                    BITCOIN,
                    ProjectionPath::new(vec![rotation::BITCOIN_PEAK, rotation::BITCOIN_END]),
                ),
                (SP500, ProjectionPath::linear(rotation::EQUITY_END)),
                (GOLD, ProjectionPath::linear(rotation::SAFE_HAVEN_END)),
                (USD, ProjectionPath::linear(rotation::SAFE_HAVEN_END)),
            ];
            Ok(extend_to(table, target, &paths)?)
        }
        _ => Ok(table.clone()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Whole history, log scale.
    Macro,
    /// From 2024, linear scale.
    Micro,
}

impl View {
    fn start(self) -> Option<NaiveDate> {
        match self {
            View::Macro => None,
            View::Micro => Some(ymd(2024, 1, 1)),
        }
    }
}

/// Every asset rebased to the first visible row, with the gap to the
/// safe-haven basket shaded and a marker where real data ends.
pub fn strength_chart(table: &SeriesTable, view: View, today: NaiveDate) -> Result<Figure, RunError> {
    let visible = match view.start() {
        Some(start) => table.since(start),
        None => table.clone(),
    };
    let norm = rebase(&visible)?;
    let xs: Vec<f64> = norm.dates().iter().copied().map(date_x).collect();

    let (title, axis) = match view {
        View::Macro => (
            "Macro Analytics: Relative Strength & Rotation Cycles",
            Axis::log().label("Strength Index (Log Scale, Start=100)"),
        ),
        View::Micro => (
            "Micro Analytics: The 2026 Rotation Crossing",
            Axis::linear().label("Strength Index (Start = 100)"),
        ),
    };
    let mut fig = Figure::new(title)
        .size(1500, 1000)
        .x_axis(XAxis::dates("%Y-%m").label("Date"))
        .y_axis(axis);

    for (_, name, color) in ASSETS {
        let (width, alpha) = if name == BITCOIN { (3.0, 1.0) } else { (2.0, 0.8) };
        fig.push(
            Line::new(xs.clone(), norm.require(name)?.to_vec(), color)
                .label(name)
                .width(width)
                .alpha(alpha),
        );
    }

    let basket = pair_mean(&norm, GOLD, USD)?;
    let btc = norm.require(BITCOIN)?.to_vec();
    fig.push(
        Fill::between(xs.clone(), btc.clone(), basket.clone(), palette::BITCOIN)
            .region(Region::Above)
            .label("Bitcoin Outperformance"),
    );
    fig.push(
        Fill::between(xs, btc, basket, palette::DOLLAR)
            .region(Region::Below)
            .label("Safe Haven Rotation"),
    );

    let inside = matches!(
        (norm.first_date(), norm.last_date()),
        (Some(first), Some(last)) if first < today && today < last
    );
    if inside {
        let floor = norm
            .iter_columns()
            .flat_map(|(_, col)| col.iter().copied())
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, f64::min);
        let x = date_x(today);
        fig.push(RefLine::vertical(x, palette::INK).width(2.0).alpha(0.6));
        fig.push(Note::new(" ← REAL DATA | PROJECTION →", (x, floor * 1.1)).bold().size(12.0));
    }
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use marketplot_render::Layer;

    /// Daily closes from Dec 1, 2023 through Feb 1, 2026, by symbol.
    fn closes() -> SeriesTable {
        let start = ymd(2023, 12, 1);
        let n = (ymd(2026, 2, 1) - start).num_days() + 1;
        let dates: Vec<_> = (0..n).map(|d| start + Duration::days(d)).collect();
        let cols = ASSETS
            .iter()
            .enumerate()
            .map(|(k, (symbol, _, _))| {
                let values = (0..n).map(|i| 100.0 + (k as f64 + 1.0) * i as f64 * 0.01).collect();
                (symbol.to_string(), values)
            })
            .collect();
        SeriesTable::new(dates, cols).unwrap()
    }

    #[test]
    fn short_history_is_projected_to_the_target() {
        let t = with_projection(&named(&closes()).unwrap()).unwrap();
        assert_eq!(t.last_date(), Some(events::rotation_target()));
        assert_eq!(t.columns(), &[BITCOIN, SP500, GOLD, USD]);

        let last_real = named(&closes()).unwrap().last_value(GOLD).unwrap();
        let projected = t.last_value(GOLD).unwrap();
        assert!((projected / last_real - rotation::SAFE_HAVEN_END).abs() < 1e-9);
    }

    #[test]
    fn micro_view_rebases_at_2024() {
        let t = with_projection(&named(&closes()).unwrap()).unwrap();
        let fig = strength_chart(&t, View::Micro, ymd(2026, 2, 5)).unwrap();
        let Layer::Line(btc) = &fig.layers[0] else {
            panic!("expected the bitcoin line first");
        };
        assert_eq!(btc.xs[0], date_x(ymd(2024, 1, 1)));
        assert_eq!(btc.ys[0], 100.0);
        assert_eq!(fig.y_axis.scale, marketplot_render::Scale::Linear);
    }

    #[test]
    fn today_inside_the_range_marks_the_projection() {
        let t = with_projection(&named(&closes()).unwrap()).unwrap();
        let fig = strength_chart(&t, View::Macro, ymd(2026, 2, 5)).unwrap();
        assert_eq!(fig.count(|l| matches!(l, Layer::RefLine(_))), 1);
        assert_eq!(fig.count(|l| matches!(l, Layer::Note(_))), 1);

        let later = strength_chart(&t, View::Macro, ymd(2026, 6, 1)).unwrap();
        assert_eq!(later.count(|l| matches!(l, Layer::RefLine(_))), 0);
    }

    #[test]
    fn fills_split_at_the_basket() {
        let t = with_projection(&named(&closes()).unwrap()).unwrap();
        let fig = strength_chart(&t, View::Macro, ymd(2026, 6, 1)).unwrap();
        assert_eq!(
            fig.legend_labels()[4..],
            ["Bitcoin Outperformance", "Safe Haven Rotation"]
        );
    }
}
