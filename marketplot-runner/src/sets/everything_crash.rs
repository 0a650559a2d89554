//! Indices, metals and bitcoin rebased to February 1, 2026, showing the
//! synchronized sell-off of February 12.

use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{events, ymd};
use crate::output::Chart;
use chrono::Duration;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::rebase_at;
use marketplot_core::SeriesTable;
use marketplot_render::{
    date_x, palette, Axis, Figure, LegendPosition, Line, Marker, Note, Rgb, Span, XAxis,
};

pub const FILES: [&str; 1] = ["everything_crash_synchronous.png"];

/// `(symbol, legend name, color)` in draw order.
const MARKETS: [(&str, &str, Rgb); 6] = [
    ("^GSPC", "SPX (S&P 500)", Rgb::from_hex(0x1f77b4)),
    ("^GDAXI", "DEU40 (DAX)", Rgb::from_hex(0xff7f0e)),
    ("^IXIC", "US100 (Nasdaq)", Rgb::from_hex(0x2ca02c)),
    ("GC=F", "Gold", Rgb::from_hex(0xd62728)),
    ("SI=F", "Silver", Rgb::from_hex(0x9467bd)),
    ("BTC-USD", "Bitcoin", palette::BITCOIN),
];

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let symbols: Vec<&str> = MARKETS.iter().map(|(s, _, _)| *s).collect();
    let request = FrameRequest::new(
        "everything-crash",
        &symbols,
        FetchWindow::range(ymd(2026, 1, 29), ymd(2026, 2, 13)),
    );
    let closes = ctx.closes(&request)?;
    Ok(vec![Chart::new(FILES[0], everything_crash(&closes)?)])
}

/// Every market indexed to its last close on or before February 1; weekend and
/// holiday gaps after that carry the previous value.
pub fn everything_crash(closes: &SeriesTable) -> Result<Figure, RunError> {
    let indexed = rebase_at(closes, ymd(2026, 2, 1))?.forward_fill();
    let crash = events::everything_crash();

    let mut fig = Figure::new(r#"The February 12 "Everything Crash": Synchronous Liquidation"#)
        .size(1400, 800)
        .x_axis(XAxis::dates("%b %d").label("Date"))
        .y_axis(Axis::linear().label("Indexed Price (Feb 1 = 100)"))
        .legend(LegendPosition::LowerLeft);

    for (symbol, name, color) in MARKETS {
        let Some(values) = indexed.column(symbol) else {
            continue;
        };
        fig.push(
            Line::dated(indexed.dates(), values, color)
                .label(name)
                .alpha(0.8)
                .marker(Marker::Circle, 4),
        );
    }

    fig.push(Span::dates(crash, crash + Duration::days(1), palette::CRASH).label("Feb 12 Crash"));

    let trough = indexed
        .columns()
        .iter()
        .filter_map(|c| indexed.value_at_or_before(c, crash))
        .fold(f64::INFINITY, f64::min);
    if !trough.is_finite() {
        return Err(RunError::Insufficient(format!("no indexed value on or before {crash}")));
    }
    fig.push(
        Note::new("Systemic Liquidity Crisis\n(Dash for Cash)", (date_x(ymd(2026, 2, 7)), 82.0))
            .arrow_to((date_x(crash), trough))
            .size(16.0)
            .bold(),
    );
    Ok(fig)
}
