//! The automation story on a dark canvas: AI training cost against the human
//! labor index, and bitcoin order blocks and fair value gaps over the last
//! two months.

use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{automation, years_x};
use crate::output::Chart;
use chrono::Duration;
use marketplot_core::data::{extract_ohlc, FetchWindow, FrameLayout, FrameRequest};
use marketplot_core::transform::{fair_value_gaps, order_blocks};
use marketplot_core::Ohlc;
use marketplot_render::{
    date_x, Axis, Candles, Dash, Figure, Line, Marker, Rgb, Theme, XAxis, Zone,
};

pub const FILES: [&str; 2] = ["ai_vs_labor.png", "smc_visualization.png"];

const CYAN: Rgb = Rgb::from_hex(0x00ffcc);
const MAGENTA: Rgb = Rgb::from_hex(0xff007f);
const WHITE: Rgb = Rgb(255, 255, 255);

const BTC: &str = "BTC-USD";
const GAPS_SHOWN: usize = 3;
const BLOCKS_SHOWN: usize = 2;

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let request = FrameRequest::new("smc", &[BTC], FetchWindow::lookback_days(60))
        .with_layout(FrameLayout::Flat);
    let frame = ctx.frame(&request)?;
    let candles = extract_ohlc(&frame, BTC)?.complete_only();

    Ok(vec![
        Chart::new(FILES[0], ai_vs_labor()),
        Chart::new(FILES[1], smc_visualization(&candles)?),
    ])
}

/// Log-scale training cost on the left, linear labor index on the right.
pub fn ai_vs_labor() -> Figure {
    let xs = years_x(&automation::YEARS);
    Figure::new("The Automation Disparity: AI Scaling vs Human Labor")
        .theme(Theme::dark())
        .x_axis(XAxis::numeric().label("Year"))
        .y_axis(Axis::log().label("AI Training Cost ($)"))
        .y2_axis(Axis::linear().label("Human Labor Cost Index"))
        .layer(
            Line::new(xs.clone(), automation::AI_COSTS.to_vec(), CYAN)
                .label("AI Model Training Cost")
                .width(3.0)
                .marker(Marker::Circle, 6),
        )
        .layer(
            Line::new(xs, automation::LABOR_INDEX.to_vec(), MAGENTA)
                .label("Human Labor Cost Index")
                .width(2.0)
                .dash(Dash::Dashed)
                .marker(Marker::Square, 6)
                .secondary(),
        )
}

/// Candles with the most recent gaps and order blocks drawn as boxes that
/// reach a few days to the right of their session.
pub fn smc_visualization(candles: &Ohlc) -> Result<Figure, RunError> {
    if candles.is_empty() {
        return Err(RunError::Insufficient(format!("no complete {BTC} sessions")));
    }
    let mut fig = Figure::new("Decoding Institutional Intent: BTC/USD Order Blocks & FVGs")
        .size(1400, 800)
        .theme(Theme::dark())
        .x_axis(XAxis::dates("%b %d").label("Date"))
        .y_axis(Axis::linear().label("Price (USD)"))
        .layer(
            Line::dated(&candles.dates, &candles.close, WHITE)
                .label("BTC Price")
                .alpha(0.3),
        )
        .layer(Candles::dated(
            &candles.dates,
            &candles.open,
            &candles.high,
            &candles.low,
            &candles.close,
        ));

    let gaps = fair_value_gaps(candles);
    for gap in &gaps[gaps.len().saturating_sub(GAPS_SHOWN)..] {
        let x0 = date_x(gap.date);
        fig.push(
            Zone::new((x0, date_x(gap.date + Duration::days(5))), (gap.bottom, gap.top), CYAN)
                .alpha(0.3)
                .label("Fair Value Gap (FVG)"),
        );
    }

    let blocks = order_blocks(candles);
    for block in &blocks[blocks.len().saturating_sub(BLOCKS_SHOWN)..] {
        let x0 = date_x(block.date);
        fig.push(
            Zone::new((x0, date_x(block.date + Duration::days(10))), (block.bottom, block.top), MAGENTA)
                .alpha(0.4)
                .label("Institutional Order Block"),
        );
    }
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ymd;
    use marketplot_render::{AxisSide, Layer};

    /// Alternating rallies that leave a gap above every second candle.
    fn staircase(n: usize) -> Ohlc {
        let dates: Vec<_> = (0..n).map(|d| ymd(2026, 1, 1) + Duration::days(d as i64)).collect();
        let open: Vec<f64> = (0..n).map(|i| 100.0 + 10.0 * i as f64).collect();
        let close: Vec<f64> = open.iter().map(|o| o + 8.0).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = open.iter().map(|o| o - 1.0).collect();
        Ohlc::new(dates, open, high, low, close).unwrap()
    }

    #[test]
    fn only_the_latest_gaps_are_drawn() {
        let candles = staircase(12);
        assert!(fair_value_gaps(&candles).len() > GAPS_SHOWN);

        let fig = smc_visualization(&candles).unwrap();
        let zones: Vec<_> = fig
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Zone(z) => Some(z),
                _ => None,
            })
            .collect();
        assert_eq!(zones.len(), GAPS_SHOWN);
        let last = zones[GAPS_SHOWN - 1];
        assert_eq!(last.x1 - last.x0, 5.0);
        assert_eq!(last.x0, date_x(ymd(2026, 1, 11)));
    }

    #[test]
    fn no_sessions_is_insufficient() {
        let empty = Ohlc::new(vec![], vec![], vec![], vec![], vec![]).unwrap();
        assert!(matches!(smc_visualization(&empty), Err(RunError::Insufficient(_))));
    }

    #[test]
    fn labor_index_sits_on_the_second_axis() {
        let fig = ai_vs_labor();
        assert!(fig.y2_axis.is_some());
        let Layer::Line(labor) = &fig.layers[1] else {
            panic!("expected the labor line");
        };
        assert_eq!(labor.axis, AxisSide::Secondary);
        assert_eq!(fig.y_axis.scale, marketplot_render::Scale::Log);
    }
}
