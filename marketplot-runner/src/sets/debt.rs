//! Debt, reserves and AI: the AI leaders against the S&P 500, China's treasury
//! holdings, central-bank reserve shares and job exposure to AI.

use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{china, job_exposure, reserves, years_x};
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::{rebase, row_mean};
use marketplot_core::{DropRule, SeriesTable};
use marketplot_render::{Axis, Bars, Figure, Fill, Line, Marker, Rgb, XAxis};

pub const FILES: [&str; 4] = [
    "market_divergence.png",
    "china_divestment.png",
    "safe_haven_flip.png",
    "job_exposure.png",
];

const AI_LEADERS: [&str; 7] = ["NVDA", "MSFT", "GOOGL", "AMZN", "META", "AVGO", "TSM"];
const SPY: &str = "SPY";

const AI_BLUE: Rgb = Rgb::from_hex(0x2979ff);
const SPY_PINK: Rgb = Rgb::from_hex(0xf50057);
const RED: Rgb = Rgb::from_hex(0xd32f2f);
const GREY: Rgb = Rgb::from_hex(0xbdbdbd);
const BLUE: Rgb = Rgb::from_hex(0x1976d2);
const GOLD: Rgb = Rgb::from_hex(0xfbc02d);

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let mut symbols = AI_LEADERS.to_vec();
    symbols.push(SPY);
    let request = FrameRequest::new("market-divergence", &symbols, FetchWindow::lookback_days(5 * 365));
    let prices = ctx.table(&request)?;

    Ok(vec![
        Chart::new(FILES[0], market_divergence(&prices)?),
        Chart::new(FILES[1], china_divestment()),
        Chart::new(FILES[2], safe_haven_flip()),
        Chart::new(FILES[3], job_exposure()),
    ])
}

/// Equal-weighted mean of the rebased AI names against SPY.
pub fn market_divergence(prices: &SeriesTable) -> Result<Figure, RunError> {
    let norm = rebase(&prices.drop_missing(DropRule::All))?;
    let leaders = row_mean(&norm, &AI_LEADERS)?;

    Ok(Figure::new("The Great Divergence: AI Leaders vs. Traditional Market")
        .x_axis(XAxis::dates("%Y").label("Year"))
        .y_axis(Axis::linear().label("Normalized Performance (Base 100)"))
        .layer(Line::dated(norm.dates(), &leaders, AI_BLUE).label("AI Leaders Index").width(2.5))
        .layer(
            Line::dated(norm.dates(), norm.require(SPY)?, SPY_PINK)
                .label("S&P 500 (SPY)")
                .alpha(0.8),
        ))
}

pub fn china_divestment() -> Figure {
    let xs = years_x(&china::YEARS);
    Figure::new("China's Structural Exit from U.S. Debt")
        .size(1000, 600)
        .x_axis(XAxis::numeric().label("Year"))
        .y_axis(Axis::linear().label("U.S. Treasury Holdings ($ Billions)"))
        .no_legend()
        .layer(
            Line::new(xs.clone(), china::HOLDINGS.to_vec(), RED)
                .width(3.0)
                .marker(Marker::Circle, 8),
        )
        .layer(Fill::to_level(xs, china::HOLDINGS.to_vec(), 0.0, RED))
}

pub fn safe_haven_flip() -> Figure {
    let width = 0.35;
    Figure::new("The Safe Haven Flip: Gold Surpasses Treasuries")
        .size(1000, 600)
        .x_axis(XAxis::categories(&reserves::ASSETS))
        .y_axis(Axis::linear().label("Percentage of Central Bank Reserves (%)"))
        .layer(
            Bars::categories(reserves::DECADE_2010S.to_vec(), -width / 2.0, GREY)
                .width(width)
                .label("2010s Average"),
        )
        .layer(
            Bars::categories(reserves::FEB_2026.to_vec(), width / 2.0, BLUE)
                .width(width)
                .colors(vec![BLUE, GOLD])
                .label("Feb 2026"),
        )
}

pub fn job_exposure() -> Figure {
    let captions = job_exposure::EXPOSURE.iter().map(|v| format!("{v}%")).collect();
    Figure::new("AI Exposure Paradox: Debt vs Displacement")
        .size(1000, 600)
        .x_axis(XAxis::categories(&job_exposure::ECONOMIES))
        .y_axis(Axis::linear().label("Job Exposure to AI (%)").range(0.0, 100.0))
        .no_legend()
        .layer(
            Bars::categories(job_exposure::EXPOSURE.to_vec(), 0.0, Rgb::from_hex(0xe53935))
                .colors(vec![Rgb::from_hex(0xe53935), Rgb::from_hex(0x43a047)])
                .width(0.6)
                .captions(captions),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ymd;
    use marketplot_render::Layer;

    #[test]
    fn leaders_index_is_the_mean_of_rebased_names() {
        let dates = vec![ymd(2024, 1, 2), ymd(2024, 1, 3)];
        let mut cols: Vec<(String, Vec<f64>)> = AI_LEADERS
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), vec![10.0, if i == 0 { 30.0 } else { 10.0 }]))
            .collect();
        cols.push((SPY.to_string(), vec![400.0, 420.0]));
        let prices = SeriesTable::new(dates, cols).unwrap();

        let fig = market_divergence(&prices).unwrap();
        let Layer::Line(leaders) = &fig.layers[0] else {
            panic!("expected the leaders line first");
        };
        // One name tripled, six flat: (300 + 6 * 100) / 7.
        assert!((leaders.ys[1] - 900.0 / 7.0).abs() < 1e-9);
        let Layer::Line(spy) = &fig.layers[1] else {
            panic!("expected the SPY line second");
        };
        assert!((spy.ys[1] - 105.0).abs() < 1e-9);
    }

    #[test]
    fn exposure_axis_is_pinned_to_percent() {
        let fig = job_exposure();
        assert_eq!(fig.y_axis.range, Some((0.0, 100.0)));
        let Layer::Bars(bars) = &fig.layers[0] else {
            panic!("expected bars");
        };
        assert_eq!(bars.captions, vec!["60%", "26%"]);
    }

    #[test]
    fn divestment_fills_to_zero() {
        let fig = china_divestment();
        let Layer::Fill(fill) = &fig.layers[1] else {
            panic!("expected a fill");
        };
        assert!(fill.b.iter().all(|&v| v == 0.0));
    }
}
