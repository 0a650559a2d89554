//! Which assets kept pace after 2023: ownership against labor, large against
//! small software, and everything against the capital it started from.

use super::with_gain;
use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::ymd;
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::clean_and_rebase;
use marketplot_core::{PriceField, SeriesTable};
use marketplot_render::{palette, Axis, Dash, Figure, Fill, Line, RefLine, Rgb, XAxis};

pub const FILES: [&str; 3] = ["asset_divergence.png", "saas_trap.png", "monetary_energy.png"];

const BTC: &str = "BTC-USD";
const XLK: &str = "XLK";
const GLD: &str = "GLD";
const IWM: &str = "IWM";
const WCLD: &str = "WCLD";

const TECH_BLUE: Rgb = Rgb::from_hex(0x00a4ef);
const GOLD_YELLOW: Rgb = Rgb::from_hex(0xf1c40f);
const LABOR_RED: Rgb = Rgb::from_hex(0xe74c3c);
const SAAS_GREY: Rgb = Rgb::from_hex(0x7f7f7f);

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let divergence = closes(ctx, "asset-divergence", &[BTC, XLK, GLD, IWM])?;
    let saas = closes(ctx, "saas-trap", &[XLK, WCLD])?;
    let energy = closes(ctx, "monetary-energy", &[BTC, XLK, GLD])?;

    Ok(vec![
        Chart::new(FILES[0], asset_divergence(&divergence)?),
        Chart::new(FILES[1], saas_trap(&saas)?),
        Chart::new(FILES[2], monetary_energy(&energy)?),
    ])
}

fn closes(ctx: &RunContext<'_>, tag: &str, symbols: &[&str]) -> Result<SeriesTable, RunError> {
    let request = FrameRequest::new(tag, symbols, FetchWindow::since(ymd(2023, 1, 1)));
    ctx.field(&request, PriceField::Close)
}

fn survival_figure(title: &str) -> Figure {
    Figure::new(title).x_axis(XAxis::dates("%b %Y"))
}

pub fn asset_divergence(closes: &SeriesTable) -> Result<Figure, RunError> {
    let t = clean_and_rebase(closes)?;
    let mut fig = survival_figure("The Great Divergence: Asset Ownership vs Labor Economy");
    for (symbol, label, color) in [
        (BTC, "Bitcoin (Measurement)", palette::BITCOIN),
        (XLK, "Big Tech (Infrastructure)", TECH_BLUE),
        (GLD, "Gold (Hedge)", GOLD_YELLOW),
        (IWM, "Small Caps (Labor/Legacy)", LABOR_RED),
    ] {
        let width = if symbol == BTC { 2.5 } else { 2.0 };
        fig.push(
            Line::dated(t.dates(), t.require(symbol)?, color)
                .label(with_gain(label, t.last_value(symbol)))
                .width(width),
        );
    }
    Ok(fig)
}

/// Large-cap tech against small cloud software, with the gap between shaded.
pub fn saas_trap(closes: &SeriesTable) -> Result<Figure, RunError> {
    let t = clean_and_rebase(closes)?;
    let xlk = t.require(XLK)?;
    let wcld = t.require(WCLD)?;

    let line = Line::dated(t.dates(), xlk, TECH_BLUE);
    let xs = line.xs.clone();
    Ok(survival_figure("The SaaS Trap: Winners vs The Replaced")
        .layer(line.label(with_gain("Big Tech", t.last_value(XLK))).width(2.5))
        .layer(
            Line::dated(t.dates(), wcld, SAAS_GREY)
                .label(with_gain("Small SaaS", t.last_value(WCLD)))
                .dash(Dash::Dashed),
        )
        .layer(Fill::between(xs, wcld.to_vec(), xlk.to_vec(), TECH_BLUE).label("The Automation Gap")))
}

/// Log-scale growth against a flat line at the starting capital.
pub fn monetary_energy(closes: &SeriesTable) -> Result<Figure, RunError> {
    let t = clean_and_rebase(closes)?;
    Ok(survival_figure("Capturing Monetary Energy in the AI Era")
        .y_axis(Axis::log())
        .layer(Line::dated(t.dates(), t.require(BTC)?, palette::BITCOIN).label("Bitcoin").width(2.5))
        .layer(Line::dated(t.dates(), t.require(XLK)?, TECH_BLUE).label("Big Tech (AI)"))
        .layer(RefLine::horizontal(100.0, palette::INK).alpha(0.5).label("Original Capital"))
        .layer(
            Line::dated(t.dates(), t.require(GLD)?, GOLD_YELLOW)
                .label("Gold (Store of Value)")
                .dash(Dash::Dotted),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use marketplot_render::Layer;

    fn closes(symbols: &[&str]) -> SeriesTable {
        let dates: Vec<_> = (0..4).map(|d| ymd(2023, 1, 2) + Duration::days(d)).collect();
        let cols = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let base = 10.0 * (i + 1) as f64;
                // The first row is a holiday for every symbol.
                (s.to_string(), vec![f64::NAN, base, base * 1.5, base * 2.0])
            })
            .collect();
        SeriesTable::new(dates, cols).unwrap()
    }

    #[test]
    fn divergence_drops_empty_rows_before_rebasing() {
        let fig = asset_divergence(&closes(&[BTC, XLK, GLD, IWM])).unwrap();
        let Layer::Line(btc) = &fig.layers[0] else {
            panic!("expected a line");
        };
        assert_eq!(btc.ys, vec![100.0, 150.0, 200.0]);
        assert_eq!(btc.width, 2.5);
        assert_eq!(fig.legend_labels()[0], "Bitcoin (Measurement) (+100.0%)");
    }

    #[test]
    fn saas_gap_is_filled_between_the_two_lines() {
        let fig = saas_trap(&closes(&[XLK, WCLD])).unwrap();
        assert_eq!(fig.count(|l| matches!(l, Layer::Fill(_))), 1);
        assert_eq!(fig.legend_labels()[2], "The Automation Gap");
    }

    #[test]
    fn energy_chart_is_log_with_capital_line() {
        let fig = monetary_energy(&closes(&[BTC, XLK, GLD])).unwrap();
        assert_eq!(fig.y_axis.scale, marketplot_render::Scale::Log);
        assert_eq!(fig.count(|l| matches!(l, Layer::RefLine(_))), 1);
    }
}
