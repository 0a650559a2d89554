//! AI infrastructure against the rest of the market since January 2023.

use super::with_gain;
use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::ymd;
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::rebase;
use marketplot_core::{DropRule, SeriesTable};
use marketplot_render::{Axis, Dash, Figure, Line, Rgb, XAxis};

pub const FILES: [&str; 1] = ["k_shaped_economy.png"];

struct Segment {
    symbol: &'static str,
    label: &'static str,
    color: Rgb,
    dash: Dash,
    width: f64,
}

const SEGMENTS: [Segment; 5] = [
    Segment {
        symbol: "NVDA",
        label: "AI Infrastructure (The New Oil)",
        color: Rgb::from_hex(0xff0000),
        dash: Dash::Solid,
        width: 3.0,
    },
    Segment {
        symbol: "XLK",
        label: "Big Tech / SaaS Ecosystem",
        color: Rgb::from_hex(0x1f77b4),
        dash: Dash::Solid,
        width: 2.0,
    },
    Segment {
        symbol: "SPY",
        label: "S&P 500 (Weighted)",
        color: Rgb::from_hex(0x2ca02c),
        dash: Dash::Solid,
        width: 2.0,
    },
    Segment {
        symbol: "RSP",
        label: "Traditional Business (Equal Weight)",
        color: Rgb::from_hex(0xff7f0e),
        dash: Dash::Dashed,
        width: 2.0,
    },
    Segment {
        symbol: "IWM",
        label: "Service Agencies / SMBs (Struggling)",
        color: Rgb::from_hex(0xbcbd22),
        dash: Dash::Dashed,
        width: 2.0,
    },
];

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let symbols: Vec<&str> = SEGMENTS.iter().map(|s| s.symbol).collect();
    let request = FrameRequest::new(
        "k-shaped-economy",
        &symbols,
        FetchWindow::since(ymd(2023, 1, 1)),
    );
    let prices = ctx.table(&request)?;
    Ok(vec![Chart::new(FILES[0], k_shaped(&prices)?)])
}

pub fn k_shaped(prices: &SeriesTable) -> Result<Figure, RunError> {
    let rebased = rebase(&prices.drop_missing(DropRule::All))?;

    let mut fig = Figure::new("The AI-Driven 'K-Shaped' Economy (Rebased to 100 at Jan 2023)")
        .size(1400, 800)
        .x_axis(XAxis::dates("%b %Y").label("Date (Start of AI Boom)"))
        .y_axis(Axis::linear().label("Performance (Indexed to 100)"));

    for seg in &SEGMENTS {
        let values = rebased.require(seg.symbol)?;
        fig.push(
            Line::dated(rebased.dates(), values, seg.color)
                .label(with_gain(seg.label, rebased.last_value(seg.symbol)))
                .dash(seg.dash)
                .width(seg.width),
        );
    }
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplot_render::Layer;

    fn prices() -> SeriesTable {
        let dates = vec![ymd(2023, 1, 3), ymd(2023, 1, 4), ymd(2024, 1, 2)];
        let cols = SEGMENTS
            .iter()
            .enumerate()
            .map(|(i, s)| (s.symbol.to_string(), vec![10.0, 11.0, 10.0 * (1.0 + i as f64)]))
            .collect();
        SeriesTable::new(dates, cols).unwrap()
    }

    #[test]
    fn legend_carries_total_gain() {
        let fig = k_shaped(&prices()).unwrap();
        let labels = fig.legend_labels();
        assert_eq!(labels[0], "AI Infrastructure (The New Oil) (+0.0%)");
        assert_eq!(labels[4], "Service Agencies / SMBs (Struggling) (+400.0%)");
    }

    #[test]
    fn equal_weight_and_small_caps_are_dashed() {
        let fig = k_shaped(&prices()).unwrap();
        let dashes: Vec<Dash> = fig
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Line(line) => Some(line.dash),
                _ => None,
            })
            .collect();
        assert_eq!(
            dashes,
            vec![Dash::Solid, Dash::Solid, Dash::Solid, Dash::Dashed, Dash::Dashed]
        );
    }

    #[test]
    fn a_missing_segment_is_an_error() {
        let partial = prices().select(&["NVDA", "XLK"]).unwrap();
        assert!(matches!(k_shaped(&partial), Err(RunError::Table(_))));
    }
}
