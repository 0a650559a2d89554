//! IBIT against software equities and gold through the two February 2026
//! sell-offs, plus a close-up of spot bitcoin.

use super::point_at;
use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{events, ymd};
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::rebase;
use marketplot_core::{AnnotationPoint, SeriesTable};
use marketplot_render::{date_x, palette, Axis, Figure, Line, Note, Rgb, Scatter, Span, XAxis};

pub const FILES: [&str; 3] = ["btc_vs_software.png", "btc_vs_gold.png", "btc_crash_detail.png"];

const IBIT: &str = "IBIT";
const IGV: &str = "IGV";
const GLD: &str = "GLD";
const BTC: &str = "BTC-USD";

pub(crate) const RED: Rgb = Rgb::from_hex(0xff0000);
pub(crate) const ORANGE: Rgb = Rgb::from_hex(0xffa500);
const PURPLE: Rgb = Rgb::from_hex(0x800080);
pub(crate) const SOFTWARE: Rgb = Rgb::from_hex(0x0078d4);

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let window = FetchWindow::range(ymd(2025, 7, 1), ymd(2026, 2, 13));
    let closes = ctx.closes(&FrameRequest::new("bitcoin-crash", &[IBIT, IGV, GLD, BTC], window))?;

    Ok(vec![
        Chart::new(FILES[0], btc_vs_software(&closes)?),
        Chart::new(FILES[1], btc_vs_gold(&closes)?),
        Chart::new(FILES[2], crash_detail(&closes)?),
    ])
}

/// The two sell-off windows as shaded bands.
fn crash_spans(first: &str, second: &str, second_color: Rgb) -> [Span; 2] {
    [
        Span::dates(ymd(2026, 2, 4), ymd(2026, 2, 7), RED).label(first),
        Span::dates(ymd(2026, 2, 12), events::macro_crash(), second_color).label(second),
    ]
}

fn indexed_pair(closes: &SeriesTable, other: &str) -> Result<SeriesTable, RunError> {
    Ok(rebase(&closes.drop_missing_in(&[IBIT, other])?.select(&[IBIT, other])?)?)
}

fn crash_figure(title: &str) -> Figure {
    Figure::new(title)
        .size(1200, 600)
        .x_axis(XAxis::dates("%b %Y"))
        .y_axis(Axis::linear().label("Indexed Price"))
}

pub fn btc_vs_software(closes: &SeriesTable) -> Result<Figure, RunError> {
    let t = indexed_pair(closes, IGV)?;
    let [first, second] = crash_spans("Mechanical (Feb 5)", "Macro (Feb 13)", ORANGE);
    Ok(
        crash_figure("Bitcoin vs. Software Equities: The Double-Dip (Indexed to 100)")
            .layer(Line::dated(t.dates(), t.require(IBIT)?, palette::BITCOIN).label("IBIT (Bitcoin ETF)"))
            .layer(Line::dated(t.dates(), t.require(IGV)?, SOFTWARE).label("IGV (Software Stocks)"))
            .layer(first)
            .layer(second),
    )
}

pub fn btc_vs_gold(closes: &SeriesTable) -> Result<Figure, RunError> {
    let t = indexed_pair(closes, GLD)?;
    let [first, second] = crash_spans("Feb 5 Divergence", "Feb 13 Macro-Risk", PURPLE);
    Ok(crash_figure("Bitcoin vs. Gold: Divergence to Convergence")
        .layer(Line::dated(t.dates(), t.require(IBIT)?, palette::BITCOIN).label("IBIT (Bitcoin ETF)"))
        .layer(Line::dated(t.dates(), t.require(GLD)?, palette::GOLD).label("GLD (Gold)"))
        .layer(first)
        .layer(second))
}

/// Spot bitcoin from January 20 with both crash days marked.
pub fn crash_detail(closes: &SeriesTable) -> Result<Figure, RunError> {
    let btc = closes.drop_missing_in(&[BTC])?.since(ymd(2026, 1, 20));
    let mechanical = AnnotationPoint::new(events::mechanical_crash(), BTC, "Mechanical Crash");
    let macro_leg = AnnotationPoint::new(events::macro_crash(), BTC, "Macro Liquidity Crash");
    let mechanical_at = point_at(&btc, &mechanical)?;
    let macro_at = point_at(&btc, &macro_leg)?;

    Ok(crash_figure("Bitcoin Price: The February 2026 Liquidity Event")
        .x_axis(XAxis::dates("%b %d"))
        .y_axis(Axis::linear().label("Price (USD)"))
        .no_legend()
        .layer(Line::dated(btc.dates(), btc.require(BTC)?, palette::BITCOIN).width(2.5))
        .layer(Scatter::new(vec![mechanical_at], RED).size(10))
        .layer(Scatter::new(vec![macro_at], ORANGE).size(10))
        .layer(
            Note::new(
                mechanical.label,
                (date_x(ymd(2026, 2, 1)), mechanical_at.1 * 0.95),
            )
            .arrow_to(mechanical_at),
        )
        .layer(
            Note::new(
                macro_leg.label,
                (date_x(ymd(2026, 2, 8)), macro_at.1 * 1.05),
            )
            .arrow_to(macro_at),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplot_render::Layer;

    fn closes() -> SeriesTable {
        let dates: Vec<_> = (0..20).map(|d| ymd(2026, 1, 25) + chrono::Duration::days(d)).collect();
        let ramp = |start: f64| (0..20).map(|i| start + i as f64).collect::<Vec<_>>();
        let mut igv = ramp(200.0);
        igv[0] = f64::NAN;
        SeriesTable::new(
            dates,
            vec![
                (IBIT.into(), ramp(50.0)),
                (IGV.into(), igv),
                (GLD.into(), ramp(300.0)),
                (BTC.into(), ramp(90_000.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn software_pair_starts_at_first_common_row() {
        let fig = btc_vs_software(&closes()).unwrap();
        match &fig.layers[0] {
            Layer::Line(line) => {
                assert_eq!(line.xs[0], date_x(ymd(2026, 1, 26)));
                assert_eq!(line.ys[0], 100.0);
            }
            other => panic!("expected line, got {other:?}"),
        }
        assert_eq!(fig.legend_labels()[2], "Mechanical (Feb 5)");
    }

    #[test]
    fn detail_marks_both_crash_days() {
        let fig = crash_detail(&closes()).unwrap();
        let points: Vec<(f64, f64)> = fig
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Scatter(s) => Some(s.points[0]),
                _ => None,
            })
            .collect();
        // Feb 5 is day 11 of the ramp, Feb 13 day 19.
        assert_eq!(
            points,
            vec![
                (date_x(events::mechanical_crash()), 90_011.0),
                (date_x(events::macro_crash()), 90_019.0),
            ]
        );
    }

    #[test]
    fn detail_needs_a_crash_day_value() {
        let late = closes().since(ymd(2026, 2, 6));
        assert!(matches!(crash_detail(&late), Err(RunError::Insufficient(_))));
    }
}
