//! Bitcoin as the unit of account: legacy assets priced in BTC, fixed supply
//! against M2, the coffee and car tests, the realized-price floor and the
//! shift of supply from retail to institutions.

use super::{column_line, from_end};
use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{car, coffee, ownership, realized, supply, years_x};
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::{linear_path, ratio, rebase, to_sats};
use marketplot_core::{DropRule, SeriesTable};
use marketplot_render::geometry::group_thousands;
use marketplot_render::{
    date_x, palette, Axis, Bars, Dash, Figure, Fill, Line, Marker, Note, Region, Rgb, XAxis,
};

pub const FILES: [&str; 6] = [
    "assets_in_btc.png",
    "supply_constant.png",
    "purchasing_power_concrete.png",
    "car_test.png",
    "market_vs_realized.png",
    "ownership_handover.png",
];

const BTC: &str = "BTC-USD";
const GOLD: &str = "GC=F";
const SPY: &str = "SPY";
const TEN_YEARS: i64 = 10 * 365;

const GOLD_LINE: Rgb = Rgb::from_hex(0xfbc02d);
const BLUE: Rgb = Rgb::from_hex(0x1976d2);
const RED: Rgb = Rgb::from_hex(0xd32f2f);
const ORANGE: Rgb = Rgb::from_hex(0xf57c00);
const GREY: Rgb = Rgb::from_hex(0xbdbdbd);

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    Ok(vec![
        Chart::new(FILES[0], assets_in_btc(ctx)?),
        Chart::new(FILES[1], supply_constant()),
        Chart::new(FILES[2], purchasing_power()),
        Chart::new(FILES[3], car_test()),
        Chart::new(FILES[4], market_vs_realized(ctx)?),
        Chart::new(FILES[5], ownership_handover()),
    ])
}

/// Gold and the S&P 500 divided by BTC, rebased to 100 on a log axis.
pub fn assets_in_btc(ctx: &RunContext<'_>) -> Result<Figure, RunError> {
    let request = FrameRequest::new("assets-in-btc", &[BTC, GOLD, SPY], FetchWindow::lookback_days(TEN_YEARS));
    let prices = ctx.table(&request)?;

    let gold = "Gold (priced in BTC)";
    let spx = "S&P 500 (priced in BTC)";
    let in_btc = SeriesTable::new(
        prices.dates().to_vec(),
        vec![
            (gold.to_string(), ratio(&prices, GOLD, BTC)?),
            (spx.to_string(), ratio(&prices, SPY, BTC)?),
        ],
    )?
    .drop_missing(DropRule::Any);
    let rebased = rebase(&in_btc)?;

    let mut fig = Figure::new("The Collapse of Legacy Assets (Measured in BTC)")
        .x_axis(XAxis::dates("%Y").label("Year"))
        .y_axis(Axis::log().label("Relative Value (Log Scale, Base 100)"))
        .layer(column_line(&rebased, gold, GOLD_LINE)?)
        .layer(column_line(&rebased, spx, BLUE)?);

    if rebased.len() > 800 {
        if let (Some((text_date, _)), Some((target_date, target))) =
            (from_end(&rebased, spx, 800), from_end(&rebased, spx, 300))
        {
            fig.push(
                Note::new(
                    "Legacy assets losing\npurchasing power vs BTC",
                    (date_x(text_date), target / 10.0),
                )
                .arrow_to((date_x(target_date), target)),
            );
        }
    }
    Ok(fig)
}

/// M2 against bitcoin supply, both rebased to 100 in 2020.
pub fn supply_constant() -> Figure {
    let xs = years_x(&supply::YEARS);
    let m2 = to_base_100(&supply::M2_TRILLIONS);
    let btc = to_base_100(&supply::BTC_MILLIONS);

    Figure::new("Mathematical Constant vs. Fiat Inflation")
        .size(1000, 600)
        .x_axis(XAxis::numeric().label("Year"))
        .y_axis(Axis::linear().label("Growth (Base 100)"))
        .layer(
            Line::new(xs.clone(), m2, RED)
                .label("USD M2 Money Supply")
                .width(3.0)
                .marker(Marker::Circle, 6),
        )
        .layer(
            Line::new(xs.clone(), btc.clone(), ORANGE)
                .label("Bitcoin Supply")
                .width(3.0)
                .marker(Marker::Square, 6),
        )
        .layer(Fill::to_level(xs, btc, 100.0, ORANGE))
}

/// Coffee in dollars (bars) against coffee in satoshis (log line).
pub fn purchasing_power() -> Figure {
    let xs = years_x(&coffee::YEARS);
    let sats: Vec<f64> = coffee::COFFEE_USD
        .iter()
        .zip(coffee::BTC_USD)
        .map(|(&usd, btc)| to_sats(usd, btc))
        .collect();

    let mut fig = Figure::new(
        "Relatable Purchasing Power: The Coffee Test\n(USD inflating vs. Satoshi deflation)",
    )
    .x_axis(XAxis::numeric().label("Year"))
    .y_axis(Axis::linear().label("Price in USD ($)"))
    .y2_axis(Axis::log().label("Price in Satoshi (Sats)"))
    .layer(
        Bars::new(xs.clone(), coffee::COFFEE_USD.to_vec(), RED)
            .label("Cost of Coffee (USD)")
            .alpha(0.3)
            .width(1.2),
    )
    .layer(
        Line::new(xs.clone(), sats.clone(), ORANGE)
            .label("Cost of Coffee (Satoshi)")
            .width(4.0)
            .marker(Marker::Square, 10)
            .secondary(),
    );

    for (x, s) in xs.into_iter().zip(sats) {
        fig.push(
            Note::new(group_thousands(s.round() as i64), (x, s))
                .offset(0, -10)
                .bold()
                .centered()
                .secondary(),
        );
    }
    fig
}

/// Bitcoin needed for an average new car.
pub fn car_test() -> Figure {
    let captions = car::BTC_PER_CAR.iter().map(|v| format!("{v} BTC")).collect();
    Figure::new("The Car Test: How many BTC for an Average New Car?")
        .size(1000, 600)
        .x_axis(XAxis::categories(&car::YEARS).label("Year"))
        .y_axis(Axis::linear().label("Bitcoin (BTC)"))
        .no_legend()
        .layer(
            Bars::categories(car::BTC_PER_CAR.to_vec(), 0.0, BLUE)
                .alpha(0.8)
                .captions(captions),
        )
}

/// Market price over a straight-line realized price, shaded by regime.
pub fn market_vs_realized(ctx: &RunContext<'_>) -> Result<Figure, RunError> {
    let request = FrameRequest::new("market-vs-realized", &[BTC], FetchWindow::lookback_days(TEN_YEARS));
    let market = ctx.table(&request)?.drop_missing(DropRule::Any);
    let price = market.require(BTC)?;
    let floor = linear_path(market.len(), realized::START_USD, realized::FLOOR_USD);
    let xs: Vec<f64> = market.dates().iter().copied().map(date_x).collect();

    let mut fig = Figure::new("The Hard Floor: Market Price vs. Realized Price (Cost Basis)")
        .x_axis(XAxis::dates("%Y").label("Year"))
        .y_axis(Axis::log().label("Price (USD)"))
        .layer(Line::new(xs.clone(), price.to_vec(), palette::INK).label("BTC Market Price"))
        .layer(
            Line::new(xs.clone(), floor.clone(), RED)
                .label("Realized Price (Network Floor)")
                .width(2.5)
                .dash(Dash::Dashed),
        )
        .layer(
            Fill::between(xs.clone(), price.to_vec(), floor.clone(), palette::GAIN)
                .region(Region::Above)
                .label("Profit Zone"),
        )
        .layer(
            Fill::between(xs, price.to_vec(), floor, RED)
                .region(Region::Below)
                .alpha(0.2)
                .label("Capitulation / Buy Zone"),
        );

    if let (Some((text_date, _)), Some((last_date, _))) =
        (from_end(&market, BTC, 900), from_end(&market, BTC, 1))
    {
        fig.push(
            Note::new("Feb 2026: ~$55k Floor", (date_x(text_date), 100_000.0))
                .arrow_to((date_x(last_date), realized::FLOOR_USD))
                .color(RED),
        );
    }
    Ok(fig)
}

/// Share of supply by holder class, 2022 against 2026.
pub fn ownership_handover() -> Figure {
    let width = 0.35;
    Figure::new("The Great Handover: Institutional Absorption of Retail Supply")
        .size(1000, 600)
        .x_axis(XAxis::categories(&ownership::CLASSES))
        .y_axis(Axis::linear().label("Percentage of Total Supply (%)"))
        .layer(
            Bars::categories(ownership::Y2022.to_vec(), -width / 2.0, GREY)
                .width(width)
                .label("2022 Pre-Euphoria"),
        )
        .layer(
            Bars::categories(ownership::Y2026.to_vec(), width / 2.0, ORANGE)
                .width(width)
                .colors(vec![ORANGE, BLUE])
                .label("Feb 2026 Post-ETF"),
        )
}

fn to_base_100(values: &[f64]) -> Vec<f64> {
    let base = values.first().copied().unwrap_or(f64::NAN);
    values.iter().map(|v| v / base * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplot_render::Layer;

    #[test]
    fn supply_lines_start_at_100() {
        let fig = supply_constant();
        for layer in &fig.layers {
            if let Layer::Line(line) = layer {
                assert_eq!(line.ys[0], 100.0);
            }
        }
        assert_eq!(fig.count(|l| matches!(l, Layer::Fill(_))), 1);
    }

    #[test]
    fn coffee_notes_group_thousands() {
        let fig = purchasing_power();
        let notes: Vec<&str> = fig
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Note(n) => Some(n.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(notes.len(), coffee::YEARS.len());
        assert_eq!(notes[0], "350,000");
        assert!(fig.y2_axis.is_some());
    }

    #[test]
    fn car_captions_carry_units() {
        let fig = car_test();
        match &fig.layers[0] {
            Layer::Bars(bars) => assert_eq!(bars.captions[3], "0.53 BTC"),
            other => panic!("expected bars, got {other:?}"),
        }
        assert!(fig.legend.is_none());
    }

    #[test]
    fn handover_bars_straddle_categories() {
        let fig = ownership_handover();
        let xs: Vec<Vec<f64>> = fig
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Bars(b) => Some(b.xs.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(xs.len(), 2);
        for (x, expected) in xs.concat().iter().zip([-0.175, 0.825, 0.175, 1.175]) {
            assert!((x - expected).abs() < 1e-12, "{x} vs {expected}");
        }
    }
}
