//! Market plumbing behind the February 2026 crash: the CME futures basis,
//! IBIT volume against price, and rolling volatility across assets.

use super::bitcoin_crash::{ORANGE, RED, SOFTWARE};
use crate::context::RunContext;
use crate::error::RunError;
use crate::fixtures::{events, ymd};
use crate::output::Chart;
use marketplot_core::data::{FetchWindow, FrameRequest};
use marketplot_core::transform::{annualized_basis, rolling_volatility};
use marketplot_core::{DropRule, PriceField, SeriesTable};
use marketplot_render::{palette, Axis, Bars, Dash, Figure, Line, RefLine, Rgb, Span, XAxis};

pub const FILES: [&str; 3] = [
    "cme_basis_deep.png",
    "etf_volume_paradox.png",
    "volatility_contagion.png",
];

const SPOT: &str = "BTC-USD";
/// February 2026 CME contract.
const FUTURE: &str = "BTCG26.CME";
const CONTINUOUS: &str = "BTC=F";
const IBIT: &str = "IBIT";
const VIX: &str = "^VIX";
const IGV: &str = "IGV";
const IBIT_VOLUME: &str = "IBIT Volume";

const VOLATILITY_WINDOW: usize = 10;

const BASIS: Rgb = Rgb::from_hex(0x2ecc71);
const VOLUME: Rgb = Rgb::from_hex(0x34495e);
const VIX_RED: Rgb = Rgb::from_hex(0xe74c3c);

pub fn build(ctx: &RunContext<'_>) -> Result<Vec<Chart>, RunError> {
    let window = FetchWindow::range(ymd(2025, 12, 1), ymd(2026, 2, 13));
    let closes = ctx.closes(&FrameRequest::new(
        "crash-deep",
        &[SPOT, FUTURE, CONTINUOUS, IBIT, VIX, IGV],
        window,
    ))?;
    let volume = ctx
        .each(&FrameRequest::new("crash-deep-volume", &[IBIT], window), PriceField::Volume)?
        .rename(IBIT, IBIT_VOLUME)?;

    // Every chart works on the sessions where both legs of the basis trade.
    let sessions = closes.drop_missing_in(&[SPOT, FUTURE])?;

    Ok(vec![
        Chart::new(FILES[0], cme_basis(&sessions)?),
        Chart::new(FILES[1], etf_volume(&sessions, &volume)?),
        Chart::new(FILES[2], volatility_contagion(&sessions)?),
    ])
}

fn deep_figure(title: &str) -> Figure {
    Figure::new(title).size(1200, 600).x_axis(XAxis::dates("%b %d"))
}

pub fn cme_basis(sessions: &SeriesTable) -> Result<Figure, RunError> {
    let basis = annualized_basis(sessions, FUTURE, SPOT, events::cme_expiry())?;
    Ok(deep_figure("CME Bitcoin Basis: The Two Faces of Contraction")
        .y_axis(Axis::linear().label("Annualized Yield (%)"))
        .layer(Line::dated(sessions.dates(), &basis, BASIS).label("CME Annualized Basis (%)"))
        .layer(RefLine::horizontal(0.0, palette::INK).alpha(0.3))
        .layer(Span::dates(ymd(2026, 2, 4), ymd(2026, 2, 6), RED).label("Feb 5 Unwind"))
        .layer(
            Span::dates(ymd(2026, 2, 12), events::macro_crash(), ORANGE)
                .label("Feb 13 Macro Panic"),
        ))
}

/// IBIT price on the left axis, daily volume as bars on the right.
pub fn etf_volume(sessions: &SeriesTable, volume: &SeriesTable) -> Result<Figure, RunError> {
    let etf = sessions
        .select(&[IBIT])?
        .outer_join(volume)?
        .drop_missing(DropRule::Any);

    Ok(deep_figure("IBIT ETF: Price Collapse vs Record Volume Spike")
        .y_axis(Axis::linear().label("ETF Price ($)"))
        .y2_axis(Axis::linear().label("Trading Volume"))
        .layer(
            Bars::dated(etf.dates(), etf.require(IBIT_VOLUME)?, VOLUME)
                .alpha(0.2)
                .label("ETF Volume")
                .secondary(),
        )
        .layer(Line::dated(etf.dates(), etf.require(IBIT)?, palette::BITCOIN).label("IBIT Price")))
}

/// Annualized 10-session volatility of spot bitcoin, software and the VIX.
pub fn volatility_contagion(sessions: &SeriesTable) -> Result<Figure, RunError> {
    let vol = rolling_volatility(&sessions.select(&[SPOT, IGV, VIX])?, VOLATILITY_WINDOW)?
        .drop_missing(DropRule::Any);

    Ok(deep_figure("Cross-Asset Volatility: The Contagion Map")
        .y_axis(Axis::linear().label("Annualized Volatility (%)"))
        .layer(Line::dated(vol.dates(), vol.require(SPOT)?, palette::BITCOIN).label("BTC Volatility"))
        .layer(Line::dated(vol.dates(), vol.require(IGV)?, SOFTWARE).label("Software (IGV) Volatility"))
        .layer(
            Line::dated(vol.dates(), vol.require(VIX)?, VIX_RED)
                .label("Equity VIX (Market Risk)")
                .width(1.5)
                .dash(Dash::Dashed),
        ))
}
