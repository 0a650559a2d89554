//! marketplot render - explicit chart values and the PNG renderer
//!
//! A chart is a plain [`Figure`] value built by the caller:
//! - Axes: dates, numbers or categories on x; linear or log on y, with an
//!   optional secondary y axis
//! - Layers: lines, bars, fills, spans, reference lines, scatter points,
//!   zones, candles and notes, drawn in order
//!
//! [`render`] draws a figure through plotters' bitmap backend. There is no
//! global plotting state.

pub mod color;
pub mod figure;
pub mod geometry;
pub mod layer;
pub mod render;
pub mod theme;

pub use color::{palette, Rgb};
pub use figure::{Axis, Figure, LegendPosition, XAxis, XKind};
pub use geometry::{date_x, Region, Scale};
pub use layer::{
    AxisSide, Bars, Candles, Dash, Fill, Layer, Line, Marker, Note, RefLine, Scatter, Span, Zone,
};
pub use render::{plot_bounds, render, Bounds};
pub use theme::Theme;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("figure '{0}' has nothing to draw")]
    NoData(String),

    #[error("invalid layer: {0}")]
    InvalidLayer(String),

    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
