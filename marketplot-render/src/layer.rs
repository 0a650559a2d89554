//! Drawable layers of a [`Figure`](crate::Figure).
//!
//! All x values are plot coordinates: [`date_x`] for date axes, the raw
//! number for numeric axes and the category index for category axes.

use crate::color::Rgb;
use crate::geometry::{date_x, Region};
use chrono::NaiveDate;

/// Which y axis a layer is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisSide {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl Dash {
    /// (on, off) lengths in pixels at scale 1.
    pub fn pattern(self) -> Option<(f64, f64)> {
        match self {
            Dash::Solid => None,
            Dash::Dashed => Some((10.0, 6.0)),
            Dash::Dotted => Some((2.0, 4.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

/// A polyline through `(xs[i], ys[i])`; NaN values break the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: Option<String>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Rgb,
    pub width: f64,
    pub alpha: f64,
    pub dash: Dash,
    pub marker: Option<(Marker, u32)>,
    pub axis: AxisSide,
}

impl Line {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, color: Rgb) -> Self {
        Self {
            label: None,
            xs,
            ys,
            color,
            width: 2.0,
            alpha: 1.0,
            dash: Dash::Solid,
            marker: None,
            axis: AxisSide::Primary,
        }
    }

    pub fn dated(dates: &[NaiveDate], ys: &[f64], color: Rgb) -> Self {
        Self::new(dates.iter().copied().map(date_x).collect(), ys.to_vec(), color)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }

    pub fn marker(mut self, marker: Marker, size: u32) -> Self {
        self.marker = Some((marker, size));
        self
    }

    pub fn secondary(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }
}

/// Vertical bars from zero (or the axis floor on a log axis).
#[derive(Debug, Clone, PartialEq)]
pub struct Bars {
    pub label: Option<String>,
    pub xs: Vec<f64>,
    pub heights: Vec<f64>,
    /// Bar width in x units.
    pub width: f64,
    /// One color for all bars, or one per bar.
    pub colors: Vec<Rgb>,
    pub alpha: f64,
    /// Text drawn above each bar; empty for none.
    pub captions: Vec<String>,
    pub axis: AxisSide,
}

impl Bars {
    pub fn new(xs: Vec<f64>, heights: Vec<f64>, color: Rgb) -> Self {
        Self {
            label: None,
            xs,
            heights,
            width: 0.8,
            colors: vec![color],
            alpha: 1.0,
            captions: Vec::new(),
            axis: AxisSide::Primary,
        }
    }

    /// Bars over category indices `0..heights.len()` shifted by `offset`.
    pub fn categories(heights: Vec<f64>, offset: f64, color: Rgb) -> Self {
        let xs = (0..heights.len()).map(|i| i as f64 + offset).collect();
        Self::new(xs, heights, color)
    }

    pub fn dated(dates: &[NaiveDate], heights: &[f64], color: Rgb) -> Self {
        Self::new(dates.iter().copied().map(date_x).collect(), heights.to_vec(), color)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn colors(mut self, colors: Vec<Rgb>) -> Self {
        self.colors = colors;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn captions(mut self, captions: Vec<String>) -> Self {
        self.captions = captions;
        self
    }

    pub fn secondary(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }

    /// Color of bar `i`.
    pub fn color_at(&self, i: usize) -> Rgb {
        match self.colors.len() {
            0 => Rgb(0, 0, 0),
            n => self.colors[i % n],
        }
    }
}

/// The band between two series.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub label: Option<String>,
    pub xs: Vec<f64>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub region: Region,
    pub color: Rgb,
    pub alpha: f64,
    pub axis: AxisSide,
}

impl Fill {
    pub fn between(xs: Vec<f64>, a: Vec<f64>, b: Vec<f64>, color: Rgb) -> Self {
        Self {
            label: None,
            xs,
            a,
            b,
            region: Region::All,
            color,
            alpha: 0.1,
            axis: AxisSide::Primary,
        }
    }

    /// Band between `ys` and a constant level.
    pub fn to_level(xs: Vec<f64>, ys: Vec<f64>, level: f64, color: Rgb) -> Self {
        let b = vec![level; ys.len()];
        Self::between(xs, ys, b, color)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// A shaded vertical band across the full plot height.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub label: Option<String>,
    pub from: f64,
    pub to: f64,
    pub color: Rgb,
    pub alpha: f64,
}

impl Span {
    pub fn new(from: f64, to: f64, color: Rgb) -> Self {
        Self {
            label: None,
            from,
            to,
            color,
            alpha: 0.1,
        }
    }

    /// A band from the start of `from` to the start of `to`.
    pub fn dates(from: NaiveDate, to: NaiveDate, color: Rgb) -> Self {
        Self::new(date_x(from), date_x(to), color)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefAt {
    Horizontal(f64),
    Vertical(f64),
}

/// A full-width or full-height reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct RefLine {
    pub label: Option<String>,
    pub at: RefAt,
    pub color: Rgb,
    pub width: f64,
    pub alpha: f64,
    pub dash: Dash,
    pub axis: AxisSide,
}

impl RefLine {
    fn new(at: RefAt, color: Rgb) -> Self {
        Self {
            label: None,
            at,
            color,
            width: 1.0,
            alpha: 1.0,
            dash: Dash::Dashed,
            axis: AxisSide::Primary,
        }
    }

    pub fn horizontal(y: f64, color: Rgb) -> Self {
        Self::new(RefAt::Horizontal(y), color)
    }

    pub fn vertical(x: f64, color: Rgb) -> Self {
        Self::new(RefAt::Vertical(x), color)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

/// Filled dots.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    pub size: u32,
    pub axis: AxisSide,
}

impl Scatter {
    pub fn new(points: Vec<(f64, f64)>, color: Rgb) -> Self {
        Self {
            label: None,
            points,
            color,
            size: 6,
            axis: AxisSide::Primary,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// An axis-aligned shaded rectangle in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub label: Option<String>,
    pub x0: f64,
    pub x1: f64,
    pub bottom: f64,
    pub top: f64,
    pub color: Rgb,
    pub alpha: f64,
}

impl Zone {
    pub fn new(x: (f64, f64), y: (f64, f64), color: Rgb) -> Self {
        Self {
            label: None,
            x0: x.0,
            x1: x.1,
            bottom: y.0,
            top: y.1,
            color,
            alpha: 0.3,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// OHLC candles colored by the theme's positive and negative tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Candles {
    pub xs: Vec<f64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    /// Body width in x units.
    pub width: f64,
}

impl Candles {
    pub fn dated(
        dates: &[NaiveDate],
        open: &[f64],
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Self {
        Self {
            xs: dates.iter().copied().map(date_x).collect(),
            open: open.to_vec(),
            high: high.to_vec(),
            low: low.to_vec(),
            close: close.to_vec(),
            width: 0.6,
        }
    }
}

/// Free text anchored in plot coordinates, optionally with an arrow to a
/// target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub text: String,
    pub at: (f64, f64),
    /// Pixel offset of the text from `at` (right, down).
    pub offset: (i32, i32),
    pub arrow_to: Option<(f64, f64)>,
    pub color: Option<Rgb>,
    pub size: f64,
    pub bold: bool,
    pub centered: bool,
    pub axis: AxisSide,
}

impl Note {
    pub fn new(text: impl Into<String>, at: (f64, f64)) -> Self {
        Self {
            text: text.into(),
            at,
            offset: (0, 0),
            arrow_to: None,
            color: None,
            size: 14.0,
            bold: false,
            centered: false,
            axis: AxisSide::Primary,
        }
    }

    pub fn arrow_to(mut self, target: (f64, f64)) -> Self {
        self.arrow_to = Some(target);
        self
    }

    pub fn offset(mut self, dx: i32, dy: i32) -> Self {
        self.offset = (dx, dy);
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn secondary(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }
}

/// One drawable element of a figure. Layers are drawn in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line(Line),
    Bars(Bars),
    Fill(Fill),
    Span(Span),
    RefLine(RefLine),
    Scatter(Scatter),
    Zone(Zone),
    Candles(Candles),
    Note(Note),
}

impl Layer {
    /// Legend label, if the layer has one.
    pub fn label(&self) -> Option<&str> {
        match self {
            Layer::Line(l) => l.label.as_deref(),
            Layer::Bars(b) => b.label.as_deref(),
            Layer::Fill(f) => f.label.as_deref(),
            Layer::Span(s) => s.label.as_deref(),
            Layer::RefLine(r) => r.label.as_deref(),
            Layer::Scatter(s) => s.label.as_deref(),
            Layer::Zone(z) => z.label.as_deref(),
            Layer::Candles(_) | Layer::Note(_) => None,
        }
    }

    pub fn axis(&self) -> AxisSide {
        match self {
            Layer::Line(l) => l.axis,
            Layer::Bars(b) => b.axis,
            Layer::Fill(f) => f.axis,
            Layer::RefLine(r) => r.axis,
            Layer::Scatter(s) => s.axis,
            Layer::Note(n) => n.axis,
            Layer::Span(_) | Layer::Zone(_) | Layer::Candles(_) => AxisSide::Primary,
        }
    }

    /// Checks per-point vectors agree in length.
    pub fn validate(&self) -> Result<(), String> {
        let check = |kind: &str, lens: &[usize]| {
            if lens.windows(2).all(|w| w[0] == w[1]) {
                Ok(())
            } else {
                Err(format!("{kind} layer has mismatched lengths {lens:?}"))
            }
        };
        match self {
            Layer::Line(l) => check("line", &[l.xs.len(), l.ys.len()]),
            Layer::Bars(b) => {
                check("bar", &[b.xs.len(), b.heights.len()])?;
                if !b.captions.is_empty() {
                    check("bar caption", &[b.xs.len(), b.captions.len()])?;
                }
                Ok(())
            }
            Layer::Fill(f) => check("fill", &[f.xs.len(), f.a.len(), f.b.len()]),
            Layer::Candles(c) => check(
                "candle",
                &[c.xs.len(), c.open.len(), c.high.len(), c.low.len(), c.close.len()],
            ),
            Layer::Span(_)
            | Layer::RefLine(_)
            | Layer::Scatter(_)
            | Layer::Zone(_)
            | Layer::Note(_) => Ok(()),
        }
    }
}

macro_rules! into_layer {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Layer {
            fn from(value: $ty) -> Self {
                Layer::$ty(value)
            }
        })*
    };
}

into_layer!(Line, Bars, Fill, Span, RefLine, Scatter, Zone, Candles, Note);
