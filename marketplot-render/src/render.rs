//! Draws a [`Figure`] to a PNG through plotters' bitmap backend.
//!
//! Every layer is drawn in the primary coordinate system. Log scales are
//! applied before drawing (plot y is `log10(value)`), and secondary-axis
//! layers are mapped onto the primary y range; the secondary coordinate
//! system only carries the right-hand tick labels.

use crate::color::Rgb;
use crate::figure::{Figure, LegendPosition, XKind};
use crate::geometry::{
    self, dash_segments, fill_polygons, padded_range, split_on_gaps, AffineMap, Point, Scale,
};
use crate::layer::{AxisSide, Bars, Candles, Dash, Fill, Layer, Line, Marker, Note, RefAt};
use crate::RenderError;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT: &str = "sans-serif";

fn backend<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// Plot-coordinate extents of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    /// Primary y, after the axis scale.
    pub y: (f64, f64),
    /// Secondary y, after its scale; present when the figure has a second axis.
    pub y2: Option<(f64, f64)>,
}

/// Computes the plot extents: explicit axis ranges where given, otherwise
/// the padded extent of every layer drawn against that axis.
pub fn plot_bounds(figure: &Figure) -> Result<Bounds, RenderError> {
    let no_data = || RenderError::NoData(figure.title.clone());

    let x = match figure.x_axis.range {
        Some(range) => range,
        None => padded_range(figure.layers.iter().flat_map(layer_xs), 0.02).ok_or_else(no_data)?,
    };

    let side_range = |side: AxisSide, scale: Scale, explicit: Option<(f64, f64)>| {
        if let Some((lo, hi)) = explicit {
            return Some((scale.apply(lo), scale.apply(hi)));
        }
        let values = figure
            .layers
            .iter()
            .filter(|l| resolved_side(figure, l.axis()) == side)
            .flat_map(|l| layer_ys(l, scale))
            .map(|v| scale.apply(v));
        padded_range(values, 0.05)
    };

    let y = side_range(AxisSide::Primary, figure.y_axis.scale, figure.y_axis.range)
        .ok_or_else(no_data)?;
    let y2 = figure
        .y2_axis
        .as_ref()
        .map(|axis| side_range(AxisSide::Secondary, axis.scale, axis.range).unwrap_or(y));

    Ok(Bounds { x, y, y2 })
}

fn resolved_side(figure: &Figure, side: AxisSide) -> AxisSide {
    if figure.y2_axis.is_some() {
        side
    } else {
        AxisSide::Primary
    }
}

fn layer_xs(layer: &Layer) -> Vec<f64> {
    match layer {
        Layer::Line(l) => l.xs.clone(),
        Layer::Bars(b) => b
            .xs
            .iter()
            .flat_map(|x| [x - b.width / 2.0, x + b.width / 2.0])
            .collect(),
        Layer::Fill(f) => f.xs.clone(),
        Layer::Span(s) => vec![s.from, s.to],
        Layer::RefLine(r) => match r.at {
            RefAt::Vertical(x) => vec![x],
            RefAt::Horizontal(_) => Vec::new(),
        },
        Layer::Scatter(s) => s.points.iter().map(|p| p.0).collect(),
        Layer::Zone(z) => vec![z.x0, z.x1],
        Layer::Candles(c) => c
            .xs
            .iter()
            .flat_map(|x| [x - c.width, x + c.width])
            .collect(),
        Layer::Note(n) => std::iter::once(n.at.0)
            .chain(n.arrow_to.map(|t| t.0))
            .collect(),
    }
}

/// Data-unit y values a layer needs visible.
fn layer_ys(layer: &Layer, scale: Scale) -> Vec<f64> {
    match layer {
        Layer::Line(l) => l.ys.clone(),
        Layer::Bars(b) => {
            let mut ys = b.heights.clone();
            if scale == Scale::Linear {
                ys.push(0.0);
            }
            ys
        }
        Layer::Fill(f) => f.a.iter().chain(&f.b).copied().collect(),
        Layer::RefLine(r) => match r.at {
            RefAt::Horizontal(y) => vec![y],
            RefAt::Vertical(_) => Vec::new(),
        },
        Layer::Scatter(s) => s.points.iter().map(|p| p.1).collect(),
        Layer::Zone(z) => vec![z.bottom, z.top],
        Layer::Candles(c) => c.high.iter().chain(&c.low).copied().collect(),
        Layer::Note(n) => std::iter::once(n.at.1)
            .chain(n.arrow_to.map(|t| t.1))
            .collect(),
        Layer::Span(_) => Vec::new(),
    }
}

/// Tick label for an x coordinate.
pub fn format_x(kind: &XKind, x: f64) -> String {
    match kind {
        XKind::Dates { format } => {
            let mut out = String::new();
            if let Some(date) = geometry::x_date(x) {
                // An unsupported specifier leaves the label empty.
                if write!(out, "{}", date.format(format)).is_err() {
                    out.clear();
                }
            }
            out
        }
        XKind::Numeric if (x - x.round()).abs() < 1e-9 => format!("{x:.0}"),
        XKind::Numeric => format!("{x:.1}"),
        XKind::Categories(names) => {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 {
                names.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
    }
}

fn x_label_count(kind: &XKind) -> usize {
    match kind {
        XKind::Categories(names) => names.len() * 2 + 1,
        _ => 10,
    }
}

/// Maps data values to primary plot coordinates.
struct Frame {
    bounds: Bounds,
    y_scale: Scale,
    secondary: Option<(Scale, AffineMap)>,
    px_per_unit: (f64, f64),
    scale: f64,
}

impl Frame {
    fn y(&self, side: AxisSide, v: f64) -> f64 {
        match (side, &self.secondary) {
            (AxisSide::Secondary, Some((scale, map))) => map.apply(scale.apply(v)),
            _ => self.y_scale.apply(v),
        }
    }

    fn side_scale(&self, side: AxisSide) -> Scale {
        match (side, &self.secondary) {
            (AxisSide::Secondary, Some((scale, _))) => *scale,
            _ => self.y_scale,
        }
    }

    fn px(&self, v: f64) -> u32 {
        (v * self.scale).round().max(1.0) as u32
    }

    fn font(&self, size: f64) -> FontDesc<'static> {
        (FONT, size * self.scale).into_font()
    }

    /// Splits a polyline into dashes when the style asks for them.
    fn stroke(&self, path: Vec<Point>, dash: Dash) -> Vec<Vec<Point>> {
        match dash.pattern() {
            None => vec![path],
            Some((on, off)) => {
                dash_segments(&path, on * self.scale, off * self.scale, self.px_per_unit)
            }
        }
    }
}

/// Hands out each legend label once.
#[derive(Default)]
struct LegendClaims {
    seen: HashSet<String>,
}

impl LegendClaims {
    fn claim<'l>(&mut self, label: Option<&'l str>) -> Option<&'l str> {
        let label = label?;
        self.seen.insert(label.to_string()).then_some(label)
    }

    fn any(&self) -> bool {
        !self.seen.is_empty()
    }
}

fn rgba(color: Rgb, alpha: f64) -> RGBAColor {
    color.to_plotters().mix(alpha)
}

/// Renders `figure` to a PNG at `path`, with pixel size, fonts and strokes
/// multiplied by `scale`.
pub fn render(figure: &Figure, path: &Path, scale: f64) -> Result<(), RenderError> {
    for layer in &figure.layers {
        layer.validate().map_err(RenderError::InvalidLayer)?;
    }
    let bounds = plot_bounds(figure)?;
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let size = (
        (figure.size.0 as f64 * scale).round() as u32,
        (figure.size.1 as f64 * scale).round() as u32,
    );
    debug!(title = %figure.title, path = %path.display(), ?size, layers = figure.layers.len(), "rendering");

    let theme = &figure.theme;
    let text = theme.text.to_plotters();
    let axis_color = theme.axis.to_plotters();
    let title_font = (FONT, 26.0 * scale).into_font().style(FontStyle::Bold);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&theme.background.to_plotters()).map_err(backend)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(figure.title.replace('\n', " "), title_font.color(&text))
        .margin((20.0 * scale) as u32)
        .x_label_area_size((60.0 * scale) as u32)
        .y_label_area_size((90.0 * scale) as u32);
    if figure.y2_axis.is_some() {
        builder.right_y_label_area_size((90.0 * scale) as u32);
    }
    let mut chart = builder
        .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
        .map_err(backend)?;

    let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
    let frame = Frame {
        bounds,
        y_scale: figure.y_axis.scale,
        secondary: figure.y2_axis.as_ref().zip(bounds.y2).map(|(axis, y2)| {
            (axis.scale, AffineMap::new(y2, bounds.y))
        }),
        px_per_unit: (
            plot_w as f64 / (bounds.x.1 - bounds.x.0).max(f64::EPSILON),
            plot_h as f64 / (bounds.y.1 - bounds.y.0).max(f64::EPSILON),
        ),
        scale,
    };

    {
        let x_fmt = |v: &f64| format_x(&figure.x_axis.kind, *v);
        let y_scale = figure.y_axis.scale;
        let y_fmt = |v: &f64| geometry::format_value(y_scale.invert(*v));
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_labels(x_label_count(&figure.x_axis.kind))
            .y_labels(8)
            .bold_line_style(theme.grid.to_plotters().stroke_width(1))
            .light_line_style(rgba(theme.grid, 0.35).stroke_width(1))
            .axis_style(axis_color.stroke_width(1))
            .label_style(frame.font(13.0).color(&axis_color))
            .axis_desc_style(frame.font(15.0).color(&text));
        if let Some(label) = &figure.x_axis.label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &figure.y_axis.label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().map_err(backend)?;
    }

    match (&figure.y2_axis, bounds.y2) {
        (Some(axis), Some(y2)) => {
            let mut dual = chart.set_secondary_coord(bounds.x.0..bounds.x.1, y2.0..y2.1);
            {
                let y2_scale = axis.scale;
                let y2_fmt = |v: &f64| geometry::format_value(y2_scale.invert(*v));
                let mut secondary = dual.configure_secondary_axes();
                secondary
                    .y_label_formatter(&y2_fmt)
                    .y_labels(8)
                    .label_style(frame.font(13.0).color(&axis_color))
                    .axis_desc_style(frame.font(15.0).color(&text));
                if let Some(label) = &axis.label {
                    secondary.y_desc(label.as_str());
                }
                secondary.draw().map_err(backend)?;
            }
            draw_all(&mut *dual, figure, &frame)?;
        }
        _ => draw_all(&mut chart, figure, &frame)?,
    }

    root.present().map_err(backend)?;
    Ok(())
}

fn draw_all<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    figure: &Figure,
    frame: &Frame,
) -> Result<(), RenderError> {
    let mut legend = LegendClaims::default();
    for layer in &figure.layers {
        draw_layer(chart, layer, frame, &figure.theme, &mut legend)?;
    }

    if let (Some(position), true) = (figure.legend, legend.any()) {
        let position = match position {
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        };
        chart
            .configure_series_labels()
            .position(position)
            .background_style(&rgba(figure.theme.legend_background, 0.9))
            .border_style(&figure.theme.axis.to_plotters())
            .label_font(frame.font(13.0).color(&figure.theme.text.to_plotters()))
            .draw()
            .map_err(backend)?;
    }
    Ok(())
}

fn draw_layer<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    layer: &Layer,
    frame: &Frame,
    theme: &crate::Theme,
    legend: &mut LegendClaims,
) -> Result<(), RenderError> {
    let (y_lo, y_hi) = frame.bounds.y;
    let (x_lo, x_hi) = frame.bounds.x;

    match layer {
        Layer::Line(line) => draw_line(chart, line, frame, legend),
        Layer::Bars(bars) => draw_bars(chart, bars, frame, theme, legend),
        Layer::Fill(fill) => draw_fill(chart, fill, frame, legend),
        Layer::Span(span) => {
            let style = rgba(span.color, span.alpha).filled();
            let anno = chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(span.from, y_lo), (span.to, y_hi)],
                    style,
                )))
                .map_err(backend)?;
            if let Some(label) = legend.claim(span.label.as_deref()) {
                anno.label(label)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], style));
            }
            Ok(())
        }
        Layer::RefLine(r) => {
            let path = match r.at {
                RefAt::Horizontal(v) => {
                    let y = frame.y(r.axis, v);
                    vec![(x_lo, y), (x_hi, y)]
                }
                RefAt::Vertical(x) => vec![(x, y_lo), (x, y_hi)],
            };
            let style = rgba(r.color, r.alpha).stroke_width(frame.px(r.width));
            let anno = chart
                .draw_series(
                    frame
                        .stroke(path, r.dash)
                        .into_iter()
                        .map(|p| PathElement::new(p, style)),
                )
                .map_err(backend)?;
            if let Some(label) = legend.claim(r.label.as_deref()) {
                anno.label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
            }
            Ok(())
        }
        Layer::Scatter(s) => {
            let style = s.color.to_plotters().filled();
            let size = frame.px(s.size as f64);
            let points: Vec<Point> = s
                .points
                .iter()
                .map(|&(x, y)| (x, frame.y(s.axis, y)))
                .filter(|p| p.0.is_finite() && p.1.is_finite())
                .collect();
            let anno = chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, size, style)))
                .map_err(backend)?;
            if let Some(label) = legend.claim(s.label.as_deref()) {
                anno.label(label)
                    .legend(move |(x, y)| Circle::new((x + 9, y), 5, style));
            }
            Ok(())
        }
        Layer::Zone(z) => {
            let style = rgba(z.color, z.alpha).filled();
            let corners = [
                (z.x0, frame.y(AxisSide::Primary, z.bottom)),
                (z.x1, frame.y(AxisSide::Primary, z.top)),
            ];
            let anno = chart
                .draw_series(std::iter::once(Rectangle::new(corners, style)))
                .map_err(backend)?;
            if let Some(label) = legend.claim(z.label.as_deref()) {
                anno.label(label)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], style));
            }
            Ok(())
        }
        Layer::Candles(c) => draw_candles(chart, c, frame, theme),
        Layer::Note(n) => draw_note(chart, n, frame, theme),
    }
}

fn draw_line<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    line: &Line,
    frame: &Frame,
    legend: &mut LegendClaims,
) -> Result<(), RenderError> {
    let color = rgba(line.color, line.alpha);
    let style = color.stroke_width(frame.px(line.width));
    let ys: Vec<f64> = line.ys.iter().map(|&v| frame.y(line.axis, v)).collect();
    let runs = split_on_gaps(&line.xs, &ys);

    let paths: Vec<Vec<Point>> = runs
        .iter()
        .flat_map(|run| frame.stroke(run.clone(), line.dash))
        .collect();
    let anno = chart
        .draw_series(paths.into_iter().map(|p| PathElement::new(p, style)))
        .map_err(backend)?;
    if let Some(label) = legend.claim(line.label.as_deref()) {
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    }

    if let Some((marker, size)) = line.marker {
        let size = frame.px(size as f64);
        let points = runs.into_iter().flatten();
        match marker {
            Marker::Circle => {
                chart
                    .draw_series(points.map(|p| Circle::new(p, size, color.filled())))
                    .map_err(backend)?;
            }
            Marker::Square => {
                let half = size as i32;
                chart
                    .draw_series(points.map(|p| {
                        EmptyElement::at(p)
                            + Rectangle::new([(-half, -half), (half, half)], color.filled())
                    }))
                    .map_err(backend)?;
            }
        }
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    bars: &Bars,
    frame: &Frame,
    theme: &crate::Theme,
    legend: &mut LegendClaims,
) -> Result<(), RenderError> {
    let base = match frame.side_scale(bars.axis) {
        Scale::Linear => frame.y(bars.axis, 0.0),
        Scale::Log => frame.bounds.y.0,
    };
    let half = bars.width / 2.0;
    let rects: Vec<_> = bars
        .xs
        .iter()
        .zip(&bars.heights)
        .enumerate()
        .filter_map(|(i, (&x, &h))| {
            let top = frame.y(bars.axis, h);
            top.is_finite().then(|| {
                Rectangle::new(
                    [(x - half, base), (x + half, top)],
                    rgba(bars.color_at(i), bars.alpha).filled(),
                )
            })
        })
        .collect();
    let anno = chart.draw_series(rects).map_err(backend)?;
    if let Some(label) = legend.claim(bars.label.as_deref()) {
        let style = rgba(bars.color_at(0), bars.alpha).filled();
        anno.label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], style));
    }

    if !bars.captions.is_empty() {
        let style = frame
            .font(13.0)
            .style(FontStyle::Bold)
            .color(&theme.text.to_plotters())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        let lift = -(frame.px(4.0) as i32);
        chart
            .draw_series(
                bars.xs
                    .iter()
                    .zip(&bars.heights)
                    .zip(&bars.captions)
                    .filter(|((_, h), _)| h.is_finite())
                    .map(|((&x, &h), caption)| {
                        EmptyElement::at((x, frame.y(bars.axis, h)))
                            + Text::new(caption.clone(), (0, lift), style.clone())
                    }),
            )
            .map_err(backend)?;
    }
    Ok(())
}

fn draw_fill<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    fill: &Fill,
    frame: &Frame,
    legend: &mut LegendClaims,
) -> Result<(), RenderError> {
    let a: Vec<f64> = fill.a.iter().map(|&v| frame.y(fill.axis, v)).collect();
    let b: Vec<f64> = fill.b.iter().map(|&v| frame.y(fill.axis, v)).collect();
    let style = rgba(fill.color, fill.alpha).filled();
    let polygons = fill_polygons(&fill.xs, &a, &b, fill.region);
    let anno = chart
        .draw_series(polygons.into_iter().map(|p| Polygon::new(p, style)))
        .map_err(backend)?;
    if let Some(label) = legend.claim(fill.label.as_deref()) {
        anno.label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], style));
    }
    Ok(())
}

fn draw_candles<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    candles: &Candles,
    frame: &Frame,
    theme: &crate::Theme,
) -> Result<(), RenderError> {
    let y = |v: f64| frame.y(AxisSide::Primary, v);
    let half = candles.width / 2.0;
    let rows: Vec<(f64, f64, f64, f64, f64)> = (0..candles.xs.len())
        .map(|i| {
            (
                candles.xs[i],
                candles.open[i],
                candles.high[i],
                candles.low[i],
                candles.close[i],
            )
        })
        .filter(|(x, o, h, l, c)| [x, o, h, l, c].iter().all(|v| v.is_finite()))
        .collect();

    chart
        .draw_series(rows.iter().map(|&(x, o, h, l, c)| {
            let color = theme.direction_color(o, c).to_plotters();
            PathElement::new(vec![(x, y(l)), (x, y(h))], color.stroke_width(frame.px(1.0)))
        }))
        .map_err(backend)?;
    chart
        .draw_series(rows.iter().map(|&(x, o, _, _, c)| {
            let color = theme.direction_color(o, c).to_plotters();
            Rectangle::new(
                [(x - half, y(o.min(c))), (x + half, y(o.max(c)))],
                color.filled(),
            )
        }))
        .map_err(backend)?;
    Ok(())
}

fn draw_note<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    note: &Note,
    frame: &Frame,
    theme: &crate::Theme,
) -> Result<(), RenderError> {
    let color = note.color.unwrap_or(theme.text).to_plotters();
    let at = (note.at.0, frame.y(note.axis, note.at.1));
    if !(at.0.is_finite() && at.1.is_finite()) {
        return Ok(());
    }

    if let Some(target) = note.arrow_to {
        let target = (target.0, frame.y(note.axis, target.1));
        if target.0.is_finite() && target.1.is_finite() {
            let stroke = color.stroke_width(frame.px(1.5));
            chart
                .draw_series(std::iter::once(PathElement::new(vec![at, target], stroke)))
                .map_err(backend)?;
            chart
                .draw_series(std::iter::once(Circle::new(
                    target,
                    frame.px(4.0),
                    color.filled(),
                )))
                .map_err(backend)?;
        }
    }

    let font = frame.font(note.size);
    let font = if note.bold {
        font.style(FontStyle::Bold)
    } else {
        font
    };
    let mut style = font.color(&color);
    if note.centered {
        style = style.pos(Pos::new(HPos::Center, VPos::Bottom));
    }
    let line_height = (note.size * frame.scale * 1.3).round() as i32;
    let (dx, dy) = (
        (note.offset.0 as f64 * frame.scale).round() as i32,
        (note.offset.1 as f64 * frame.scale).round() as i32,
    );
    chart
        .draw_series(note.text.lines().enumerate().map(|(i, line)| {
            EmptyElement::at(at) + Text::new(line.to_string(), (dx, dy + i as i32 * line_height), style.clone())
        }))
        .map_err(backend)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::figure::{Axis, XAxis};
    use crate::layer::{Bars, Fill, Line, Note, RefLine, Span};
    use chrono::NaiveDate;

    fn line(xs: &[f64], ys: &[f64]) -> Line {
        Line::new(xs.to_vec(), ys.to_vec(), palette::INK)
    }

    #[test]
    fn bounds_pad_layer_extents() {
        let fig = Figure::new("t")
            .x_axis(XAxis::numeric())
            .layer(line(&[0.0, 100.0], &[10.0, 30.0]));
        let b = plot_bounds(&fig).unwrap();
        assert_eq!(b.x, (-2.0, 102.0));
        assert_eq!(b.y, (9.0, 31.0));
        assert_eq!(b.y2, None);
    }

    #[test]
    fn bounds_include_bar_base_and_spans() {
        let fig = Figure::new("t")
            .layer(Bars::new(vec![1.0], vec![50.0], palette::INK).width(1.0))
            .layer(Span::new(-10.0, 0.0, palette::CRASH));
        let b = plot_bounds(&fig).unwrap();
        assert!(b.y.0 < 0.0, "zero baseline visible: {:?}", b.y);
        assert!(b.x.0 < -10.0 && b.x.1 > 1.5);
    }

    #[test]
    fn log_axis_bounds_are_in_log_space() {
        let fig = Figure::new("t")
            .y_axis(Axis::log().range(10.0, 10_000.0))
            .layer(line(&[0.0, 1.0], &[100.0, 1000.0]));
        let b = plot_bounds(&fig).unwrap();
        assert!((b.y.0 - 1.0).abs() < 1e-12);
        assert!((b.y.1 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn secondary_layers_get_their_own_range() {
        let fig = Figure::new("t")
            .y_axis(Axis::linear())
            .y2_axis(Axis::log())
            .layer(Bars::new(vec![0.0, 1.0], vec![2.0, 4.0], palette::CRASH))
            .layer(line(&[0.0, 1.0], &[10.0, 100_000.0]).secondary());
        let b = plot_bounds(&fig).unwrap();
        assert!(b.y.1 < 10.0, "primary holds bars only: {:?}", b.y);
        let y2 = b.y2.unwrap();
        assert!(y2.0 < 1.0 && y2.1 > 5.0, "log range: {y2:?}");
    }

    #[test]
    fn secondary_without_second_axis_shares_primary() {
        let fig = Figure::new("t").layer(line(&[0.0, 1.0], &[1.0, 2.0]).secondary());
        assert!(plot_bounds(&fig).is_ok());
    }

    #[test]
    fn figure_without_data_is_rejected() {
        let fig = Figure::new("empty").layer(RefLine::horizontal(0.0, palette::INK));
        assert!(matches!(plot_bounds(&fig), Err(RenderError::NoData(t)) if t == "empty"));
    }

    #[test]
    fn notes_and_fills_count_toward_bounds() {
        let fig = Figure::new("t")
            .layer(Fill::to_level(vec![0.0, 1.0], vec![5.0, 6.0], 100.0, palette::GAIN))
            .layer(Note::new("floor", (3.0, 0.0)).arrow_to((1.0, 200.0)));
        let b = plot_bounds(&fig).unwrap();
        assert!(b.x.1 > 3.0);
        assert!(b.y.0 < 0.0 && b.y.1 > 200.0);
    }

    #[test]
    fn x_labels_by_kind() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 12).unwrap();
        let dates = XKind::Dates {
            format: "%b %d".into(),
        };
        assert_eq!(format_x(&dates, geometry::date_x(d)), "Feb 12");
        assert_eq!(format_x(&XKind::Numeric, 2024.0), "2024");
        assert_eq!(format_x(&XKind::Numeric, 2024.5), "2024.5");

        let cats = XKind::Categories(vec!["Retail".into(), "Institutions".into()]);
        assert_eq!(format_x(&cats, 1.0), "Institutions");
        assert_eq!(format_x(&cats, 0.5), "");
        assert_eq!(format_x(&cats, 2.0), "");
        assert_eq!(format_x(&cats, -1.0), "");
    }

    #[test]
    fn legend_claims_once() {
        let mut claims = LegendClaims::default();
        assert!(!claims.any());
        assert_eq!(claims.claim(Some("Zone")), Some("Zone"));
        assert_eq!(claims.claim(Some("Zone")), None);
        assert_eq!(claims.claim(None), None);
        assert!(claims.any());
    }

    #[test]
    fn invalid_layer_is_reported_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let fig = Figure::new("t").layer(line(&[0.0, 1.0], &[1.0]));
        let err = render(&fig, &dir.path().join("x.png"), 1.0).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayer(_)));
        assert!(!dir.path().join("x.png").exists());
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn renders_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let fig = Figure::new("Smoke")
            .x_axis(XAxis::numeric().label("Year"))
            .y_axis(Axis::log().label("Cost"))
            .y2_axis(Axis::linear().label("Index"))
            .layer(line(&[2017.0, 2024.0], &[930.0, 2.0e8]).label("AI"))
            .layer(
                line(&[2017.0, 2024.0], &[100.0, 134.0])
                    .secondary()
                    .dash(Dash::Dashed)
                    .label("Labor"),
            )
            .layer(Note::new("peak", (2020.0, 1.0e6)).arrow_to((2024.0, 2.0e8)));
        render(&fig, &path, 0.5).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
