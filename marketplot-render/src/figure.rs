//! The explicit chart description handed to the renderer.

use crate::geometry::Scale;
use crate::layer::{AxisSide, Layer};
use crate::theme::Theme;

/// How x coordinates are labelled.
#[derive(Debug, Clone, PartialEq)]
pub enum XKind {
    /// Day numbers from [`date_x`](crate::geometry::date_x), labelled with a
    /// chrono format string.
    Dates { format: String },
    Numeric,
    /// Category `i` sits at x = i.
    Categories(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XAxis {
    pub label: Option<String>,
    pub kind: XKind,
    /// Explicit (min, max); derived from the layers when absent.
    pub range: Option<(f64, f64)>,
}

impl XAxis {
    pub fn dates(format: impl Into<String>) -> Self {
        Self {
            label: None,
            kind: XKind::Dates {
                format: format.into(),
            },
            range: None,
        }
    }

    pub fn numeric() -> Self {
        Self {
            label: None,
            kind: XKind::Numeric,
            range: None,
        }
    }

    pub fn categories<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        let range = Some((-0.5, names.len() as f64 - 0.5));
        Self {
            label: None,
            kind: XKind::Categories(names),
            range,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// A y axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub label: Option<String>,
    pub scale: Scale,
    /// Explicit (min, max) in data units.
    pub range: Option<(f64, f64)>,
}

impl Axis {
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn log() -> Self {
        Self {
            scale: Scale::Log,
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// A complete chart: canvas, axes and ordered layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// Pixel size at scale 1.
    pub size: (u32, u32),
    pub theme: Theme,
    pub x_axis: XAxis,
    pub y_axis: Axis,
    pub y2_axis: Option<Axis>,
    pub legend: Option<LegendPosition>,
    pub layers: Vec<Layer>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: (1200, 700),
            theme: Theme::default(),
            x_axis: XAxis::dates("%Y"),
            y_axis: Axis::linear(),
            y2_axis: None,
            legend: Some(LegendPosition::UpperLeft),
            layers: Vec::new(),
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn x_axis(mut self, axis: XAxis) -> Self {
        self.x_axis = axis;
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn y2_axis(mut self, axis: Axis) -> Self {
        self.y2_axis = Some(axis);
        self
    }

    pub fn legend(mut self, position: LegendPosition) -> Self {
        self.legend = Some(position);
        self
    }

    pub fn no_legend(mut self) -> Self {
        self.legend = None;
        self
    }

    pub fn layer(mut self, layer: impl Into<Layer>) -> Self {
        self.layers.push(layer.into());
        self
    }

    pub fn push(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    /// Legend labels in draw order, first occurrence only.
    pub fn legend_labels(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for label in self.layers.iter().filter_map(Layer::label) {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }

    /// The axis a layer side resolves to. Secondary falls back to primary
    /// when the figure has no second axis.
    pub fn axis_for(&self, side: AxisSide) -> &Axis {
        match (side, &self.y2_axis) {
            (AxisSide::Secondary, Some(axis)) => axis,
            _ => &self.y_axis,
        }
    }

    pub fn count<F: Fn(&Layer) -> bool>(&self, pred: F) -> usize {
        self.layers.iter().filter(|l| pred(l)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::layer::{Fill, Line, Span};

    #[test]
    fn legend_labels_are_deduplicated_in_order() {
        let fig = Figure::new("t")
            .layer(Span::new(0.0, 1.0, palette::CRASH).label("Zone"))
            .layer(Line::new(vec![0.0], vec![1.0], palette::INK).label("Price"))
            .layer(Span::new(2.0, 3.0, palette::CRASH).label("Zone"))
            .layer(Fill::between(vec![], vec![], vec![], palette::GAIN));
        assert_eq!(fig.legend_labels(), vec!["Zone", "Price"]);
    }

    #[test]
    fn secondary_falls_back_without_second_axis() {
        let fig = Figure::new("t").y_axis(Axis::log().label("Cost"));
        assert_eq!(fig.axis_for(AxisSide::Secondary).scale, Scale::Log);

        let fig = fig.y2_axis(Axis::linear().label("Index"));
        assert_eq!(fig.axis_for(AxisSide::Secondary).label.as_deref(), Some("Index"));
    }

    #[test]
    fn categories_set_their_range() {
        let axis = XAxis::categories(&["Retail", "Institutions"]);
        assert_eq!(axis.range, Some((-0.5, 1.5)));
    }
}
