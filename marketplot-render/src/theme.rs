//! Theme tokens for rendered charts.
//!
//! Two palettes: a light "article" theme (white canvas, dark ink) and a dark
//! neon theme for the institutional-flow charts.

use crate::color::Rgb;

/// Surface and ink colors shared by every element of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Canvas fill
    pub background: Rgb,
    /// Titles, axis labels, notes
    pub text: Rgb,
    /// Tick labels and axis lines
    pub axis: Rgb,
    /// Grid lines
    pub grid: Rgb,
    /// Legend box fill
    pub legend_background: Rgb,
    /// Rising candles, positive bars
    pub positive: Rgb,
    /// Falling candles, negative bars
    pub negative: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Rgb(255, 255, 255),
            text: Rgb(33, 33, 33),
            axis: Rgb(90, 90, 90),
            grid: Rgb(225, 225, 225),
            legend_background: Rgb(255, 255, 255),
            positive: Rgb(46, 125, 50),
            negative: Rgb(211, 47, 47),
        }
    }

    /// Deep charcoal with neon accents.
    pub fn dark() -> Self {
        Self {
            background: Rgb(18, 18, 18),
            text: Rgb(240, 240, 240),
            axis: Rgb(170, 170, 170),
            grid: Rgb(45, 45, 48),
            legend_background: Rgb(30, 30, 32),
            positive: Rgb(0, 230, 118),
            negative: Rgb(255, 23, 68),
        }
    }

    /// Candle or bar color for a move from `open` to `close`.
    pub fn direction_color(&self, open: f64, close: f64) -> Rgb {
        if close >= open {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn is_dark(&self) -> bool {
        let Rgb(r, g, b) = self.background;
        (r as u32 + g as u32 + b as u32) < 3 * 128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_light() {
        let theme = Theme::default();
        assert_eq!(theme.background, Rgb(255, 255, 255));
        assert!(!theme.is_dark());
        assert!(Theme::dark().is_dark());
    }

    #[test]
    fn direction_color_treats_flat_as_up() {
        let theme = Theme::dark();
        assert_eq!(theme.direction_color(10.0, 10.0), theme.positive);
        assert_eq!(theme.direction_color(10.0, 9.0), theme.negative);
    }
}
