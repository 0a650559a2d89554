//! Pure geometry helpers: coordinate mapping, gap splitting, dashes and
//! fill polygons. Nothing here touches a drawing backend.

use chrono::{Datelike, NaiveDate};

/// A point in plot coordinates (x, y).
pub type Point = (f64, f64);

/// X coordinate of a calendar day (days since 0001-01-01).
pub fn date_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_x`], rounding to the nearest day.
pub fn x_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Vertical axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    /// Base-10 logarithm; non-positive values are not drawable.
    Log,
}

impl Scale {
    /// Data value to plot coordinate. Non-drawable values become NaN.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log if v > 0.0 => v.log10(),
            Scale::Log => f64::NAN,
        }
    }

    /// Plot coordinate back to a data value.
    pub fn invert(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log => 10f64.powf(v),
        }
    }
}

/// Maps one interval linearly onto another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    from: (f64, f64),
    to: (f64, f64),
}

impl AffineMap {
    pub fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self { from, to }
    }

    pub fn identity() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }

    pub fn apply(&self, v: f64) -> f64 {
        let span = self.from.1 - self.from.0;
        if span == 0.0 {
            return self.to.0;
        }
        self.to.0 + (v - self.from.0) / span * (self.to.1 - self.to.0)
    }
}

/// Finite min/max of `values`, widened by `pad` of the span on each side.
///
/// A degenerate span is widened by 5% of the magnitude (or 1.0 around zero).
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return None;
    }
    if lo == hi {
        let half = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        return Some((lo - half, hi + half));
    }
    let margin = (hi - lo) * pad;
    Some((lo - margin, hi + margin))
}

/// Runs of consecutive finite points; a NaN in either coordinate ends a run.
pub fn split_on_gaps(xs: &[f64], ys: &[f64]) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Cuts a polyline into dashes of `on` length separated by `off` gaps.
///
/// Lengths are measured after multiplying x by `unit.0` and y by `unit.1`,
/// i.e. in pixels when `unit` is pixels per plot unit.
pub fn dash_segments(path: &[Point], on: f64, off: f64, unit: (f64, f64)) -> Vec<Vec<Point>> {
    if path.len() < 2 || on <= 0.0 {
        return if path.is_empty() { Vec::new() } else { vec![path.to_vec()] };
    }
    let period = on + off.max(0.0);
    let mut dashes = Vec::new();
    let mut current = vec![path[0]];
    // Distance travelled within the current period.
    let mut phase = 0.0;

    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dx = (b.0 - a.0) * unit.0;
        let dy = (b.1 - a.1) * unit.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            continue;
        }
        let mut walked = 0.0;
        while walked < len {
            let drawing = phase < on;
            let boundary = if drawing { on } else { period };
            let step = (boundary - phase).min(len - walked);
            walked += step;
            phase += step;
            let t = walked / len;
            let p = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
            if drawing {
                current.push(p);
            }
            if phase >= boundary {
                if drawing {
                    if current.len() >= 2 {
                        dashes.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                } else {
                    phase = 0.0;
                    current = vec![p];
                }
            }
        }
    }
    if current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/// Which part of the band between two series to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    All,
    /// Where the first series is at or above the second.
    Above,
    /// Where the first series is below the second.
    Below,
}

impl Region {
    fn admits(self, a: f64, b: f64) -> bool {
        match self {
            Region::All => true,
            Region::Above => a >= b,
            Region::Below => a < b,
        }
    }
}

/// Polygons covering the band between `a` and `b` over `xs`.
///
/// One polygon per run of consecutive rows that are finite and admitted by
/// `region`. Single-row runs have no area and are dropped.
pub fn fill_polygons(xs: &[f64], a: &[f64], b: &[f64], region: Region) -> Vec<Vec<Point>> {
    let mut polygons = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    let flush = |run: &mut Vec<usize>, polygons: &mut Vec<Vec<Point>>| {
        if run.len() >= 2 {
            let mut poly: Vec<Point> = run.iter().map(|&i| (xs[i], a[i])).collect();
            poly.extend(run.iter().rev().map(|&i| (xs[i], b[i])));
            polygons.push(poly);
        }
        run.clear();
    };

    for i in 0..xs.len().min(a.len()).min(b.len()) {
        let ok = xs[i].is_finite() && a[i].is_finite() && b[i].is_finite();
        if ok && region.admits(a[i], b[i]) {
            run.push(i);
        } else {
            flush(&mut run, &mut polygons);
        }
    }
    flush(&mut run, &mut polygons);
    polygons
}

/// Tick label for a value: thousands grouping for large values, trimmed
/// decimals for small ones.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let abs = v.abs();
    if abs >= 1000.0 {
        group_thousands(v.round() as i64)
    } else if abs >= 100.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else if abs >= 1.0 {
        trim_zeros(format!("{v:.2}"))
    } else {
        trim_zeros(format!("{v:.4}"))
    }
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_x_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 12).unwrap();
        assert_eq!(x_date(date_x(d)), Some(d));
        assert_eq!(x_date(date_x(d) + 0.4), Some(d));
        assert_eq!(date_x(d + chrono::Duration::days(1)) - date_x(d), 1.0);
        assert_eq!(x_date(f64::NAN), None);
    }

    #[test]
    fn log_scale_drops_non_positive() {
        assert!((Scale::Log.apply(1000.0) - 3.0).abs() < 1e-12);
        assert!(Scale::Log.apply(0.0).is_nan());
        assert!(Scale::Log.apply(-5.0).is_nan());
        assert!((Scale::Log.invert(2.0) - 100.0).abs() < 1e-9);
        assert_eq!(Scale::Linear.apply(-5.0), -5.0);
    }

    #[test]
    fn affine_maps_endpoints() {
        let m = AffineMap::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(m.apply(0.0), 100.0);
        assert_eq!(m.apply(10.0), 200.0);
        assert_eq!(m.apply(5.0), 150.0);
        assert_eq!(AffineMap::new((3.0, 3.0), (1.0, 2.0)).apply(9.0), 1.0);
        assert_eq!(AffineMap::identity().apply(0.25), 0.25);
    }

    #[test]
    fn padded_range_ignores_nan() {
        let r = padded_range([f64::NAN, 10.0, 20.0], 0.1).unwrap();
        assert_eq!(r, (9.0, 21.0));
        assert_eq!(padded_range([f64::NAN], 0.1), None);
        assert_eq!(padded_range([0.0, 0.0], 0.1), Some((-1.0, 1.0)));
        assert_eq!(padded_range([100.0], 0.1), Some((95.0, 105.0)));
    }

    #[test]
    fn gaps_split_lines() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [1.0, f64::NAN, 3.0, 4.0, f64::NAN, f64::NAN];
        let runs = split_on_gaps(&xs, &ys);
        assert_eq!(runs, vec![vec![(0.0, 1.0)], vec![(2.0, 3.0), (3.0, 4.0)]]);
    }

    #[test]
    fn dashes_alternate_along_a_straight_line() {
        let dashes = dash_segments(&[(0.0, 0.0), (10.0, 0.0)], 2.0, 2.0, (1.0, 1.0));
        assert_eq!(dashes.len(), 3);
        assert_eq!(dashes[0], vec![(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(dashes[1], vec![(4.0, 0.0), (6.0, 0.0)]);
        assert_eq!(dashes[2], vec![(8.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn dashes_follow_corners() {
        // 3 px right then 3 px up; the first dash turns the corner.
        let path = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)];
        let dashes = dash_segments(&path, 4.0, 1.0, (1.0, 1.0));
        assert_eq!(dashes[0], vec![(0.0, 0.0), (3.0, 0.0), (3.0, 1.0)]);
        assert_eq!(dashes[1], vec![(3.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn dash_units_scale_lengths() {
        // Two plot units at 5 px per unit: a 10 px line, one 4-px dash fits twice.
        let dashes = dash_segments(&[(0.0, 0.0), (2.0, 0.0)], 4.0, 1.0, (5.0, 1.0));
        assert_eq!(dashes.len(), 2);
    }

    #[test]
    fn fill_regions_follow_the_crossing() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let a = [5.0, 6.0, 1.0, 0.0, 7.0];
        let b = [2.0, 2.0, 2.0, 2.0, 2.0];

        let above = fill_polygons(&xs, &a, &b, Region::Above);
        assert_eq!(above.len(), 1);
        assert_eq!(
            above[0],
            vec![(0.0, 5.0), (1.0, 6.0), (1.0, 2.0), (0.0, 2.0)]
        );

        let below = fill_polygons(&xs, &a, &b, Region::Below);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].len(), 4);

        let all = fill_polygons(&xs, &a, &b, Region::All);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].len(), 10);
    }

    #[test]
    fn fill_breaks_on_missing_rows() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let a = [1.0, f64::NAN, 1.0, 1.0];
        let b = [0.0; 4];
        let polys = fill_polygons(&xs, &a, &b, Region::All);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0][0], (2.0, 1.0));
    }

    #[test]
    fn value_labels() {
        assert_eq!(format_value(55207.0), "55,207");
        assert_eq!(format_value(-1234567.4), "-1,234,567");
        assert_eq!(format_value(150.25), "150");
        assert_eq!(format_value(100.0), "100");
        assert_eq!(format_value(3.5), "3.5");
        assert_eq!(format_value(0.0125), "0.0125");
        assert_eq!(format_value(f64::NAN), "");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
    }
}
