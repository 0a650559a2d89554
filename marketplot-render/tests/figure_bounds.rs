//! Figures assembled the way chart sets build them, checked without a
//! drawing backend.

use chrono::NaiveDate;
use marketplot_render::{
    date_x, palette, plot_bounds, Axis, Bars, Fill, Figure, Line, Note, Region, Span, XAxis,
};
use proptest::prelude::*;

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, day).unwrap()
}

#[test]
fn dated_figure_spans_its_series_and_highlights() {
    let dates: Vec<NaiveDate> = (1..=13).map(|day| d(2, day)).collect();
    let values: Vec<f64> = (0..13).map(|i| 100.0 - i as f64).collect();
    let fig = Figure::new("Double dip")
        .x_axis(XAxis::dates("%b %d"))
        .layer(Line::dated(&dates, &values, palette::BITCOIN).label("IBIT"))
        .layer(Span::dates(d(2, 4), d(2, 7), palette::CRASH).label("Mechanical"))
        .layer(Span::dates(d(2, 12), d(2, 13), palette::WARNING).label("Macro"));

    let b = plot_bounds(&fig).unwrap();
    assert!(b.x.0 < date_x(d(2, 1)) && b.x.1 > date_x(d(2, 13)));
    assert!(b.y.0 < 88.0 && b.y.1 > 100.0);
    assert_eq!(fig.legend_labels(), vec!["IBIT", "Mechanical", "Macro"]);
}

#[test]
fn twin_axis_keeps_ranges_apart() {
    let years: Vec<f64> = (2016..=2026).step_by(2).map(f64::from).collect();
    let fig = Figure::new("Coffee")
        .x_axis(XAxis::numeric())
        .y_axis(Axis::linear().label("USD"))
        .y2_axis(Axis::log().label("Sats"))
        .layer(Bars::new(years.clone(), vec![2.1, 2.3, 2.7, 3.1, 3.5, 3.8], palette::CRASH).width(1.2))
        .layer(Line::new(years, vec![350_000.0, 35_384.0, 18_000.0, 10_333.0, 5_384.0, 5_588.0], palette::BITCOIN).secondary());

    let b = plot_bounds(&fig).unwrap();
    assert!(b.y.1 < 5.0);
    let (lo, hi) = b.y2.unwrap();
    assert!(lo < 5_384f64.log10() && hi > 350_000f64.log10());
}

#[test]
fn fill_regions_do_not_widen_bounds_beyond_their_series() {
    let xs: Vec<f64> = (0..4).map(f64::from).collect();
    let fig = Figure::new("Zones")
        .x_axis(XAxis::numeric())
        .layer(Fill::between(xs.clone(), vec![1.0, 3.0, 1.0, 3.0], vec![2.0; 4], palette::GAIN).region(Region::Above))
        .layer(Note::new("floor", (1.0, 2.0)));
    let b = plot_bounds(&fig).unwrap();
    assert!(b.y.0 > 0.0 && b.y.1 < 4.0);
}

proptest! {
    #[test]
    fn bounds_contain_every_finite_point(
        ys in proptest::collection::vec(prop_oneof![Just(f64::NAN), -1.0e6..1.0e6f64], 1..60)
    ) {
        prop_assume!(ys.iter().any(|v| v.is_finite()));
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        let fig = Figure::new("p")
            .x_axis(XAxis::numeric())
            .layer(Line::new(xs, ys.clone(), palette::INK));
        let b = plot_bounds(&fig).unwrap();
        for v in ys.iter().filter(|v| v.is_finite()) {
            prop_assert!(b.y.0 <= *v && *v <= b.y.1);
        }
        prop_assert!(b.x.0 < b.x.1);
    }
}
