//! Rebasing: scale every column so a chosen row reads 100.
//!
//! `rebase` uses the first row. A zero or missing base is an error rather than
//! a silent column of infinities; clean the table first.

use super::TransformError;
use crate::domain::{DropRule, SeriesTable};
use chrono::NaiveDate;

/// Divide every column by its first value and multiply by 100.
pub fn rebase(table: &SeriesTable) -> Result<SeriesTable, TransformError> {
    if table.is_empty() {
        return Err(TransformError::EmptyTable);
    }
    let bases = table.row(0);
    divide_by(table, &bases)
}

/// Rebase to the value on `date`, or the last value before it.
///
/// The baseline is read from the forward-filled table, so a market closed on
/// `date` is based on its previous session. Only rows on or after `date` are
/// returned; they are not filled.
pub fn rebase_at(table: &SeriesTable, date: NaiveDate) -> Result<SeriesTable, TransformError> {
    let filled = table.until(date).forward_fill();
    if filled.is_empty() {
        return Err(TransformError::NoBaseline(date));
    }
    let bases = filled.row(filled.len() - 1);
    divide_by(&table.since(date), &bases)
}

/// Drop empty rows, forward-fill, drop rows still incomplete, then rebase.
pub fn clean_and_rebase(table: &SeriesTable) -> Result<SeriesTable, TransformError> {
    let cleaned = table
        .drop_missing(DropRule::All)
        .forward_fill()
        .drop_missing(DropRule::Any);
    rebase(&cleaned)
}

fn divide_by(table: &SeriesTable, bases: &[f64]) -> Result<SeriesTable, TransformError> {
    for ((name, _), base) in table.iter_columns().zip(bases) {
        if base.is_nan() || *base == 0.0 {
            return Err(TransformError::InvalidBase {
                column: name.to_string(),
                value: *base,
            });
        }
    }

    let mut out = table.clone();
    for ((name, col), base) in table.iter_columns().zip(bases) {
        let scaled = col.iter().map(|v| v / base * 100.0).collect();
        out = out.with_column(name, scaled)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::day;
    use crate::transform::{assert_approx, DEFAULT_EPSILON};

    fn table(cols: &[(&str, &[f64])]) -> SeriesTable {
        let n = cols[0].1.len();
        SeriesTable::new(
            (0..n as i64).map(day).collect(),
            cols.iter().map(|(c, v)| (c.to_string(), v.to_vec())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn rebases_to_first_row() {
        let t = table(&[("A", &[10.0, 20.0, 5.0]), ("B", &[100.0, 100.0, 100.0])]);
        let r = rebase(&t).unwrap();
        assert_eq!(r.column("A").unwrap(), &[100.0, 200.0, 50.0]);
        assert_eq!(r.column("B").unwrap(), &[100.0, 100.0, 100.0]);
    }

    #[test]
    fn zero_or_missing_base_is_an_error() {
        let t = table(&[("A", &[0.0, 1.0])]);
        assert_eq!(
            rebase(&t).unwrap_err(),
            TransformError::InvalidBase {
                column: "A".into(),
                value: 0.0
            }
        );

        let t = table(&[("A", &[1.0, 1.0]), ("B", &[f64::NAN, 1.0])]);
        assert!(matches!(
            rebase(&t),
            Err(TransformError::InvalidBase { column, .. }) if column == "B"
        ));
    }

    #[test]
    fn empty_table_is_an_error() {
        let t = SeriesTable::empty(&["A"]);
        assert_eq!(rebase(&t).unwrap_err(), TransformError::EmptyTable);
    }

    #[test]
    fn rebasing_after_slicing_is_not_a_no_op() {
        let t = table(&[("A", &[10.0, 20.0, 40.0])]);
        let once = rebase(&t).unwrap();
        let again = rebase(&once.skip_rows(1)).unwrap();
        assert_eq!(again.column("A").unwrap(), &[100.0, 200.0]);
    }

    #[test]
    fn rebase_at_uses_last_session_before_closed_day() {
        // Stocks closed on day 2; BTC trades through.
        let t = table(&[
            ("SPX", &[50.0, 40.0, f64::NAN, 44.0]),
            ("BTC", &[10.0, 10.0, 20.0, 5.0]),
        ]);
        let r = rebase_at(&t, day(2)).unwrap();
        assert_eq!(r.dates(), &[day(2), day(3)]);
        let spx = r.column("SPX").unwrap();
        assert!(spx[0].is_nan());
        assert_approx(spx[1], 110.0, DEFAULT_EPSILON);
        assert_eq!(r.column("BTC").unwrap(), &[100.0, 25.0]);
    }

    #[test]
    fn rebase_at_before_first_row_has_no_baseline() {
        let t = table(&[("A", &[1.0])]);
        assert_eq!(
            rebase_at(&t, day(-3)).unwrap_err(),
            TransformError::NoBaseline(day(-3))
        );
    }

    #[test]
    fn clean_and_rebase_fills_then_trims() {
        let t = table(&[
            ("A", &[f64::NAN, 2.0, f64::NAN, 4.0]),
            ("B", &[1.0, f64::NAN, f64::NAN, 3.0]),
        ]);
        let r = clean_and_rebase(&t).unwrap();
        // Day 2 is empty everywhere; day 0 keeps a leading gap in A.
        assert_eq!(r.dates(), &[day(1), day(3)]);
        assert_eq!(r.column("A").unwrap(), &[100.0, 200.0]);
        assert_eq!(r.column("B").unwrap(), &[100.0, 300.0]);
    }
}
