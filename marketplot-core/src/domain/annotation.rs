use super::table::SeriesTable;
use chrono::NaiveDate;

/// A labelled mark on one series of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationPoint {
    pub date: NaiveDate,
    pub series: String,
    pub label: String,
}

impl AnnotationPoint {
    pub fn new(date: NaiveDate, series: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            date,
            series: series.into(),
            label: label.into(),
        }
    }

    /// Anchor of the mark: the series value on the date, or the last value
    /// before it when the market was closed that day.
    pub fn resolve(&self, table: &SeriesTable) -> Option<(NaiveDate, f64)> {
        table
            .value_at_or_before(&self.series, self.date)
            .map(|v| (self.date, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::day;

    #[test]
    fn resolves_to_previous_session_on_closed_day() {
        let table = SeriesTable::new(
            vec![day(0), day(1), day(2)],
            vec![("BTC".into(), vec![10.0, 11.0, f64::NAN])],
        )
        .unwrap();

        let mark = AnnotationPoint::new(day(2), "BTC", "crash");
        assert_eq!(mark.resolve(&table), Some((day(2), 11.0)));

        let unknown = AnnotationPoint::new(day(2), "ETH", "n/a");
        assert_eq!(unknown.resolve(&table), None);
    }
}
