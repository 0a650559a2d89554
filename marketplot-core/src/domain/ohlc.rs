use super::table::TableError;
use chrono::NaiveDate;

/// Open/high/low/close columns of one symbol, aligned to a date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Ohlc {
    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl Ohlc {
    pub fn new(
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> Result<Self, TableError> {
        for (name, col) in [("open", &open), ("high", &high), ("low", &low), ("close", &close)] {
            if col.len() != dates.len() {
                return Err(TableError::LengthMismatch {
                    column: name.to_string(),
                    expected: dates.len(),
                    actual: col.len(),
                });
            }
        }
        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Drop sessions where any of the four prices is missing.
    pub fn complete_only(&self) -> Self {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| {
                [self.open[i], self.high[i], self.low[i], self.close[i]]
                    .iter()
                    .all(|v| !v.is_nan())
            })
            .collect();
        let pick = |col: &[f64]| keep.iter().map(|&i| col[i]).collect::<Vec<_>>();
        Self {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            open: pick(&self.open),
            high: pick(&self.high),
            low: pick(&self.low),
            close: pick(&self.close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::day;

    #[test]
    fn complete_only_drops_partial_sessions() {
        let ohlc = Ohlc::new(
            vec![day(0), day(1), day(2)],
            vec![1.0, 2.0, 3.0],
            vec![1.5, f64::NAN, 3.5],
            vec![0.5, 1.5, 2.5],
            vec![1.2, 2.2, 3.2],
        )
        .unwrap();

        let clean = ohlc.complete_only();
        assert_eq!(clean.dates, vec![day(0), day(2)]);
        assert_eq!(clean.high, vec![1.5, 3.5]);
    }

    #[test]
    fn rejects_short_column() {
        let err = Ohlc::new(vec![day(0)], vec![1.0], vec![], vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { ref column, .. } if column == "high"));
    }
}
