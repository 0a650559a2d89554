//! What a chart set sees while it builds its figures.

use crate::error::RunError;
use marketplot_core::data::{
    acquire, acquire_each, acquire_table, FieldPreference, FrameRequest, FrameSource, RawFrame,
};
use marketplot_core::{PriceField, SeriesTable};
use chrono::NaiveDate;

pub struct RunContext<'a> {
    pub source: &'a dyn FrameSource,
    /// Anchors `Since`/`Lookback` windows and the "today" marker on
    /// projection charts.
    pub today: NaiveDate,
}

impl<'a> RunContext<'a> {
    pub fn new(source: &'a dyn FrameSource, today: NaiveDate) -> Self {
        Self { source, today }
    }

    /// One column per symbol, adjusted close preferred.
    pub fn table(&self, request: &FrameRequest) -> Result<SeriesTable, RunError> {
        Ok(acquire_table(
            self.source,
            request,
            FieldPreference::PreferAdjusted,
        )?)
    }

    /// One column per symbol holding exactly `field`.
    pub fn field(&self, request: &FrameRequest, field: PriceField) -> Result<SeriesTable, RunError> {
        Ok(acquire_table(
            self.source,
            request,
            FieldPreference::Exact(field),
        )?)
    }

    /// Unadjusted closes, one download per symbol, outer-joined.
    pub fn closes(&self, request: &FrameRequest) -> Result<SeriesTable, RunError> {
        self.each(request, PriceField::Close)
    }

    /// One exact field, one download per symbol, outer-joined.
    pub fn each(&self, request: &FrameRequest, field: PriceField) -> Result<SeriesTable, RunError> {
        Ok(acquire_each(
            self.source,
            request,
            FieldPreference::Exact(field),
        )?)
    }

    /// The raw frame, for charts that need more than one field per symbol.
    pub fn frame(&self, request: &FrameRequest) -> Result<RawFrame, RunError> {
        Ok(acquire(self.source, request)?)
    }
}
