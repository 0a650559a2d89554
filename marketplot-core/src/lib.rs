//! marketplot core: series tables, market-data acquisition, shape
//! normalization and transforms.
//!
//! The pipeline every chart set follows:
//! - Acquire a raw frame for a set of symbols (`data::acquire`)
//! - Normalize its layout to one price field per symbol (`data::shape`)
//! - Transform: rebase, ratios, volatility, basis, projections (`transform`)
//!
//! Rendering lives in `marketplot-render`; the chart sets themselves in
//! `marketplot-runner`.

pub mod data;
pub mod domain;
pub mod transform;

pub use data::DataError;
pub use domain::{AnnotationPoint, DropRule, Ohlc, PriceField, SeriesTable, TableError};
pub use transform::TransformError;
