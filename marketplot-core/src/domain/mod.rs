//! Domain types for marketplot

pub mod annotation;
pub mod field;
pub mod ohlc;
pub mod table;

pub use annotation::AnnotationPoint;
pub use field::PriceField;
pub use ohlc::Ohlc;
pub use table::{DropRule, SeriesTable, TableError};
