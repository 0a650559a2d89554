//! Marketplot Runner: chart sets built on `marketplot-core` and
//! `marketplot-render`.
//!
//! This crate provides:
//! - Run configuration loaded from TOML
//! - A run context that turns named requests into tables
//! - Fixed article datasets that need no download
//! - One module per chart set, each producing its figures before any is written
//! - The output directory that renders figures to PNG

pub mod config;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod output;
pub mod sets;

pub use config::{ConfigError, ProviderConfig, RenderConfig, RunConfig};
pub use context::RunContext;
pub use error::RunError;
pub use output::{Chart, OutputDir};
pub use sets::ChartSet;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
    }

    #[test]
    fn chart_set_is_send_sync() {
        assert_send::<ChartSet>();
        assert_sync::<ChartSet>();
    }

    #[test]
    fn charts_can_cross_threads() {
        assert_send::<Chart>();
        assert_send::<OutputDir>();
        assert_sync::<OutputDir>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
