pub mod calendar;
pub mod catalog;
pub mod columns;
pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod logging;
pub mod outcome;
pub mod sample_season;
pub mod season_checks;
pub mod state;
pub mod stats_browser;
pub mod summary;
pub mod table;
pub mod views;
