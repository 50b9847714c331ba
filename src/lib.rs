pub mod activity;
pub mod api;
pub mod config;
pub mod eth;
pub mod fetch_stats;
pub mod format;
pub mod models;
pub mod price;
pub mod stats;
