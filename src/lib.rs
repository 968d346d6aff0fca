pub mod actions;
pub mod capabilities;
pub mod cli;
pub mod config_store;
pub mod confirm;
pub mod decoder;
pub mod doctor;
pub mod logging;
pub mod menu;
pub mod metrics;
pub mod nav;
pub mod render;
pub mod runtime;
pub mod telemetry;
pub mod terminal_restore;

pub use logging::{init_logging, log_debug};
