pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod logging;
pub mod platform;
