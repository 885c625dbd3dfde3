pub mod config;
pub mod error;
pub mod gateway;
pub mod leave;
pub mod telemetry;
