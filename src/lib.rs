pub mod config;
pub mod error;
pub mod security;
pub mod telemetry;
pub mod workflows;
