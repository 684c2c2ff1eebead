//! Process-level plumbing shared by the server binary and modules:
//! layered configuration and logging bootstrap.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
