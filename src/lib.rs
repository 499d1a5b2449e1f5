pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::falcon::{FalconClient, FalconConnector, FalconSettings};
pub use config::{Cloud, RunSettings};
pub use crate::core::{dispatch::UninstallDispatcher, runner::UninstallRun};
pub use domain::model::{HostRecord, RunSummary, UninstallOutcome, UninstallReceipt};
pub use domain::ports::SensorApi;
pub use utils::error::{Result, UninstallError};
