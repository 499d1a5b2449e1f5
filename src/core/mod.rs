pub mod dispatch;
pub mod runner;

pub use crate::domain::model::{HostRecord, RunSummary, UninstallOutcome, UninstallReceipt};
pub use crate::domain::ports::SensorApi;
pub use crate::utils::error::Result;
