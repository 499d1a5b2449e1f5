use crate::adapters::csv_source::load_host_records;
use crate::adapters::falcon::FalconConnector;
use crate::config::RunSettings;
use crate::core::dispatch::UninstallDispatcher;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;

/// Drives one run: preflight, authenticate, load the input, dispatch every row.
pub struct UninstallRun {
    settings: RunSettings,
}

impl UninstallRun {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let settings = &self.settings;

        tracing::info!("🔌 Checking Falcon API client");
        let connector = FalconConnector::preflight(settings.falcon.clone())?;

        tracing::info!("🔑 Authenticating against {}", settings.falcon.base_url);
        let client = connector.authenticate().await?;
        tracing::info!("✅ Falcon API credentials accepted");

        let input = &settings.input_path;
        let records = load_host_records(input, settings.delimiter)?;
        tracing::info!("📄 Loaded {} records from {}", records.len(), input.display());

        if !settings.queue_offline {
            tracing::info!("Offline queueing disabled; unreachable hosts will fail");
        }

        let dispatcher =
            UninstallDispatcher::new(&client, settings.column.as_str(), settings.queue_offline);
        let summary = dispatcher.dispatch_all(&records).await;

        tracing::info!(
            "📊 Summary: {} submitted, {} skipped, {} failed ({} rows)",
            summary.submitted,
            summary.skipped,
            summary.failed,
            summary.total
        );
        Ok(summary)
    }
}
