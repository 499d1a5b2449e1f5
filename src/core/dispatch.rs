use crate::domain::model::{HostRecord, RunSummary, UninstallOutcome};
use crate::domain::ports::SensorApi;

/// Sends one uninstall request per record, strictly in input order.
pub struct UninstallDispatcher<'a, A: SensorApi + ?Sized> {
    api: &'a A,
    column: String,
    queue_offline: bool,
}

impl<'a, A: SensorApi + ?Sized> UninstallDispatcher<'a, A> {
    pub fn new(api: &'a A, column: impl Into<String>, queue_offline: bool) -> Self {
        Self {
            api,
            column: column.into(),
            queue_offline,
        }
    }

    pub async fn dispatch_one(&self, record: &HostRecord) -> UninstallOutcome {
        let Some(host_id) = record.host_id(&self.column) else {
            tracing::warn!(
                "⚠️ Line {}: column '{}' is empty or missing, skipping",
                record.row,
                self.column
            );
            return UninstallOutcome::Skipped {
                row: record.row,
                column: self.column.clone(),
            };
        };

        tracing::debug!("Line {}: requesting sensor uninstall for {}", record.row, host_id);
        match self.api.queue_uninstall(host_id, self.queue_offline).await {
            Ok(receipt) => {
                tracing::info!("✅ {}: uninstall request {}", host_id, receipt.state);
                UninstallOutcome::Submitted {
                    row: record.row,
                    host_id: host_id.to_string(),
                    receipt,
                }
            }
            Err(e) => {
                tracing::error!("❌ {}: uninstall request failed: {}", host_id, e);
                UninstallOutcome::Failed {
                    row: record.row,
                    host_id: host_id.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    pub async fn dispatch_all(&self, records: &[HostRecord]) -> RunSummary {
        let mut summary = RunSummary::default();
        for record in records {
            let outcome = self.dispatch_one(record).await;
            summary.record(outcome);
        }
        summary
    }
}
