
/// Exit status when the loop completed but some hosts failed and the caller asked to be told.
pub const PARTIAL_FAILURE_EXIT_CODE: i32 = 4;

/// One data row of the input file, fields kept in header order.
#[derive(Debug, Clone)]
pub struct HostRecord {
    /// 1-based line in the input file where the row starts.
    pub row: usize,
    pub data: Vec<(String, String)>,
}

impl HostRecord {
    pub fn new(row: usize, data: Vec<(String, String)>) -> Self {
        Self { row, data }
    }

    /// A blank line of the input file.
    pub fn empty(row: usize) -> Self {
        Self::new(row, Vec::new())
    }

    /// Looks up a column, falling back to the first case-insensitive match on the header name.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(key, _)| key == column)
            .or_else(|| {
                self.data
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(column))
            })
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed identifier in `column`, or `None` when absent or blank.
    pub fn host_id(&self, column: &str) -> Option<&str> {
        self.field(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReceipt {
    pub state: String,
    pub cloud_request_id: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Submitted {
        row: usize,
        host_id: String,
        receipt: UninstallReceipt,
    },
    Skipped {
        row: usize,
        column: String,
    },
    Failed {
        row: usize,
        host_id: String,
        message: String,
    },
}

impl UninstallOutcome {
    pub fn host_id(&self) -> Option<&str> {
        match self {
            Self::Submitted { host_id, .. } | Self::Failed { host_id, .. } => Some(host_id),
            Self::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<UninstallOutcome>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: UninstallOutcome) {
        self.total += 1;
        match outcome {
            UninstallOutcome::Submitted { .. } => self.submitted += 1,
            UninstallOutcome::Skipped { .. } => self.skipped += 1,
            UninstallOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn exit_code(&self, fail_on_error: bool) -> i32 {
        if fail_on_error && self.has_failures() {
            PARTIAL_FAILURE_EXIT_CODE
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> HostRecord {
        let data = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HostRecord::new(1, data)
    }

    #[test]
    fn test_host_id_lookup() {
        let rec = record(&[("HostID", "  abc123  "), ("Hostname", "ws-01")]);
        assert_eq!(rec.host_id("HostID"), Some("abc123"));
        assert_eq!(rec.host_id("hostid"), Some("abc123"));
        assert_eq!(rec.host_id("AID"), None);
    }

    #[test]
    fn test_blank_host_id_is_none() {
        let rec = record(&[("HostID", " \t ")]);
        assert_eq!(rec.field("HostID"), Some(" \t "));
        assert_eq!(rec.host_id("HostID"), None);
    }

    #[test]
    fn test_exact_match_wins_over_case_insensitive() {
        let rec = record(&[("hostid", "lower"), ("HostID", "exact")]);
        assert_eq!(rec.host_id("HostID"), Some("exact"));
    }

    #[test]
    fn test_case_insensitive_match_takes_first_header() {
        let rec = record(&[("hostid", "first"), ("HOSTID", "second")]);
        for _ in 0..8 {
            assert_eq!(rec.host_id("HostId"), Some("first"));
        }
    }

    #[test]
    fn test_empty_record_has_no_host_id() {
        let rec = HostRecord::empty(3);
        assert_eq!(rec.row, 3);
        assert_eq!(rec.host_id("HostID"), None);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(UninstallOutcome::Skipped {
            row: 1,
            column: "HostID".to_string(),
        });
        summary.record(UninstallOutcome::Failed {
            row: 2,
            host_id: "bad".to_string(),
            message: "nope".to_string(),
        });
        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.outcomes[1].host_id(), Some("bad"));
        assert_eq!(summary.exit_code(false), 0);
        assert_eq!(summary.exit_code(true), PARTIAL_FAILURE_EXIT_CODE);
    }
}
