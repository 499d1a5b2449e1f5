#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::falcon::FalconSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_COLUMN: &str = "HostID";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_AUDIT_MESSAGE: &str = "falcon-uninstall: sensor removal";

/// Falcon cloud regions and their API gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Cloud {
    #[default]
    #[serde(rename = "us-1")]
    #[cfg_attr(feature = "cli", value(name = "us-1"))]
    Us1,
    #[serde(rename = "us-2")]
    #[cfg_attr(feature = "cli", value(name = "us-2"))]
    Us2,
    #[serde(rename = "eu-1")]
    #[cfg_attr(feature = "cli", value(name = "eu-1"))]
    Eu1,
    #[serde(rename = "us-gov-1")]
    #[cfg_attr(feature = "cli", value(name = "us-gov-1"))]
    UsGov1,
}

impl Cloud {
    pub fn base_url(self) -> &'static str {
        match self {
            Cloud::Us1 => "https://api.crowdstrike.com",
            Cloud::Us2 => "https://api.us-2.crowdstrike.com",
            Cloud::Eu1 => "https://api.eu-1.crowdstrike.com",
            Cloud::UsGov1 => "https://api.laggar.gcw.crowdstrike.com",
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input_path: PathBuf,
    pub column: String,
    pub delimiter: u8,
    pub queue_offline: bool,
    pub fail_on_error: bool,
    pub falcon: FalconSettings,
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path.to_string_lossy())?;
        validate_non_empty_string("column", &self.column)?;
        validate_non_empty_string("client_id", &self.falcon.client_id)?;
        validate_non_empty_string("client_secret", &self.falcon.client_secret)?;
        validate_range(
            "timeout_secs",
            self.falcon.timeout.as_secs(),
            1,
            MAX_TIMEOUT_SECS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> RunSettings {
        RunSettings {
            input_path: PathBuf::from("hosts.csv"),
            column: DEFAULT_COLUMN.to_string(),
            delimiter: b',',
            queue_offline: true,
            fail_on_error: false,
            falcon: FalconSettings {
                base_url: Cloud::default().base_url().to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                member_cid: None,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                audit_message: DEFAULT_AUDIT_MESSAGE.to_string(),
            },
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let mut s = settings();
        s.falcon.client_secret = " ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut s = settings();
        s.falcon.timeout = Duration::from_secs(0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_cloud_base_urls() {
        assert_eq!(Cloud::default(), Cloud::Us1);
        assert_eq!(Cloud::Eu1.base_url(), "https://api.eu-1.crowdstrike.com");
    }
}
