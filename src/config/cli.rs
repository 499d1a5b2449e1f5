use crate::adapters::csv_source::delimiter_for_path;
use crate::adapters::falcon::FalconSettings;
use crate::config::toml_config::FileConfig;
use crate::config::{
    Cloud, RunSettings, DEFAULT_AUDIT_MESSAGE, DEFAULT_COLUMN, DEFAULT_TIMEOUT_SECS,
};
use crate::utils::error::Result;
use crate::utils::validation::validate_delimiter;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "falcon-uninstall")]
#[command(about = "Queue CrowdStrike Falcon sensor uninstalls for hosts listed in a CSV file")]
#[command(version)]
pub struct CliConfig {
    #[arg(long, short = 'i', help = "Delimited file with one host per row")]
    pub input: PathBuf,

    #[arg(long, short = 'c', help = "Column holding the host ID [default: HostID]")]
    pub column: Option<String>,

    #[arg(long, env = "FALCON_CLIENT_ID")]
    pub client_id: String,

    #[arg(long, env = "FALCON_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    #[arg(long, env = "FALCON_MEMBER_CID", help = "Child CID for Flight Control tenants")]
    pub member_cid: Option<String>,

    #[arg(long, env = "FALCON_CLOUD", value_enum)]
    pub cloud: Option<Cloud>,

    #[arg(long, env = "FALCON_BASE_URL", help = "Overrides the URL derived from --cloud")]
    pub base_url: Option<String>,

    #[arg(long, help = "Field delimiter [default: tab for .tsv, comma otherwise]")]
    pub delimiter: Option<char>,

    #[arg(long, help = "TOML file with default settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Fail instead of queueing when a host is offline")]
    pub no_queue_offline: bool,

    #[arg(long, help = "Exit with status 4 when any host failed")]
    pub fail_on_error: bool,

    #[arg(long, help = "Per-request timeout in seconds [default: 30]")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Merges flags over the optional config file over built-in defaults.
    pub fn resolve(&self) -> Result<RunSettings> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let falcon = file.falcon();
        let input = file.input();
        let run = file.run();

        let base_url = self
            .base_url
            .clone()
            .or(falcon.base_url)
            .unwrap_or_else(|| {
                self.cloud
                    .or(falcon.cloud)
                    .unwrap_or_default()
                    .base_url()
                    .to_string()
            });

        let delimiter = match self.delimiter.or(input.delimiter) {
            Some(c) => validate_delimiter("delimiter", c)?,
            None => delimiter_for_path(&self.input),
        };

        let timeout_secs = self
            .timeout_secs
            .or(falcon.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(RunSettings {
            input_path: self.input.clone(),
            column: self
                .column
                .clone()
                .or(input.column)
                .unwrap_or_else(|| DEFAULT_COLUMN.to_string()),
            delimiter,
            queue_offline: !self.no_queue_offline && run.queue_offline.unwrap_or(true),
            fail_on_error: self.fail_on_error || run.fail_on_error.unwrap_or(false),
            falcon: FalconSettings {
                base_url,
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
                member_cid: self.member_cid.clone().or(falcon.member_cid),
                timeout: Duration::from_secs(timeout_secs),
                audit_message: falcon
                    .audit_message
                    .unwrap_or_else(|| DEFAULT_AUDIT_MESSAGE.to_string()),
            },
        })
    }
}
