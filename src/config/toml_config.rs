use crate::config::Cloud;
use crate::utils::error::{Result, UninstallError};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Optional defaults file. Credentials are deliberately not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub falcon: Option<FalconSection>,
    pub input: Option<InputSection>,
    pub run: Option<RunSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FalconSection {
    pub cloud: Option<Cloud>,
    pub base_url: Option<String>,
    pub member_cid: Option<String>,
    pub timeout_secs: Option<u64>,
    pub audit_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub column: Option<String>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    pub queue_offline: Option<bool>,
    pub fail_on_error: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| UninstallError::ConfigError {
                message: format!("cannot read config file {}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UninstallError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UninstallError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn falcon(&self) -> FalconSection {
        self.falcon.clone().unwrap_or_default()
    }

    pub fn input(&self) -> InputSection {
        self.input.clone().unwrap_or_default()
    }

    pub fn run(&self) -> RunSection {
        self.run.clone().unwrap_or_default()
    }
}
