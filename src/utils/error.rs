use thiserror::Error;

#[derive(Error, Debug)]
pub enum UninstallError {
    #[error("Preflight check failed: {message}")]
    PreflightError { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationError {
        status: Option<u16>,
        message: String,
    },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Input file could not be parsed ({path}): {message}")]
    InputParseError { path: String, message: String },

    #[error("Falcon API returned {status}: {message}")]
    VendorError { status: u16, message: String },

    #[error("Host {host_id} was not found in the Falcon console")]
    HostNotFound { host_id: String },

    #[error("Host {host_id} reports unsupported platform '{platform}'")]
    UnsupportedPlatform { host_id: String, platform: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Preflight,
    Authentication,
    Input,
    Api,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UninstallError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PreflightError { .. } => ErrorCategory::Preflight,
            Self::AuthenticationError { .. } => ErrorCategory::Authentication,
            Self::InputNotFound { .. } | Self::InputParseError { .. } => ErrorCategory::Input,
            Self::VendorError { .. }
            | Self::HostNotFound { .. }
            | Self::UnsupportedPlatform { .. }
            | Self::ApiError(_) => ErrorCategory::Api,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Authentication => ErrorSeverity::High,
            ErrorCategory::Preflight | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for a run aborted by this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 1,
            ErrorCategory::Authentication | ErrorCategory::Api => 2,
            ErrorCategory::Preflight | ErrorCategory::Configuration => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Preflight => {
                "Check --cloud/--base-url and that the TLS backend is available on this host"
            }
            ErrorCategory::Authentication => {
                "Verify the API client id/secret and that the client has the Hosts, Sensor update policies and Real time response (admin) scopes"
            }
            ErrorCategory::Input => {
                "Check that the input file exists, is readable and is valid delimited text with a header row"
            }
            ErrorCategory::Api => "Check network connectivity to the Falcon cloud and retry the run",
            ErrorCategory::Configuration => "Fix the reported option or config file value",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::PreflightError { message } => format!("Falcon API client unavailable: {}", message),
            Self::AuthenticationError { message, .. } => {
                format!("Could not authenticate with the Falcon API: {}", message)
            }
            Self::InputNotFound { path } => format!("Input file '{}' does not exist", path),
            Self::InputParseError { path, message } => {
                format!("Input file '{}' could not be read: {}", path, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UninstallError>;
