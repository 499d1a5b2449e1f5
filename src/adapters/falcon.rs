use crate::adapters::uninstall_script::{runscript_command, Platform};
use crate::domain::model::UninstallReceipt;
use crate::domain::ports::SensorApi;
use crate::utils::error::{Result, UninstallError};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

const USER_AGENT: &str = concat!("falcon-uninstall/", env!("CARGO_PKG_VERSION"));
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 1799;

#[derive(Clone)]
pub struct FalconSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub member_cid: Option<String>,
    pub timeout: Duration,
    pub audit_message: String,
}

impl fmt::Debug for FalconSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalconSettings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("member_cid", &self.member_cid)
            .field("timeout", &self.timeout)
            .field("audit_message", &self.audit_message)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    resources: Option<Vec<T>>,
    errors: Option<Vec<ApiMessage>>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DeviceDetails {
    #[serde(default)]
    platform_name: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UninstallTokenResource {
    uninstall_token: String,
}

#[derive(Debug, Deserialize)]
struct SessionResource {
    session_id: String,
    #[serde(default)]
    offline_queued: bool,
}

#[derive(Debug, Deserialize)]
struct CommandResource {
    #[serde(default)]
    cloud_request_id: Option<String>,
    #[serde(default)]
    queued_command_offline: bool,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// HTTP transport that passed preflight but has not authenticated yet.
#[derive(Debug)]
pub struct FalconConnector {
    http: Client,
    base_url: Url,
    settings: FalconSettings,
}

impl FalconConnector {
    /// Builds the TLS client and resolves the API base URL without touching the network.
    pub fn preflight(settings: FalconSettings) -> Result<Self> {
        let mut base_url =
            Url::parse(&settings.base_url).map_err(|e| UninstallError::PreflightError {
                message: format!("invalid Falcon API base URL '{}': {}", settings.base_url, e),
            })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(UninstallError::PreflightError {
                message: format!("unsupported URL scheme '{}'", base_url.scheme()),
            });
        }

        // Relative joins below rely on the base path ending with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| UninstallError::PreflightError {
                message: format!("could not initialise the HTTP client: {}", e),
            })?;

        tracing::debug!("Falcon API base URL: {}", base_url);
        Ok(Self {
            http,
            base_url,
            settings,
        })
    }

    /// Exchanges the API client credentials for a bearer token.
    pub async fn authenticate(self) -> Result<FalconClient> {
        let token = request_token(&self.http, &self.base_url, &self.settings).await?;
        tracing::debug!("Falcon API token valid until {}", token.expires_at);

        Ok(FalconClient {
            http: self.http,
            base_url: self.base_url,
            settings: self.settings,
            token: Mutex::new(token),
        })
    }
}

/// Authenticated Falcon API session.
pub struct FalconClient {
    http: Client,
    base_url: Url,
    settings: FalconSettings,
    token: Mutex<AccessToken>,
}

impl fmt::Debug for FalconClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalconClient")
            .field("base_url", &self.base_url.as_str())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn endpoint(base_url: &Url, path: &str) -> Result<Url> {
    base_url
        .join(path)
        .map_err(|e| UninstallError::ConfigError {
            message: format!("cannot build endpoint '{}': {}", path, e),
        })
}

async fn request_token(http: &Client, base_url: &Url, settings: &FalconSettings) -> Result<AccessToken> {
    let url = endpoint(base_url, "oauth2/token")?;

    let mut form = vec![
        ("client_id", settings.client_id.as_str()),
        ("client_secret", settings.client_secret.as_str()),
    ];
    if let Some(member_cid) = settings.member_cid.as_deref() {
        form.push(("member_cid", member_cid));
    }

    let response = http
        .post(url)
        .form(&form)
        .send()
        .await
        .map_err(|e| UninstallError::AuthenticationError {
            status: None,
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(UninstallError::AuthenticationError {
            status: Some(status.as_u16()),
            message,
        });
    }

    let body: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| UninstallError::AuthenticationError {
                status: Some(status.as_u16()),
                message: format!("malformed token response: {}", e),
            })?;

    let lifetime = body.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    Ok(AccessToken {
        value: body.access_token,
        expires_at: Utc::now() + ChronoDuration::seconds(lifetime),
    })
}

/// Pulls the first vendor error message out of a failed response body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    parse_error_body(status, &text)
}

fn parse_error_body(status: StatusCode, text: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(text) {
        if let Some(err) = envelope.errors.unwrap_or_default().into_iter().next() {
            return match err.code {
                Some(code) => format!("{} (code {})", err.message, code),
                None => err.message,
            };
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

impl FalconClient {
    async fn bearer(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.expires_soon(Utc::now()) {
            tracing::debug!("Refreshing Falcon API token");
            *token = request_token(&self.http, &self.base_url, &self.settings).await?;
        }
        Ok(token.value.clone())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let token = self.bearer().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(UninstallError::VendorError {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        let mut resources = envelope.resources.unwrap_or_default();
        if resources.is_empty() {
            let message = envelope
                .errors
                .unwrap_or_default()
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_else(|| format!("no {} in response", what));
            return Err(UninstallError::VendorError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resources.swap_remove(0))
    }

    async fn host_platform(&self, host_id: &str) -> Result<Platform> {
        let url = endpoint(&self.base_url, "devices/entities/devices/v2")?;
        let request = self.http.get(url).query(&[("ids", host_id)]);

        let device: DeviceDetails = match self.send(request, "device details").await {
            Ok(device) => device,
            Err(UninstallError::VendorError { status, .. })
                if status == 404 || (200..300).contains(&status) =>
            {
                return Err(UninstallError::HostNotFound {
                    host_id: host_id.to_string(),
                })
            }
            Err(e) => return Err(e),
        };

        let platform_name = device.platform_name.unwrap_or_default();
        tracing::debug!(
            "{}: hostname {:?}, platform {}",
            host_id,
            device.hostname,
            platform_name
        );
        Platform::from_platform_name(&platform_name).ok_or_else(|| {
            UninstallError::UnsupportedPlatform {
                host_id: host_id.to_string(),
                platform: platform_name,
            }
        })
    }

    async fn maintenance_token(&self, host_id: &str) -> Result<String> {
        let url = endpoint(&self.base_url, "policy/combined/reveal-uninstall-token/v1")?;
        let request = self.http.post(url).json(&json!({
            "device_id": host_id,
            "audit_message": self.settings.audit_message,
        }));
        let resource: UninstallTokenResource = self.send(request, "uninstall token").await?;
        Ok(resource.uninstall_token)
    }

    async fn open_session(&self, host_id: &str, queue_offline: bool) -> Result<SessionResource> {
        let url = endpoint(&self.base_url, "real-time-response/entities/sessions/v1")?;
        let request = self.http.post(url).json(&json!({
            "device_id": host_id,
            "queue_offline": queue_offline,
        }));
        self.send(request, "session").await
    }

    async fn run_admin_command(
        &self,
        host_id: &str,
        session_id: &str,
        command_string: &str,
        queue_offline: bool,
    ) -> Result<CommandResource> {
        let url = endpoint(&self.base_url, "real-time-response/entities/admin-command/v1")?;
        let request = self.http.post(url).json(&json!({
            "base_command": "runscript",
            "command_string": command_string,
            "device_id": host_id,
            "session_id": session_id,
            "persist": queue_offline,
        }));
        self.send(request, "command result").await
    }
}

#[async_trait]
impl SensorApi for FalconClient {
    async fn queue_uninstall(
        &self,
        host_id: &str,
        queue_offline: bool,
    ) -> Result<UninstallReceipt> {
        let platform = self.host_platform(host_id).await?;

        let token = if platform.needs_maintenance_token() {
            Some(self.maintenance_token(host_id).await?)
        } else {
            None
        };

        let session = self.open_session(host_id, queue_offline).await?;
        tracing::debug!(
            "{}: session {} (offline queued: {})",
            host_id,
            session.session_id,
            session.offline_queued
        );

        let command = runscript_command(platform, token.as_deref());
        let result = self
            .run_admin_command(host_id, &session.session_id, &command, queue_offline)
            .await?;

        let state = if result.queued_command_offline || session.offline_queued {
            "queued"
        } else {
            "submitted"
        };

        Ok(UninstallReceipt {
            state: state.to_string(),
            cloud_request_id: result.cloud_request_id,
            session_id: result.session_id.or(Some(session.session_id)),
        })
    }
}
