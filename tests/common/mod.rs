#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use std::path::PathBuf;
use tempfile::TempDir;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const ACCESS_TOKEN: &str = "test-access-token";

pub fn mock_token(server: &MockServer) -> Mock<'_> {
    mock_token_with_lifetime(server, 1799)
}

pub fn mock_token_with_lifetime(server: &MockServer, expires_in: i64) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/oauth2/token")
            .body_contains(format!("client_id={}", CLIENT_ID))
            .body_contains(format!("client_secret={}", CLIENT_SECRET));
        then.status(201).json_body(serde_json::json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "bearer",
            "expires_in": expires_in
        }));
    })
}

pub fn mock_token_rejected(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/oauth2/token");
        then.status(401).json_body(serde_json::json!({
            "meta": {},
            "resources": null,
            "errors": [{"code": 401, "message": "access denied, invalid bearer token"}]
        }));
    })
}

pub struct HostMocks<'a> {
    pub device: Mock<'a>,
    pub uninstall_token: Mock<'a>,
    pub session: Mock<'a>,
    pub command: Mock<'a>,
}

impl HostMocks<'_> {
    pub fn total_hits(&self) -> usize {
        self.device.hits() + self.uninstall_token.hits() + self.session.hits() + self.command.hits()
    }
}

/// Mocks the four calls a single host uninstall makes.
pub fn mock_host<'a>(
    server: &'a MockServer,
    host_id: &str,
    platform: &str,
    offline: bool,
) -> HostMocks<'a> {
    let device = server.mock(|when, then| {
        when.method(GET)
            .path("/devices/entities/devices/v2")
            .query_param("ids", host_id)
            .header("authorization", format!("Bearer {}", ACCESS_TOKEN));
        then.status(200).json_body(serde_json::json!({
            "meta": {},
            "resources": [{
                "device_id": host_id,
                "hostname": format!("host-{}", host_id),
                "platform_name": platform
            }],
            "errors": []
        }));
    });

    let uninstall_token = server.mock(|when, then| {
        when.method(POST)
            .path("/policy/combined/reveal-uninstall-token/v1")
            .json_body_partial(format!(r#"{{"device_id":"{}"}}"#, host_id));
        then.status(200).json_body(serde_json::json!({
            "resources": [{"device_id": host_id, "uninstall_token": "maint-token"}],
            "errors": []
        }));
    });

    let session_id = format!("session-{}", host_id);
    let session = server.mock(|when, then| {
        when.method(POST)
            .path("/real-time-response/entities/sessions/v1")
            .json_body_partial(format!(r#"{{"device_id":"{}"}}"#, host_id));
        then.status(201).json_body(serde_json::json!({
            "resources": [{"session_id": session_id, "offline_queued": offline}],
            "errors": []
        }));
    });

    let command = server.mock(|when, then| {
        when.method(POST)
            .path("/real-time-response/entities/admin-command/v1")
            .json_body_partial(format!(
                r#"{{"device_id":"{}","base_command":"runscript"}}"#,
                host_id
            ));
        then.status(201).json_body(serde_json::json!({
            "resources": [{
                "cloud_request_id": format!("request-{}", host_id),
                "queued_command_offline": offline,
                "session_id": session_id
            }],
            "errors": []
        }));
    });

    HostMocks {
        device,
        uninstall_token,
        session,
        command,
    }
}

/// Device lookup that the vendor rejects, as it does for malformed IDs.
pub fn mock_invalid_host<'a>(server: &'a MockServer, host_id: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/devices/entities/devices/v2")
            .query_param("ids", host_id);
        then.status(400).json_body(serde_json::json!({
            "meta": {},
            "resources": [],
            "errors": [{"code": 400, "message": "invalid device id [bad-id-xyz]"}]
        }));
    })
}

pub fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
