use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};

/// A wrapforge process started from a temp config, running in stub mode.
struct StartedServer {
    port: u16,
    child: tokio::process::Child,
    _config: NamedTempFile,
}

impl StartedServer {
    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    async fn stop(mut self) {
        self.child.kill().await.ok();
    }
}

/// Pick a free port for this test run.
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Start the binary with a minimal config (no API key, so stub backends)
/// and wait until the health endpoint answers.
async fn start_server() -> StartedServer {
    let port = free_port();
    let config = write_config(&format!(
        "[server]\nhost = \"127.0.0.1\"\nport = {}\n",
        port
    ));

    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_wrapforge"))
        .env("WRAPFORGE_CONFIG", config.path())
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    let server = StartedServer {
        port,
        child,
        _config: config,
    };

    let client = Client::new();
    for _ in 0..40 {
        if client.get(server.url("/api/v1/health")).send().await.is_ok() {
            return server;
        }
        sleep(Duration::from_millis(50)).await;
    }
    panic!("Server did not start in time");
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_server().await;

    let response = Client::new()
        .get(server.url("/api/v1/health"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");

    server.stop().await;
}

#[tokio::test]
async fn test_config_endpoint_returns_sanitized() {
    let server = start_server().await;

    let response = Client::new()
        .get(server.url("/api/v1/config"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["server"]["port"], server.port);
    assert_eq!(json["generation"]["api_key_configured"], false);

    server.stop().await;
}

#[tokio::test]
async fn test_metrics_endpoint_serves_prometheus_text() {
    let server = start_server().await;

    let response = Client::new()
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("wrapforge_http_requests_total"));

    server.stop().await;
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_wrapforge"))
            .env("WRAPFORGE_CONFIG", "/nonexistent/config.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    // Port 0 is rejected by config validation
    let config = write_config("[server]\nport = 0\n");

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_wrapforge"))
            .env("WRAPFORGE_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
