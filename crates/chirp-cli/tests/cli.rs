//! CLI tests against a mock API.
//!
//! Each test runs the built `chirp` binary with an isolated HOME so no real
//! config file or credentials leak in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMELINE_PATH: &str = "/1.1/statuses/user_timeline.json";

/// Run the CLI binary with arguments and an isolated environment.
fn run_cli(args: &[String], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chirp"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("CHIRP_API_KEY");
    cmd.env_remove("CHIRP_API_SECRET");
    cmd.env_remove("CHIRP_BASE_URL");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime so the mock server keeps serving.
async fn run_cli_async(args: &[&str], home: &Path) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home: PathBuf = home.to_path_buf();
    tokio::task::spawn_blocking(move || run_cli(&args, &home))
        .await
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

async fn mount_grant(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": token
        })))
        .mount(server)
        .await;
}

fn tweets() -> serde_json::Value {
    json!([
        {
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "id": 1050118621198921728u64,
            "text": "To make room for more expression, we will now count all emojis as equal. https://t.co/MtBAXnldWA",
            "entities": {
                "urls": [{
                    "url": "https://t.co/MtBAXnldWA",
                    "expanded_url": "https://twittercommunity.com/t/115034"
                }]
            }
        }
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeline_json_output() {
    let server = MockServer::start().await;
    mount_grant(&server, "token-1").await;

    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .and(header("authorization", "Bearer token-1"))
        .and(query_param("screen_name", "twitterapi"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tweets()))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();
    let output = run_cli_async(
        &[
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--base-url",
            &uri,
            "timeline",
            "--screen-name",
            "twitterapi",
            "--count",
            "1",
            "--json",
        ],
        home.path(),
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);

    let tweet: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(tweet, tweets()[0]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeline_text_output() {
    let server = MockServer::start().await;
    mount_grant(&server, "token-1").await;

    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(tweets()))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();
    let output = run_cli_async(
        &[
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--base-url",
            &uri,
            "timeline",
            "--user-id",
            "783214",
        ],
        home.path(),
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("2018-10-10 20:19:24"));
    assert!(out.contains("1050118621198921728"));
    assert!(out.contains("https://twittercommunity.com/t/115034"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeline_reports_api_errors() {
    let server = MockServer::start().await;
    mount_grant(&server, "token-1").await;

    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"code": 34, "message": "Sorry, that page does not exist."}]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();
    let output = run_cli_async(
        &[
            "--api-key",
            "key",
            "--api-secret",
            "secret",
            "--base-url",
            &uri,
            "timeline",
            "--screen-name",
            "nobody",
        ],
        home.path(),
    )
    .await;

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to fetch timeline"));
    assert!(err.contains("code: 34 - message: Sorry, that page does not exist."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_reads_config_file() {
    let server = MockServer::start().await;
    mount_grant(&server, "token-from-file").await;

    let home = tempfile::tempdir().unwrap();
    let config_path = home.path().join("chirp.toml");
    std::fs::write(
        &config_path,
        format!(
            "api_key = \"key\"\napi_secret = \"secret\"\nbase_url = \"{}\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let config_arg = config_path.display().to_string();
    let output = run_cli_async(&["--config", &config_arg, "token", "--show"], home.path()).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Credentials accepted"));
    assert!(out.contains("token-from-file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{"code": 99, "message": "Unable to verify your credentials"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();
    let output = run_cli_async(
        &[
            "--api-key",
            "key",
            "--api-secret",
            "wrong",
            "--base-url",
            &uri,
            "token",
        ],
        home.path(),
    )
    .await;

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to obtain bearer token"));
    assert!(err.contains("Unable to verify your credentials"));
}

#[test]
fn test_missing_credentials() {
    let home = tempfile::tempdir().unwrap();
    let args = vec![
        "timeline".to_string(),
        "--screen-name".to_string(),
        "acme".to_string(),
    ];
    let output = run_cli(&args, home.path());

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Missing API credentials"));
    assert!(err.contains("CHIRP_API_KEY"));
}

#[test]
fn test_timeline_requires_user() {
    let home = tempfile::tempdir().unwrap();
    let args: Vec<String> = ["--api-key", "k", "--api-secret", "s", "timeline"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let output = run_cli(&args, home.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Pass --screen-name or --user-id"));
}
