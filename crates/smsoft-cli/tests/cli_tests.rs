//! End-to-end tests for the smsoft binary against a mocked Dashboard.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the developer's environment and config files
#[allow(deprecated)]
fn smsoft_cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("smsoft").unwrap();
    cmd.current_dir(home.path());
    cmd.env_remove("API_KEY");
    cmd.env_remove("NET_ID");
    cmd.env_remove("SMSOFT_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

/// Dashboard with Bob (Slack) and Carol (Slack, Excel)
async fn dashboard() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N_1/sm/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "1", "name": "Bob" },
            { "id": "2", "name": "Carol" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N_1/sm/devices/1/softwares"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Slack" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N_1/sm/devices/2/softwares"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Slack" },
            { "name": "Excel" }
        ])))
        .mount(&server)
        .await;

    server
}

fn base_url(server: &MockServer) -> String {
    format!("{}/api/v1/", server.uri())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_api_key_fails_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    smsoft_cmd(&home)
        .args(["apps", "--net", "N_1", "--base-url", &base_url(&server)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_network_id_fails() {
    let home = tempfile::tempdir().unwrap();
    smsoft_cmd(&home)
        .args(["apps", "--apikey", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing network ID"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreadable_ignore_file_fails() {
    let home = tempfile::tempdir().unwrap();
    smsoft_cmd(&home)
        .args(["apps", "--apikey", "k", "--net", "N_1", "--ignore", "no-such-file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read ignore file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apps_report_quiet() {
    let server = dashboard().await;
    let home = tempfile::tempdir().unwrap();

    smsoft_cmd(&home)
        .args(["apps", "--apikey", "k", "--net", "N_1", "--quiet"])
        .args(["--base-url", &base_url(&server)])
        .assert()
        .success()
        .stdout("   Excel\n   Slack\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apps_report_with_narration() {
    let server = dashboard().await;
    let home = tempfile::tempdir().unwrap();

    smsoft_cmd(&home)
        .args(["apps", "--apikey", "k", "--net", "N_1"])
        .args(["--base-url", &base_url(&server)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Connecting to Meraki Dashboard...\n"))
        .stdout(predicate::str::contains("Gathering devices...\n"))
        .stdout(predicate::str::ends_with("Apps on systems\n   Excel\n   Slack\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_system_report_with_ignore_file() {
    let server = dashboard().await;
    let home = tempfile::tempdir().unwrap();
    let ignore = home.path().join("ignore.txt");
    let mut file = std::fs::File::create(&ignore).unwrap();
    writeln!(file, "Slack").unwrap();

    smsoft_cmd(&home)
        .args(["system", "--apikey", "k", "--net", "N_1"])
        .args(["--base-url", &base_url(&server)])
        .arg("--ignore")
        .arg(&ignore)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Bob\nCarol\n   Excel\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_defaults_from_config_file_and_env() {
    let server = dashboard().await;
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("smsoft.toml"),
        format!(
            "[defaults]\napi_key = \"file-key\"\nbase_url = \"{}\"\n",
            base_url(&server)
        ),
    )
    .unwrap();

    smsoft_cmd(&home)
        .args(["system", "--quiet", "--pc", "Carol"])
        .env("NET_ID", "N_1")
        .assert()
        .success()
        .stdout("   Excel\n   Slack\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_error_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N_1/sm/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errors": ["Invalid API key"]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    smsoft_cmd(&home)
        .args(["apps", "--apikey", "bad", "--net", "N_1", "--quiet"])
        .args(["--base-url", &base_url(&server)])
        .assert()
        .failure()
        .stdout("");
}
