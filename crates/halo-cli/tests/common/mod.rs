use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary with an isolated config directory.
pub fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_halo"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env_remove("HALO_URL");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime.
pub async fn run(args: &[&str], home: &Path) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli(&args, &home)
    })
    .await
    .unwrap()
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_success(args: &[&str], home: &Path) -> String {
    let output = run(args, home).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_failure(args: &[&str], home: &Path) -> String {
    let output = run(args, home).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn service_url(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

/// Mount a root document advertising `users` and `people`.
pub async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {
                "child": [
                    {"title": "users", "href": "users"},
                    {"title": "people", "href": "people"}
                ]
            }
        })))
        .mount(server)
        .await;
}

/// A write acknowledgement envelope.
pub fn ack(resource: &str, id: &str, etag: &str) -> serde_json::Value {
    json!({
        "item": {
            "status": "OK",
            "_id": id,
            "etag": etag,
            "updated": "Tue, 02 Apr 2013 10:29:33 GMT",
            "_links": {"self": {"href": format!("{resource}/{id}")}}
        }
    })
}
