#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory storage keeps the suite independent of a running Postgres
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_storefront-api"));
        cmd.arg("--in-memory")
            .env("APP_ENV", "development")
            .env("APP_HOST", "127.0.0.1")
            .env("APP_PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Email address no other test in the run will use
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4().simple())
}

pub async fn register(client: &reqwest::Client, server: &TestServer, email: &str, password: &str) -> Result<Value> {
    let res = client
        .post(server.url("/users"))
        .json(&json!({ "name": "Test User", "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
    let body = res.json::<Value>().await?;
    Ok(body["data"].clone())
}

pub async fn login(client: &reqwest::Client, server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = client
        .post(server.url("/sessions"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body = res.json::<Value>().await?;
    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("token missing from session response")
}

/// Register a fresh account and return `(user id, bearer token)`
pub async fn signed_in_user(client: &reqwest::Client, server: &TestServer, prefix: &str) -> Result<(String, String)> {
    let email = unique_email(prefix);
    let user = register(client, server, &email, "secret1").await?;
    let token = login(client, server, &email, "secret1").await?;
    let id = user["id"].as_str().context("user id missing")?.to_string();
    Ok((id, token))
}

pub async fn create_product(client: &reqwest::Client, server: &TestServer, token: &str, name: &str) -> Result<Value> {
    let res = client
        .post(server.url("/products"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "price": "19.90", "description": "Test product" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "create product failed: {}", res.status());
    let body = res.json::<Value>().await?;
    Ok(body["data"].clone())
}
