//! Test helpers for integration tests
//!
//! Provides a test server over the in-process backend and a browser-like
//! HTTP client that keeps its session cookie between requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use evently_api::{create_app, AppState};
use evently_cache::MemorySessionStore;
use evently_common::AppConfig;
use evently_gateway::{MemoryBackend, MemoryOptions};
use evently_service::{ServiceContext, ServiceSettings, SessionRegistry};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Site origin used for links in emails
pub const SITE_URL: &str = "https://evently.test";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    /// Backend behind the server, for inspecting rows directly
    pub backend: Arc<MemoryBackend>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_options(MemoryOptions::default()).await
    }

    /// Start a test server with custom backend options
    pub async fn start_with_options(options: MemoryOptions) -> Result<Self> {
        let backend = Arc::new(MemoryBackend::with_options(options));
        let ctx = ServiceContext::from_backend(
            backend.clone(),
            Arc::new(MemorySessionStore::new(3600)),
            ServiceSettings {
                site_url: SITE_URL.to_string(),
                ..ServiceSettings::default()
            },
        );
        let state = AppState::new(SessionRegistry::new(ctx), test_config()?);
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            backend,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A new browser with an empty cookie jar
    pub fn browser(&self) -> Result<Browser> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Browser {
            base_url: self.base_url(),
            client,
        })
    }
}

/// HTTP client that behaves like one browser
pub struct Browser {
    base_url: String,
    client: Client,
}

impl Browser {
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        Ok(self.client.post(self.url(path)).send().await?)
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.patch(self.url(path)).json(body).send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }
}

/// Configuration for the server under test; the backend URL is never dialed
pub fn test_config() -> Result<AppConfig> {
    AppConfig::from_lookup(|key| match key {
        "BACKEND_URL" => Some("http://backend.invalid".to_string()),
        "BACKEND_ANON_KEY" => Some("test-anon-key".to_string()),
        "APP_SITE_URL" => Some(SITE_URL.to_string()),
        _ => None,
    })
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
