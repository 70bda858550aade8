//! Consul agent HTTP API access.
//!
//! [`ConsulTransport`] fetches raw JSON from the agent; [`models`]
//! describes the parts of the responses the tables read, and [`rows`]
//! flattens them into table rows.

pub mod models;
pub mod rows;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::OpsQueryError;

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8500";

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Empty<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // With more than one rustls crypto provider compiled in, rustls cannot
    // pick one on its own. Install `ring` explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

// async_trait is required here because the table catalogue holds the transport as Arc<dyn _>.
#[async_trait]
pub trait ConsulTransport: Send + Sync {
    /// Agent base address, used to label errors.
    fn address(&self) -> &str;

    /// GET `path` (e.g. `/v1/agent/checks`) and return the body.
    async fn get(&self, path: &str) -> Result<Bytes, OpsQueryError>;
}

pub struct HttpTransport {
    client: HttpClient,
    address: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    #[must_use]
    pub fn new(address: &str, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: build_http_client(),
            address: address.trim_end_matches('/').to_string(),
            token,
            timeout,
        }
    }
}

#[async_trait]
impl ConsulTransport for HttpTransport {
    fn address(&self) -> &str {
        &self.address
    }

    async fn get(&self, path: &str) -> Result<Bytes, OpsQueryError> {
        let url = format!("{}{path}", self.address);
        let uri: hyper::Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            OpsQueryError::fetch(&self.address, path, e)
        })?;

        let mut builder = hyper::Request::builder()
            .method(hyper::Method::GET)
            .uri(uri);
        if let Some(ref token) = self.token {
            builder = builder.header("X-Consul-Token", token);
        }
        let req = builder
            .body(http_body_util::Empty::new())
            .map_err(|e| OpsQueryError::fetch(&self.address, path, e))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(req))
            .await
            .map_err(|_| {
                OpsQueryError::fetch(
                    &self.address,
                    path,
                    format!("no response within {}ms", self.timeout.as_millis()),
                )
            })?
            .map_err(|e| OpsQueryError::fetch(&self.address, path, e))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| OpsQueryError::fetch(&self.address, path, e))?
            .to_bytes();

        if !status.is_success() {
            return Err(OpsQueryError::fetch(
                &self.address,
                path,
                format!("status {status}: {}", String::from_utf8_lossy(&body).trim()),
            ));
        }

        tracing::debug!(
            consul = %self.address,
            path,
            bytes = body.len(),
            "consul agent answered"
        );
        Ok(body)
    }
}
