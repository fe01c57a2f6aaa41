use std::error::Error as _;
use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Proxy, RequestBuilder};

use super::{HttpResponse, Transport, TransportError};

pub const DEFAULT_TOR_PROXY: &str = "socks5h://127.0.0.1:9050";

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub proxy: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            proxy: Some(DEFAULT_TOR_PROXY.to_string()),
        }
    }
}

impl TransportConfig {
    pub fn direct() -> Self {
        Self { proxy: None }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(cfg: &TransportConfig) -> Result<Self> {
        let mut builder = Client::builder();
        builder = match &cfg.proxy {
            Some(url) => {
                let proxy = Proxy::all(url).with_context(|| format!("parse proxy {url}"))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        let http = builder.build().context("build http client")?;
        Ok(Self { http })
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        // The request timeout also covers reading the body.
        let resp = request
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(describe)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(describe)?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.execute(self.http.get(url), timeout).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.execute(self.http.post(url).json(body), timeout).await
    }
}

fn describe(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        let url = err.url().map(|u| u.as_str()).unwrap_or("<unknown url>");
        return TransportError::new(format!("request to {url} timed out"));
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportError::new(message)
}
