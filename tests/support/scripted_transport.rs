use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use onion_swap::transport::{HttpResponse, Transport, TransportError};
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub enum Reply {
    Http(StatusCode, String),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.replies
            .insert(url.to_string(), Reply::Http(status, body.to_string()));
        self
    }

    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    fn answer(
        &self,
        method: &'static str,
        url: &str,
        body: Option<serde_json::Value>,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(RecordedRequest {
                method,
                url: url.to_string(),
                body,
                timeout,
            });

        match self.replies.get(url) {
            Some(Reply::Http(status, body)) => Ok(HttpResponse::new(*status, body.as_bytes())),
            Some(Reply::Fail(message)) => Err(TransportError::new(message.clone())),
            None => Err(TransportError::new(format!("connection refused: {url}"))),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.answer("GET", url, None, timeout)
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.answer("POST", url, Some(body.clone()), timeout)
    }
}
