use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};

use super::{RateQuote, SwapOrderRequest, SwapRecord, SwapStatus, unix_now};
use crate::endpoint::BaseAddress;
use crate::error::SwapError;
use crate::transport::{HttpResponse, Transport, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SwapApiClient {
    transport: Arc<dyn Transport>,
    base: BaseAddress,
    timeout: Duration,
}

impl SwapApiClient {
    pub fn new(transport: Arc<dyn Transport>, base: BaseAddress) -> Self {
        Self {
            transport,
            base,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base(&self) -> &BaseAddress {
        &self.base
    }

    pub async fn quote_rate(
        &self,
        source_coin: &str,
        dest_coin: &str,
        amount: &str,
    ) -> Result<RateQuote, SwapError> {
        let url = self.base.join(&format!("/rate/{source_coin}/{dest_coin}/{amount}"));
        tracing::debug!(%url, "fetching exchange rate");

        let resp = self.transport.get(&url, self.timeout).await;
        let obj = json_object(&url, resp).map_err(|detail| {
            tracing::error!(%detail, "failed to fetch exchange rate");
            SwapError::QuoteFailed(detail)
        })?;
        Ok(RateQuote::from_response(&obj))
    }

    pub async fn create_swap(&self, order: &SwapOrderRequest) -> Result<SwapRecord, SwapError> {
        let url = self.base.join("/swap");
        let body = json!({
            "from_coin": order.from_coin.to_lowercase(),
            "to_coin": order.to_coin.to_lowercase(),
            "amount": order.amount,
            "receiving_address": order.receiving_address,
            "refund_address": order.refund_address,
        });
        tracing::debug!(
            %url,
            from_coin = %order.from_coin,
            to_coin = %order.to_coin,
            "creating swap"
        );

        let resp = self.transport.post_json(&url, &body, self.timeout).await;
        let obj = json_object(&url, resp).map_err(|detail| {
            tracing::error!(%detail, "failed to create swap");
            SwapError::SwapCreationFailed(detail)
        })?;

        let mut record = SwapRecord::from_response(obj);
        record.stamp_created_at(unix_now());
        tracing::info!(swap_id = %record.swap_id, "swap created");
        Ok(record)
    }

    pub async fn get_swap_status(&self, swap_id: &str) -> Result<SwapStatus, SwapError> {
        let url = self.base.join(&format!("/swap/status/{swap_id}"));
        tracing::debug!(%url, "fetching swap status");

        let resp = self.transport.get(&url, self.timeout).await;
        let obj = json_object(&url, resp).map_err(|detail| {
            tracing::error!(%detail, "failed to fetch swap status");
            SwapError::StatusFetchFailed(detail)
        })?;
        Ok(SwapStatus::from_response(&obj))
    }
}

fn json_object(
    url: &str,
    resp: Result<HttpResponse, TransportError>,
) -> Result<Map<String, Value>, String> {
    let resp = resp.map_err(|e| e.to_string())?;
    if !resp.is_success() {
        return Err(format!("HTTP {} for url: {url}", resp.status));
    }

    match serde_json::from_slice::<Value>(&resp.body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(other) => Err(format!(
            "expected a JSON object from {url}, got {}",
            json_kind(&other)
        )),
        Err(e) => Err(format!("invalid JSON body from {url}: {e}")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
