pub mod client;
pub mod store;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

pub use client::SwapApiClient;

pub const UNAVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Coin {
    Xmr,
    Btc,
    Eth,
    Ltc,
    Doge,
    Ada,
    Bch,
    Sol,
    Dot,
    Trx,
    Xlm,
}

impl Coin {
    pub const ALL: [Coin; 11] = [
        Coin::Xmr,
        Coin::Btc,
        Coin::Eth,
        Coin::Ltc,
        Coin::Doge,
        Coin::Ada,
        Coin::Bch,
        Coin::Sol,
        Coin::Dot,
        Coin::Trx,
        Coin::Xlm,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Coin::Xmr => "XMR",
            Coin::Btc => "BTC",
            Coin::Eth => "ETH",
            Coin::Ltc => "LTC",
            Coin::Doge => "DOGE",
            Coin::Ada => "ADA",
            Coin::Bch => "BCH",
            Coin::Sol => "SOL",
            Coin::Dot => "DOT",
            Coin::Trx => "TRX",
            Coin::Xlm => "XLM",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Coin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Coin::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unsupported coin: {s}"))
    }
}

/// A response field that the service may omit. JSON `null` counts as omitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Reported {
    Value(Value),
    Missing,
}

impl Reported {
    pub fn from_field(obj: &Map<String, Value>, key: &str) -> Self {
        match obj.get(key) {
            None | Some(Value::Null) => Reported::Missing,
            Some(v) => Reported::Value(v.clone()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reported::Missing)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Reported::Value(v) => Some(v),
            Reported::Missing => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Numbers, and strings holding a number, as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn text_or(&self, sentinel: &str) -> String {
        match self {
            Reported::Value(Value::String(s)) => s.clone(),
            Reported::Value(v) => v.to_string(),
            Reported::Missing => sentinel.to_string(),
        }
    }
}

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text_or(UNAVAILABLE))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate_with_commission: Reported,
    pub min_amount: Reported,
    pub max_amount: Reported,
}

impl RateQuote {
    pub fn from_response(obj: &Map<String, Value>) -> Self {
        Self {
            rate_with_commission: Reported::from_field(obj, "rate_with_commission"),
            min_amount: Reported::from_field(obj, "min_amount"),
            max_amount: Reported::from_field(obj, "max_amount"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOrderRequest {
    pub from_coin: String,
    pub to_coin: String,
    pub amount: String,
    pub receiving_address: String,
    pub refund_address: String,
}

impl SwapOrderRequest {
    pub fn new(
        from: Coin,
        to: Coin,
        amount: impl Into<String>,
        receiving_address: impl Into<String>,
        refund_address: impl Into<String>,
    ) -> Self {
        Self {
            from_coin: from.code().to_string(),
            to_coin: to.code().to_string(),
            amount: amount.into(),
            receiving_address: receiving_address.into(),
            refund_address: refund_address.into(),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("from_coin", &self.from_coin),
            ("to_coin", &self.to_coin),
            ("amount", &self.amount),
            ("receiving_address", &self.receiving_address),
            ("refund_address", &self.refund_address),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapRecord {
    pub swap_id: String,
    pub send_to: Reported,
    pub expected_amount: Reported,
    pub created_at: Reported,
    pub fields: Map<String, Value>,
}

impl SwapRecord {
    pub fn from_response(fields: Map<String, Value>) -> Self {
        let swap_id = match Reported::from_field(&fields, "transaction_id") {
            Reported::Value(Value::String(s)) if !s.is_empty() => s,
            Reported::Value(Value::Number(n)) => n.to_string(),
            _ => UNKNOWN.to_string(),
        };
        Self {
            swap_id,
            send_to: Reported::from_field(&fields, "send_to"),
            expected_amount: Reported::from_field(&fields, "expected_amount"),
            created_at: Reported::from_field(&fields, "created_at"),
            fields,
        }
    }

    /// Fills `created_at` with `unix_secs` unless the service already sent one.
    pub fn stamp_created_at(&mut self, unix_secs: i64) {
        if self.created_at.is_missing() {
            let stamp = Value::from(unix_secs);
            self.fields.insert("created_at".to_string(), stamp.clone());
            self.created_at = Reported::Value(stamp);
        }
    }

    pub fn has_service_id(&self) -> bool {
        self.fields.contains_key("transaction_id") && self.swap_id != UNKNOWN
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapLeg {
    pub amount: Reported,
    pub symbol: Reported,
    pub address: Reported,
    pub explorer_url: Reported,
}

impl SwapLeg {
    pub fn empty() -> Self {
        Self {
            amount: Reported::Missing,
            symbol: Reported::Missing,
            address: Reported::Missing,
            explorer_url: Reported::Missing,
        }
    }

    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(obj)) => Self {
                amount: Reported::from_field(obj, "amount"),
                symbol: Reported::from_field(obj, "symbol"),
                address: Reported::from_field(obj, "address"),
                explorer_url: Reported::from_field(obj, "address_explorer_url"),
            },
            _ => Self::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_missing()
            && self.symbol.is_missing()
            && self.address.is_missing()
            && self.explorer_url.is_missing()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapStatus {
    pub status: String,
    pub created_at: Reported,
    pub deposit: SwapLeg,
    pub withdrawal: SwapLeg,
}

impl SwapStatus {
    pub fn from_response(obj: &Map<String, Value>) -> Self {
        let status = match obj.get("status") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => UNKNOWN.to_string(),
            Some(other) => other.to_string(),
        };
        Self {
            status,
            created_at: Reported::from_field(obj, "created_at"),
            deposit: SwapLeg::from_value(obj.get("deposit")),
            withdrawal: SwapLeg::from_value(obj.get("withdrawal")),
        }
    }
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
