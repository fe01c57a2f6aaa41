mod support {
    pub mod swap_service;
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};

use onion_swap::endpoint::{CandidateEndpoint, resolve};
use onion_swap::error::SwapError;
use onion_swap::swap::{Coin, SwapApiClient, SwapOrderRequest};
use onion_swap::transport::{HttpTransport, Transport, TransportConfig};

use support::swap_service::{KNOWN_SWAP_ID, SwapServiceFixture};

const TIMEOUT: Duration = Duration::from_secs(5);

fn direct_transport() -> Result<Arc<HttpTransport>> {
    Ok(Arc::new(
        HttpTransport::new(&TransportConfig::direct()).context("create http transport")?,
    ))
}

#[tokio::test]
async fn resolve_then_quote_create_and_status_over_http() -> Result<()> {
    let _ = onion_swap::logging::init();
    let service = SwapServiceFixture::start().await.context("start fixture")?;
    let transport = direct_transport()?;

    // Port 9 (discard) on loopback is closed in test environments.
    let candidates = vec![
        CandidateEndpoint::new("127.0.0.1", 9),
        CandidateEndpoint::new(service.host(), service.port()),
    ];
    let base = resolve(transport.as_ref(), &candidates, "/ping", TIMEOUT)
        .await
        .context("resolve")?;
    assert_eq!(base.as_str(), format!("http://{}", service.addr));

    let client = SwapApiClient::new(transport, base).with_timeout(TIMEOUT);

    let quote = client
        .quote_rate("BTC", "XMR", "0.5")
        .await
        .context("quote rate")?;
    assert_eq!(quote.rate_with_commission.as_f64(), Some(150.2));
    assert_eq!(quote.min_amount.as_f64(), Some(0.001));
    assert!(quote.max_amount.is_missing());

    let order = SwapOrderRequest::new(Coin::Btc, Coin::Xmr, "0.5", "xmr-receive", "btc-refund");
    let record = client.create_swap(&order).await.context("create swap")?;
    assert_eq!(record.swap_id, KNOWN_SWAP_ID);
    assert_eq!(record.send_to.as_str(), Some("addr1"));
    assert_eq!(record.fields.get("from_coin").and_then(|v| v.as_str()), Some("btc"));
    assert_eq!(record.fields.get("to_coin").and_then(|v| v.as_str()), Some("xmr"));

    let status = client
        .get_swap_status(KNOWN_SWAP_ID)
        .await
        .context("get swap status")?;
    assert_eq!(status.status, "waiting");
    assert_eq!(status.deposit.symbol.as_str(), Some("btc"));
    assert!(status.withdrawal.is_empty());

    Ok(())
}

#[tokio::test]
async fn http_errors_become_named_failures() -> Result<()> {
    let service = SwapServiceFixture::start().await.context("start fixture")?;
    let transport = direct_transport()?;
    let candidates = vec![CandidateEndpoint::new(service.host(), service.port())];
    let base = resolve(transport.as_ref(), &candidates, "/ping", TIMEOUT)
        .await
        .context("resolve")?;
    let client = SwapApiClient::new(transport, base).with_timeout(TIMEOUT);

    let err = client.get_swap_status("nope").await.unwrap_err();
    assert!(
        matches!(err, SwapError::StatusFetchFailed(ref d) if d.contains("404")),
        "unexpected {err:?}"
    );

    let err = client.quote_rate("BTC", "BTC", "1").await.unwrap_err();
    assert!(
        matches!(err, SwapError::QuoteFailed(ref d) if d.contains("400")),
        "unexpected {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn slow_ping_times_out_and_is_skipped() -> Result<()> {
    let service = SwapServiceFixture::start().await.context("start fixture")?;
    let transport = direct_transport()?;
    let candidates = vec![CandidateEndpoint::new(service.host(), service.port())];

    let started = Instant::now();
    let err = resolve(
        transport.as_ref(),
        &candidates,
        "/slow",
        Duration::from_millis(300),
    )
    .await
    .unwrap_err();

    assert_eq!(err, SwapError::NoReachableEndpoint);
    assert!(started.elapsed() < Duration::from_secs(4));
    Ok(())
}

#[tokio::test]
async fn transport_returns_status_without_failing() -> Result<()> {
    let service = SwapServiceFixture::start().await.context("start fixture")?;
    let transport = direct_transport()?;

    let resp = transport
        .get(&format!("http://{}/swap/status/nope", service.addr), TIMEOUT)
        .await
        .context("get")?;
    assert_eq!(resp.status.as_u16(), 404);
    assert_eq!(resp.body, b"swap not found".to_vec());
    Ok(())
}

#[test]
fn invalid_proxy_url_is_rejected() {
    let cfg = TransportConfig {
        proxy: Some("not a url".to_string()),
    };
    assert!(HttpTransport::new(&cfg).is_err());
}
