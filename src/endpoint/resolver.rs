use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom as _;
use reqwest::StatusCode;

use super::{BaseAddress, CandidateEndpoint};
use crate::error::SwapError;
use crate::transport::Transport;

pub fn visiting_order<'a, R>(
    candidates: &'a [CandidateEndpoint],
    rng: &mut R,
) -> Vec<&'a CandidateEndpoint>
where
    R: Rng + ?Sized,
{
    let mut order: Vec<&CandidateEndpoint> = candidates.iter().collect();
    order.shuffle(rng);
    order
}

pub async fn resolve(
    transport: &dyn Transport,
    candidates: &[CandidateEndpoint],
    probe_path: &str,
    timeout: Duration,
) -> Result<BaseAddress, SwapError> {
    // ThreadRng is !Send, so it must not live across the probe awaits.
    let order = visiting_order(candidates, &mut rand::thread_rng());
    probe_in_order(transport, order, probe_path, timeout).await
}

pub async fn probe_in_order<'a, I>(
    transport: &dyn Transport,
    order: I,
    probe_path: &str,
    timeout: Duration,
) -> Result<BaseAddress, SwapError>
where
    I: IntoIterator<Item = &'a CandidateEndpoint>,
{
    for candidate in order {
        let base = BaseAddress::from_candidate(candidate);
        let url = base.join(probe_path);
        tracing::debug!(%url, "probing endpoint");

        match transport.get(&url, timeout).await {
            Ok(resp) if resp.status == StatusCode::OK => {
                tracing::info!(endpoint = %base, "connected to swap service");
                return Ok(base);
            }
            Ok(resp) => {
                tracing::warn!(%url, status = %resp.status, "endpoint probe rejected");
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "endpoint unreachable");
            }
        }
    }

    tracing::error!("no reachable endpoint among candidates");
    Err(SwapError::NoReachableEndpoint)
}
