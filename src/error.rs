use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("no reachable endpoint: every candidate failed its liveness probe")]
    NoReachableEndpoint,

    #[error("failed to fetch exchange rate: {0}")]
    QuoteFailed(String),

    #[error("failed to create swap: {0}")]
    SwapCreationFailed(String),

    #[error("failed to fetch swap status: {0}")]
    StatusFetchFailed(String),
}

impl SwapError {
    pub fn detail(&self) -> Option<&str> {
        match self {
            SwapError::NoReachableEndpoint => None,
            SwapError::QuoteFailed(detail)
            | SwapError::SwapCreationFailed(detail)
            | SwapError::StatusFetchFailed(detail) => Some(detail),
        }
    }
}
