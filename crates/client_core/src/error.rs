use thiserror::Error;

/// Failure talking to the RSA gateway.
///
/// Callers treat every variant the same way: the operation is reported as blocked or failed
/// and the session stays as it was.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid gateway base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("gateway request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("gateway rejected request to {endpoint} with status {status}")]
    Rejected { endpoint: &'static str, status: u16 },
    #[error("gateway response from {endpoint} could not be decoded: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },
}

impl GatewayError {
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidBaseUrl { .. } => None,
            Self::Transport { endpoint, .. }
            | Self::Rejected { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
        }
    }
}
