//! Ranking oracle port.
//!
//! The oracle is an external ranking service (an LLM) that proposes which
//! candidate services to pick. Its reply is untrusted free text: adapters
//! return it verbatim and never interpret it.

use async_trait::async_trait;
use thiserror::Error;

/// One ranking call: natural-language rules plus a JSON payload.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub prompt: String,
    pub payload: serde_json::Value,
}

/// Failure to obtain any reply from the oracle.
///
/// Every variant means "oracle unavailable" to the suggestion engine, which
/// recovers by falling back rather than surfacing the error.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle timed out after {0}s")]
    Timeout(u64),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Oracle response could not be decoded: {0}")]
    MalformedResponse(String),

    #[error("Oracle HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Oracle rate limited")]
    RateLimited,
}

impl OracleError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::RateLimited | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse | Self::MalformedResponse(_) => false,
        }
    }
}

/// A service that ranks candidates and replies with free text.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Send one ranking request and return the raw reply text.
    async fn rank(&self, request: &RankingRequest) -> Result<String, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(OracleError::Unavailable("reset".into()).is_transient());
        assert!(OracleError::RateLimited.is_transient());
        assert!(OracleError::Http { status: 502, body: String::new() }.is_transient());
        assert!(!OracleError::Http { status: 400, body: String::new() }.is_transient());
        assert!(!OracleError::EmptyResponse.is_transient());
        assert!(!OracleError::MalformedResponse("eof".into()).is_transient());
    }
}
