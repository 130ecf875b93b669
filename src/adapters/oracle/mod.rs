//! Ranking oracle adapters.

pub mod gemini;
pub mod mock;

pub use gemini::{DisabledOracle, GeminiOracle};
pub use mock::{MockOracle, MockReply};

use std::sync::Arc;

use crate::domain::models::{OracleConfig, OracleProvider};
use crate::domain::ports::RankingOracle;

/// Build the oracle selected by configuration.
///
/// A Gemini provider without an API key degrades to the disabled oracle so
/// that suggestions keep working through the fallback selector.
pub fn build_oracle(config: &OracleConfig) -> Arc<dyn RankingOracle> {
    match config.provider {
        OracleProvider::Disabled => Arc::new(DisabledOracle),
        OracleProvider::Gemini => match config.resolve_api_key() {
            Some(api_key) => match GeminiOracle::new(config, api_key) {
                Ok(oracle) => Arc::new(oracle),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to build Gemini client, oracle disabled");
                    Arc::new(DisabledOracle)
                }
            },
            None => {
                tracing::warn!("no Gemini API key configured, oracle disabled");
                Arc::new(DisabledOracle)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_provider() {
        let config = OracleConfig {
            provider: OracleProvider::Disabled,
            ..Default::default()
        };
        assert_eq!(build_oracle(&config).name(), "disabled");
    }

    #[test]
    fn test_gemini_without_key_is_disabled() {
        temp_env::with_var_unset("GEMINI_API_KEY", || {
            let oracle = build_oracle(&OracleConfig::default());
            assert_eq!(oracle.name(), "disabled");
        });
    }

    #[test]
    fn test_gemini_with_key() {
        let config = OracleConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert_eq!(build_oracle(&config).name(), "gemini");
    }
}
