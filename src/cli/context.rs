use crate::config::app_config::AppConfig;
use crate::core::errors::{Result, RollcallError};

/// Resolve the bot token: an explicit `--token` wins, otherwise the
/// environment variable named in the configuration is consulted.
///
/// Blank values are treated as absent so an empty flag or variable does
/// not silently produce unauthorized requests.
pub fn resolve_token(flag: Option<&str>, config: &AppConfig) -> Result<String> {
    if let Some(token) = flag {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    match std::env::var(&config.rollcall.token_env) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(RollcallError::MissingToken {
            env_var: config.rollcall.token_env.clone(),
        }),
    }
}
