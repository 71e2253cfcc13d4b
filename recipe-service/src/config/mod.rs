use recipe_core::config as core_config;
use recipe_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    /// Base URL of the chat-completions API, without the trailing path.
    pub api_base: String,
    pub model: String,
    /// Overall deadline for one upstream call, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Maximum requests allowed per client within one window.
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AppConfig {
            common,
            openai: OpenAiSettings {
                api_key: get_env("OPENAI_API_KEY", None, is_prod)?,
                api_base: get_env("OPENAI_API_BASE", Some("https://api.openai.com/v1"), is_prod)?,
                model: get_env("OPENAI_MODEL", Some("gpt-3.5-turbo"), is_prod)?,
                timeout_secs: get_env("UPSTREAM_TIMEOUT_SECS", Some("30"), is_prod)?
                    .parse()
                    .unwrap_or(30),
            },
            rate_limit: RateLimitSettings {
                max_requests: get_env("RATE_LIMIT_MAX_REQUESTS", Some("20"), is_prod)?
                    .parse()
                    .unwrap_or(20),
                window_seconds: get_env("RATE_LIMIT_WINDOW_SECS", Some("900"), is_prod)?
                    .parse()
                    .unwrap_or(900),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
