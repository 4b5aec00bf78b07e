#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Environment-driven startup configuration. Loaded once, validated, and
//! failed loudly before the service starts serving, sourced from env vars
//! via `dotenvy`.

use std::path::PathBuf;

use mnemo_core::{EmbeddingVariant, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub reply_llm_api_key: String,
    pub embedding_api_key: Option<String>,
    pub api_key: Option<String>,
    pub embedding_model: EmbeddingVariant,
    pub data_dir: PathBuf,
    pub memory_extract_threshold: u32,
    pub max_context_memories: usize,
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Config {
    /// Loads `.env` (if present, via `dotenvy`) then reads and validates
    /// every configuration key. Returns `Error::ConfigInvalid` on any
    /// missing-required-key, unparsable-value, or production-mode
    /// violation — callers should treat this as fatal and exit non-zero.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env file loaded: {e}");
        }

        let environment = match env_var("ENVIRONMENT").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(Error::ConfigInvalid(format!("unknown ENVIRONMENT: {other}")))
            }
        };

        let reply_llm_api_key = require_env("REPLY_LLM_API_KEY")?;
        let embedding_api_key = env_var("EMBEDDING_API_KEY");
        let api_key = env_var("API_KEY");

        let embedding_model: EmbeddingVariant = env_var("EMBEDDING_MODEL")
            .unwrap_or_else(|| "simple".to_string())
            .parse()?;

        if environment.is_production() {
            if !embedding_model.allowed_in_production() {
                return Err(Error::ConfigInvalid(
                    "EMBEDDING_MODEL=simple is forbidden in production".to_string(),
                ));
            }
            if api_key.is_none() {
                return Err(Error::ConfigInvalid(
                    "API_KEY is required in production".to_string(),
                ));
            }
        }

        let data_dir = PathBuf::from(env_var("DATA_DIR").unwrap_or_else(|| "./data".to_string()));

        let memory_extract_threshold = parse_env_or("MEMORY_EXTRACT_THRESHOLD", 5)?;
        let max_context_memories = parse_env_or("MAX_CONTEXT_MEMORIES", 5)?;
        let host = env_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_env_or("PORT", 8080)?;
        let workers = parse_env_or("WORKERS", num_cpus())?;

        Ok(Self {
            environment,
            reply_llm_api_key,
            embedding_api_key,
            api_key,
            embedding_model,
            data_dir,
            memory_extract_threshold,
            max_context_memories,
            host,
            port,
            workers,
        })
    }

    #[must_use]
    pub const fn auth_required(&self) -> bool {
        self.environment.is_production()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn require_env(key: &str) -> Result<String> {
    env_var(key).ok_or_else(|| Error::ConfigInvalid(format!("missing required env var {key}")))
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env_var(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::ConfigInvalid(format!("invalid value for {key}: {raw}"))),
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "ENVIRONMENT",
            "REPLY_LLM_API_KEY",
            "EMBEDDING_API_KEY",
            "API_KEY",
            "EMBEDDING_MODEL",
            "DATA_DIR",
            "MEMORY_EXTRACT_THRESHOLD",
            "MAX_CONTEXT_MEMORIES",
            "HOST",
            "PORT",
            "WORKERS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn missing_required_key_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        let result = Config::load();
        assert!(matches!(result, Err(Error::ConfigInvalid(_))));
    }

    #[test]
    fn production_rejects_simple_embedding() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("REPLY_LLM_API_KEY", "key");
        std::env::set_var("ENVIRONMENT", "production");
        std::env::set_var("API_KEY", "gate");
        std::env::set_var("EMBEDDING_MODEL", "simple");

        let result = Config::load();
        assert!(matches!(result, Err(Error::ConfigInvalid(_))));
        clear_env();
    }

    #[test]
    fn production_requires_api_key() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("REPLY_LLM_API_KEY", "key");
        std::env::set_var("ENVIRONMENT", "production");
        std::env::set_var("EMBEDDING_MODEL", "remote-llm");

        let result = Config::load();
        assert!(matches!(result, Err(Error::ConfigInvalid(_))));
        clear_env();
    }

    #[test]
    fn development_defaults_are_permissive() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("REPLY_LLM_API_KEY", "key");

        let config = Config::load().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.auth_required());
        clear_env();
    }
}
