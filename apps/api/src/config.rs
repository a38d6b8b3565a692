use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::generation::request::EmptyInputPolicy;

const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 180;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// What to do when both the resume text and the job description are blank.
    pub empty_input_policy: EmptyInputPolicy,
    /// Caller-level bound on a whole `generate` call, retries included. `None` disables it.
    pub generation_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let empty_input_policy = match std::env::var("EMPTY_INPUT_POLICY") {
            Ok(raw) => parse_empty_input_policy(&raw)?,
            Err(_) => EmptyInputPolicy::default(),
        };

        let timeout_secs = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_GENERATION_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            empty_input_policy,
            generation_timeout: timeout_from_secs(timeout_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_empty_input_policy(raw: &str) -> Result<EmptyInputPolicy> {
    match raw.trim().to_lowercase().as_str() {
        "strict" => Ok(EmptyInputPolicy::Strict),
        "lenient" => Ok(EmptyInputPolicy::Lenient),
        other => bail!("EMPTY_INPUT_POLICY must be 'strict' or 'lenient', got '{other}'"),
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
