use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use validash_core::AppError;


/// Where the log blob is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStorageConfig {
    Memory,
    File { directory: PathBuf },
    Redis { redis_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub log_storage: LogStorageConfig,
    pub storage_key: String,
    pub simulated_latency: Duration,
    pub notification_display: Duration,
    pub notification_max_visible: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", optional("API_PORT"), 3001_u16)?;
        let frontend_url =
            optional("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let log_storage = match optional("LOG_STORAGE")
            .unwrap_or_else(|| "file".to_owned())
            .as_str()
        {
            "memory" => LogStorageConfig::Memory,
            "file" => LogStorageConfig::File {
                directory: PathBuf::from(
                    optional("LOG_STORAGE_DIR").unwrap_or_else(|| "./data".to_owned()),
                ),
            },
            "redis" => LogStorageConfig::Redis {
                redis_url: optional("REDIS_URL").ok_or_else(|| {
                    AppError::Validation("REDIS_URL is required when LOG_STORAGE=redis".to_owned())
                })?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "LOG_STORAGE must be one of 'memory', 'file' or 'redis', got '{other}'"
                )));
            }
        };

        let storage_key = optional("LOG_STORAGE_KEY").unwrap_or_else(|| "apiLogs".to_owned());
        let simulated_latency = Duration::from_millis(parse_or(
            "SIMULATED_LATENCY_MS",
            optional("SIMULATED_LATENCY_MS"),
            1_000_u64,
        )?);
        let notification_display = Duration::from_millis(parse_or(
            "NOTIFICATION_DISPLAY_MS",
            optional("NOTIFICATION_DISPLAY_MS"),
            3_000_u64,
        )?);
        let notification_max_visible = parse_or(
            "NOTIFICATION_MAX_VISIBLE",
            optional("NOTIFICATION_MAX_VISIBLE"),
            5_usize,
        )?;
        if notification_max_visible == 0 {
            return Err(AppError::Validation(
                "NOTIFICATION_MAX_VISIBLE must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            log_storage,
            storage_key,
            simulated_latency,
            notification_display,
            notification_max_visible,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
