//! Server configuration.
//!
//! Configuration is read from an optional YAML file, then overridden by
//! environment variables. Every field has a default so an empty (or missing)
//! file yields a working loopback server on port 8080.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Files larger than this are served one chunk per request.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;
pub const DEFAULT_BACKLOG: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid listen address {0:?}, expected host:port")]
    ListenAddr(String),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pending-connection queue length passed to `listen(2)`.
    pub backlog: u32,
    /// Upper bound on concurrently served connections. `None` means one task
    /// per accepted connection with no cap.
    pub max_connections: Option<usize>,
    /// Idle time allowed while waiting for request bytes. `None` waits forever.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub root: PathBuf,
    pub chunk_size: u64,
    pub read_buffer_size: usize,
    pub forbidden_segment: String,
    /// Reject paths that canonicalize outside of `root`.
    pub contain_paths: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backlog: DEFAULT_BACKLOG,
            max_connections: None,
            request_timeout_secs: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            forbidden_segment: "confidential".to_string(),
            contain_paths: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads configuration from `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Applies `VODSERVER_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(listen) = lookup("VODSERVER_LISTEN") {
            let (host, port) = listen
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::ListenAddr(listen.clone()))?;
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::ListenAddr(listen.clone()))?;
            self.server.host = host.to_string();
        }

        if let Some(root) = lookup("VODSERVER_ROOT") {
            self.content.root = PathBuf::from(root);
        }

        if let Some(level) = lookup("VODSERVER_LOG") {
            self.log.level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.chunk_size == 0 {
            return Err(ConfigError::Invalid("content.chunk_size must be positive"));
        }
        if self.content.read_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "content.read_buffer_size must be positive",
            ));
        }
        if self.server.max_connections == Some(0) {
            return Err(ConfigError::Invalid(
                "server.max_connections must be positive when set",
            ));
        }
        Ok(())
    }

    /// The runtime view handed to every connection handler.
    pub fn serve_config(&self) -> Arc<ServeConfig> {
        Arc::new(ServeConfig {
            root: self.content.root.clone(),
            chunk_size: self.content.chunk_size,
            read_buffer_size: self.content.read_buffer_size,
            forbidden_segment: self.content.forbidden_segment.clone(),
            contain_paths: self.content.contain_paths,
            request_timeout: self.server.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Immutable settings shared by all connection handlers.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub root: PathBuf,
    pub chunk_size: u64,
    pub read_buffer_size: usize,
    pub forbidden_segment: String,
    pub contain_paths: bool,
    pub request_timeout: Option<Duration>,
}

impl ServeConfig {
    /// Settings for serving `root` with every other knob at its default.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let content = ContentConfig::default();
        Self {
            root: root.into(),
            chunk_size: content.chunk_size,
            read_buffer_size: content.read_buffer_size,
            forbidden_segment: content.forbidden_segment,
            contain_paths: content.contain_paths,
            request_timeout: None,
        }
    }
}
