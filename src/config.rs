//! Service configuration.
//!
//! Either service runs only when its section (or environment variable) is
//! present. Missing required values are fatal at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

const CONFIG_PATH_ENV: &str = "COURIER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "courier.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// File service settings; omit to disable the file service.
    #[serde(default)]
    pub server: Option<ServerConfig>,
    /// Proxy settings; omit to disable the proxy.
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory served files are read from and uploads are written to.
    #[serde(default = "default_store_root")]
    pub store_root: PathBuf,
    /// Admission gate capacity: handlers running at once.
    #[serde(default = "default_max_inflight")]
    pub max_inflight: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    pub listen_addr: String,
    /// Upstream as "host:port" or an http(s) URL.
    pub upstream_addr: String,
}

fn default_store_root() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_inflight() -> usize {
    10
}

impl Config {
    /// Loads configuration from `$COURIER_CONFIG`, then `courier.yaml` if it
    /// exists, then the environment.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&path));
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::from_file(Path::new(DEFAULT_CONFIG_PATH));
        }
        Self::from_env()
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("invalid config file")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds a configuration from `SERVER_PORT`, `PROXY_PORT` and
    /// `TARGET_ADDRESS`, plus optional `STORE_ROOT`.
    pub fn from_env() -> anyhow::Result<Self> {
        let server = std::env::var("SERVER_PORT").ok().map(|port| ServerConfig {
            listen_addr: format!("0.0.0.0:{port}"),
            store_root: std::env::var("STORE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_store_root()),
            max_inflight: default_max_inflight(),
        });

        let proxy = match std::env::var("PROXY_PORT") {
            Ok(port) => {
                let upstream_addr = std::env::var("TARGET_ADDRESS")
                    .context("TARGET_ADDRESS environment variable is not set")?;
                Some(ProxyConfig {
                    listen_addr: format!("0.0.0.0:{port}"),
                    upstream_addr,
                })
            }
            Err(_) => None,
        };

        let cfg = Config { server, proxy };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.server.is_none() && self.proxy.is_none() {
            bail!("no service configured: set a server or proxy section, or SERVER_PORT / PROXY_PORT");
        }
        if let Some(server) = &self.server {
            if server.listen_addr.is_empty() {
                bail!("server.listen_addr must not be empty");
            }
            if server.max_inflight == 0 {
                bail!("server.max_inflight must be at least 1");
            }
        }
        if let Some(proxy) = &self.proxy {
            if proxy.listen_addr.is_empty() {
                bail!("proxy.listen_addr must not be empty");
            }
            if proxy.upstream_addr.is_empty() {
                bail!("proxy.upstream_addr must not be empty");
            }
        }
        Ok(())
    }
}
