use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_STATIC_DIR: &str = "frontend";
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// port = 3000
/// api_url = "http://localhost:5000/api"
/// static_dir = "frontend"
/// relay_url = "http://localhost:3000"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the relay listens on (all interfaces).
    pub port: u16,
    /// Base URL of the upstream temperature/LLM service.
    pub api_url: String,
    /// Directory the relay serves UI assets from.
    pub static_dir: PathBuf,
    /// Relay the terminal client talks to.
    pub relay_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_url: DEFAULT_API_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            relay_url: DEFAULT_RELAY_URL.to_string(),
        }
    }
}

/// Command-line overrides applied on top of the file config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub api_url: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub relay_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "thermo", "thermo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(static_dir) = overrides.static_dir {
            self.static_dir = static_dir;
        }
        if let Some(relay_url) = overrides.relay_url {
            self.relay_url = relay_url;
        }
        self
    }

    /// Address the relay binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_values() {
        let cfg = Config::default();

        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.api_url, "http://localhost:5000/api");
        assert_eq!(cfg.static_dir, PathBuf::from("frontend"));
        assert_eq!(cfg.relay_url, "http://localhost:3000");
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg = Config::from_toml("port = 8080\n").expect("valid toml");

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("port = \"not a port\"").is_err());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let cfg = Config::default().apply(Overrides {
            api_url: Some("http://sensor.local:5000/api".into()),
            ..Overrides::default()
        });

        assert_eq!(cfg.api_url, "http://sensor.local:5000/api");
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.relay_url, DEFAULT_RELAY_URL);
    }
}
