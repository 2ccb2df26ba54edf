//! Deployment configuration — realizes the `ConfigProvider` port as a
//! typed struct loaded from `conf/deployment.toml`, with environment
//! variable overrides layered on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRouterConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpRouterConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8290,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpInboundConfig {
    /// Base port for HTTP inbound listeners. Each deployed HTTP inbound
    /// is assigned `port + deployment_offset`, in declaration order,
    /// so multiple HTTP inbounds in one deployment never collide.
    pub port: u16,
    pub deployment_offset: u16,
}

impl Default for HttpInboundConfig {
    fn default() -> Self {
        Self {
            port: 8291,
            deployment_offset: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub router: HttpRouterConfig,
    pub inbound_http: HttpInboundConfig,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            router: HttpRouterConfig::default(),
            inbound_http: HttpInboundConfig::default(),
        }
    }
}

impl DeploymentConfig {
    /// Loads `<root>/conf/deployment.toml` if present, falling back to
    /// defaults, then applies `SWITCHYARD_ROUTER_PORT` /
    /// `SWITCHYARD_INBOUND_HTTP_PORT` environment overrides.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join("conf").join("deployment.toml");
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            info!(path = %path.display(), "loading deployment configuration");
            toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.clone(), source })?
        } else {
            info!(path = %path.display(), "no deployment.toml found, using defaults");
            DeploymentConfig::default()
        };

        if let Ok(port) = std::env::var("SWITCHYARD_ROUTER_PORT") {
            if let Ok(port) = port.parse() {
                config.router.port = port;
            }
        }
        if let Ok(port) = std::env::var("SWITCHYARD_INBOUND_HTTP_PORT") {
            if let Ok(port) = port.parse() {
                config.inbound_http.port = port;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file_present() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeploymentConfig::load(dir.path()).unwrap();
        assert_eq!(config.router.port, 8290);
        assert_eq!(config.inbound_http.port, 8291);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("conf")).unwrap();
        std::fs::write(
            dir.path().join("conf").join("deployment.toml"),
            "[router]\nport = 9000\n",
        )
        .unwrap();
        let config = DeploymentConfig::load(dir.path()).unwrap();
        assert_eq!(config.router.port, 9000);
    }
}
