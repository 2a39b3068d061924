//! Configuration management
//!
//! Settings load from `~/.netinv/netinv.toml` (or an explicit `--config`
//! path), with environment variables prefixed `NETINV` taking precedence.
//! A commented template file is written on first run.

use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

pub struct NetinvConfig {
    /// Path to the directory holding the inventory database
    pub data_dir: String,
}

const EMPTY_CONFIG: &str = r#"### netinv configuration file

### directory for the inventory database
# data_dir = "~/.netinv"
"#;

impl Default for NetinvConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        Self {
            data_dir: format!("{}/.netinv", home_dir),
        }
    }
}

impl NetinvConfig {
    /// Create and initialize a configuration, writing the template file if
    /// none exists yet
    pub fn new(path: &Option<String>) -> Result<NetinvConfig> {
        let mut builder = Config::builder();

        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        let netinv_dir = format!("{}/.netinv", home_dir.as_str());

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(netinv_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create netinv directory: {}", e))?;
                let p = format!("{}/netinv.toml", netinv_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // e.g. `NETINV_DATA_DIR=/tmp/netinv netinv host list`
        builder = builder.add_source(config::Environment::with_prefix("NETINV"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;
        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let data_dir = match config.get("data_dir") {
            Some(p) => p.trim_end_matches('/').to_string(),
            None => {
                let dir = format!("{}/.netinv", home_dir.as_str());
                std::fs::create_dir_all(dir.as_str())
                    .map_err(|e| anyhow!("Unable to create data directory: {}", e))?;
                dir
            }
        };

        Ok(NetinvConfig { data_dir })
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/netinv.sqlite3", data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_path() {
        let config = NetinvConfig {
            data_dir: "/tmp/netinv-test/".to_string(),
        };
        assert_eq!(config.sqlite_path(), "/tmp/netinv-test/netinv.sqlite3");
    }
}
