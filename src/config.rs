//! Configuration for doko, loaded from an optional doko.toml.
//!
//! Every key has a compiled-in default so the tool works out of the box in a
//! conventional Odoo project layout.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure loaded from doko.toml
#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub project: Option<ProjectConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ProjectConfig {
    /// Compose service to run commands in
    pub service: Option<String>,
    /// Name of the long-lived core database
    pub core_db: Option<String>,
    /// Name of the fixed test database
    pub test_db: Option<String>,
    /// Name of the disposable scratch database
    pub scratch_db: Option<String>,
    /// Branch that maps to the core database
    pub primary_branch: Option<String>,
    /// Default port published by `doko run`
    pub port: Option<u16>,
    /// Filestore root inside the container
    pub filestore: Option<String>,
    /// Migration manifest path, relative to the repository root
    pub manifest: Option<String>,
}

impl Config {
    /// Load config from file, or return default if no config exists.
    /// If an explicit path is provided via --config, it MUST exist (error if not).
    /// If no path is provided, check ./doko.toml (use default if not found).
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    bail!("Config file not found: {}", p.display());
                }
                p
            }
            None => {
                let default_path = Path::new("doko.toml");
                if default_path.exists() {
                    default_path
                } else {
                    return Ok(Config::default());
                }
            }
        };

        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", config_path.display(), e))?;

        Ok(config)
    }

    fn project(&self) -> Option<&ProjectConfig> {
        self.project.as_ref()
    }

    pub fn service(&self) -> &str {
        self.project()
            .and_then(|p| p.service.as_deref())
            .unwrap_or("odoo")
    }

    pub fn core_db(&self) -> &str {
        self.project()
            .and_then(|p| p.core_db.as_deref())
            .unwrap_or("odoodb")
    }

    pub fn test_db(&self) -> &str {
        self.project()
            .and_then(|p| p.test_db.as_deref())
            .unwrap_or("testdb")
    }

    pub fn scratch_db(&self) -> &str {
        self.project()
            .and_then(|p| p.scratch_db.as_deref())
            .unwrap_or("scratchdb")
    }

    pub fn primary_branch(&self) -> &str {
        self.project()
            .and_then(|p| p.primary_branch.as_deref())
            .unwrap_or("master")
    }

    pub fn port(&self) -> u16 {
        self.project().and_then(|p| p.port).unwrap_or(8069)
    }

    pub fn filestore(&self) -> &str {
        self.project()
            .and_then(|p| p.filestore.as_deref())
            .unwrap_or("/data/odoo/filestore")
    }

    pub fn manifest(&self) -> &str {
        self.project()
            .and_then(|p| p.manifest.as_deref())
            .unwrap_or("migration.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service(), "odoo");
        assert_eq!(config.core_db(), "odoodb");
        assert_eq!(config.test_db(), "testdb");
        assert_eq!(config.scratch_db(), "scratchdb");
        assert_eq!(config.primary_branch(), "master");
        assert_eq!(config.port(), 8069);
        assert_eq!(config.filestore(), "/data/odoo/filestore");
        assert_eq!(config.manifest(), "migration.yml");
    }

    #[test]
    fn test_partial_project_section_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[project]
core_db = "mainproj"
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(config.core_db(), "mainproj");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.service(), "odoo");
        assert_eq!(config.primary_branch(), "master");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/doko.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
