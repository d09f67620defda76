//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Create the default category taxonomy on `dossier init`
    #[serde(default = "default_enabled")]
    pub default_categories: bool,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/dossier/dossier.db".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_search_limit() -> usize {
    20
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            default_categories: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            seed: SeedConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./dossier.yaml (current directory)
    /// 3. ~/.config/dossier/dossier.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "dossier.yaml".to_string(),
            shellexpand::tilde("~/.config/dossier/dossier.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.seed.default_categories);
        assert_eq!(config.search.limit, 20);
        assert!(config.database.path.ends_with("dossier.db"));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
database:
  path: ~/.local/share/dossier/test.db

seed:
  default_categories: false

search:
  limit: 50
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.path, "~/.local/share/dossier/test.db");
        assert!(!config.seed.default_categories);
        assert_eq!(config.search.limit, 50);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "database:\n  path: /tmp/dossier.db\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.seed.default_categories);
        assert_eq!(config.search.limit, 20);
    }
}
