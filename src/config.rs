use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prep product reported for lines seen before any product is named
    #[serde(default = "default_prep")]
    pub default_prep: String,
    /// Table written by `convert` when no `--output` is given
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Keyword tables for the classifier, in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default = "default_medication")]
    pub medication: Vec<String>,
    #[serde(default = "default_bowelprep")]
    pub bowelprep: Vec<String>,
    #[serde(default = "default_diet")]
    pub diet: Vec<String>,
    #[serde(default = "default_procedure")]
    pub procedure: Vec<String>,
    /// Product names recognised as the current prep (whole-word match)
    #[serde(default = "default_prep_products")]
    pub prep_products: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_prep() -> String {
    "plenvu".to_string()
}

fn default_output_file() -> String {
    "output.csv".to_string()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_medication() -> Vec<String> {
    words(&[
        "medication",
        "iron",
        "supplements",
        "antidiarrheals",
        "blood",
        "tablets",
        "aspirin",
    ])
}

fn default_bowelprep() -> Vec<String> {
    words(&[
        "plenvu", "glycoprep", "moviprep", "picolax", "picoprep", "prepkit", "dose", "sachet",
    ])
}

fn default_diet() -> Vec<String> {
    words(&[
        "diet",
        "food",
        "eat",
        "drink",
        "fluids",
        "breakfast",
        "lunch",
        "dinner",
        "meals",
    ])
}

fn default_procedure() -> Vec<String> {
    words(&[
        "procedure",
        "colonoscopy",
        "hospital",
        "appointment",
        "admission",
    ])
}

fn default_prep_products() -> Vec<String> {
    words(&[
        "plenvu", "glycoprep", "moviprep", "picolax", "picoprep", "prepkit",
    ])
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_prep: default_prep(),
            output_file: default_output_file(),
            keywords: KeywordsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            medication: default_medication(),
            bowelprep: default_bowelprep(),
            diet: default_diet(),
            procedure: default_procedure(),
            prep_products: default_prep_products(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("prepcsv");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from an explicit path, or from the default
    /// location. A missing default file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path()?;
                if !config_path.exists() {
                    tracing::debug!(
                        "No config at {}, using defaults",
                        config_path.display()
                    );
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    /// Load configuration from a file that must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config.expand_env_vars();

        Ok(config)
    }

    /// Write configuration to the given path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file at {}", path.display()))?;
        Ok(())
    }

    /// Expand environment variables in path-like values
    fn expand_env_vars(&mut self) {
        self.output_file = expand_env_var(&self.output_file);
        self.server.upload_dir = expand_env_var(&self.server.upload_dir);
        self.server.output_dir = expand_env_var(&self.server.output_dir);
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var_braces() {
        // SAFETY: test is single-threaded
        unsafe { std::env::set_var("PREPCSV_TEST_VAR_A", "/srv/uploads") };
        assert_eq!(expand_env_var("${PREPCSV_TEST_VAR_A}"), "/srv/uploads");
        unsafe { std::env::remove_var("PREPCSV_TEST_VAR_A") };
    }

    #[test]
    fn test_expand_env_var_dollar() {
        unsafe { std::env::set_var("PREPCSV_TEST_VAR_B", "out") };
        assert_eq!(expand_env_var("$PREPCSV_TEST_VAR_B"), "out");
        unsafe { std::env::remove_var("PREPCSV_TEST_VAR_B") };
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("output.csv"), "output.csv");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_prep, "plenvu");
        assert_eq!(config.output_file, "output.csv");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.keywords.medication.len(), 7);
        assert_eq!(config.keywords.bowelprep.len(), 8);
        assert_eq!(config.keywords.diet.len(), 9);
        assert_eq!(config.keywords.procedure.len(), 5);
        assert_eq!(config.keywords.prep_products.len(), 6);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_prep, "plenvu");
        assert_eq!(config.server.upload_dir, "uploads");
        assert_eq!(config.keywords.diet, default_diet());
    }

    #[test]
    fn test_partial_override() {
        let toml_str = r#"
            default_prep = "moviprep"

            [keywords]
            diet = ["jelly", "broth"]

            [server]
            port = 8081
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_prep, "moviprep");
        assert_eq!(config.keywords.diet, vec!["jelly", "broth"]);
        assert_eq!(config.keywords.medication, default_medication());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.output_dir, "output");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.default_prep = "picolax".into();
        config.server.port = 4000;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.default_prep, "picolax");
        assert_eq!(loaded.server.port, 4000);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
