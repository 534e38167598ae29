//! Configuration file handling for fintrack.
//!
//! The configuration file is stored at `$FINTRACK_HOME/config.json` and holds the address of the
//! transaction store along with optional statement settings.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "fintrack";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINTRACK_HOME` and from there it loads `$FINTRACK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/fintrack`
    /// - `api_url` - The base URL of the transaction store, e.g. `http://localhost:8000/api`
    /// - `logo_path` - An optional image shown in the statement header
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        logo_path: Option<&Path>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the fintrack home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            logo_path: logo_path.map(Path::to_path_buf),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The fintrack home directory is missing, run `fintrack init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn api_url(&self) -> &str {
        &self.config_file.api_url
    }

    /// The statement logo, resolved against the home directory when relative.
    pub fn logo_path(&self) -> Option<PathBuf> {
        self.config_file
            .logo_path
            .as_ref()
            .map(|p| self.resolve(p))
    }

    /// Where statements are written. Defaults to the home directory.
    pub fn output_dir(&self) -> PathBuf {
        match &self.config_file.output_dir {
            Some(p) => self.resolve(p),
            None => self.root.clone(),
        }
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            return p.to_path_buf();
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fintrack",
///   "config_version": 1,
///   "api_url": "http://localhost:8000/api",
///   "logo_path": "logo.png",
///   "output_dir": "statements"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fintrack"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the transaction store
    api_url: String,

    /// Image shown in the statement header (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo_path: Option<PathBuf>,

    /// Directory that statements are written to (optional, relative to the home directory or
    /// absolute). Defaults to the home directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            logo_path: None,
            output_dir: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it is not a fintrack config
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            !config.api_url.is_empty(),
            "The config file at {} has no api_url",
            path.display()
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("fintrack_home");

        let config = Config::create(&home_dir, "http://localhost:8000/api", None)
            .await
            .unwrap();
        assert_eq!(config.api_url(), "http://localhost:8000/api");
        assert!(config.config_path().is_file());
        assert_eq!(config.logo_path(), None);
        assert_eq!(config.output_dir(), config.root());

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.api_url(), config.api_url());
        assert_eq!(loaded.root(), config.root());
    }

    #[tokio::test]
    async fn test_relative_paths_resolve_against_home() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(
            dir.path(),
            "http://localhost:8000/api",
            Some(Path::new("logo.png")),
        )
        .await
        .unwrap();
        assert_eq!(config.logo_path(), Some(config.root().join("logo.png")));

        let absolute = dir.path().join("elsewhere.png");
        let config = Config::create(dir.path(), "http://localhost:8000/api", Some(absolute.as_path()))
            .await
            .unwrap();
        assert_eq!(config.logo_path(), Some(absolute));
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
        // The directory exists but there is no config file.
        assert!(Config::load(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_rejects_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(
            &path,
            r#"{"app_name":"tiller","config_version":1,"api_url":"http://x"}"#,
        )
        .await
        .unwrap();
        assert!(Config::load(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_JSON);
        let original = ConfigFile {
            api_url: "http://localhost:8000/api".to_string(),
            logo_path: Some(PathBuf::from("logo.png")),
            output_dir: Some(PathBuf::from("statements")),
            ..ConfigFile::default()
        };
        original.save(&config_path).await.unwrap();
        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("logo_path"));
        assert!(!json.contains("output_dir"));
    }
}
