//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables `verdict.toml`
//! - `yaml-config`: enables `verdict.yaml` / `verdict.yml`
//!
//! Both features can be enabled simultaneously; if so, both file formats are
//! searched and loaded, TOML first.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Main config file (`verdict.toml`)
//! 3. Profile-specific config file (`verdict.{profile}.toml`)
//! 4. Environment variables (`VERDICT_*`)
//! 5. Programmatic overrides ([`ConfigLoader::set`], [`ConfigLoader::merge`])
//!
//! The loaded configuration is validated with
//! [`validate_config`](super::validate_config) before it is returned.
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `VERDICT_` prefix with `__` as
//! separator:
//!
//! - `VERDICT_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `VERDICT_PIPELINE__INCLUDE_VALUES=true` → `pipeline.include_values = true`
//!
//! `VERDICT_PROFILE` selects the profile and is not part of the configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use verdict_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .set("pipeline.include_values", false)
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::schema::VerdictConfig;
use super::validation::validate_config;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable prefix.
const ENV_PREFIX: &str = "VERDICT_";

/// Environment variable that selects the profile.
const PROFILE_VAR: &str = "VERDICT_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Test profile, for automated test runs.
    Test,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; `prod` and `dev` are accepted as aliases.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            "test" => Self::Test,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `VERDICT_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides, merged last.
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    ///
    /// Without explicit search paths, the current directory and the user
    /// config directory (`~/.config/verdict` on Linux) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load instead of searching.
    ///
    /// A profile-specific sibling (`<stem>.{profile}.<ext>`) is loaded on top
    /// when it exists.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Overrides a single value by dotted key, e.g. `"logging.level"`.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Overrides every value with the ones in `config`.
    pub fn merge(mut self, config: VerdictConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Returns the active profile.
    pub fn active_profile(&self) -> &Profile {
        &self.profile
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<VerdictConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: VerdictConfig = figment.extract().map_err(Box::new)?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(VerdictConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, path)?;

            let profile_path = self.profile_variant(path);
            if profile_path.exists() {
                debug!(path = %profile_path.display(), "Loading profile-specific config");
                figment = Self::merge_config_file(figment, &profile_path)?;
            }
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    ///
    /// Only extensions enabled via feature flags are accepted.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// `dir/verdict.toml` → `dir/verdict.{profile}.toml`.
    fn profile_variant(&self, path: &Path) -> PathBuf {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{}.{ext}", self.profile),
            None => format!("{stem}.{}", self.profile),
        };
        path.with_file_name(name)
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("verdict"));
        }
        paths
    }

    /// Searches one file format.
    ///
    /// The first search path holding a base or profile-specific file wins;
    /// the base file is merged first, then the profile file on top.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let base_path = search_path.join(base_name);
                let profile_path = self.profile_variant(&base_path);
                let (has_base, has_profile) = (base_path.exists(), profile_path.exists());
                if !has_base && !has_profile {
                    continue;
                }
                if has_base {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = merge_fn(figment, &base_path);
                }
                if has_profile {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }
                return (figment, true);
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files from search paths.
    fn load_config_files(&self, figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        #[allow(unused_mut)]
        let (mut figment, mut found) = (figment, false);

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["verdict.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["verdict.yaml", "verdict.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            debug!(
                paths = ?search_paths,
                "No configuration file found, using defaults"
            );
        }
        figment
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<VerdictConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file, plus environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<VerdictConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;
    use crate::config::schema::{LogLevel, LogOutput};

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config, VerdictConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }

    #[test]
    fn test_test_profile_loads_its_own_file() {
        assert_eq!(Profile::parse("Test"), Profile::Test);
        assert_eq!(Profile::Test.to_string(), "test");

        Jail::expect_with(|jail| {
            jail.create_file("verdict.toml", "[logging]\nlevel = \"warn\"\n")?;
            jail.create_file("verdict.test.toml", "[logging]\nlevel = \"error\"\n")?;

            let loader = ConfigLoader::new()
                .profile("test")
                .search_path(jail.directory())
                .without_env();
            assert_eq!(loader.active_profile(), &Profile::Test);

            let config = loader.load().unwrap();
            assert_eq!(config.logging.level, LogLevel::Error);
            Ok(())
        });
    }

    #[test]
    fn test_profile_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env(PROFILE_VAR, "production");
            assert_eq!(Profile::from_env(), Profile::Production);
            Ok(())
        });
    }

    #[test]
    fn test_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "verdict.toml",
                r#"
                [logging]
                level = "warn"
                thread_ids = true

                [pipeline]
                include_values = true
                "#,
            )?;
            jail.create_file(
                "verdict.production.toml",
                r#"
                [logging]
                level = "error"
                "#,
            )?;
            jail.set_env("VERDICT_PIPELINE__LOG_SUCCESS", "false");
            jail.set_env("VERDICT_PROFILE", "production");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .set("pipeline.success_level", "info")
                .load()
                .unwrap();

            assert_eq!(config.logging.level, LogLevel::Error);
            assert!(config.logging.thread_ids);
            assert!(config.pipeline.include_values);
            assert!(!config.pipeline.log_success);
            assert_eq!(config.pipeline.success_level, LogLevel::Info);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("verdict.toml", "[logging]\nlevel = \"warn\"\n")?;
            jail.set_env("VERDICT_LOGGING__LEVEL", "trace");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap();
            assert_eq!(config.logging.level, LogLevel::Trace);

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("app.toml", "[logging]\noutput = \"stderr\"\n")?;

            let config = ConfigLoader::new()
                .file(jail.directory().join("app.toml"))
                .without_env()
                .load()
                .unwrap();
            assert_eq!(config.logging.output, LogOutput::Stderr);

            let missing = ConfigLoader::new()
                .file(jail.directory().join("nope.toml"))
                .load();
            assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

            jail.create_file("app.ini", "")?;
            let unsupported = ConfigLoader::new()
                .file(jail.directory().join("app.ini"))
                .load();
            match unsupported {
                Err(ConfigError::UnsupportedFormat(ext)) => assert_eq!(ext, "ini"),
                other => panic!("expected an unsupported format error, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("verdict.toml", "[logging]\noutput = \"file\"\n")?;

            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Invalid(_))));

            jail.create_file("verdict.toml", "[logging]\nlevel = \"loud\"\n")?;
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }
}
