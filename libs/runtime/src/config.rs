use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core settings shared by every binary.
    pub core: CoreConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    pub home_dir: String, // will be normalized to absolute path
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/foodloop.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many rotated files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            // Empty => $HOME/.foodloop (%APPDATA%/.foodloop on Windows)
            home_dir: String::new(),
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "warn".to_string(),
            file: "logs/foodloop.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `core.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            core: CoreConfig::default(),
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // Example: APP__CORE__HOME_DIR=/tmp/foodloop maps to core.home_dir
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to parse yaml config {}", path.display()))?;

        normalize_home_dir_inplace(&mut config.core)
            .context("Failed to resolve core.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or create with default values.
    /// Also normalizes `core.home_dir` into an absolute path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.core)
                    .context("Failed to resolve core.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "info".to_string(),
                2 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }

    /// Absolute home directory (valid after `load_*`).
    pub fn home_dir(&self) -> PathBuf {
        PathBuf::from(&self.core.home_dir)
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;

    /// Best-effort: deserialize the module's config into `T`, fallback to `T::default()`
    /// if the section is missing.
    fn module_config<T: DeserializeOwned + Default>(&self, module_name: &str) -> Result<T>
    where
        Self: Sized,
    {
        match self.get_module_config(module_name) {
            Some(v) => serde_json::from_value::<T>(v.clone())
                .with_context(|| format!("invalid {module_name} config")),
            None => Ok(T::default()),
        }
    }
}

/// `ConfigProvider` backed by a loaded `AppConfig`.
#[derive(Debug, Clone)]
pub struct AppConfigProvider {
    config: AppConfig,
}

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.config.modules.get(module_name)
    }
}

const fn default_subdir() -> &'static str {
    ".foodloop"
}

/// Normalize `core.home_dir` using `resolve_home_dir` and store the absolute path back.
fn normalize_home_dir_inplace(core: &mut CoreConfig) -> Result<()> {
    // Treat empty string as "not provided" => None.
    let opt = if core.home_dir.trim().is_empty() {
        None
    } else {
        Some(core.home_dir.clone())
    };

    let resolved: PathBuf = resolve_home_dir(opt, default_subdir(), /*create*/ true)
        .context("home_dir normalization failed")?;

    core.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid module yaml {}", path.display()))?;
        let json = serde_json::to_value(val)?;
        bag.insert(name, json);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        // raw (not yet normalized)
        assert_eq!(config.core.home_dir, "");

        let logging = config.logging.as_ref().unwrap();
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "warn");
        assert_eq!(default_section.file, "logs/foodloop.log");

        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_load_layered_parses_sections() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("home");
        let cfg_path = tmp.path().join("cfg.yaml");

        let yaml = format!(
            r#"
core:
  home_dir: "{}"

logging:
  default:
    console_level: debug
    file: "logs/default.log"

modules:
  food_share:
    storage_key: "custom_posts"
"#,
            home.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(is_normalized_path(&config.core.home_dir));
        assert!(home.is_dir(), "home_dir must be created");

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file, "logs/default.log");

        assert_eq!(config.modules["food_share"]["storage_key"], "custom_posts");
    }

    #[test]
    fn test_minimal_yaml_config_leaves_optional_sections_empty() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            "core:\n  home_dir: \"{}\"\n",
            tmp.path().join("h").to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert!(config.logging.is_none());
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = AppConfig::load_layered("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_cli_verbose_levels_matrix() {
        for (verbose_level, expected) in [(0, "warn"), (1, "info"), (2, "debug"), (3, "trace")] {
            let mut config = AppConfig::default();
            let args = CliArgs {
                verbose: verbose_level,
                ..Default::default()
            };

            config.apply_cli_overrides(&args);

            let default_section = &config.logging.as_ref().unwrap()["default"];
            assert_eq!(default_section.console_level, expected);
        }
    }

    #[test]
    fn test_layered_config_loading_with_modules_dir() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("modules_dir.yaml");
        let modules_dir = tmp.path().join("modules");

        fs::create_dir_all(&modules_dir).unwrap();
        fs::write(
            modules_dir.join("food_share.yaml"),
            "storage_key: from_file\nmax_photos: 3\n",
        )
        .unwrap();

        let yaml = format!(
            r#"
core:
  home_dir: "{}"

modules_dir: "{}"

modules:
  other_module:
    key: "value"
"#,
            tmp.path().join("h").to_string_lossy().replace('\\', "/"),
            modules_dir.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(config.modules.contains_key("other_module"));
        let food_share = &config.modules["food_share"];
        assert_eq!(food_share["storage_key"], "from_file");
        assert_eq!(food_share["max_photos"], 3);
    }

    #[test]
    fn test_provider_module_config_defaults_when_missing() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct Demo {
            #[serde(default)]
            value: u32,
        }

        let mut config = AppConfig::default();
        config
            .modules
            .insert("demo".into(), serde_json::json!({ "value": 7 }));
        let provider = AppConfigProvider::new(config);

        let present: Demo = provider.module_config("demo").unwrap();
        assert_eq!(present.value, 7);
        let missing: Demo = provider.module_config("absent").unwrap();
        assert_eq!(missing, Demo::default());
    }

    #[test]
    fn test_to_yaml_roundtrip_basic() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("core:"));
        assert!(yaml.contains("logging:"));

        let roundtrip: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(roundtrip.core.home_dir, config.core.home_dir);
    }
}
