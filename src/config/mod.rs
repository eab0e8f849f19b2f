//! Configuration management.
//!
//! Precedence, lowest first: built-in defaults, config file, environment
//! variables, CLI flags (applied by the binary).
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `DOCREG_CONFIG_PATH` | path | unset | Config file to load |
//! | `DOCREG_HAMMING_THRESHOLD` | u32 | `8` | Max differing fingerprint bits |
//! | `DOCREG_TITLE_THRESHOLD` | f64 | `80` | Min title similarity (0–100) |
//! | `DOCREG_WORKERS` | usize | CPU count | Scanner worker threads |
//! | `DOCREG_DISABLE_SIMHASH` | bool | `false` | Turn off similarity hashing |
//! | `DOCREG_DISABLE_FUZZY` | bool | `false` | Turn off title matching |

mod features;

pub use features::FeatureFlags;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local config file.
pub const CONFIG_FILE_NAME: &str = "docreg.toml";

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "DOCREG_CONFIG_PATH";

/// Thresholds for the two-stage near-duplicate detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionConfig {
    /// Maximum Hamming distance (out of 64 bits) that passes the prefilter.
    pub hamming_threshold: u32,
    /// Minimum title similarity (0–100) that confirms a match.
    pub title_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            hamming_threshold: 8,
            title_threshold: 80.0,
        }
    }
}

/// Main configuration for docreg.
#[derive(Debug, Clone, Serialize)]
pub struct DocregConfig {
    /// Root of the documentation tree.
    pub docs_root: PathBuf,
    /// Registry output path; `None` means `<docs_root>/index/registry.json`.
    pub registry_path: Option<PathBuf>,
    /// Directory name of the staging inbox.
    pub staging_dir: String,
    /// Path fragments excluded from the walk.
    pub exclude_patterns: Vec<String>,
    /// Scanner worker threads.
    pub workers: usize,
    /// Near-duplicate thresholds.
    pub detection: DetectionConfig,
    /// Optional capabilities.
    pub features: FeatureFlags,
}

impl Default for DocregConfig {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("docs"),
            registry_path: None,
            staging_dir: "_inbox".to_string(),
            exclude_patterns: default_excludes(),
            workers: default_workers(),
            detection: DetectionConfig::default(),
            features: FeatureFlags::default(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    ["/archive/", "/index/", "/node_modules/", "/.git/"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Documentation root.
    pub docs_root: Option<String>,
    /// Registry output path.
    pub registry_path: Option<String>,
    /// Staging directory name.
    pub staging_dir: Option<String>,
    /// Exclude fragments (replaces the defaults).
    pub exclude_patterns: Option<Vec<String>>,
    /// Worker threads.
    pub workers: Option<usize>,
    /// Detection section.
    pub detection: Option<ConfigFileDetection>,
    /// Features section.
    pub features: Option<ConfigFileFeatures>,
}

/// Detection section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileDetection {
    /// Hamming threshold.
    pub hamming_threshold: Option<u32>,
    /// Title similarity threshold.
    pub title_threshold: Option<f64>,
}

/// Features section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileFeatures {
    /// Similarity hashing.
    pub similarity_hash: Option<bool>,
    /// Fuzzy title matching.
    pub fuzzy_matching: Option<bool>,
}

impl DocregConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the configuration the way the binary does.
    ///
    /// Uses `explicit` when given, else `DOCREG_CONFIG_PATH`, else
    /// `docreg.toml` in the working directory, else the platform config dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected file cannot be read or parsed.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, &process_env)
    }

    fn resolve_with(
        explicit: Option<&Path>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file_with(path, lookup);
        }
        match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => {
                Self::load_from_file_with(Path::new(path.trim()), lookup)
            },
            _ => Self::load_default_with(lookup),
        }
    }

    /// Loads configuration from a file path, then applies env overrides.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_from_file_with(path, &process_env)
    }

    fn load_from_file_with(
        path: &Path,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_config_file", e))?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::operation("parse_config_file", format!("{}: {e}", path.display()))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::from_config_file(file, base).with_overrides_from(lookup))
    }

    /// Checks `docreg.toml` in the working directory, then the platform config
    /// dir (`~/.config/docreg/config.toml` on Linux). Falls back to defaults
    /// when neither exists; a file that exists but does not parse is an error.
    fn load_default_with(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from_file_with(&local, lookup);
        }

        if let Some(base_dirs) = directories::BaseDirs::new() {
            let platform = base_dirs.config_dir().join("docreg").join("config.toml");
            if platform.exists() {
                return Self::load_from_file_with(&platform, lookup);
            }
        }

        Ok(Self::default().with_overrides_from(lookup))
    }

    /// Converts a `ConfigFile` to `DocregConfig`.
    fn from_config_file(file: ConfigFile, base: &Path) -> Self {
        let mut config = Self::default();

        if let Some(root) = file.docs_root {
            config.docs_root = base.join(root);
        }
        if let Some(registry) = file.registry_path {
            config.registry_path = Some(base.join(registry));
        }
        if let Some(staging) = file.staging_dir {
            config.staging_dir = staging;
        }
        if let Some(patterns) = file.exclude_patterns {
            config.exclude_patterns = patterns;
        }
        if let Some(workers) = file.workers {
            config.workers = workers.max(1);
        }
        if let Some(detection) = file.detection {
            if let Some(v) = detection.hamming_threshold {
                config.detection.hamming_threshold = v;
            }
            if let Some(v) = detection.title_threshold {
                config.detection.title_threshold = v;
            }
        }
        if let Some(features) = file.features {
            if let Some(v) = features.similarity_hash {
                config.features.similarity_hash = v;
            }
            if let Some(v) = features.fuzzy_matching {
                config.features.fuzzy_matching = v;
            }
        }

        config
    }

    /// Applies `DOCREG_*` overrides read through `lookup`, usually the
    /// process environment. Unparseable values are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = parse_var(lookup, "DOCREG_HAMMING_THRESHOLD") {
            self.detection.hamming_threshold = v;
        }
        if let Some(v) = parse_var(lookup, "DOCREG_TITLE_THRESHOLD") {
            self.detection.title_threshold = v;
        }
        if let Some(v) = parse_var::<usize>(lookup, "DOCREG_WORKERS") {
            self.workers = v.max(1);
        }
        if flag_var(lookup, "DOCREG_DISABLE_SIMHASH") {
            self.features.similarity_hash = false;
        }
        if flag_var(lookup, "DOCREG_DISABLE_FUZZY") {
            self.features.fuzzy_matching = false;
        }
        self
    }

    /// Sets the documentation root.
    #[must_use]
    pub fn with_docs_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.docs_root = path.into();
        self
    }

    /// Sets the registry output path.
    #[must_use]
    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = Some(path.into());
        self
    }

    /// Sets the feature flags.
    #[must_use]
    pub const fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Sets the scanner worker count (minimum 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Effective registry output path.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(|| self.docs_root.join("index").join("registry.json"))
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.registry_path = Some(self.registry_path());
        toml::to_string(&shown).map_err(|e| Error::operation("serialize_config", e))
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_var<T: std::str::FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn flag_var(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key).is_some_and(|v| {
        let v = v.trim().to_lowercase();
        !v.is_empty() && v != "0" && v != "false"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn overridden(pairs: &[(&str, &str)]) -> DocregConfig {
        DocregConfig::default()
            .with_workers(4)
            .with_overrides_from(&vars(pairs))
    }

    #[test_case("DOCREG_HAMMING_THRESHOLD", "5" ; "hamming threshold")]
    #[test_case("DOCREG_HAMMING_THRESHOLD", " 12 " ; "hamming threshold padded")]
    fn test_hamming_override(key: &str, value: &str) {
        let config = overridden(&[(key, value)]);
        assert_eq!(config.detection.hamming_threshold, value.trim().parse::<u32>().unwrap());
    }

    #[test_case("62.5", 62.5 ; "fractional")]
    #[test_case("90", 90.0 ; "integral")]
    fn test_title_override(value: &str, expected: f64) {
        let config = overridden(&[("DOCREG_TITLE_THRESHOLD", value)]);
        assert!((config.detection.title_threshold - expected).abs() < f64::EPSILON);
    }

    #[test_case("3", 3 ; "explicit")]
    #[test_case("0", 1 ; "clamped to one")]
    fn test_workers_override(value: &str, expected: usize) {
        assert_eq!(overridden(&[("DOCREG_WORKERS", value)]).workers, expected);
    }

    #[test_case("DOCREG_HAMMING_THRESHOLD", "eight" ; "hamming not a number")]
    #[test_case("DOCREG_HAMMING_THRESHOLD", "-1" ; "hamming negative")]
    #[test_case("DOCREG_TITLE_THRESHOLD", "high" ; "title not a number")]
    #[test_case("DOCREG_WORKERS", "many" ; "workers not a number")]
    #[test_case("DOCREG_DISABLE_SIMHASH", "" ; "empty flag")]
    fn test_unparseable_values_ignored(key: &str, value: &str) {
        let config = overridden(&[(key, value)]);
        let baseline = DocregConfig::default().with_workers(4);
        assert_eq!(config.detection, baseline.detection);
        assert_eq!(config.workers, baseline.workers);
        assert_eq!(config.features, baseline.features);
    }

    #[test_case("DOCREG_DISABLE_SIMHASH", "1", false, true ; "simhash one")]
    #[test_case("DOCREG_DISABLE_SIMHASH", "TRUE", false, true ; "simhash true")]
    #[test_case("DOCREG_DISABLE_SIMHASH", "false", true, true ; "simhash false keeps it")]
    #[test_case("DOCREG_DISABLE_FUZZY", "yes", true, false ; "fuzzy yes")]
    #[test_case("DOCREG_DISABLE_FUZZY", "0", true, true ; "fuzzy zero keeps it")]
    fn test_feature_flag_overrides(key: &str, value: &str, simhash: bool, fuzzy: bool) {
        let features = overridden(&[(key, value)]).features;
        assert_eq!(features.similarity_hash, simhash);
        assert_eq!(features.fuzzy_matching, fuzzy);
        assert_eq!(features.duplicate_detection(), simhash && fuzzy);
    }

    #[test]
    fn test_precedence_file_then_env_then_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docreg.toml");
        std::fs::write(
            &path,
            "docs_root = \"from-file\"\nworkers = 2\n\n[detection]\nhamming_threshold = 6\ntitle_threshold = 70.0\n",
        )
        .unwrap();

        let env = vars(&[("DOCREG_HAMMING_THRESHOLD", "4")]);
        let config = DocregConfig::load_from_file_with(&path, &env)
            .unwrap()
            .with_docs_root("from-cli");

        assert_eq!(config.detection.hamming_threshold, 4);
        assert!((config.detection.title_threshold - 70.0).abs() < f64::EPSILON);
        assert_eq!(config.workers, 2);
        assert_eq!(config.docs_root, PathBuf::from("from-cli"));
    }

    #[test]
    fn test_resolve_prefers_explicit_then_env_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let from_env = dir.path().join("env.toml");
        std::fs::write(&explicit, "staging_dir = \"explicit\"\n").unwrap();
        std::fs::write(&from_env, "staging_dir = \"env\"\n").unwrap();

        let env_path = from_env.to_string_lossy().into_owned();
        let env = vars(&[(CONFIG_PATH_ENV, env_path.as_str())]);

        let config = DocregConfig::resolve_with(Some(explicit.as_path()), &env).unwrap();
        assert_eq!(config.staging_dir, "explicit");

        let config = DocregConfig::resolve_with(None, &env).unwrap();
        assert_eq!(config.staging_dir, "env");
    }

    #[test]
    fn test_resolve_env_path_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml").to_string_lossy().into_owned();
        let env = vars(&[(CONFIG_PATH_ENV, missing.as_str())]);
        assert!(DocregConfig::resolve_with(None, &env).is_err());
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docreg.toml");
        std::fs::write(&path, "docroot = \"typo\"\n").unwrap();

        let err = DocregConfig::load_from_file_with(&path, &vars(&[])).unwrap_err();
        assert!(err.to_string().contains("docreg.toml"), "{err}");
    }

    #[test]
    fn test_defaults() {
        let config = DocregConfig::default();
        assert_eq!(config.docs_root, PathBuf::from("docs"));
        assert_eq!(config.staging_dir, "_inbox");
        assert_eq!(config.detection.hamming_threshold, 8);
        assert!((config.detection.title_threshold - 80.0).abs() < f64::EPSILON);
        assert!(config.features.duplicate_detection());
        assert!(config.workers >= 1);
        assert_eq!(
            config.registry_path(),
            PathBuf::from("docs").join("index").join("registry.json")
        );
    }

    #[test]
    fn test_from_config_file_resolves_relative_paths() {
        let file: ConfigFile = toml::from_str(
            r#"
            docs_root = "documentation"
            staging_dir = "incoming"
            exclude_patterns = ["/old/"]

            [detection]
            hamming_threshold = 6

            [features]
            fuzzy_matching = false
            "#,
        )
        .unwrap();

        let config = DocregConfig::from_config_file(file, Path::new("/repo"));
        assert_eq!(config.docs_root, PathBuf::from("/repo/documentation"));
        assert_eq!(config.staging_dir, "incoming");
        assert_eq!(config.exclude_patterns, vec!["/old/"]);
        assert_eq!(config.detection.hamming_threshold, 6);
        assert!(config.features.similarity_hash);
        assert!(!config.features.fuzzy_matching);
        assert!(!config.features.duplicate_detection());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let parsed: std::result::Result<ConfigFile, _> = toml::from_str("docroot = \"x\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_to_toml_includes_registry_path() {
        let rendered = DocregConfig::default().to_toml().unwrap();
        assert!(rendered.contains("registry_path"));
        assert!(rendered.contains("[detection]"));
        assert!(rendered.contains("hamming_threshold = 8"));
    }
}
