//! Engine configuration.
//!
//! Handles loading, validating, and merging `media-links.toml`. Stock
//! defaults are the base layer; a config file only needs the keys it wants
//! to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [validator]
//! min_dimension_px = 150     # Shorter edge below this → placeholder
//! min_size_bytes = 20480     # Re-encoded size below this → placeholder
//! timeout_ms = 5000          # Per-URL decode budget before giving up (unknown)
//! reencode_quality = 80      # JPEG quality used for the size estimate
//! placeholder_patterns = ["/now_printing/", "now_printing", ".svg", ...]
//!
//! [links]
//! reserved_template_slots = 50   # Template tag slots; also the estimate for a template
//!
//! [http]
//! connect_timeout_ms = 3000
//! read_timeout_ms = 5000
//! max_body_bytes = 20971520
//! user_agent = "media-links/<version>"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::links::DEFAULT_RESERVED_TEMPLATE_SLOTS;
use crate::validation::heuristics::{DEFAULT_MIN_DIMENSION_PX, DEFAULT_MIN_SIZE_BYTES, Thresholds};
use crate::validation::rules::DEFAULT_PLACEHOLDER_PATTERNS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Name of the config file looked up in a directory.
pub const CONFIG_FILENAME: &str = "media-links.toml";

pub const DEFAULT_REENCODE_QUALITY: u8 = 80;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Placeholder detection settings.
    pub validator: ValidatorConfig,
    /// Combined link field and tag numbering.
    pub links: LinksConfig,
    /// Production image source.
    pub http: HttpConfig,
}

impl EngineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.validator;
        if v.min_dimension_px == 0 {
            return Err(ConfigError::Validation(
                "validator.min_dimension_px must be non-zero".into(),
            ));
        }
        if v.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "validator.timeout_ms must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&v.reencode_quality) {
            return Err(ConfigError::Validation(
                "validator.reencode_quality must be 1-100".into(),
            ));
        }
        if v.placeholder_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "validator.placeholder_patterns must not contain empty strings".into(),
            ));
        }
        if self.links.reserved_template_slots == 0 {
            return Err(ConfigError::Validation(
                "links.reserved_template_slots must be non-zero".into(),
            ));
        }
        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "http.max_body_bytes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Placeholder detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Images whose shorter edge is below this are placeholders.
    pub min_dimension_px: u32,
    /// Images whose re-encoded size is below this are placeholders.
    pub min_size_bytes: u64,
    /// Per-URL budget for fetch + decode + estimate.
    pub timeout_ms: u64,
    /// JPEG quality used when re-encoding to estimate size.
    pub reencode_quality: u8,
    /// Lowercase substrings that mark a URL as a placeholder outright.
    pub placeholder_patterns: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_dimension_px: DEFAULT_MIN_DIMENSION_PX,
            min_size_bytes: DEFAULT_MIN_SIZE_BYTES,
            timeout_ms: 5_000,
            reencode_quality: DEFAULT_REENCODE_QUALITY,
            placeholder_patterns: DEFAULT_PLACEHOLDER_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ValidatorConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_dimension_px: self.min_dimension_px,
            min_size_bytes: self.min_size_bytes,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Tag slots reserved for template positions. Manual tags number from
    /// here, and the estimator counts a template as this many images.
    pub reserved_template_slots: usize,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            reserved_template_slots: DEFAULT_RESERVED_TEMPLATE_SLOTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Responses are truncated past this many bytes.
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 3_000,
            read_timeout_ms: 5_000,
            max_body_bytes: 20 * 1024 * 1024,
            user_agent: format!("media-links/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// Loading: stock defaults, overlaid with the directory's media-links.toml.

/// [`EngineConfig::default`] as a TOML table, the base every overlay lands on.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EngineConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base`. Sections such as `[validator]` combine key by
/// key; any other value is replaced outright, so a file's
/// `placeholder_patterns` list supersedes the built-in denylist instead of
/// extending it.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                let combined = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, combined);
            }
            toml::Value::Table(table)
        }
        (_, replacement) => replacement,
    }
}

/// Read the directory's `media-links.toml` without interpreting it.
/// A directory with no such file yields `Ok(None)`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let text = match fs::read_to_string(dir.join(CONFIG_FILENAME)) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Turn base plus optional overlay into a checked [`EngineConfig`]. Unknown
/// keys and out-of-range thresholds are rejected here.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EngineConfig, ConfigError> {
    let value = match overlay {
        Some(layer) => merge_toml(base, layer),
        None => base,
    };
    let config: EngineConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Engine settings for `dir`: built-in defaults with the directory's file,
/// if any, applied on top.
pub fn load_config(dir: &Path) -> Result<EngineConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(dir = %dir.display(), "config loaded");
    Ok(config)
}

/// Returns a fully-commented stock `media-links.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# media-links configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Placeholder detection
# ---------------------------------------------------------------------------
[validator]
# Images whose shorter edge is below this many pixels are placeholders.
min_dimension_px = 150

# Images that re-encode to fewer bytes than this are placeholders.
min_size_bytes = 20480

# Per-URL budget (fetch + decode + size estimate). On expiry the verdict is
# "unknown", never "placeholder".
timeout_ms = 5000

# JPEG quality used when re-encoding to estimate size (1-100).
reencode_quality = 80

# URLs containing any of these (case-insensitive) are placeholders without
# being fetched. Setting this replaces the whole list.
placeholder_patterns = [
    "/now_printing/",
    "now_printing",
    "nowprinting",
    ".svg",
    "noimage",
    "no_image",
    "no-image",
    "notfound",
    "not_found",
    "not-found",
    "image_not_available",
]

# ---------------------------------------------------------------------------
# Combined link field
# ---------------------------------------------------------------------------
[links]
# Tag slots reserved for template positions. Manual-link tags are numbered
# from here, and a template counts as this many images in estimates. This is
# a numbering convention, not a cap on gallery size.
reserved_template_slots = 50

# ---------------------------------------------------------------------------
# HTTP image source
# ---------------------------------------------------------------------------
[http]
connect_timeout_ms = 3000
read_timeout_ms = 5000
# Responses are truncated past this many bytes (20 MiB).
max_body_bytes = 20971520
# user_agent = "media-links/<version>"
"##
}
