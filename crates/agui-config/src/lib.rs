// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading and validation for the AG-UI event protocol
//! engine: [`EngineConfig`] seeds a [`agui_validate::ValidatorConfig`]'s
//! level, a [`agui_sequence::SequenceTracker`]'s ring-buffer size and
//! compliance-age thresholds, and the diagnostics formatter's default
//! render target (spec §10.2). This crate only seeds defaults — it never
//! overrides an explicit constructor argument a caller supplies, so the
//! core crates remain fully usable without it.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve
/// attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `max_history_size` is set low enough that history-dependent
    /// queries (e.g. `events_by_run_id` over a long-running run) may
    /// silently miss events.
    SmallHistorySize {
        /// The configured size.
        size: u64,
    },
    /// `orphan_age_warning_secs` is larger than
    /// `incomplete_run_age_error_secs`, which is legal but almost
    /// certainly not intended.
    OrphanWindowExceedsRunWindow {
        /// Configured orphan warning window, in seconds.
        orphan_secs: u64,
        /// Configured incomplete-run error window, in seconds.
        run_secs: u64,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::SmallHistorySize { size } => {
                write!(f, "max_history_size={size} is unusually small for a ring buffer")
            }
            ConfigWarning::OrphanWindowExceedsRunWindow { orphan_secs, run_secs } => {
                write!(
                    f,
                    "orphan_age_warning_secs={orphan_secs} exceeds incomplete_run_age_error_secs={run_secs}"
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Default validation strictness when a caller doesn't specify one
/// explicitly (spec §4.4's `level`).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValidationLevel {
    /// Requires timestamps and runs every default rule.
    #[default]
    Strict,
    /// Relaxes ID-presence and timestamp requirements.
    Permissive,
}

/// Default rendering target for diagnostics reports (spec §4.7).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pretty-printed JSON.
    Json,
    /// Plain, unstyled text.
    #[default]
    Text,
    /// GitHub-flavored markdown.
    Markdown,
}

/// Top-level runtime configuration for the AG-UI event protocol engine.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Seeds `ValidatorConfig::level` when a caller doesn't specify one
    /// explicitly.
    pub default_validation_level: DefaultValidationLevel,

    /// Seeds a [`agui_sequence::SequenceTracker`]'s ring buffer bound
    /// (spec §4.6 default: 10,000).
    pub max_history_size: u64,

    /// Seeds the compliance report's orphan-age warning threshold, in
    /// seconds (spec §4.6 default: 1 hour).
    pub orphan_age_warning_secs: u64,

    /// Seeds the compliance report's incomplete-run-age error
    /// threshold, in seconds (spec §4.6 default: 24 hours).
    pub incomplete_run_age_error_secs: u64,

    /// Default diagnostics rendering target.
    pub report_format: ReportFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_validation_level: DefaultValidationLevel::Strict,
            max_history_size: 10_000,
            orphan_age_warning_secs: 60 * 60,
            incomplete_run_age_error_secs: 24 * 60 * 60,
            report_format: ReportFormat::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Below this, a ring buffer is large enough to be legal but likely to
/// surprise a caller relying on history queries.
const SMALL_HISTORY_THRESHOLD: u64 = 16;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load an [`EngineConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`EngineConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => EngineConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML string into an [`EngineConfig`].
pub fn parse_toml(content: &str) -> Result<EngineConfig, ConfigError> {
    toml::from_str::<EngineConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `AGUI_VALIDATION_LEVEL` (`strict` | `permissive`)
/// - `AGUI_MAX_HISTORY_SIZE` (unsigned integer)
/// - `AGUI_REPORT_FORMAT` (`json` | `text` | `markdown`)
pub fn apply_env_overrides(config: &mut EngineConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("AGUI_VALIDATION_LEVEL") {
        config.default_validation_level = match val.to_ascii_lowercase().as_str() {
            "strict" => DefaultValidationLevel::Strict,
            "permissive" => DefaultValidationLevel::Permissive,
            other => {
                return Err(ConfigError::ValidationError {
                    reasons: vec![format!(
                        "AGUI_VALIDATION_LEVEL={other:?} is not 'strict' or 'permissive'"
                    )],
                });
            }
        };
    }
    if let Ok(val) = std::env::var("AGUI_MAX_HISTORY_SIZE") {
        config.max_history_size = val.parse().map_err(|_| ConfigError::ValidationError {
            reasons: vec![format!("AGUI_MAX_HISTORY_SIZE={val:?} is not a valid integer")],
        })?;
    }
    if let Ok(val) = std::env::var("AGUI_REPORT_FORMAT") {
        config.report_format = match val.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            "text" => ReportFormat::Text,
            "markdown" => ReportFormat::Markdown,
            other => {
                return Err(ConfigError::ValidationError {
                    reasons: vec![format!(
                        "AGUI_REPORT_FORMAT={other:?} is not 'json', 'text', or 'markdown'"
                    )],
                });
            }
        };
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (a zero history size) are returned as a
/// [`ConfigError::ValidationError`]; soft issues come back as warnings.
pub fn validate_config(config: &EngineConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if config.max_history_size == 0 {
        errors.push("max_history_size must be at least 1".into());
    } else if config.max_history_size < SMALL_HISTORY_THRESHOLD {
        warnings.push(ConfigWarning::SmallHistorySize {
            size: config.max_history_size,
        });
    }

    if config.orphan_age_warning_secs > config.incomplete_run_age_error_secs {
        warnings.push(ConfigWarning::OrphanWindowExceedsRunWindow {
            orphan_secs: config.orphan_age_warning_secs,
            run_secs: config.incomplete_run_age_error_secs,
        });
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_sensible_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_history_size, 10_000);
        assert_eq!(cfg.default_validation_level, DefaultValidationLevel::Strict);
        assert_eq!(cfg.report_format, ReportFormat::Text);
    }

    #[test]
    fn default_config_is_valid_with_no_warnings() {
        let cfg = EngineConfig::default();
        let warnings = validate_config(&cfg).expect("default config should be valid");
        assert!(warnings.is_empty());
    }

    #[test]
    fn parse_valid_toml_string() {
        let toml = r#"
            default_validation_level = "permissive"
            max_history_size = 500
            report_format = "markdown"
        "#;
        let cfg = parse_toml(toml).unwrap();
        assert_eq!(cfg.default_validation_level, DefaultValidationLevel::Permissive);
        assert_eq!(cfg.max_history_size, 500);
        assert_eq!(cfg.report_format, ReportFormat::Markdown);
    }

    #[test]
    fn parse_invalid_toml_gives_parse_error() {
        let err = parse_toml("this is [not valid toml =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn empty_string_toml_parses_to_defaults() {
        let cfg = parse_toml("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn validation_catches_zero_history_size() {
        let cfg = EngineConfig {
            max_history_size: 0,
            ..Default::default()
        };
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn small_history_size_produces_warning_not_error() {
        let cfg = EngineConfig {
            max_history_size: 4,
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(warnings.iter().any(|w| matches!(w, ConfigWarning::SmallHistorySize { .. })));
    }

    #[test]
    fn inverted_age_windows_produce_warning() {
        let cfg = EngineConfig {
            orphan_age_warning_secs: 100,
            incomplete_run_age_error_secs: 10,
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ConfigWarning::OrphanWindowExceedsRunWindow { .. })));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agui.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "max_history_size = 42\nreport_format = \"json\"").unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.max_history_size, 42);
        assert_eq!(cfg.report_format, ReportFormat::Json);
    }

    #[test]
    fn load_missing_file_gives_file_not_found() {
        let err = load_config(Some(Path::new("/nonexistent/agui.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn load_none_returns_default() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn env_override_validation_level() {
        // SAFETY-equivalent: tests run single-threaded per process for env
        // vars via serial execution is not guaranteed, so scope narrowly.
        std::env::set_var("AGUI_VALIDATION_LEVEL", "permissive");
        let mut cfg = EngineConfig::default();
        apply_env_overrides(&mut cfg).unwrap();
        assert_eq!(cfg.default_validation_level, DefaultValidationLevel::Permissive);
        std::env::remove_var("AGUI_VALIDATION_LEVEL");
    }

    #[test]
    fn env_override_rejects_unknown_value() {
        std::env::set_var("AGUI_REPORT_FORMAT", "xml");
        let mut cfg = EngineConfig::default();
        let err = apply_env_overrides(&mut cfg).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        std::env::remove_var("AGUI_REPORT_FORMAT");
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = EngineConfig {
            default_validation_level: DefaultValidationLevel::Permissive,
            max_history_size: 777,
            orphan_age_warning_secs: 30,
            incomplete_run_age_error_secs: 3000,
            report_format: ReportFormat::Markdown,
        };
        let serialized = toml::to_string(&cfg).unwrap();
        let deserialized: EngineConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::FileNotFound { path: "/foo".into() };
        assert!(e.to_string().contains("/foo"));
        let e = ConfigError::ParseError { reason: "bad toml".into() };
        assert!(e.to_string().contains("bad toml"));
    }
}
