//! Compiler configuration.
//!
//! Loaded in layers:
//! - built-in defaults
//! - kvsql.toml (or an explicit file)
//! - Environment variables (KVSQL_* prefix)
//!
//! ## Example
//!
//! ```toml
//! [date]
//! allow_date_only = false
//!
//! [pushdown]
//! enabled = true
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! KVSQL_FUNCTIONS__FOLD_CONSTANTS=false
//! KVSQL_LOGGING__LEVEL=debug
//! ```

use crate::expression::{DateParser, FunctionContext};
use crate::filter::FilterBuilder;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub date: DateConfig,
    #[serde(default)]
    pub functions: FunctionConfig,
    #[serde(default)]
    pub pushdown: PushdownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Date parsing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateConfig {
    /// Accept `yyyy-M-d` without a time portion (midnight)
    #[serde(default = "default_true")]
    pub allow_date_only: bool,
}

impl Default for DateConfig {
    fn default() -> Self {
        DateConfig {
            allow_date_only: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Evaluate calls with constant arguments at compile time
    #[serde(default = "default_true")]
    pub fold_constants: bool,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            fold_constants: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushdownConfig {
    /// Build storage filters; when off the whole predicate stays residual
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PushdownConfig {
    fn default() -> Self {
        PushdownConfig { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CompilerConfig {
    /// Load configuration from kvsql.toml and the environment
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_file("kvsql.toml")
    }

    /// Load configuration from specific file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(CompilerConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("KVSQL_").split("__"))
            .extract()
    }

    pub fn function_context(&self) -> FunctionContext {
        FunctionContext {
            date_parser: DateParser::new(self.date.allow_date_only),
        }
    }

    pub fn filter_builder(&self) -> FilterBuilder {
        let builder = if self.pushdown.enabled {
            FilterBuilder::new()
        } else {
            FilterBuilder::disabled()
        };
        builder.with_context(self.function_context())
    }
}
