// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading: defaults layered with a TOML file and
//! `TAILER_`-prefixed environment variables (spec §7 "Configuration /
//! unknown-encoding / bad-glob" is fatal to input startup).

use crate::schema::TailerConfigSchema;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("no paths configured")]
    NoPaths,

    #[error("invalid glob pattern {pattern:?}: {source}")]
    BadGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid exclude_files regex {pattern:?}: {source}")]
    BadExcludeRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid include_lines regex {pattern:?}: {source}")]
    BadIncludeRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid exclude_lines regex {pattern:?}: {source}")]
    BadExcludeLinesRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid multiline pattern {pattern:?}: {source}")]
    BadMultilineRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported encoding {0:?}")]
    UnknownEncoding(String),

    #[error("multiline config sets both `pattern` and `fixed_lines`; choose one")]
    AmbiguousMultiline,
}

/// A validated configuration, ready for the watcher/prospector/harvester to
/// consume. Wraps the raw schema so validation can only be bypassed by
/// constructing through [`TailerConfig::from_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct TailerConfig {
    pub inner: TailerConfigSchema,
}

impl std::ops::Deref for TailerConfig {
    type Target = TailerConfigSchema;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl TailerConfig {
    /// Load and validate configuration from a TOML file, with environment
    /// variable overrides under the `TAILER_` prefix (matching the
    /// teacher's layered-`config`-crate style).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("TAILER").separator("__"));
        let schema: TailerConfigSchema = builder.build()?.try_deserialize()?;
        Self::from_schema(schema)
    }

    pub fn from_schema(schema: TailerConfigSchema) -> Result<Self, ConfigError> {
        validate(&schema)?;
        Ok(Self { inner: schema })
    }
}

fn validate(schema: &TailerConfigSchema) -> Result<(), ConfigError> {
    if schema.paths.is_empty() {
        return Err(ConfigError::NoPaths);
    }
    for pattern in &schema.paths {
        glob::Pattern::new(pattern).map_err(|source| ConfigError::BadGlob {
            pattern: pattern.clone(),
            source,
        })?;
    }
    for pattern in &schema.exclude_files {
        regex::Regex::new(pattern).map_err(|source| ConfigError::BadExcludeRegex {
            pattern: pattern.clone(),
            source,
        })?;
    }
    for pattern in &schema.include_lines {
        regex::Regex::new(pattern).map_err(|source| ConfigError::BadIncludeRegex {
            pattern: pattern.clone(),
            source,
        })?;
    }
    for pattern in &schema.exclude_lines {
        regex::Regex::new(pattern).map_err(|source| ConfigError::BadExcludeLinesRegex {
            pattern: pattern.clone(),
            source,
        })?;
    }
    if let Some(multiline) = &schema.multiline {
        if multiline.pattern.is_some() && multiline.fixed_lines.is_some() {
            return Err(ConfigError::AmbiguousMultiline);
        }
        if let Some(pattern) = &multiline.pattern {
            regex::Regex::new(pattern).map_err(|source| ConfigError::BadMultilineRegex {
                pattern: pattern.clone(),
                source,
            })?;
        }
    }
    if encoding_rs::Encoding::for_label(schema.reader.encoding.as_bytes()).is_none() {
        return Err(ConfigError::UnknownEncoding(schema.reader.encoding.clone()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
