//! Configuration management for the CLI.

use std::env;
use syncmerge_engine::{MergeConfig, UnionFields, DEFAULT_TIMESTAMP_FIELD, DEFAULT_UNION_FIELD};

/// Engine settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Field compared by last-write-wins resolution
    pub timestamp_field: String,
    /// Fields whose arrays are unioned by `merge`
    pub union_fields: UnionFields,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timestamp_field = lookup("SYNCMERGE_TIMESTAMP_FIELD")
            .unwrap_or_else(|| DEFAULT_TIMESTAMP_FIELD.to_string());
        let timestamp_field = timestamp_field.trim().to_string();
        if timestamp_field.is_empty() {
            return Err(ConfigError::EmptyTimestampField);
        }

        let union_fields = parse_union_fields(
            &lookup("SYNCMERGE_UNION_FIELDS").unwrap_or_else(|| DEFAULT_UNION_FIELD.to_string()),
        )?;

        Ok(Self {
            timestamp_field,
            union_fields,
        })
    }

    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig::default()
            .with_timestamp_field(self.timestamp_field.clone())
            .with_union_fields(self.union_fields.clone())
    }
}

/// Parse a comma-separated list of field names. The empty list is allowed.
pub fn parse_union_fields(raw: &str) -> Result<UnionFields, ConfigError> {
    let mut fields = UnionFields::none();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        validate_field_name(name)?;
        fields.insert(name);
    }
    Ok(fields)
}

pub fn validate_field_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidUnionField(name.to_string()));
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SYNCMERGE_TIMESTAMP_FIELD must not be empty")]
    EmptyTimestampField,

    #[error("Invalid union field name: {0:?}")]
    InvalidUnionField(String),
}
