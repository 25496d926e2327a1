//! Engine configuration.

use crate::{UnionFields, DEFAULT_TIMESTAMP_FIELD};
use serde::{Deserialize, Serialize};

/// Settings for a [`MergeEngine`](crate::MergeEngine).
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeConfig {
    /// Field compared by last-write-wins resolution
    pub timestamp_field: String,
    /// Fields whose arrays are unioned by the structural merge
    pub union_fields: UnionFields,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            union_fields: UnionFields::default(),
        }
    }
}

impl MergeConfig {
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    pub fn with_union_fields(mut self, fields: UnionFields) -> Self {
        self.union_fields = fields;
        self
    }
}
