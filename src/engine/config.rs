//! Per-instance configuration.

use crate::core::{Metadata, DEFAULT_LOG_CAPACITY};
use serde::{Deserialize, Serialize};

/// Settings applied when an instance is created.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use statemesh::engine::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{"log_capacity": 16}"#).unwrap();
/// assert_eq!(config.log_capacity, 16);
/// assert!(config.label.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Human-readable name used in logs and errors.
    /// Defaults to `<machine type>-<first 8 hex digits of the id>`.
    pub label: Option<String>,

    /// Maximum number of events retained in the instance log.
    pub log_capacity: usize,

    /// Extra metadata merged into the args of every action attempt.
    /// Keys passed by the caller take precedence.
    pub metadata: Metadata,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            label: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
            metadata: Metadata::new(),
        }
    }
}

impl MachineConfig {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
