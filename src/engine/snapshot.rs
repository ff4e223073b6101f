//! Serializable diagnostic view of an instance.
//!
//! A snapshot is read-only: there is no way to rebuild an instance from
//! one, since action and reaction bodies are not serializable.

use crate::core::{EventLog, InstanceId, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known state of one publisher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PublisherState<S: State> {
    pub publisher: InstanceId,
    pub state: S,
}

/// Point-in-time view of a machine instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Snapshot<S: State> {
    pub id: InstanceId,
    pub label: String,
    pub machine_type: String,
    pub current: S,

    /// Sorted by publisher id.
    pub publishers: Vec<PublisherState<S>>,

    /// Live consumers in registration order.
    pub consumers: Vec<InstanceId>,

    pub log: EventLog<S>,
    pub taken_at: DateTime<Utc>,
}
