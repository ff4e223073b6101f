//! Events describing attempted or observed transitions.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Key/value bag carried by events and passed to action bodies.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Identity of a machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an event came from, relative to the instance processing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by one of the instance's own actions.
    Internal {
        /// Whether the originating action fans out to consumers.
        broadcast: bool,
    },
    /// Relayed from a publisher the instance observes.
    External { publisher: InstanceId },
}

/// Immutable record of an attempted transition or a relayed broadcast.
///
/// # Example
///
/// ```rust
/// use statemesh::core::{Event, Metadata, Provenance};
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Gate {
///         Up,
///         Down,
///     }
/// }
///
/// let event = Event::internal("lower", Gate::Down, Metadata::new(), true);
/// assert!(event.is_internal());
/// assert_eq!(event.provenance, Provenance::Internal { broadcast: true });
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Event<S: State> {
    /// Name of the action that produced the event.
    pub name: String,
    pub provenance: Provenance,
    /// State the event reports (target for internal events).
    pub state: S,
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
}

impl<S: State> Event<S> {
    /// Event produced by an action on the processing instance itself.
    pub fn internal(name: impl Into<String>, state: S, metadata: Metadata, broadcast: bool) -> Self {
        Self {
            name: name.into(),
            provenance: Provenance::Internal { broadcast },
            state,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Event relayed from `publisher`.
    pub fn external(
        name: impl Into<String>,
        publisher: InstanceId,
        state: S,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            provenance: Provenance::External { publisher },
            state,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Copy of this event as seen by a consumer of `publisher`.
    ///
    /// Name, state and metadata are preserved.
    pub fn relay(&self, publisher: InstanceId) -> Self {
        Self::external(
            self.name.clone(),
            publisher,
            self.state.clone(),
            self.metadata.clone(),
        )
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.provenance, Provenance::Internal { .. })
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self.provenance, Provenance::Internal { broadcast: true })
    }

    /// The publisher for external events.
    pub fn publisher(&self) -> Option<InstanceId> {
        match self.provenance {
            Provenance::External { publisher } => Some(publisher),
            Provenance::Internal { .. } => None,
        }
    }
}
