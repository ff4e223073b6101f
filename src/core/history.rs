//! Per-instance event log.
//!
//! The log keeps at most `capacity` events; older events are evicted first
//! and counted in [`EventLog::dropped`].

use super::event::Event;
use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of events retained per instance.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Bounded, ordered log of events recorded by one instance.
///
/// # Example
///
/// ```rust
/// use statemesh::core::{Event, EventLog, Metadata};
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Phase {
///         One,
///         Two,
///         Three,
///     }
/// }
///
/// let mut log = EventLog::with_capacity(2);
/// log.record(Event::internal("a", Phase::One, Metadata::new(), false));
/// log.record(Event::internal("b", Phase::Two, Metadata::new(), false));
/// log.record(Event::internal("c", Phase::Three, Metadata::new(), false));
///
/// assert_eq!(log.states(), vec![&Phase::Two, &Phase::Three]);
/// assert_eq!(log.dropped(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EventLog<S: State> {
    events: VecDeque<Event<S>>,
    capacity: usize,
    dropped: u64,
}

impl<S: State> Default for EventLog<S> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl<S: State> EventLog<S> {
    /// Create an empty log retaining at most `capacity` events.
    ///
    /// A capacity of zero retains nothing; every record only bumps the
    /// dropped counter.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    /// Append an event, evicting the oldest one when full.
    pub fn record(&mut self, event: Event<S>) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// States reported by the retained events, oldest first.
    pub fn states(&self) -> Vec<&S> {
        self.events.iter().map(|e| &e.state).collect()
    }

    /// Time between the oldest and newest retained events.
    ///
    /// Returns `None` when the log is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.events.front()?, self.events.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event<S>> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&Event<S>> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events evicted or never retained.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
