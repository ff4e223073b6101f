//! Declared transitions and the adjacency map compiled from them.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A permitted edge between two states.
///
/// Declared once per machine type. A bidirectional transition also permits
/// the reverse edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State> {
    pub source: S,
    pub destination: S,
    pub bidirectional: bool,
}

impl<S: State> Transition<S> {
    /// One-way edge `source -> destination`.
    pub fn new(source: S, destination: S) -> Self {
        Self {
            source,
            destination,
            bidirectional: false,
        }
    }

    /// Edge usable in both directions.
    pub fn bidirectional(source: S, destination: S) -> Self {
        Self {
            source,
            destination,
            bidirectional: true,
        }
    }
}

/// Directed adjacency map: state -> states reachable in one step.
///
/// Immutable once built; shared read-only by every instance of a machine type.
///
/// # Example
///
/// ```rust
/// use statemesh::core::{Adjacency, Transition};
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Valve {
///         Open,
///         Closed,
///         Jammed,
///     }
/// }
///
/// let adjacency = Adjacency::from_transitions(&[
///     Transition::bidirectional(Valve::Open, Valve::Closed),
///     Transition::new(Valve::Closed, Valve::Jammed),
/// ]);
///
/// assert!(adjacency.permits(&Valve::Open, &Valve::Closed));
/// assert!(adjacency.permits(&Valve::Closed, &Valve::Open));
/// assert!(!adjacency.permits(&Valve::Jammed, &Valve::Closed));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency<S: State> {
    edges: HashMap<S, HashSet<S>>,
}

impl<S: State> Default for Adjacency<S> {
    fn default() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

impl<S: State> Adjacency<S> {
    /// Compile a transition list. Duplicate edges collapse.
    pub fn from_transitions(transitions: &[Transition<S>]) -> Self {
        let mut edges: HashMap<S, HashSet<S>> = HashMap::new();
        for t in transitions {
            edges
                .entry(t.source.clone())
                .or_default()
                .insert(t.destination.clone());
            if t.bidirectional {
                edges
                    .entry(t.destination.clone())
                    .or_default()
                    .insert(t.source.clone());
            }
        }
        Self { edges }
    }

    /// True if `to` is in `adjacency[from]`.
    pub fn permits(&self, from: &S, to: &S) -> bool {
        self.edges.get(from).is_some_and(|targets| targets.contains(to))
    }

    /// States reachable from `from` in one step.
    pub fn targets(&self, from: &S) -> impl Iterator<Item = &S> {
        self.edges.get(from).into_iter().flat_map(|t| t.iter())
    }

    /// True if `state` appears on either end of any edge.
    pub fn knows(&self, state: &S) -> bool {
        self.edges.contains_key(state) || self.edges.values().any(|t| t.contains(state))
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
