//! Builder for declaring machine types.

use crate::builder::descriptor::{ActionBuilder, ReactionBuilder};
use crate::core::{State, Transition};
use crate::definition::{DefineError, Descriptor, MachineType};
use std::sync::Arc;

/// Builder for declaring a machine type with a fluent API.
///
/// Descriptor builders are validated as they are added; table-wide rules
/// (unique action names, one reaction per trigger state) are checked
/// together by [`define`](MachineTypeBuilder::define).
pub struct MachineTypeBuilder<S: State> {
    name: String,
    transitions: Vec<Transition<S>>,
    descriptors: Vec<Descriptor<S>>,
}

impl<S: State> MachineTypeBuilder<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    /// Permit `source -> destination`.
    pub fn transition(mut self, source: S, destination: S) -> Self {
        self.transitions.push(Transition::new(source, destination));
        self
    }

    /// Permit movement between `a` and `b` in both directions.
    pub fn bidirectional(mut self, a: S, b: S) -> Self {
        self.transitions.push(Transition::bidirectional(a, b));
        self
    }

    /// Add several pre-built transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Add an action using a builder.
    /// Returns an error if the builder fails validation.
    pub fn action(mut self, builder: ActionBuilder<S>) -> Result<Self, DefineError> {
        let action = builder.build()?;
        self.descriptors.push(Descriptor::Action(action));
        Ok(self)
    }

    /// Add a reaction using a builder.
    /// Returns an error if the builder fails validation.
    pub fn reaction(mut self, builder: ReactionBuilder<S>) -> Result<Self, DefineError> {
        let reaction = builder.build()?;
        self.descriptors.push(Descriptor::Reaction(reaction));
        Ok(self)
    }

    /// Add a pre-built descriptor.
    pub fn describe(mut self, descriptor: Descriptor<S>) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Compile the machine type.
    pub fn define(self) -> Result<Arc<MachineType<S>>, DefineError> {
        let kind = MachineType::from_parts(self.name, self.transitions, self.descriptors)?;
        tracing::debug!(
            "Defined machine type {}: {} edges, {} actions, {} reactions",
            kind.name(),
            kind.adjacency().edge_count(),
            kind.actions().count(),
            kind.reactions().count()
        );
        Ok(Arc::new(kind))
    }
}
