//! Action and reaction descriptors.

use crate::core::{Event, Guard, Metadata, State};
use crate::engine::{EngineError, Machine};
use std::fmt;
use std::sync::Arc;

/// Behavior run by an action once its guard passes.
///
/// Runs before the transition is validated; its side effects are not
/// undone if the transition turns out to be illegal.
pub type ActionBody<S> = Arc<dyn Fn(&Machine<S>, &Metadata) + Send + Sync>;

/// Behavior run when an observed publisher state matches a reaction.
///
/// May call local actions on the machine it receives; errors from those
/// calls propagate to whoever triggered the broadcast.
pub type ReactionBody<S> =
    Arc<dyn Fn(&Machine<S>, &Event<S>) -> Result<(), EngineError> + Send + Sync>;

/// An action bound to a target state.
pub struct ActionDescriptor<S: State> {
    pub name: String,
    pub target: S,
    pub broadcast: bool,
    pub guard: Guard<S>,
    pub body: ActionBody<S>,
}

/// A reaction bound to one externally observed trigger state.
pub struct ReactionDescriptor<S: State> {
    pub name: String,
    pub trigger: S,
    pub guard: Guard<S>,
    pub body: ReactionBody<S>,
}

/// Entry in a machine type's descriptor table.
pub enum Descriptor<S: State> {
    Action(ActionDescriptor<S>),
    Reaction(ReactionDescriptor<S>),
}

impl<S: State> Descriptor<S> {
    pub fn name(&self) -> &str {
        match self {
            Descriptor::Action(a) => &a.name,
            Descriptor::Reaction(r) => &r.name,
        }
    }
}

impl<S: State> Clone for ActionDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            target: self.target.clone(),
            broadcast: self.broadcast,
            guard: self.guard.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<S: State> Clone for ReactionDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            trigger: self.trigger.clone(),
            guard: self.guard.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<S: State> fmt::Debug for ActionDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("broadcast", &self.broadcast)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<S: State> fmt::Debug for ReactionDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactionDescriptor")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<S: State> fmt::Debug for Descriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Action(a) => a.fmt(f),
            Descriptor::Reaction(r) => r.fmt(f),
        }
    }
}
