//! Builders for action and reaction descriptors.

use crate::core::{Event, Guard, Metadata, State};
use crate::definition::{
    ActionBody, ActionDescriptor, DefineError, ReactionBody, ReactionDescriptor,
};
use crate::engine::{EngineError, Machine};
use std::sync::Arc;

/// Builder for an action bound to a target state.
///
/// # Example
///
/// ```
/// use statemesh::builder::ActionBuilder;
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Light {
///         Green,
///         Red,
///     }
/// }
///
/// let action = ActionBuilder::new("red")
///     .target(Light::Red)
///     .broadcast()
///     .unless([Light::Red])
///     .build()
///     .unwrap();
///
/// assert!(action.broadcast);
/// assert_eq!(action.target, Light::Red);
/// ```
pub struct ActionBuilder<S: State> {
    name: String,
    target: Option<S>,
    broadcast: bool,
    guard: Guard<S>,
    body: Option<ActionBody<S>>,
}

impl<S: State> ActionBuilder<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            broadcast: false,
            guard: Guard::new(),
            body: None,
        }
    }

    /// Set the target state (required).
    pub fn target(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Relay successful transitions to every consumer.
    pub fn broadcast(mut self) -> Self {
        self.broadcast = true;
        self
    }

    /// Only fire when one of `states` is observed.
    pub fn when<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.guard = self.guard.when(states);
        self
    }

    /// Never fire while one of `states` is observed.
    pub fn unless<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.guard = self.guard.unless(states);
        self
    }

    /// Replace the guard wholesale.
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.guard = guard;
        self
    }

    /// Set the behavior body (optional; defaults to doing nothing).
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Machine<S>, &Metadata) + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn build(self) -> Result<ActionDescriptor<S>, DefineError> {
        let target = self.target.ok_or_else(|| DefineError::MissingTarget {
            action: self.name.clone(),
        })?;
        let body: ActionBody<S> = match self.body {
            Some(body) => body,
            None => Arc::new(|_: &Machine<S>, _: &Metadata| {}),
        };

        Ok(ActionDescriptor {
            name: self.name,
            target,
            broadcast: self.broadcast,
            guard: self.guard,
            body,
        })
    }
}

/// Builder for a reaction bound to an observed trigger state.
pub struct ReactionBuilder<S: State> {
    name: String,
    trigger: Option<S>,
    guard: Guard<S>,
    body: Option<ReactionBody<S>>,
}

impl<S: State> ReactionBuilder<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: None,
            guard: Guard::new(),
            body: None,
        }
    }

    /// Set the trigger state (required).
    pub fn on(mut self, state: S) -> Self {
        self.trigger = Some(state);
        self
    }

    pub fn when<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.guard = self.guard.when(states);
        self
    }

    pub fn unless<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.guard = self.guard.unless(states);
        self
    }

    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.guard = guard;
        self
    }

    /// Set the behavior body (required).
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Machine<S>, &Event<S>) -> Result<(), EngineError> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Shorthand for a body that runs the local action `action`.
    pub fn perform(self, action: impl Into<String>) -> Self {
        let action = action.into();
        self.body(move |machine, _| machine.attempt(&action).map(|_| ()))
    }

    pub fn build(self) -> Result<ReactionDescriptor<S>, DefineError> {
        let trigger = self.trigger.ok_or_else(|| DefineError::MissingTrigger {
            reaction: self.name.clone(),
        })?;
        let body = self.body.ok_or_else(|| DefineError::MissingBody {
            reaction: self.name.clone(),
        })?;

        Ok(ReactionDescriptor {
            name: self.name,
            trigger,
            guard: self.guard,
            body,
        })
    }
}
