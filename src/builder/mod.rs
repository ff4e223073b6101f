//! Builder API for declaring machine types.
//!
//! This module provides fluent builders and a macro for declaring states,
//! transitions, actions and reactions with minimal boilerplate.

pub mod descriptor;
pub mod machine;
pub mod macros;

pub use descriptor::{ActionBuilder, ReactionBuilder};
pub use machine::MachineTypeBuilder;

use crate::core::State;

/// Create an unguarded action that broadcasts on success.
///
/// # Example
///
/// ```
/// use statemesh::builder::{broadcast_action, MachineTypeBuilder};
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Signal {
///         Go,
///         Halt,
///     }
/// }
///
/// let kind = MachineTypeBuilder::new("Signal")
///     .bidirectional(Signal::Go, Signal::Halt)
///     .action(broadcast_action("halt", Signal::Halt))
///     .unwrap()
///     .define()
///     .unwrap();
///
/// assert!(kind.action("halt").unwrap().broadcast);
/// ```
pub fn broadcast_action<S: State>(name: impl Into<String>, target: S) -> ActionBuilder<S> {
    ActionBuilder::new(name).target(target).broadcast()
}

/// Create a reaction that runs the local action `action` when `trigger`
/// is observed.
///
/// # Example
///
/// ```
/// use statemesh::builder::follow;
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Signal {
///         Go,
///         Halt,
///     }
/// }
///
/// let reaction = follow("on_halt", Signal::Halt, "stop").build().unwrap();
/// assert_eq!(reaction.trigger, Signal::Halt);
/// ```
pub fn follow<S: State>(
    name: impl Into<String>,
    trigger: S,
    action: impl Into<String>,
) -> ReactionBuilder<S> {
    ReactionBuilder::new(name).on(trigger).perform(action)
}
