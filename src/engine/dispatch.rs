//! Outcome of dispatching an action or event.

use crate::core::{InstanceId, State, Verdict};

/// What happened when an instance processed an action or event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch<S: State> {
    /// The action's guard rejected the call; the body did not run.
    GuardRejected { verdict: Verdict },

    /// The event named the current state; nothing changed and nothing was relayed.
    Unchanged { state: S },

    /// The transition was applied. `relayed` counts consumers reached.
    Transitioned { from: S, to: S, relayed: usize },

    /// A publisher state was recorded; no reaction is bound to it.
    Observed { publisher: InstanceId, state: S },

    /// A reaction matched but its guard rejected the event.
    ReactionRejected { reaction: String, verdict: Verdict },

    /// A reaction body ran to completion.
    Reacted { reaction: String },
}

impl<S: State> Dispatch<S> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Dispatch::Transitioned { .. })
    }

    /// True if a guard stopped the action or reaction.
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Dispatch::GuardRejected { .. } | Dispatch::ReactionRejected { .. }
        )
    }
}
