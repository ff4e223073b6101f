//! Runtime errors.

use thiserror::Error;

/// Errors raised while dispatching actions and events.
///
/// Guard rejections are not errors; they surface as
/// [`Dispatch::GuardRejected`](crate::engine::Dispatch::GuardRejected).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// The target state is not reachable from the current state.
    ///
    /// The current state is left unchanged. When `body_executed` is true
    /// the action body already ran and its side effects were kept.
    #[error("[{machine}] Action '{action}' cannot move from '{from}' to '{to}'")]
    Transition {
        machine: String,
        action: String,
        from: String,
        to: String,
        body_executed: bool,
    },

    #[error("Machine type '{machine_type}' declares no action '{action}'")]
    UnknownAction {
        machine_type: String,
        action: String,
    },
}

impl EngineError {
    pub fn is_transition(&self) -> bool {
        matches!(self, EngineError::Transition { .. })
    }
}
