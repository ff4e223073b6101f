//! Errors raised while declaring a machine type.

use thiserror::Error;

/// Errors that can occur when declaring machine types and their descriptors.
///
/// All of these are raised before any instance of the machine type exists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefineError {
    #[error("Action '{action}' has no target state. Call .target(state) before adding it")]
    MissingTarget { action: String },

    #[error("Reaction '{reaction}' has no trigger state. Call .on(state) before adding it")]
    MissingTrigger { reaction: String },

    #[error("Reaction '{reaction}' has no body. Call .body(f) before adding it")]
    MissingBody { reaction: String },

    #[error("Action '{action}' is declared more than once")]
    DuplicateAction { action: String },

    #[error("Reactions '{first}' and '{second}' are both bound to state '{state}'")]
    DuplicateReaction {
        state: String,
        first: String,
        second: String,
    },

    #[error("Machine type '{machine}' rejected with {} error(s): {}", .errors.len(), summarize(.errors))]
    Rejected {
        machine: String,
        errors: Vec<DefineError>,
    },
}

fn summarize(errors: &[DefineError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_lists_every_error() {
        let error = DefineError::Rejected {
            machine: "Rider".to_string(),
            errors: vec![
                DefineError::DuplicateAction {
                    action: "stop".to_string(),
                },
                DefineError::DuplicateReaction {
                    state: "Green".to_string(),
                    first: "go".to_string(),
                    second: "go_again".to_string(),
                },
            ],
        };

        let message = error.to_string();
        assert!(message.starts_with("Machine type 'Rider' rejected with 2 error(s)"));
        assert!(message.contains("Action 'stop' is declared more than once"));
        assert!(message.contains("bound to state 'Green'"));
    }
}
