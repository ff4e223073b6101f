//! Core State trait for machine states.
//!
//! States are opaque symbols. The engine compares them by equality only and
//! never assumes an ordering between them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for machine states.
///
/// Machines that observe each other must share one state type, because a
/// guard is evaluated over the union of local and remote states. The
/// [`domain`](State::domain) method names the machine type a symbol belongs
/// to, so one Rust type can still group its states per machine type.
///
/// # Required Traits
///
/// - `Clone`, `Eq`, `Hash`: states are stored in sets and maps
/// - `Debug`: states appear in diagnostics and errors
/// - `Serialize` + `DeserializeOwned`: states appear in events and snapshots
///
/// # Example
///
/// ```rust
/// use statemesh::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
///
///     fn domain(&self) -> &str {
///         "Door"
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// assert_eq!(Door::Closed.domain(), "Door");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Name of the group (usually the machine type) this state belongs to.
    ///
    /// Default implementation returns an empty string.
    fn domain(&self) -> &str {
        ""
    }
}
