//! Core machine types and logic.
//!
//! This module contains the pure parts of the engine:
//! - State symbols via the `State` trait
//! - Declared transitions and their adjacency map
//! - `when`/`unless` guards over observed states
//! - Immutable events and the bounded per-instance log
//!
//! Nothing in this module performs dispatch or holds references to
//! other instances.

mod event;
mod guard;
mod history;
mod state;
mod transition;

pub use event::{Event, InstanceId, Metadata, Provenance};
pub use guard::{Guard, ObservedStates, Verdict};
pub use history::{EventLog, DEFAULT_LOG_CAPACITY};
pub use state::State;
pub use transition::{Adjacency, Transition};
