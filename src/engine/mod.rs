//! Runtime: machine instances, subscriptions and dispatch.
//!
//! # Key Concepts
//!
//! - **Machine**: a handle to one instance of a machine type
//! - **Subscriptions**: a consumer tracks each publisher's last broadcast
//!   state; a publisher keeps only a delivery list of consumers
//! - **Dispatch**: actions and events are handled synchronously, with
//!   broadcasts delivered depth-first before the triggering call returns
//!
//! Each instance guards its own state with one lock, so a transition is
//! validated and applied atomically even when instances are shared across
//! threads. A second, reentrant lock serializes attempts on an instance
//! together with their broadcast fan-out, so consumers observe a publisher's
//! transitions in the order they were applied.

mod config;
mod dispatch;
mod error;
mod machine;
mod snapshot;

pub use config::MachineConfig;
pub use dispatch::Dispatch;
pub use error::EngineError;
pub use machine::{EventSink, Machine};
pub use snapshot::{PublisherState, Snapshot};
