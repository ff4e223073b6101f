//! Statemesh: finite-state machines that react to each other
//!
//! Several independent machines run in one process. Each declares which
//! transitions it permits, which actions move it and which states of other
//! machines it reacts to. Machines are wired together with a
//! publish/subscribe relationship, and every action or reaction can be
//! gated by `when`/`unless` guards over the union of its own state and the
//! last broadcast states of its publishers.
//!
//! # Core Concepts
//!
//! - **State**: opaque symbols via the `State` trait or `state_enum!`
//! - **Machine type**: an immutable table of transitions, actions and
//!   reactions, declared once with `MachineTypeBuilder`
//! - **Machine**: an instance of a machine type with its own current state,
//!   publishers, consumers and bounded event log
//! - **Broadcast**: relay of a validated transition to every consumer
//!
//! # Example
//!
//! ```rust
//! use statemesh::builder::{broadcast_action, follow, ActionBuilder, MachineTypeBuilder};
//! use statemesh::{state_enum, Machine};
//!
//! state_enum! {
//!     enum Street {
//!         Green,
//!         Yellow,
//!         Red,
//!         Stopped,
//!         Cycling,
//!     }
//!     domains: {
//!         Light: [Green, Yellow, Red],
//!         Rider: [Stopped, Cycling],
//!     }
//! }
//!
//! let light = MachineTypeBuilder::new("Light")
//!     .transition(Street::Green, Street::Yellow)
//!     .transition(Street::Yellow, Street::Red)
//!     .bidirectional(Street::Red, Street::Green)
//!     .action(broadcast_action("green", Street::Green)).unwrap()
//!     .action(broadcast_action("yellow", Street::Yellow)).unwrap()
//!     .action(broadcast_action("red", Street::Red)).unwrap()
//!     .define()
//!     .unwrap();
//!
//! let rider = MachineTypeBuilder::new("Rider")
//!     .bidirectional(Street::Stopped, Street::Cycling)
//!     .action(ActionBuilder::new("stop").target(Street::Stopped)).unwrap()
//!     .action(ActionBuilder::new("cycle").target(Street::Cycling)).unwrap()
//!     .reaction(follow("on_green", Street::Green, "cycle")).unwrap()
//!     .reaction(follow("on_red", Street::Red, "stop")).unwrap()
//!     .define()
//!     .unwrap();
//!
//! let light = Machine::new(light, Street::Green);
//! let rider = Machine::new(rider, Street::Cycling);
//! rider.subscribe([&light]);
//!
//! light.attempt("red").unwrap();
//! assert_eq!(rider.current_state(), Street::Stopped);
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod engine;

// Re-export commonly used types
pub use builder::{ActionBuilder, MachineTypeBuilder, ReactionBuilder};
pub use core::{Event, Guard, InstanceId, Metadata, State, Transition};
pub use definition::{DefineError, MachineType};
pub use engine::{Dispatch, EngineError, Machine, MachineConfig};
