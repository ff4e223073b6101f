//! Machine type declarations.
//!
//! A machine type is an explicit, immutable descriptor table: declared
//! transitions compiled into an adjacency map, actions keyed by name and
//! reactions keyed by trigger state. It is built once and shared by
//! reference among instances.

mod descriptor;
mod error;
mod machine_type;

pub use descriptor::{ActionBody, ActionDescriptor, Descriptor, ReactionBody, ReactionDescriptor};
pub use error::DefineError;
pub use machine_type::MachineType;
