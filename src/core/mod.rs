//! Core machine description types and transition resolution.
//!
//! This module contains the immutable data model of the engine:
//! - States, events, and transitions as declared by the builder
//! - The `Machine` aggregate and its resolution algorithm
//! - Runtime error kinds shared by the whole crate
//!
//! Everything here is description, not behavior: values are built once,
//! validated, and then only read. Hook execution and state tracking live
//! in the `runtime` module.

mod error;
mod event;
mod machine;
mod state;
mod transition;

pub use error::{Rejection, RuntimeError};
pub use event::Event;
pub use machine::{Machine, DEFAULT_MACHINE};
pub use state::State;
pub use transition::Transition;
