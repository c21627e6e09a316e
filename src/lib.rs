//! Statehood: a finite-state-machine engine for arbitrary host types
//!
//! Statehood separates what a state machine *is* from what it *does to a
//! host*. A [`Machine`] is an immutable description (states, events,
//! transitions, guards) built once per host type; a [`Tracker`] attaches
//! that description to a live instance, answers state queries, and fires
//! events through the fixed lifecycle order: exit hook, transition
//! callback, persist, enter hook, success hook.
//!
//! # Core Concepts
//!
//! - **Machine**: named, validated, immutable definition; a host type can
//!   carry several, each tracked independently
//! - **Hooks**: a per-type table mapping hook and guard names to closures,
//!   validated against machine definitions when they are registered
//! - **Tracker**: the runtime adapter holding an instance's current state,
//!   with non-raising (`fire`) and raising (`fire_strict`) invocation
//! - **Registry**: per-type machine storage with lazy subtype inheritance
//! - **StateStore**: optional persistence seam; reads win over memory,
//!   writes may veto a transition
//!
//! # Example
//!
//! ```rust
//! use statehood::{Args, Event, Hooks, MachineBuilder, MachineSet, State, Tracker, Transition};
//!
//! struct Door {
//!     slams: u32,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let machine = MachineBuilder::new()
//!     .state(State::new("open"))
//!     .state(State::new("closed"))
//!     .event(
//!         Event::new("close")
//!             .transition(Transition::new(["open"], "closed").callback("slam")),
//!     )
//!     .build()?;
//!
//! let hooks = Hooks::new().hook("slam", |door: &mut Door, _args: &Args| door.slams += 1);
//! let set = MachineSet::assemble(vec![machine], hooks)?;
//!
//! let mut door = Door { slams: 0 };
//! let mut tracker = Tracker::attach(set);
//!
//! assert_eq!(tracker.current_state(&door)?, "open");
//! assert!(tracker.fire(&mut door, "close")?);
//! assert!(tracker.in_state(&door, "closed")?);
//! assert_eq!(door.slams, 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod hooks;
mod macros;
pub mod persist;
pub mod present;
pub mod registry;
pub mod runtime;

// Re-export commonly used types
pub use builder::{DefinitionError, MachineBuilder};
pub use core::{Event, Machine, Rejection, RuntimeError, State, Transition, DEFAULT_MACHINE};
pub use hooks::{Args, GuardFn, HookFn, Hooks};
pub use persist::{MemoryStore, StateStore, TransitionRecord};
pub use registry::{MachineRegistry, MachineSet};
pub use runtime::Tracker;
