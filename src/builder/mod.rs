//! Builder API for declaring machines.
//!
//! A machine is declared once per host type with [`MachineBuilder`] and
//! validated in full before it exists: every transition must reference
//! declared states, names must be unique, and events must carry at least
//! one transition. The output is immutable, so nothing checked here can
//! regress at fire time.

pub mod error;
pub mod machine;

pub use error::DefinitionError;
pub use machine::MachineBuilder;
