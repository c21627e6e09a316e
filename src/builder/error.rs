//! Definition-time errors for machine declaration and registration.

use thiserror::Error;

/// Errors raised while declaring a machine or registering it for a host
/// type. All of these are programming mistakes in the declaration itself:
/// they fail fast at definition time and are never deferred to fire time.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Machine '{machine}' declares no states")]
    NoStates { machine: String },

    #[error("Duplicate state '{state}' on machine '{machine}'")]
    DuplicateState { machine: String, state: String },

    #[error("Duplicate event '{event}' on machine '{machine}'")]
    DuplicateEvent { machine: String, event: String },

    #[error("Event '{event}' on machine '{machine}' declares no transitions")]
    EmptyEvent { machine: String, event: String },

    #[error(
        "Transition on event '{event}' of machine '{machine}' references undeclared state '{state}'"
    )]
    UndeclaredState {
        machine: String,
        event: String,
        state: String,
    },

    #[error("Initial state '{state}' is not declared on machine '{machine}'")]
    UndeclaredInitial { machine: String, state: String },

    #[error("Hook '{hook}' on machine '{machine}' is not registered for {host}")]
    UnknownHook {
        machine: String,
        hook: String,
        host: &'static str,
    },

    #[error("Guard '{guard}' on machine '{machine}' is not registered for {host}")]
    UnknownGuard {
        machine: String,
        guard: String,
        host: &'static str,
    },

    #[error("Machine '{machine}' is already defined for {host}")]
    DuplicateMachine {
        machine: String,
        host: &'static str,
    },

    #[error("No hook table registered for {host}. Call register() before define()")]
    UnregisteredType { host: &'static str },

    #[error("{host} is already registered")]
    AlreadyRegistered { host: &'static str },

    #[error("Parent type {parent} is not registered. Register it before its subtypes")]
    UnknownParent { parent: &'static str },
}
