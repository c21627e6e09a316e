//! Runtime error types for state queries and event invocation.

use thiserror::Error;

/// Why an event declined to fire.
///
/// All three kinds have the same caller-visible effect: the non-raising
/// invocation form returns `false` and the raising form returns
/// [`RuntimeError::EventNotFired`]. They are distinguished for diagnostics
/// only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No transition on the event covers the current state.
    #[error("no transition covers the current state")]
    NoMatchingTransition,

    /// Transitions cover the current state, but every guard declined.
    #[error("every matching guard declined")]
    GuardRejected,

    /// The state store's write hook returned false.
    #[error("the state store vetoed the write")]
    PersistenceVeto,
}

/// Errors raised while querying state or firing events.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No machine with this name is attached to the host type.
    #[error("Machine '{name}' is not defined for {host}")]
    UnknownMachine { host: &'static str, name: String },

    /// The event name is not declared on the machine.
    #[error("Event '{name}' is not declared on machine '{machine}'")]
    UnknownEvent { machine: String, name: String },

    /// The state name is not declared on the machine.
    #[error("State '{name}' is not declared on machine '{machine}'")]
    UnknownState { machine: String, name: String },

    /// A referenced hook or guard is missing from the host's hook table.
    #[error("Hook '{name}' is not registered")]
    UnknownHook { name: String },

    /// The event did not fire. Returned by the raising invocation form;
    /// the non-raising form folds this into a `false` return.
    #[error("Event '{event}' on machine '{machine}' not fired from state '{from}': {rejection}")]
    EventNotFired {
        machine: String,
        event: String,
        from: String,
        rejection: Rejection,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_name_the_cause() {
        assert_eq!(
            Rejection::NoMatchingTransition.to_string(),
            "no transition covers the current state"
        );
        assert_eq!(
            Rejection::GuardRejected.to_string(),
            "every matching guard declined"
        );
        assert_eq!(
            Rejection::PersistenceVeto.to_string(),
            "the state store vetoed the write"
        );
    }

    #[test]
    fn event_not_fired_carries_full_context() {
        let error = RuntimeError::EventNotFired {
            machine: "default".to_string(),
            event: "close".to_string(),
            from: "open".to_string(),
            rejection: Rejection::GuardRejected,
        };

        let message = error.to_string();
        assert!(message.contains("close"));
        assert!(message.contains("default"));
        assert!(message.contains("open"));
        assert!(message.contains("guard"));
    }

    #[test]
    fn unknown_event_names_the_machine() {
        let error = RuntimeError::UnknownEvent {
            machine: "bar".to_string(),
            name: "foo".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Event 'foo' is not declared on machine 'bar'"
        );
    }
}
