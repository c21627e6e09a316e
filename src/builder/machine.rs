//! Builder for declaring machines.

use std::collections::HashSet;

use crate::builder::error::DefinitionError;
use crate::core::{Event, Machine, State, DEFAULT_MACHINE};

/// Fluent builder producing a validated, immutable [`Machine`].
///
/// Declaration order matters twice: the first declared state is the
/// implicit initial state (unless [`initial`](Self::initial) picks another),
/// and an event's transitions are evaluated in the order they were added.
///
/// All validation happens in [`build`](Self::build), which is the only way
/// to obtain a `Machine`; a machine that exists is a machine that passed.
///
/// # Example
///
/// ```rust
/// use statehood::{Event, MachineBuilder, State, Transition};
///
/// let machine = MachineBuilder::named("bar")
///     .state(State::new("read"))
///     .state(State::new("ended"))
///     .event(Event::new("foo").transition(Transition::new(["read"], "ended")))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.name(), "bar");
/// assert_eq!(machine.initial_state(), "read");
/// ```
pub struct MachineBuilder {
    name: String,
    states: Vec<State>,
    events: Vec<Event>,
    initial: Option<String>,
}

impl MachineBuilder {
    /// Start declaring the machine named `"default"`.
    pub fn new() -> Self {
        Self::named(DEFAULT_MACHINE)
    }

    /// Start declaring a machine under an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            events: Vec::new(),
            initial: None,
        }
    }

    /// Declare a state. The first declared state becomes the initial state
    /// unless [`initial`](Self::initial) overrides it.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Declare multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Declare an event with its transitions.
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Pick the initial state explicitly. The name must be declared.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Validate the declaration and produce the machine.
    ///
    /// Fails fast on: no states, duplicate state or event names, an event
    /// with no transitions, a transition referencing an undeclared state on
    /// either side, or an explicit initial state that is not declared.
    pub fn build(self) -> Result<Machine, DefinitionError> {
        let machine = &self.name;

        let Some(first_state) = self.states.first() else {
            return Err(DefinitionError::NoStates {
                machine: machine.clone(),
            });
        };

        let mut declared = HashSet::new();
        for state in &self.states {
            if !declared.insert(state.name()) {
                return Err(DefinitionError::DuplicateState {
                    machine: machine.clone(),
                    state: state.name().to_string(),
                });
            }
        }

        let mut seen_events = HashSet::new();
        for event in &self.events {
            if !seen_events.insert(event.name()) {
                return Err(DefinitionError::DuplicateEvent {
                    machine: machine.clone(),
                    event: event.name().to_string(),
                });
            }
            if event.transitions().is_empty() {
                return Err(DefinitionError::EmptyEvent {
                    machine: machine.clone(),
                    event: event.name().to_string(),
                });
            }
            for transition in event.transitions() {
                for state in transition
                    .from_states()
                    .iter()
                    .map(String::as_str)
                    .chain([transition.to_state()])
                {
                    if !declared.contains(state) {
                        return Err(DefinitionError::UndeclaredState {
                            machine: machine.clone(),
                            event: event.name().to_string(),
                            state: state.to_string(),
                        });
                    }
                }
            }
        }

        let initial = match self.initial {
            Some(name) => {
                if !declared.contains(name.as_str()) {
                    return Err(DefinitionError::UndeclaredInitial {
                        machine: machine.clone(),
                        state: name,
                    });
                }
                name
            }
            None => first_state.name().to_string(),
        };

        Ok(Machine::from_parts(
            self.name,
            self.states,
            self.events,
            initial,
        ))
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;

    #[test]
    fn builder_requires_states() {
        let result = MachineBuilder::new().build();

        assert!(matches!(result, Err(DefinitionError::NoStates { .. })));
    }

    #[test]
    fn first_state_is_implicit_initial() {
        let machine = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("closed"))
            .build()
            .unwrap();

        assert_eq!(machine.initial_state(), "open");
    }

    #[test]
    fn explicit_initial_overrides_first_state() {
        let machine = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("closed"))
            .initial("closed")
            .build()
            .unwrap();

        assert_eq!(machine.initial_state(), "closed");
    }

    #[test]
    fn explicit_initial_must_be_declared() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .initial("ajar")
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::UndeclaredInitial { ref state, .. }) if state == "ajar"
        ));
    }

    #[test]
    fn duplicate_state_rejected() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("open"))
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::DuplicateState { ref state, .. }) if state == "open"
        ));
    }

    #[test]
    fn duplicate_event_rejected() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("closed"))
            .event(Event::new("close").transition(Transition::new(["open"], "closed")))
            .event(Event::new("close").transition(Transition::new(["open"], "closed")))
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::DuplicateEvent { ref event, .. }) if event == "close"
        ));
    }

    #[test]
    fn event_without_transitions_rejected() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .event(Event::new("close"))
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::EmptyEvent { ref event, .. }) if event == "close"
        ));
    }

    #[test]
    fn undeclared_source_state_rejected() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("closed"))
            .event(Event::new("close").transition(Transition::new(["ajar"], "closed")))
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::UndeclaredState { ref state, .. }) if state == "ajar"
        ));
    }

    #[test]
    fn undeclared_destination_state_rejected() {
        let result = MachineBuilder::new()
            .state(State::new("open"))
            .event(Event::new("close").transition(Transition::new(["open"], "shut")))
            .build();

        assert!(matches!(
            result,
            Err(DefinitionError::UndeclaredState { ref state, .. }) if state == "shut"
        ));
    }

    #[test]
    fn builder_defaults_to_default_machine_name() {
        let machine = MachineBuilder::new()
            .state(State::new("open"))
            .build()
            .unwrap();

        assert_eq!(machine.name(), DEFAULT_MACHINE);
    }

    #[test]
    fn states_adds_in_bulk() {
        let machine = MachineBuilder::new()
            .states([State::new("open"), State::new("closed")])
            .build()
            .unwrap();

        assert_eq!(machine.state_names(), vec!["open", "closed"]);
    }
}
