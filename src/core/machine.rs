//! Immutable machine definitions and transition resolution.

use serde::{Deserialize, Serialize};

use crate::core::error::{Rejection, RuntimeError};
use crate::core::event::Event;
use crate::core::state::State;
use crate::core::transition::Transition;
use crate::present;

/// Name of the machine addressed when a caller does not pick one explicitly.
pub const DEFAULT_MACHINE: &str = "default";

/// An immutable machine definition: states, events, and the initial state.
///
/// Machines are produced by [`MachineBuilder`](crate::MachineBuilder), which
/// validates the declaration, and never change afterwards. One `Machine`
/// value is safely shared by every instance of the host type.
///
/// Definitions compare structurally and serialize with serde, so a host can
/// snapshot a machine or check that two types expose the same shape.
///
/// # Example
///
/// ```rust
/// use statehood::{Event, MachineBuilder, State, Transition};
///
/// let machine = MachineBuilder::new()
///     .state(State::new("open"))
///     .state(State::new("closed"))
///     .event(Event::new("close").transition(Transition::new(["open"], "closed")))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.name(), "default");
/// assert_eq!(machine.initial_state(), "open");
/// assert_eq!(machine.state_names(), vec!["open", "closed"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    name: String,
    states: Vec<State>,
    events: Vec<Event>,
    initial: String,
}

impl Machine {
    /// Assemble a validated machine. Only the builder calls this.
    pub(crate) fn from_parts(
        name: String,
        states: Vec<State>,
        events: Vec<Event>,
        initial: String,
    ) -> Self {
        Self {
            name,
            states,
            events,
            initial,
        }
    }

    /// Get the machine's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the initial state.
    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    /// The declared states, in declaration order.
    ///
    /// Returns the full declarations, hook names included.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statehood::{MachineBuilder, State};
    ///
    /// let machine = MachineBuilder::new()
    ///     .state(State::new("open").on_exit("creak"))
    ///     .state(State::new("closed"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let states = machine.states();
    /// assert_eq!(states.len(), 2);
    /// assert_eq!(states[0].exit_hook(), Some("creak"));
    /// ```
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The declared events, in declaration order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statehood::{Event, MachineBuilder, State, Transition};
    ///
    /// let machine = MachineBuilder::new()
    ///     .state(State::new("open"))
    ///     .state(State::new("closed"))
    ///     .event(Event::new("close").transition(Transition::new(["open"], "closed")))
    ///     .build()
    ///     .unwrap();
    ///
    /// let close = &machine.events()[0];
    /// assert_eq!(close.name(), "close");
    /// assert_eq!(close.transitions().len(), 1);
    /// ```
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|state| state.name() == name)
    }

    /// Look up an event by name.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.name() == name)
    }

    /// Check whether a state name is declared on this machine.
    pub fn has_state(&self, name: &str) -> bool {
        self.state(name).is_some()
    }

    /// Declared state names, in declaration order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(State::name).collect()
    }

    /// Declared event names, in declaration order.
    pub fn event_names(&self) -> Vec<&str> {
        self.events.iter().map(Event::name).collect()
    }

    /// Ordered `(display label, state name)` pairs for presentation
    /// collaborators such as select widgets.
    ///
    /// Labels follow the [`present::humanize`] convention:
    /// `"shipped_back"` is shown as `"Shipped back"`.
    pub fn select_options(&self) -> Vec<(String, &str)> {
        self.states
            .iter()
            .map(|state| (present::humanize(state.name()), state.name()))
            .collect()
    }

    /// Select the transition that fires for `event` out of state `from`.
    ///
    /// Transitions are scanned in declaration order; a transition is a
    /// candidate when its source set covers `from`. For each candidate,
    /// `guard_check` is asked to evaluate the named guard against the host;
    /// the first candidate without a guard, or whose guard passes, wins.
    ///
    /// Failures are reported as [`RuntimeError::EventNotFired`] carrying a
    /// [`Rejection`]: `NoMatchingTransition` when no candidate covered
    /// `from` at all, `GuardRejected` when candidates existed but every
    /// guard declined. An unknown event name is
    /// [`RuntimeError::UnknownEvent`], and `guard_check` errors (a guard
    /// name missing from the hook table) propagate unchanged.
    pub fn resolve<F>(
        &self,
        event: &str,
        from: &str,
        mut guard_check: F,
    ) -> Result<&Transition, RuntimeError>
    where
        F: FnMut(&str) -> Result<bool, RuntimeError>,
    {
        let found = self.event(event).ok_or_else(|| RuntimeError::UnknownEvent {
            machine: self.name.clone(),
            name: event.to_string(),
        })?;

        let mut covered = false;
        for transition in found.transitions() {
            if !transition.covers(from) {
                continue;
            }
            covered = true;

            let passes = match transition.guard_name() {
                Some(guard) => guard_check(guard)?,
                None => true,
            };
            if passes {
                tracing::trace!(
                    machine = %self.name,
                    event,
                    from,
                    to = transition.to_state(),
                    "transition selected"
                );
                return Ok(transition);
            }
        }

        let rejection = if covered {
            Rejection::GuardRejected
        } else {
            Rejection::NoMatchingTransition
        };
        Err(RuntimeError::EventNotFired {
            machine: self.name.clone(),
            event: event.to_string(),
            from: from.to_string(),
            rejection,
        })
    }

    /// Every hook name the machine references: enter, exit, transition
    /// callbacks, and event success hooks.
    pub(crate) fn hook_names(&self) -> impl Iterator<Item = &str> {
        let state_hooks = self
            .states
            .iter()
            .flat_map(|state| state.enter_hook().into_iter().chain(state.exit_hook()));
        let event_hooks = self.events.iter().flat_map(|event| {
            event.success_hook().into_iter().chain(
                event
                    .transitions()
                    .iter()
                    .filter_map(Transition::callback_name),
            )
        });
        state_hooks.chain(event_hooks)
    }

    /// Every guard name the machine references.
    pub(crate) fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().flat_map(|event| {
            event
                .transitions()
                .iter()
                .filter_map(Transition::guard_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;

    fn door() -> Machine {
        MachineBuilder::new()
            .state(State::new("open").on_exit("exit"))
            .state(State::new("closed").on_enter("enter"))
            .state(State::new("locked"))
            .event(
                Event::new("close")
                    .success("success_callback")
                    .transition(Transition::new(["open"], "closed").callback("slam")),
            )
            .event(
                Event::new("lock")
                    .transition(Transition::new(["closed"], "locked").guard("has_key")),
            )
            .event(
                Event::new("shut")
                    .transition(Transition::new(["open"], "closed").guard("quietly"))
                    .transition(Transition::new(["open"], "locked")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn resolve_picks_first_matching_transition() {
        let machine = door();

        let transition = machine
            .resolve("close", "open", |_| panic!("no guards on close"))
            .unwrap();
        assert_eq!(transition.to_state(), "closed");
        assert_eq!(transition.callback_name(), Some("slam"));
    }

    #[test]
    fn resolve_unknown_event_errors() {
        let machine = door();

        let result = machine.resolve("explode", "open", |_| Ok(true));
        assert!(matches!(
            result,
            Err(RuntimeError::UnknownEvent { ref name, .. }) if name == "explode"
        ));
    }

    #[test]
    fn uncovered_state_is_no_matching_transition() {
        let machine = door();

        let result = machine.resolve("close", "locked", |_| Ok(true));
        assert!(matches!(
            result,
            Err(RuntimeError::EventNotFired {
                rejection: Rejection::NoMatchingTransition,
                ..
            })
        ));
    }

    #[test]
    fn declined_guards_are_guard_rejected() {
        let machine = door();

        let result = machine.resolve("lock", "closed", |_| Ok(false));
        assert!(matches!(
            result,
            Err(RuntimeError::EventNotFired {
                rejection: Rejection::GuardRejected,
                ..
            })
        ));
    }

    #[test]
    fn declined_guard_falls_through_to_next_transition() {
        let machine = door();

        // "shut" declares a guarded transition to closed first, then an
        // unguarded one to locked.
        let transition = machine
            .resolve("shut", "open", |guard| Ok(guard != "quietly"))
            .unwrap();
        assert_eq!(transition.to_state(), "locked");
    }

    #[test]
    fn guard_errors_propagate() {
        let machine = door();

        let result = machine.resolve("lock", "closed", |guard| {
            Err(RuntimeError::UnknownHook {
                name: guard.to_string(),
            })
        });
        assert!(matches!(
            result,
            Err(RuntimeError::UnknownHook { ref name }) if name == "has_key"
        ));
    }

    #[test]
    fn select_options_humanize_names() {
        let machine = MachineBuilder::new()
            .state(State::new("open"))
            .state(State::new("shipped_back"))
            .event(Event::new("ship").transition(Transition::new(["open"], "shipped_back")))
            .build()
            .unwrap();

        assert_eq!(
            machine.select_options(),
            vec![
                ("Open".to_string(), "open"),
                ("Shipped back".to_string(), "shipped_back"),
            ]
        );
    }

    #[test]
    fn lookups_find_declared_names() {
        let machine = door();

        assert!(machine.has_state("locked"));
        assert!(!machine.has_state("ajar"));
        assert_eq!(machine.event("close").unwrap().name(), "close");
        assert_eq!(machine.state("open").unwrap().exit_hook(), Some("exit"));
        assert_eq!(machine.event_names(), vec!["close", "lock", "shut"]);
    }

    #[test]
    fn declarations_are_readable_in_order() {
        let machine = door();

        let names: Vec<&str> = machine.states().iter().map(State::name).collect();
        assert_eq!(names, ["open", "closed", "locked"]);
        assert_eq!(machine.events().len(), 3);
        assert_eq!(machine.events()[2].transitions().len(), 2);
    }

    #[test]
    fn hook_and_guard_names_cover_the_whole_machine() {
        let machine = door();

        let hooks: Vec<_> = machine.hook_names().collect();
        assert!(hooks.contains(&"exit"));
        assert!(hooks.contains(&"enter"));
        assert!(hooks.contains(&"slam"));
        assert!(hooks.contains(&"success_callback"));

        let guards: Vec<_> = machine.guard_names().collect();
        assert_eq!(guards, vec!["has_key", "quietly"]);
    }

    #[test]
    fn machine_serializes_correctly() {
        let machine = door();
        let json = serde_json::to_string(&machine).unwrap();
        let deserialized: Machine = serde_json::from_str(&json).unwrap();

        assert_eq!(machine, deserialized);
    }
}
