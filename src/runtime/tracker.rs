//! Per-instance state tracking and event invocation.

use std::collections::HashMap;

use crate::core::{Machine, Rejection, RuntimeError, DEFAULT_MACHINE};
use crate::hooks::Args;
use crate::persist::StateStore;
use crate::registry::MachineSet;

/// Runtime adapter owning one instance's current state, per machine.
///
/// A tracker pairs a host instance with a [`MachineSet`]: it answers state
/// queries and fires events, running the lifecycle hooks in their fixed
/// order. It assumes single-threaded use per instance; the `&mut self`
/// receivers make the borrow checker serialize invocations.
///
/// Events come in two forms. [`fire`](Self::fire) is the non-raising form:
/// a rejected transition (no match, declined guard, store veto) returns
/// `Ok(false)`. [`fire_strict`](Self::fire_strict) is the raising form: the
/// same rejection becomes [`RuntimeError::EventNotFired`]. Everything else
/// (unknown machine, unknown event) is an error in both forms.
///
/// # Example
///
/// ```rust
/// use statehood::{Args, Event, Hooks, MachineBuilder, MachineSet, State, Tracker, Transition};
///
/// struct Door {
///     slams: u32,
/// }
///
/// let machine = MachineBuilder::new()
///     .state(State::new("open"))
///     .state(State::new("closed"))
///     .event(Event::new("close").transition(Transition::new(["open"], "closed").callback("slam")))
///     .build()?;
/// let hooks = Hooks::new().hook("slam", |door: &mut Door, _args: &Args| door.slams += 1);
/// let set = MachineSet::assemble(vec![machine], hooks)?;
///
/// let mut door = Door { slams: 0 };
/// let mut tracker = Tracker::attach(set);
///
/// assert_eq!(tracker.current_state(&door)?, "open");
/// assert!(tracker.fire(&mut door, "close")?);
/// assert!(tracker.in_state(&door, "closed")?);
/// assert_eq!(door.slams, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Tracker<H> {
    set: MachineSet<H>,
    current: HashMap<String, String>,
    store: Option<Box<dyn StateStore<H>>>,
}

impl<H> Tracker<H> {
    /// Create a tracker over a machine set, with no store attached.
    pub fn attach(set: MachineSet<H>) -> Self {
        Self {
            set,
            current: HashMap::new(),
            store: None,
        }
    }

    /// Attach a persistence store. Its reads take priority over the
    /// in-memory state, and its writes may veto transitions.
    pub fn with_store(mut self, store: impl StateStore<H> + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// The machine set this tracker runs against.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statehood::{Hooks, MachineBuilder, MachineSet, State, Tracker};
    ///
    /// let machine = MachineBuilder::new()
    ///     .state(State::new("open"))
    ///     .state(State::new("closed"))
    ///     .build()?;
    /// let set = MachineSet::<()>::assemble(vec![machine], Hooks::new())?;
    /// let tracker = Tracker::attach(set);
    ///
    /// assert_eq!(tracker.set().default_machine().unwrap().initial_state(), "open");
    /// # Ok::<(), statehood::DefinitionError>(())
    /// ```
    pub fn set(&self) -> &MachineSet<H> {
        &self.set
    }

    /// Current state of the `"default"` machine.
    pub fn current_state(&self, host: &H) -> Result<String, RuntimeError> {
        self.current_state_of(host, DEFAULT_MACHINE)
    }

    /// Current state of a named machine: the store's answer if one is
    /// attached and has a value, else the in-memory state, else the
    /// machine's initial state.
    pub fn current_state_of(&self, host: &H, machine: &str) -> Result<String, RuntimeError> {
        let machine = self.set.require(machine)?;
        Ok(self.state_for(host, machine))
    }

    /// Check whether the `"default"` machine is in `state`.
    pub fn in_state(&self, host: &H, state: &str) -> Result<bool, RuntimeError> {
        self.in_state_of(host, DEFAULT_MACHINE, state)
    }

    /// Check whether a named machine is in `state`. Asking about a state
    /// the machine does not declare is [`RuntimeError::UnknownState`].
    pub fn in_state_of(&self, host: &H, machine: &str, state: &str) -> Result<bool, RuntimeError> {
        let machine = self.set.require(machine)?;
        if !machine.has_state(state) {
            return Err(RuntimeError::UnknownState {
                machine: machine.name().to_string(),
                name: state.to_string(),
            });
        }
        Ok(self.state_for(host, machine) == state)
    }

    /// Move a machine to `state` directly: no hooks, no store write.
    ///
    /// This is for seeding an instance that resumes mid-lifecycle, not for
    /// ordinary operation; transitions go through [`fire`](Self::fire).
    pub fn set_state(&mut self, machine: &str, state: &str) -> Result<(), RuntimeError> {
        let found = self.set.require(machine)?;
        if !found.has_state(state) {
            return Err(RuntimeError::UnknownState {
                machine: found.name().to_string(),
                name: state.to_string(),
            });
        }
        let name = found.name().to_string();
        self.current.insert(name, state.to_string());
        Ok(())
    }

    /// Fire an event on the `"default"` machine, with no arguments.
    /// Returns `Ok(false)` when the transition is rejected.
    pub fn fire(&mut self, host: &mut H, event: &str) -> Result<bool, RuntimeError> {
        self.fire_with(host, DEFAULT_MACHINE, event, &Args::none())
    }

    /// Fire an event on a named machine, forwarding `args` to the guard
    /// and the transition callback. Returns `Ok(false)` when rejected.
    pub fn fire_with(
        &mut self,
        host: &mut H,
        machine: &str,
        event: &str,
        args: &Args<'_>,
    ) -> Result<bool, RuntimeError> {
        match self.run_event(host, machine, event, args) {
            Ok(()) => Ok(true),
            Err(RuntimeError::EventNotFired {
                machine,
                event,
                from,
                rejection,
            }) => {
                tracing::debug!(
                    machine = %machine,
                    event = %event,
                    from = %from,
                    %rejection,
                    "event not fired"
                );
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    /// Raising form of [`fire`](Self::fire): a rejected transition is
    /// [`RuntimeError::EventNotFired`].
    pub fn fire_strict(&mut self, host: &mut H, event: &str) -> Result<(), RuntimeError> {
        self.fire_strict_with(host, DEFAULT_MACHINE, event, &Args::none())
    }

    /// Raising form of [`fire_with`](Self::fire_with).
    pub fn fire_strict_with(
        &mut self,
        host: &mut H,
        machine: &str,
        event: &str,
        args: &Args<'_>,
    ) -> Result<(), RuntimeError> {
        self.run_event(host, machine, event, args)
    }

    /// One invocation, in fixed order: resolve, exit(old), transition
    /// callback, persist, enter(new), success. Hook panics propagate as-is;
    /// the only rollback is the in-memory one on a store veto.
    fn run_event(
        &mut self,
        host: &mut H,
        machine_name: &str,
        event: &str,
        args: &Args<'_>,
    ) -> Result<(), RuntimeError> {
        let machine = self.set.require(machine_name)?.clone();
        let hooks = self.set.hooks().clone();

        let from = self.state_for(host, &machine);
        let transition =
            machine.resolve(event, &from, |guard| hooks.check_guard(guard, host, args))?;
        let to = transition.to_state().to_string();
        let callback = transition.callback_name().map(str::to_string);
        let exit = machine
            .state(&from)
            .and_then(|state| state.exit_hook())
            .map(str::to_string);
        let enter = machine
            .state(&to)
            .and_then(|state| state.enter_hook())
            .map(str::to_string);
        let success = machine
            .event(event)
            .and_then(|found| found.success_hook())
            .map(str::to_string);

        if let Some(hook) = &exit {
            hooks.run_hook(hook, host, &Args::none())?;
        }
        if let Some(hook) = &callback {
            hooks.run_hook(hook, host, args)?;
        }

        let previous = self.current.insert(machine.name().to_string(), to.clone());
        if let Some(store) = self.store.as_mut() {
            if !store.write(host, machine.name(), &to) {
                // Roll the in-memory state back to the pre-transition value.
                match previous {
                    Some(prior) => {
                        self.current.insert(machine.name().to_string(), prior);
                    }
                    None => {
                        self.current.remove(machine.name());
                    }
                }
                return Err(RuntimeError::EventNotFired {
                    machine: machine.name().to_string(),
                    event: event.to_string(),
                    from,
                    rejection: Rejection::PersistenceVeto,
                });
            }
        }

        if let Some(hook) = &enter {
            hooks.run_hook(hook, host, &Args::none())?;
        }
        if let Some(hook) = &success {
            hooks.run_hook(hook, host, &Args::none())?;
        }

        tracing::debug!(
            machine = machine.name(),
            event,
            from = %from,
            to = %to,
            "transition applied"
        );
        Ok(())
    }

    fn state_for(&self, host: &H, machine: &Machine) -> String {
        if let Some(store) = &self.store {
            if let Some(state) = store.read(host, machine.name()) {
                return state;
            }
        }
        self.current
            .get(machine.name())
            .cloned()
            .unwrap_or_else(|| machine.initial_state().to_string())
    }
}


#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{Event, State, Transition};
    use crate::hooks::Hooks;
    use crate::persist::MemoryStore;

    struct Door {
        log: Vec<String>,
    }

    fn door() -> Door {
        Door { log: Vec::new() }
    }

    fn door_hooks() -> Hooks<Door> {
        Hooks::new()
            .hook("exit", |door: &mut Door, _args: &Args| {
                door.log.push("exit".to_string())
            })
            .hook("enter", |door: &mut Door, _args: &Args| {
                door.log.push("enter".to_string())
            })
            .hook("slam", |door: &mut Door, _args: &Args| {
                door.log.push("slam".to_string())
            })
            .hook("success_callback", |door: &mut Door, _args: &Args| {
                door.log.push("success_callback".to_string())
            })
    }

    fn door_machine() -> Machine {
        MachineBuilder::new()
            .state(State::new("open").on_exit("exit"))
            .state(State::new("closed").on_enter("enter"))
            .event(
                Event::new("close")
                    .success("success_callback")
                    .transition(Transition::new(["open"], "closed").callback("slam")),
            )
            .event(Event::new("reopen").transition(Transition::new(["closed"], "open")))
            .build()
            .unwrap()
    }

    fn tracker_with<S: StateStore<Door> + 'static>(store: S) -> Tracker<Door> {
        Tracker::attach(MachineSet::assemble(vec![door_machine()], door_hooks()).unwrap())
            .with_store(store)
    }

    /// Marks its write in the host's log, between the hooks.
    struct MarkingStore;

    impl StateStore<Door> for MarkingStore {
        fn read(&self, _host: &Door, _machine: &str) -> Option<String> {
            None
        }

        fn write(&mut self, host: &mut Door, _machine: &str, _to: &str) -> bool {
            host.log.push("write".to_string());
            true
        }
    }

    struct VetoStore;

    impl StateStore<Door> for VetoStore {
        fn read(&self, _host: &Door, _machine: &str) -> Option<String> {
            None
        }

        fn write(&mut self, _host: &mut Door, _machine: &str, _to: &str) -> bool {
            false
        }
    }

    #[test]
    fn hooks_run_in_fixed_order_around_the_write() {
        let mut host = door();
        let mut tracker = tracker_with(MarkingStore);

        assert!(tracker.fire(&mut host, "close").unwrap());
        assert_eq!(
            host.log,
            vec!["exit", "slam", "write", "enter", "success_callback"]
        );
    }

    #[test]
    fn veto_rolls_back_to_the_initial_state() {
        let mut host = door();
        let mut tracker = tracker_with(VetoStore);

        assert!(!tracker.fire(&mut host, "close").unwrap());
        assert_eq!(tracker.current_state(&host).unwrap(), "open");

        let result = tracker.fire_strict(&mut host, "close");
        assert!(matches!(
            result,
            Err(RuntimeError::EventNotFired {
                rejection: Rejection::PersistenceVeto,
                ..
            })
        ));
    }

    #[test]
    fn veto_rolls_back_to_the_previous_state() {
        let mut host = door();
        let mut tracker = tracker_with(VetoStore);
        tracker.set_state(DEFAULT_MACHINE, "closed").unwrap();

        assert!(!tracker.fire(&mut host, "reopen").unwrap());
        assert_eq!(tracker.current_state(&host).unwrap(), "closed");
    }

    #[test]
    fn veto_skips_enter_and_success_hooks() {
        let mut host = door();
        let mut tracker = tracker_with(VetoStore);

        tracker.fire(&mut host, "close").unwrap();
        assert_eq!(host.log, vec!["exit", "slam"]);
    }

    #[test]
    fn store_read_takes_priority_over_memory() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.write(&mut door(), "default", "closed");

        let host = door();
        let tracker = tracker_with(store);
        assert_eq!(tracker.current_state(&host).unwrap(), "closed");
    }

    #[test]
    fn accepted_writes_land_in_the_store() {
        let store = MemoryStore::new();
        let mut host = door();
        let mut tracker = tracker_with(store.clone());

        tracker.fire(&mut host, "close").unwrap();

        assert_eq!(store.state_of("default"), Some("closed".to_string()));
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to, "closed");
    }
}
