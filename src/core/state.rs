//! Named states with optional lifecycle hooks.

use serde::{Deserialize, Serialize};

/// A named state within a machine.
///
/// States are plain descriptions: the name identifies the state, and the
/// optional enter/exit hook names are looked up in the host's hook table
/// when a transition crosses this state. States are built once during
/// machine declaration and never change afterwards.
///
/// # Example
///
/// ```rust
/// use statehood::State;
///
/// let open = State::new("open").on_exit("log_exit");
/// let closed = State::new("closed").on_enter("log_enter");
///
/// assert_eq!(open.name(), "open");
/// assert_eq!(open.exit_hook(), Some("log_exit"));
/// assert_eq!(closed.enter_hook(), Some("log_enter"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    name: String,
    enter: Option<String>,
    exit: Option<String>,
}

impl State {
    /// Declare a state with no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enter: None,
            exit: None,
        }
    }

    /// Name the hook to run when a transition arrives at this state.
    pub fn on_enter(mut self, hook: impl Into<String>) -> Self {
        self.enter = Some(hook.into());
        self
    }

    /// Name the hook to run when a transition leaves this state.
    pub fn on_exit(mut self, hook: impl Into<String>) -> Self {
        self.exit = Some(hook.into());
        self
    }

    /// Get the state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the enter hook, if one is declared.
    pub fn enter_hook(&self) -> Option<&str> {
        self.enter.as_deref()
    }

    /// Name of the exit hook, if one is declared.
    pub fn exit_hook(&self) -> Option<&str> {
        self.exit.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hooks_default_to_none() {
        let state = State::new("open");

        assert_eq!(state.name(), "open");
        assert_eq!(state.enter_hook(), None);
        assert_eq!(state.exit_hook(), None);
    }

    #[test]
    fn state_carries_hook_names() {
        let state = State::new("closed").on_enter("enter").on_exit("exit");

        assert_eq!(state.enter_hook(), Some("enter"));
        assert_eq!(state.exit_hook(), Some("exit"));
    }

    #[test]
    fn state_serializes_correctly() {
        let state = State::new("open").on_exit("exit");
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: State = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
