//! Directed edges between states, scoped to an event.

use serde::{Deserialize, Serialize};

/// One candidate state change belonging to an event.
///
/// A transition covers a set of source states and names a single
/// destination. An optional guard decides at fire time whether the
/// transition may proceed; an optional callback runs after the source
/// state's exit hook, with the invocation's arguments forwarded.
///
/// Sibling transitions on one event are evaluated in declaration order,
/// and their source sets may overlap; the first covering transition whose
/// guard passes wins.
///
/// # Example
///
/// ```rust
/// use statehood::Transition;
///
/// let t = Transition::new(["open", "ajar"], "closed")
///     .guard("door_unblocked")
///     .callback("slam");
///
/// assert!(t.covers("ajar"));
/// assert!(!t.covers("closed"));
/// assert_eq!(t.to_state(), "closed");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    from: Vec<String>,
    to: String,
    guard: Option<String>,
    callback: Option<String>,
}

impl Transition {
    /// Declare a transition from any of `from` into `to`.
    pub fn new<I, S>(from: I, to: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into_iter().map(Into::into).collect(),
            to: to.into(),
            guard: None,
            callback: None,
        }
    }

    /// Name the guard that must pass for this transition to fire.
    pub fn guard(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(name.into());
        self
    }

    /// Name the callback to run while this transition executes.
    pub fn callback(mut self, name: impl Into<String>) -> Self {
        self.callback = Some(name.into());
        self
    }

    /// Check whether `state` is one of this transition's sources.
    pub fn covers(&self, state: &str) -> bool {
        self.from.iter().any(|from| from == state)
    }

    /// The declared source states, in declaration order.
    pub fn from_states(&self) -> &[String] {
        &self.from
    }

    /// The destination state name.
    pub fn to_state(&self) -> &str {
        &self.to
    }

    /// Name of the guard, if one is declared.
    pub fn guard_name(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    /// Name of the callback, if one is declared.
    pub fn callback_name(&self) -> Option<&str> {
        self.callback.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_matches_declared_sources() {
        let transition = Transition::new(["open", "ajar"], "closed");

        assert!(transition.covers("open"));
        assert!(transition.covers("ajar"));
        assert!(!transition.covers("closed"));
        assert!(!transition.covers("locked"));
    }

    #[test]
    fn guard_and_callback_are_optional() {
        let bare = Transition::new(["open"], "closed");
        assert_eq!(bare.guard_name(), None);
        assert_eq!(bare.callback_name(), None);

        let full = Transition::new(["open"], "closed")
            .guard("unblocked")
            .callback("slam");
        assert_eq!(full.guard_name(), Some("unblocked"));
        assert_eq!(full.callback_name(), Some("slam"));
    }

    #[test]
    fn transition_serializes_correctly() {
        let transition = Transition::new(["open"], "closed").guard("unblocked");
        let json = serde_json::to_string(&transition).unwrap();
        let deserialized: Transition = serde_json::from_str(&json).unwrap();

        assert_eq!(transition, deserialized);
    }
}
