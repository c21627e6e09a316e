//! Named triggers holding ordered candidate transitions.

use serde::{Deserialize, Serialize};

use crate::core::transition::Transition;

/// A named trigger an instance can invoke to attempt a state change.
///
/// An event owns its candidate transitions in declaration order and may
/// name a success hook, which runs last once a transition completes.
///
/// # Example
///
/// ```rust
/// use statehood::{Event, Transition};
///
/// let close = Event::new("close")
///     .success("notify")
///     .transition(Transition::new(["open"], "closed"));
///
/// assert_eq!(close.name(), "close");
/// assert_eq!(close.transitions().len(), 1);
/// assert_eq!(close.success_hook(), Some("notify"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    transitions: Vec<Transition>,
    success: Option<String>,
}

impl Event {
    /// Declare an event with no transitions yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            success: None,
        }
    }

    /// Append a candidate transition. Call order is evaluation order.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Name the hook to run after this event fires successfully.
    pub fn success(mut self, hook: impl Into<String>) -> Self {
        self.success = Some(hook.into());
        self
    }

    /// Get the event's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The candidate transitions, in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Name of the success hook, if one is declared.
    pub fn success_hook(&self) -> Option<&str> {
        self.success.as_deref()
    }
}
