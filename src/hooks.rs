//! Registered hook and guard tables for a host type.
//!
//! Machines reference hooks and guards by name; this module holds the
//! closures those names stand for. The table is registered once per host
//! type, so name references can be validated when a machine is defined
//! instead of failing on first use.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::RuntimeError;

/// A lifecycle hook: runs against the host with the invocation arguments.
pub type HookFn<H> = Arc<dyn Fn(&mut H, &Args<'_>) + Send + Sync>;

/// A guard predicate: reads the host and decides whether a transition may
/// proceed. Guards must not mutate, so resolution stays side-effect free.
pub type GuardFn<H> = Arc<dyn Fn(&H, &Args<'_>) -> bool + Send + Sync>;

/// Arguments forwarded from an event invocation to guards and transition
/// callbacks.
///
/// The pack borrows each value as `&dyn Any`; hooks recover them by
/// position with [`Args::get`]. Guards and the selected transition's
/// callback receive the caller's arguments; enter, exit, and success hooks
/// run with an empty pack.
///
/// The [`args!`](crate::args) macro builds a pack in place:
///
/// ```rust
/// use statehood::{args, Args};
///
/// let reason = String::from("maintenance");
/// let pack = args![reason, 3_u32];
///
/// assert_eq!(pack.get::<String>(0).map(String::as_str), Some("maintenance"));
/// assert_eq!(pack.get::<u32>(1), Some(&3));
/// ```
pub struct Args<'a> {
    values: Vec<&'a dyn Any>,
}

impl<'a> Args<'a> {
    /// An empty pack.
    pub fn none() -> Self {
        Self { values: Vec::new() }
    }

    /// Wrap already-borrowed values.
    pub fn new(values: Vec<&'a dyn Any>) -> Self {
        Self { values }
    }

    /// Recover the value at `index` as a `T`. Returns `None` when the
    /// position is absent or holds a different type.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&'a T> {
        self.values.get(index).copied().and_then(<dyn Any>::downcast_ref)
    }

    /// Number of values in the pack.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the pack is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Args<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// The hook table for a host type `H`.
///
/// Hooks mutate the host; guards only read it. The two namespaces are
/// independent: a hook and a guard may share a name without clashing.
///
/// # Example
///
/// ```rust
/// use statehood::{Args, Hooks};
///
/// struct Door {
///     slams: u32,
/// }
///
/// let hooks = Hooks::new()
///     .hook("slam", |door: &mut Door, _args: &Args| door.slams += 1)
///     .guard("gentle_so_far", |door: &Door, _args: &Args| door.slams < 3);
///
/// assert!(hooks.has_hook("slam"));
/// assert!(hooks.has_guard("gentle_so_far"));
/// assert!(!hooks.has_hook("gentle_so_far"));
/// ```
pub struct Hooks<H> {
    hooks: HashMap<String, HookFn<H>>,
    guards: HashMap<String, GuardFn<H>>,
}

impl<H> Hooks<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register a hook under `name`, replacing any previous one.
    pub fn hook(
        mut self,
        name: impl Into<String>,
        hook: impl Fn(&mut H, &Args<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Register a guard under `name`, replacing any previous one.
    pub fn guard(
        mut self,
        name: impl Into<String>,
        guard: impl Fn(&H, &Args<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.guards.insert(name.into(), Arc::new(guard));
        self
    }

    /// Check whether a hook is registered under `name`.
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Check whether a guard is registered under `name`.
    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    /// Registered hook names, in no particular order.
    pub(crate) fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// Registered guard names, in no particular order.
    pub(crate) fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.guards.keys().map(String::as_str)
    }

    /// Run the named hook against the host.
    pub(crate) fn run_hook(
        &self,
        name: &str,
        host: &mut H,
        args: &Args<'_>,
    ) -> Result<(), RuntimeError> {
        let hook = self.hooks.get(name).ok_or_else(|| RuntimeError::UnknownHook {
            name: name.to_string(),
        })?;
        hook(host, args);
        Ok(())
    }

    /// Evaluate the named guard against the host.
    pub(crate) fn check_guard(
        &self,
        name: &str,
        host: &H,
        args: &Args<'_>,
    ) -> Result<bool, RuntimeError> {
        let guard = self.guards.get(name).ok_or_else(|| RuntimeError::UnknownHook {
            name: name.to_string(),
        })?;
        Ok(guard(host, args))
    }
}

impl<H> Default for Hooks<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Door {
        slams: u32,
        locked: bool,
    }

    fn door() -> Door {
        Door {
            slams: 0,
            locked: false,
        }
    }

    #[test]
    fn registered_hook_runs_against_host() {
        let hooks = Hooks::new().hook("slam", |door: &mut Door, _args: &Args| door.slams += 1);
        let mut host = door();

        hooks.run_hook("slam", &mut host, &Args::none()).unwrap();
        hooks.run_hook("slam", &mut host, &Args::none()).unwrap();

        assert_eq!(host.slams, 2);
    }

    #[test]
    fn missing_hook_is_unknown_hook() {
        let hooks: Hooks<Door> = Hooks::new();
        let mut host = door();

        let result = hooks.run_hook("slam", &mut host, &Args::none());
        assert!(matches!(
            result,
            Err(RuntimeError::UnknownHook { ref name }) if name == "slam"
        ));
    }

    #[test]
    fn guard_reads_host_state() {
        let hooks = Hooks::new().guard("unlocked", |door: &Door, _args: &Args| !door.locked);
        let mut host = door();

        assert!(hooks.check_guard("unlocked", &host, &Args::none()).unwrap());
        host.locked = true;
        assert!(!hooks.check_guard("unlocked", &host, &Args::none()).unwrap());
    }

    #[test]
    fn missing_guard_is_unknown_hook() {
        let hooks: Hooks<Door> = Hooks::new();
        let host = door();

        let result = hooks.check_guard("unlocked", &host, &Args::none());
        assert!(matches!(result, Err(RuntimeError::UnknownHook { .. })));
    }

    #[test]
    fn hook_and_guard_namespaces_are_independent() {
        let hooks = Hooks::new()
            .hook("check", |_door: &mut Door, _args: &Args| {})
            .guard("check", |_door: &Door, _args: &Args| true);

        assert!(hooks.has_hook("check"));
        assert!(hooks.has_guard("check"));
    }

    #[test]
    fn args_downcast_by_position() {
        let count = 3_u32;
        let label = String::from("gently");
        let values: Vec<&dyn std::any::Any> = vec![&count, &label];
        let args = Args::new(values);

        assert_eq!(args.len(), 2);
        assert_eq!(args.get::<u32>(0), Some(&3));
        assert_eq!(args.get::<String>(1).map(String::as_str), Some("gently"));
    }

    #[test]
    fn wrong_type_or_position_is_none() {
        let count = 3_u32;
        let values: Vec<&dyn std::any::Any> = vec![&count];
        let args = Args::new(values);

        assert_eq!(args.get::<String>(0), None);
        assert_eq!(args.get::<u32>(1), None);
    }

    #[test]
    fn empty_pack_reports_empty() {
        let args = Args::none();

        assert!(args.is_empty());
        assert_eq!(args.len(), 0);
    }
}
