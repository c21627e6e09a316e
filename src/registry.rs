//! Per-host-type machine registration and inheritance.
//!
//! The registry maps each host type (by `TypeId`) to its hook table and
//! its named machines. Subtypes declare their parent explicitly and
//! inherit the parent's machines lazily: the copy happens the first time
//! the subtype is resolved, under the registry lock, so concurrent first
//! reads cannot seed an entry twice or halfway. Machines a parent defines
//! after that snapshot do not appear on the already-materialized subtype.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::builder::{DefinitionError, MachineBuilder};
use crate::core::{Machine, RuntimeError, DEFAULT_MACHINE};
use crate::hooks::Hooks;

/// The machines and hook table a [`Tracker`](crate::Tracker) runs against,
/// for one host type.
///
/// A set is an immutable snapshot: registry changes made after
/// [`MachineRegistry::resolve`] returned it are not reflected. Machine
/// definitions are shared by `Arc`, so snapshots are cheap and two sets can
/// expose the very same machine value.
///
/// Hosts that do not want a registry can assemble a set directly:
///
/// ```rust
/// use statehood::{Event, Hooks, MachineBuilder, MachineSet, State, Transition};
///
/// struct Door;
///
/// let machine = MachineBuilder::new()
///     .state(State::new("open"))
///     .state(State::new("closed"))
///     .event(Event::new("close").transition(Transition::new(["open"], "closed")))
///     .build()?;
/// let set = MachineSet::<Door>::assemble(vec![machine], Hooks::new())?;
///
/// assert_eq!(set.machine("default").unwrap().initial_state(), "open");
/// # Ok::<(), statehood::DefinitionError>(())
/// ```
pub struct MachineSet<H> {
    host: &'static str,
    machines: Vec<Arc<Machine>>,
    hooks: Arc<Hooks<H>>,
}

impl<H> MachineSet<H> {
    /// Build a set without a registry, with the same validation as
    /// registration: unique machine names, and every referenced hook and
    /// guard present in the table.
    pub fn assemble(machines: Vec<Machine>, hooks: Hooks<H>) -> Result<Self, DefinitionError> {
        let host = type_name::<H>();
        let hook_names: HashSet<String> = hooks.hook_names().map(str::to_string).collect();
        let guard_names: HashSet<String> = hooks.guard_names().map(str::to_string).collect();

        let mut seen = HashSet::new();
        for machine in &machines {
            if !seen.insert(machine.name().to_string()) {
                return Err(DefinitionError::DuplicateMachine {
                    machine: machine.name().to_string(),
                    host,
                });
            }
            check_references(machine, &hook_names, &guard_names, host)?;
        }

        Ok(Self {
            host,
            machines: machines.into_iter().map(Arc::new).collect(),
            hooks: Arc::new(hooks),
        })
    }

    fn from_parts(host: &'static str, machines: Vec<Arc<Machine>>, hooks: Arc<Hooks<H>>) -> Self {
        Self {
            host,
            machines,
            hooks,
        }
    }

    /// The host type's name, for diagnostics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statehood::{Hooks, MachineBuilder, MachineSet, State};
    ///
    /// struct Door;
    ///
    /// let machine = MachineBuilder::new()
    ///     .state(State::new("open"))
    ///     .state(State::new("closed"))
    ///     .build()?;
    /// let set = MachineSet::<Door>::assemble(vec![machine], Hooks::new())?;
    ///
    /// assert!(set.host().ends_with("Door"));
    /// # Ok::<(), statehood::DefinitionError>(())
    /// ```
    pub fn host(&self) -> &'static str {
        self.host
    }

    /// Every machine in the set, in definition order.
    pub fn machines(&self) -> &[Arc<Machine>] {
        &self.machines
    }

    /// Look up a machine by name.
    pub fn machine(&self, name: &str) -> Option<&Arc<Machine>> {
        self.machines.iter().find(|machine| machine.name() == name)
    }

    /// The machine named `"default"`, if the host declares one.
    pub fn default_machine(&self) -> Option<&Arc<Machine>> {
        self.machine(DEFAULT_MACHINE)
    }

    pub(crate) fn require(&self, name: &str) -> Result<&Arc<Machine>, RuntimeError> {
        self.machine(name).ok_or_else(|| RuntimeError::UnknownMachine {
            host: self.host,
            name: name.to_string(),
        })
    }

    pub(crate) fn hooks(&self) -> &Arc<Hooks<H>> {
        &self.hooks
    }
}

impl<H> Clone for MachineSet<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host,
            machines: self.machines.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

struct MachineSlot {
    machine: Arc<Machine>,
    inherited: bool,
}

struct TypeEntry {
    host: &'static str,
    machines: Vec<MachineSlot>,
    hooks: Arc<dyn Any + Send + Sync>,
    // Name snapshots let inherited machines be validated against a type's
    // table without knowing the type parameter.
    hook_names: HashSet<String>,
    guard_names: HashSet<String>,
    parent: Option<TypeId>,
    seeded: bool,
}

/// Registry of machine definitions, keyed by concrete host type.
///
/// Usage order per type: [`register`](Self::register) the hook table (or
/// [`register_sub`](Self::register_sub) to also declare the parent type),
/// then [`define`](Self::define) each machine, then
/// [`resolve`](Self::resolve) snapshots for trackers. Machines are
/// validated against the hook table when defined, so a resolved set never
/// references a missing hook.
///
/// # Example
///
/// ```rust
/// use statehood::{Event, Hooks, MachineBuilder, MachineRegistry, State, Transition};
///
/// struct Door;
///
/// let registry = MachineRegistry::new();
/// registry.register::<Door>(Hooks::new())?;
/// registry.define::<Door>(
///     MachineBuilder::new()
///         .state(State::new("open"))
///         .state(State::new("closed"))
///         .event(Event::new("close").transition(Transition::new(["open"], "closed"))),
/// )?;
///
/// let set = registry.resolve::<Door>()?;
/// assert_eq!(set.machines().len(), 1);
/// # Ok::<(), statehood::DefinitionError>(())
/// ```
pub struct MachineRegistry {
    entries: Mutex<HashMap<TypeId, TypeEntry>>,
}

impl MachineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register the hook table for a root host type.
    pub fn register<H: 'static>(&self, hooks: Hooks<H>) -> Result<(), DefinitionError> {
        self.insert_entry(hooks, None)
    }

    /// Register the hook table for a host type that inherits machines from
    /// `P`. The parent must already be registered.
    pub fn register_sub<C: 'static, P: 'static>(
        &self,
        hooks: Hooks<C>,
    ) -> Result<(), DefinitionError> {
        self.insert_entry(hooks, Some((TypeId::of::<P>(), type_name::<P>())))
    }

    /// Build the machine and file it under the host type.
    ///
    /// Besides builder validation, every hook and guard the machine
    /// references must exist in the host's table. A machine whose name the
    /// host only inherited is replaced; redefining the host's own machine
    /// is an error.
    pub fn define<H: 'static>(&self, builder: MachineBuilder) -> Result<(), DefinitionError> {
        let machine = builder.build()?;
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(&TypeId::of::<H>()) else {
            return Err(DefinitionError::UnregisteredType {
                host: type_name::<H>(),
            });
        };

        check_references(&machine, &entry.hook_names, &entry.guard_names, entry.host)?;

        if let Some(slot) = entry
            .machines
            .iter_mut()
            .find(|slot| slot.machine.name() == machine.name())
        {
            if !slot.inherited {
                return Err(DefinitionError::DuplicateMachine {
                    machine: machine.name().to_string(),
                    host: entry.host,
                });
            }
            tracing::debug!(
                host = entry.host,
                machine = machine.name(),
                "inherited machine overridden"
            );
            slot.machine = Arc::new(machine);
            slot.inherited = false;
            return Ok(());
        }

        tracing::debug!(host = entry.host, machine = machine.name(), "machine defined");
        entry.machines.push(MachineSlot {
            machine: Arc::new(machine),
            inherited: false,
        });
        Ok(())
    }

    /// Snapshot the host type's machines and hook table.
    ///
    /// The first resolve for a subtype seeds its entry with the parent's
    /// machines as of this moment (names the subtype already defined are
    /// kept); the seed happens once, and later parent definitions are not
    /// picked up. Seeding fails if the subtype's table does not cover a
    /// hook or guard an inherited machine references.
    pub fn resolve<H: 'static>(&self) -> Result<MachineSet<H>, DefinitionError> {
        let mut entries = self.lock();
        let id = TypeId::of::<H>();
        if !entries.contains_key(&id) {
            return Err(DefinitionError::UnregisteredType {
                host: type_name::<H>(),
            });
        }

        seed_chain(&mut entries, id)?;

        let Some(entry) = entries.get(&id) else {
            return Err(DefinitionError::UnregisteredType {
                host: type_name::<H>(),
            });
        };
        Ok(MachineSet::from_parts(
            entry.host,
            entry
                .machines
                .iter()
                .map(|slot| slot.machine.clone())
                .collect(),
            table_of::<H>(&entry.hooks),
        ))
    }

    fn insert_entry<H: 'static>(
        &self,
        hooks: Hooks<H>,
        parent: Option<(TypeId, &'static str)>,
    ) -> Result<(), DefinitionError> {
        let mut entries = self.lock();
        if let Some((parent_id, parent_name)) = parent {
            if !entries.contains_key(&parent_id) {
                return Err(DefinitionError::UnknownParent {
                    parent: parent_name,
                });
            }
        }

        let id = TypeId::of::<H>();
        if entries.contains_key(&id) {
            return Err(DefinitionError::AlreadyRegistered {
                host: type_name::<H>(),
            });
        }

        entries.insert(
            id,
            TypeEntry {
                host: type_name::<H>(),
                machines: Vec::new(),
                hook_names: hooks.hook_names().map(str::to_string).collect(),
                guard_names: hooks.guard_names().map(str::to_string).collect(),
                hooks: Arc::new(hooks),
                parent: parent.map(|(parent_id, _)| parent_id),
                // Roots have nothing to inherit.
                seeded: parent.is_none(),
            },
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, TypeEntry>> {
        // A poisoned lock still holds complete entries.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MachineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed every unseeded entry on the ancestry path of `id`, furthest
/// ancestor first, so each child copies a fully seeded parent.
fn seed_chain(
    entries: &mut HashMap<TypeId, TypeEntry>,
    id: TypeId,
) -> Result<(), DefinitionError> {
    let mut pending = Vec::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        match entries.get(&current) {
            Some(entry) if !entry.seeded => {
                pending.push(current);
                cursor = entry.parent;
            }
            _ => break,
        }
    }

    for current in pending.into_iter().rev() {
        seed_one(entries, current)?;
    }
    Ok(())
}

fn seed_one(entries: &mut HashMap<TypeId, TypeEntry>, id: TypeId) -> Result<(), DefinitionError> {
    let inherited: Vec<Arc<Machine>> = entries
        .get(&id)
        .and_then(|entry| entry.parent)
        .and_then(|parent_id| entries.get(&parent_id))
        .map(|parent| {
            parent
                .machines
                .iter()
                .map(|slot| slot.machine.clone())
                .collect()
        })
        .unwrap_or_default();

    let Some(entry) = entries.get_mut(&id) else {
        return Ok(());
    };

    let own: HashSet<String> = entry
        .machines
        .iter()
        .map(|slot| slot.machine.name().to_string())
        .collect();
    let additions: Vec<Arc<Machine>> = inherited
        .into_iter()
        .filter(|machine| !own.contains(machine.name()))
        .collect();

    // Validate the whole batch before touching the entry, so a bad table
    // leaves nothing half-seeded.
    for machine in &additions {
        check_references(machine, &entry.hook_names, &entry.guard_names, entry.host)?;
    }

    tracing::debug!(host = entry.host, inherited = additions.len(), "entry seeded");
    for machine in additions {
        entry.machines.push(MachineSlot {
            machine,
            inherited: true,
        });
    }
    entry.seeded = true;
    Ok(())
}

fn check_references(
    machine: &Machine,
    hook_names: &HashSet<String>,
    guard_names: &HashSet<String>,
    host: &'static str,
) -> Result<(), DefinitionError> {
    for hook in machine.hook_names() {
        if !hook_names.contains(hook) {
            return Err(DefinitionError::UnknownHook {
                machine: machine.name().to_string(),
                hook: hook.to_string(),
                host,
            });
        }
    }
    for guard in machine.guard_names() {
        if !guard_names.contains(guard) {
            return Err(DefinitionError::UnknownGuard {
                machine: machine.name().to_string(),
                guard: guard.to_string(),
                host,
            });
        }
    }
    Ok(())
}

/// The table is stored under its own `TypeId`, so this downcast holds by
/// construction.
fn table_of<H: 'static>(hooks: &Arc<dyn Any + Send + Sync>) -> Arc<Hooks<H>> {
    hooks
        .clone()
        .downcast::<Hooks<H>>()
        .ok()
        .expect("hook table stored under its own TypeId")
}
