//! Door Lifecycle
//!
//! This example walks a single door instance through its lifecycle.
//!
//! Key concepts:
//! - Declaring states, events, and transitions with the builder
//! - Lifecycle hooks: exit, transition callback, enter, event success
//! - A guard reading the host instance
//! - Persisting state through a store, with an audit trail
//!
//! Run with: cargo run --example door

use statehood::{
    args, Args, Event, Hooks, MachineBuilder, MachineSet, MemoryStore, State, Tracker, Transition,
    DEFAULT_MACHINE,
};

struct Door {
    slams: u32,
    key_present: bool,
}

fn main() {
    println!("=== Door Lifecycle ===\n");

    let machine = MachineBuilder::new()
        .state(State::new("open").on_exit("creak"))
        .state(State::new("closed").on_enter("latch"))
        .state(State::new("locked"))
        .event(
            Event::new("close")
                .success("announce")
                .transition(Transition::new(["open"], "closed").callback("slam")),
        )
        .event(Event::new("reopen").transition(Transition::new(["closed"], "open")))
        .event(Event::new("lock").transition(Transition::new(["closed"], "locked").guard("has_key")))
        .build()
        .unwrap();

    println!("States a form would offer:");
    for (label, name) in machine.select_options() {
        println!("  {label} ({name})");
    }
    println!();

    let hooks = Hooks::new()
        .hook("creak", |_door: &mut Door, _args: &Args| {
            println!("  [exit] hinges creak on the way out")
        })
        .hook("latch", |_door: &mut Door, _args: &Args| {
            println!("  [enter] latch clicks into place")
        })
        .hook("slam", |door: &mut Door, args: &Args| {
            door.slams += 1;
            let force = args.get::<u32>(0).copied().unwrap_or(1);
            println!("  [callback] slammed with force {force}");
        })
        .hook("announce", |_door: &mut Door, _args: &Args| {
            println!("  [success] the close event went through")
        })
        .guard("has_key", |door: &Door, _args: &Args| door.key_present);

    let store = MemoryStore::new();
    let set = MachineSet::assemble(vec![machine], hooks).unwrap();
    let mut tracker = Tracker::attach(set).with_store(store.clone());

    let mut door = Door {
        slams: 0,
        key_present: false,
    };

    println!(
        "Initial state: {}\n",
        tracker.current_state(&door).unwrap()
    );

    println!("Step 1: Close the door (with a force argument)");
    let fired = tracker
        .fire_with(&mut door, DEFAULT_MACHINE, "close", &args![3u32])
        .unwrap();
    println!(
        "  fired: {fired}, state: {}, slams so far: {}\n",
        tracker.current_state(&door).unwrap(),
        door.slams
    );

    println!("Step 2: Try to lock without a key");
    let fired = tracker.fire(&mut door, "lock").unwrap();
    println!(
        "  fired: {fired}, state stays: {}",
        tracker.current_state(&door).unwrap()
    );
    if let Err(error) = tracker.fire_strict(&mut door, "lock") {
        println!("  the strict form reports: {error}");
    }
    println!();

    println!("Step 3: Pick up the key and lock");
    door.key_present = true;
    let fired = tracker.fire(&mut door, "lock").unwrap();
    println!(
        "  fired: {fired}, state: {}\n",
        tracker.current_state(&door).unwrap()
    );

    println!("Audit trail from the store:");
    for record in store.records() {
        println!(
            "  {}: {} -> {} at {}",
            record.machine,
            record.from.as_deref().unwrap_or("(initial)"),
            record.to,
            record.at.format("%H:%M:%S%.3f")
        );
    }

    println!("\nKey Takeaways:");
    println!("- States and events are declared once, then shared immutably");
    println!("- Hooks run in a fixed order: exit, callback, persist, enter, success");
    println!("- A declined guard rejects the event without an error");
    println!("- The store is the source of truth once attached");

    println!("\n=== Example Complete ===");
}
