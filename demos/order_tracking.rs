//! Order Tracking Across a Type Hierarchy
//!
//! This example tracks an order's fulfilment and payment as two
//! independent machines, then lets a priority order subtype inherit
//! both through the registry and add a machine of its own.
//!
//! Key concepts:
//! - Registering a hook table per host type
//! - Multiple named machines on one instance, tracked independently
//! - A guard on one machine reading state the other machine's hook wrote
//! - Subtype inheritance with a lazy snapshot at first resolve
//!
//! Run with: cargo run --example order_tracking

use statehood::{
    args, Args, Event, Hooks, MachineBuilder, MachineRegistry, State, Tracker, Transition,
};

struct Order {
    notes: Vec<String>,
    paid: bool,
}

struct PriorityOrder {
    notes: Vec<String>,
    paid: bool,
}

fn fulfilment_machine() -> MachineBuilder {
    MachineBuilder::new()
        .state(State::new("cart"))
        .state(State::new("placed"))
        .state(State::new("shipped"))
        .state(State::new("delivered"))
        .event(Event::new("place").transition(Transition::new(["cart"], "placed")))
        .event(
            Event::new("ship").transition(
                Transition::new(["placed"], "shipped")
                    .guard("payment_cleared")
                    .callback("record_shipment"),
            ),
        )
        .event(
            Event::new("deliver")
                .success("celebrate")
                .transition(Transition::new(["shipped"], "delivered")),
        )
}

fn payment_machine() -> MachineBuilder {
    MachineBuilder::named("payment")
        .state(State::new("unpaid"))
        .state(State::new("settled"))
        .event(
            Event::new("pay")
                .transition(Transition::new(["unpaid"], "settled").callback("mark_paid")),
        )
}

fn main() {
    println!("=== Order Tracking ===\n");

    let registry = MachineRegistry::new();

    let order_hooks = Hooks::new()
        .hook("mark_paid", |order: &mut Order, _args: &Args| {
            order.paid = true;
            println!("  [callback] payment settled");
        })
        .hook("record_shipment", |order: &mut Order, args: &Args| {
            let tracking = args.get::<String>(0).cloned().unwrap_or_default();
            order.notes.push(format!("shipped as {tracking}"));
            println!("  [callback] shipment recorded: {tracking}");
        })
        .hook("celebrate", |_order: &mut Order, _args: &Args| {
            println!("  [success] delivered!")
        })
        .guard("payment_cleared", |order: &Order, _args: &Args| order.paid);

    registry.register::<Order>(order_hooks).unwrap();
    registry.define::<Order>(fulfilment_machine()).unwrap();
    registry.define::<Order>(payment_machine()).unwrap();

    let mut tracker = Tracker::attach(registry.resolve::<Order>().unwrap());
    let mut order = Order {
        notes: Vec::new(),
        paid: false,
    };

    println!("Step 1: Place the order");
    tracker.fire(&mut order, "place").unwrap();
    println!(
        "  fulfilment: {}, payment: {}\n",
        tracker.current_state(&order).unwrap(),
        tracker.current_state_of(&order, "payment").unwrap()
    );

    println!("Step 2: Try to ship before paying");
    let fired = tracker.fire(&mut order, "ship").unwrap();
    println!(
        "  fired: {fired}, fulfilment stays: {}\n",
        tracker.current_state(&order).unwrap()
    );

    println!("Step 3: Settle the payment on its own machine");
    tracker
        .fire_with(&mut order, "payment", "pay", &Args::none())
        .unwrap();
    println!(
        "  payment: {}\n",
        tracker.current_state_of(&order, "payment").unwrap()
    );

    println!("Step 4: Ship with a tracking code, then deliver");
    tracker
        .fire_with(
            &mut order,
            "default",
            "ship",
            &args![String::from("TRK-12345")],
        )
        .unwrap();
    tracker.fire(&mut order, "deliver").unwrap();
    println!(
        "  fulfilment: {}, notes: {:?}\n",
        tracker.current_state(&order).unwrap(),
        order.notes
    );

    // The subtype re-declares every name the inherited machines use,
    // with closures typed for itself.
    let priority_hooks = Hooks::new()
        .hook("mark_paid", |order: &mut PriorityOrder, _args: &Args| {
            order.paid = true;
        })
        .hook("record_shipment", |order: &mut PriorityOrder, args: &Args| {
            let tracking = args.get::<String>(0).cloned().unwrap_or_default();
            order.notes.push(format!("shipped as {tracking}"));
        })
        .hook("celebrate", |_order: &mut PriorityOrder, _args: &Args| {})
        .hook("page_oncall", |_order: &mut PriorityOrder, _args: &Args| {
            println!("  [callback] paging the on-call courier")
        })
        .guard("payment_cleared", |order: &PriorityOrder, _args: &Args| {
            order.paid
        });

    registry
        .register_sub::<PriorityOrder, Order>(priority_hooks)
        .unwrap();
    registry
        .define::<PriorityOrder>(
            MachineBuilder::named("escalation")
                .state(State::new("routine"))
                .state(State::new("escalated"))
                .event(
                    Event::new("escalate").transition(
                        Transition::new(["routine"], "escalated").callback("page_oncall"),
                    ),
                ),
        )
        .unwrap();

    println!("Step 5: A priority order inherits both machines");
    let set = registry.resolve::<PriorityOrder>().unwrap();
    print!("  machines:");
    for machine in set.machines() {
        print!(" {}", machine.name());
    }
    println!();

    let mut tracker = Tracker::attach(set);
    let mut rush = PriorityOrder {
        notes: Vec::new(),
        paid: true,
    };
    tracker.fire(&mut rush, "place").unwrap();
    tracker
        .fire_with(&mut rush, "escalation", "escalate", &Args::none())
        .unwrap();
    println!(
        "  fulfilment: {}, escalation: {}",
        tracker.current_state(&rush).unwrap(),
        tracker.current_state_of(&rush, "escalation").unwrap()
    );

    println!("\nKey Takeaways:");
    println!("- Each machine tracks its own current state on the instance");
    println!("- Guards can read host fields that other machines' hooks wrote");
    println!("- Subtypes inherit machine definitions, not hook closures");
    println!("- The inheritance snapshot is taken at the first resolve");

    println!("\n=== Example Complete ===");
}
