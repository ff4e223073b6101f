//! Street Crossing
//!
//! A traffic light broadcasts its transitions; a rider subscribed to it
//! stops on red and cycles on green. Yellow is observed but has no reaction.
//!
//! Key concepts:
//! - Broadcasting actions
//! - Reactions bound to another machine's states
//! - Guards over observed states
//!
//! Run with: RUST_LOG=debug cargo run --example street_crossing

use statemesh::builder::{broadcast_action, follow, ActionBuilder, MachineTypeBuilder};
use statemesh::engine::MachineConfig;
use statemesh::{state_enum, DefineError, Machine};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Street {
        Green,
        Yellow,
        Red,
        Stopped,
        Cycling,
    }
    domains: {
        Light: [Green, Yellow, Red],
        Rider: [Stopped, Cycling],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Street Crossing ===\n");

    let light_type = MachineTypeBuilder::new("Light")
        .transition(Street::Green, Street::Yellow)
        .transition(Street::Yellow, Street::Red)
        .bidirectional(Street::Red, Street::Green)
        .action(broadcast_action("green", Street::Green))?
        .action(broadcast_action("yellow", Street::Yellow))?
        .action(broadcast_action("red", Street::Red))?
        .define()?;

    let rider_type = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(
            ActionBuilder::new("stop")
                .target(Street::Stopped)
                .body(|rider, _| println!("  {} puts a foot down", rider.label())),
        )?
        .action(ActionBuilder::new("cycle").target(Street::Cycling))?
        .reaction(follow("on_green", Street::Green, "cycle"))?
        .reaction(follow("on_red", Street::Red, "stop"))?
        .define()?;

    let light = Machine::with_config(
        light_type,
        Street::Green,
        MachineConfig::default().label("light"),
    );
    let rider = Machine::with_config(
        rider_type,
        Street::Cycling,
        MachineConfig::default().label("rider"),
    );
    rider.subscribe([&light]);

    for action in ["red", "green", "yellow"] {
        let dispatch = light.attempt(action)?;
        println!(
            "light.{}() -> {:?}; rider is {:?}",
            action,
            dispatch,
            rider.current_state()
        );
    }

    println!("\nRider saw:");
    for event in rider.events() {
        println!("  {:<8} {:?}", event.name, event.state);
    }

    // Two reactions on one state are refused before any instance exists.
    let duplicate = MachineTypeBuilder::new("Rider")
        .action(ActionBuilder::new("stop").target(Street::Stopped))?
        .reaction(follow("on_red", Street::Red, "stop"))?
        .reaction(follow("on_red_again", Street::Red, "stop"))?
        .define();
    if let Err(DefineError::Rejected { errors, .. }) = duplicate {
        println!("\nDuplicate declaration rejected: {}", errors[0]);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
