//! Integration tests wiring several machines together.

use statemesh::builder::{
    broadcast_action, follow, ActionBuilder, MachineTypeBuilder, ReactionBuilder,
};
use statemesh::core::{State, Verdict};
use statemesh::{state_enum, DefineError, Dispatch, EngineError, Machine, MachineType};
use std::sync::Arc;
use std::time::Duration;

state_enum! {
    enum Street {
        Green,
        Yellow,
        Red,
        Stopped,
        Cycling,
        Waiting,
        Crossing,
    }
    domains: {
        Light: [Green, Yellow, Red],
        Rider: [Stopped, Cycling],
        Pedestrian: [Waiting, Crossing],
    }
}

fn light() -> Arc<MachineType<Street>> {
    MachineTypeBuilder::new("Light")
        .transition(Street::Green, Street::Yellow)
        .transition(Street::Yellow, Street::Red)
        .bidirectional(Street::Red, Street::Green)
        .action(broadcast_action("green", Street::Green))
        .unwrap()
        .action(broadcast_action("yellow", Street::Yellow))
        .unwrap()
        .action(broadcast_action("red", Street::Red))
        .unwrap()
        .define()
        .unwrap()
}

fn rider() -> Arc<MachineType<Street>> {
    MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(ActionBuilder::new("stop").target(Street::Stopped))
        .unwrap()
        .action(ActionBuilder::new("cycle").target(Street::Cycling))
        .unwrap()
        .reaction(follow("on_green", Street::Green, "cycle"))
        .unwrap()
        .reaction(follow("on_red", Street::Red, "stop"))
        .unwrap()
        .define()
        .unwrap()
}

fn pedestrian() -> Arc<MachineType<Street>> {
    MachineTypeBuilder::new("Pedestrian")
        .bidirectional(Street::Waiting, Street::Crossing)
        .action(
            ActionBuilder::new("cross")
                .target(Street::Crossing)
                .when([Street::Red])
                .unless([Street::Crossing]),
        )
        .unwrap()
        .action(ActionBuilder::new("wait").target(Street::Waiting))
        .unwrap()
        .define()
        .unwrap()
}

#[test]
fn rider_follows_light() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);
    rider.subscribe([&light]);

    let mut observed = Vec::new();
    for action in ["red", "green", "yellow"] {
        light.attempt(action).unwrap();
        observed.push(rider.current_state());
    }

    assert_eq!(
        observed,
        vec![Street::Stopped, Street::Cycling, Street::Cycling]
    );
    assert_eq!(light.current_state(), Street::Yellow);
}

#[test]
fn yellow_is_observed_without_reaction() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);
    rider.subscribe([&light]);

    light.attempt("yellow").unwrap();

    assert_eq!(rider.current_state(), Street::Cycling);
    assert_eq!(rider.publishers().get(&light.id()), Some(&Street::Yellow));
    let last = rider.events().pop().unwrap();
    assert_eq!(last.state, Street::Yellow);
    assert_eq!(last.publisher(), Some(light.id()));
    assert_eq!(last.state.domain(), "Light");
}

#[test]
fn relay_is_delivered_before_attempt_returns() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);
    rider.subscribe([&light]);

    let dispatch = light.attempt("red").unwrap();

    assert_eq!(
        dispatch,
        Dispatch::Transitioned {
            from: Street::Green,
            to: Street::Red,
            relayed: 1,
        }
    );
    // Rider logged the relay and then its own reaction-driven transition.
    let names: Vec<String> = rider.events().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["red".to_string(), "stop".to_string()]);
}

#[test]
fn subscription_is_directional() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);

    rider.subscribe([&light]);

    assert_eq!(light.consumers(), vec![rider.id()]);
    assert!(rider.consumers().is_empty());
    assert!(light.publishers().is_empty());
}

#[test]
fn publisher_state_only_updates_on_broadcast() {
    let light = Machine::new(light(), Street::Green);
    let walker = Machine::new(pedestrian(), Street::Waiting);
    walker.subscribe([&light]);

    // Walker never reacts; it only records what the light broadcasts.
    assert_eq!(
        walker.attempt("cross").unwrap(),
        Dispatch::GuardRejected {
            verdict: Verdict::WhenUnmet
        }
    );

    light.attempt("red").unwrap();
    assert!(walker.attempt("cross").unwrap().is_transitioned());
    assert_eq!(walker.current_state(), Street::Crossing);

    // Already crossing: unless blocks before any transition check.
    assert_eq!(
        walker.attempt("cross").unwrap(),
        Dispatch::GuardRejected {
            verdict: Verdict::UnlessMatched
        }
    );
}

#[test]
fn unless_beats_when_for_the_same_state() {
    let kind = MachineTypeBuilder::new("Pedestrian")
        .bidirectional(Street::Waiting, Street::Crossing)
        .action(
            ActionBuilder::new("cross")
                .target(Street::Crossing)
                .when([Street::Waiting])
                .unless([Street::Waiting]),
        )
        .unwrap()
        .define()
        .unwrap();
    let walker = Machine::new(kind, Street::Waiting);

    for _ in 0..3 {
        assert!(walker.attempt("cross").unwrap().is_rejected());
    }
    assert_eq!(walker.current_state(), Street::Waiting);
}

#[test]
fn duplicate_reaction_fails_before_instantiation() {
    let result = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(ActionBuilder::new("stop").target(Street::Stopped))
        .unwrap()
        .reaction(follow("on_red", Street::Red, "stop"))
        .unwrap()
        .reaction(follow("also_on_red", Street::Red, "stop"))
        .unwrap()
        .define();

    assert!(matches!(result, Err(DefineError::Rejected { .. })));
}

#[test]
fn transition_error_in_reaction_reaches_broadcaster() {
    // A rider that tries to jump straight from Stopped to a light state.
    let confused = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(ActionBuilder::new("teleport").target(Street::Yellow))
        .unwrap()
        .reaction(follow("on_red", Street::Red, "teleport"))
        .unwrap()
        .define()
        .unwrap();
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(confused, Street::Stopped);
    rider.subscribe([&light]);

    let result = light.attempt("red");

    match result {
        Err(EngineError::Transition { action, from, .. }) => {
            assert_eq!(action, "teleport");
            assert_eq!(from, "Stopped");
        }
        other => panic!("Expected transition error, got {other:?}"),
    }
    // The light's own transition was applied before fan-out.
    assert_eq!(light.current_state(), Street::Red);
    assert_eq!(rider.current_state(), Street::Stopped);
}

#[test]
fn reaction_can_reenter_its_publisher() {
    // Light goes red; the rider stops and broadcasts; a light subscribed to
    // the rider turns green again while the original attempt is on the stack.
    let smart_light = MachineTypeBuilder::new("Light")
        .bidirectional(Street::Red, Street::Green)
        .action(broadcast_action("red", Street::Red))
        .unwrap()
        .action(ActionBuilder::new("green").target(Street::Green))
        .unwrap()
        .reaction(follow("on_stopped", Street::Stopped, "green"))
        .unwrap()
        .define()
        .unwrap();
    let polite_rider = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(broadcast_action("stop", Street::Stopped))
        .unwrap()
        .reaction(follow("on_red", Street::Red, "stop"))
        .unwrap()
        .define()
        .unwrap();

    let light = Machine::new(smart_light, Street::Green);
    let rider = Machine::new(polite_rider, Street::Cycling);
    rider.subscribe([&light]);
    light.subscribe([&rider]);

    let dispatch = light.attempt("red").unwrap();

    assert_eq!(
        dispatch,
        Dispatch::Transitioned {
            from: Street::Green,
            to: Street::Red,
            relayed: 1,
        }
    );
    assert_eq!(rider.current_state(), Street::Stopped);
    assert_eq!(light.current_state(), Street::Green);
    assert_eq!(light.publishers().get(&rider.id()), Some(&Street::Stopped));
}

#[test]
fn reaction_guard_uses_observed_states() {
    let cautious = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(ActionBuilder::new("cycle").target(Street::Cycling))
        .unwrap()
        .reaction(
            ReactionBuilder::new("on_green")
                .on(Street::Green)
                .unless([Street::Crossing])
                .perform("cycle"),
        )
        .unwrap()
        .define()
        .unwrap();

    let light = Machine::new(light(), Street::Red);
    let walker = Machine::new(pedestrian(), Street::Crossing);
    let rider = Machine::new(cautious, Street::Stopped);
    rider.subscribe([&light, &walker]);

    light.attempt("green").unwrap();
    assert_eq!(rider.current_state(), Street::Stopped);

    // The walker's move is not broadcast, so the rider still sees Crossing.
    walker.attempt("wait").unwrap();
    light.attempt("red").unwrap();
    light.attempt("green").unwrap();
    assert_eq!(rider.current_state(), Street::Stopped);
}

#[test]
fn instances_are_shareable_across_threads() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);
    rider.subscribe([&light]);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let light = light.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let action = if i % 2 == 0 { "red" } else { "green" };
                    light.attempt(action).unwrap();
                }
            });
        }
    });

    let final_light = light.current_state();
    assert_eq!(rider.publishers()[&light.id()], final_light);
    let expected_rider = match final_light {
        Street::Red => Street::Stopped,
        _ => Street::Cycling,
    };
    assert_eq!(rider.current_state(), expected_rider);
}

#[test]
fn relays_arrive_in_transition_order_across_threads() {
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(rider(), Street::Cycling);
    rider.subscribe([&light]);
    // Widen the window between applying Red and relaying it.
    light.set_sink(|event| {
        if event.state == Street::Red {
            std::thread::sleep(Duration::from_millis(100));
        }
    });

    std::thread::scope(|scope| {
        let first = light.clone();
        scope.spawn(move || first.attempt("red").unwrap());
        let second = light.clone();
        scope.spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            second.attempt("green").unwrap();
        });
    });

    assert_eq!(light.current_state(), Street::Green);
    assert_eq!(rider.publishers()[&light.id()], Street::Green);
    assert_eq!(rider.current_state(), Street::Cycling);
    let seen: Vec<Street> = rider
        .events()
        .into_iter()
        .filter(|e| e.publisher() == Some(light.id()))
        .map(|e| e.state)
        .collect();
    assert_eq!(seen, vec![Street::Red, Street::Green]);
}

#[test]
fn reaction_guard_sees_the_state_just_broadcast() {
    let strict = MachineTypeBuilder::new("Rider")
        .bidirectional(Street::Stopped, Street::Cycling)
        .action(ActionBuilder::new("stop").target(Street::Stopped))
        .unwrap()
        .reaction(
            ReactionBuilder::new("on_red")
                .on(Street::Red)
                .when([Street::Red])
                .perform("stop"),
        )
        .unwrap()
        .define()
        .unwrap();
    let light = Machine::new(light(), Street::Green);
    let rider = Machine::new(strict, Street::Cycling);
    rider.subscribe([&light]);
    assert!(!rider.observed_states().contains(&Street::Red));

    light.attempt("red").unwrap();

    assert_eq!(rider.current_state(), Street::Stopped);
    assert_eq!(rider.publishers()[&light.id()], Street::Red);
}
