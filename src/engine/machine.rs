//! Machine instances and the central dispatcher.

use crate::core::{Event, EventLog, InstanceId, Metadata, ObservedStates, Provenance, State};
use crate::definition::MachineType;
use crate::engine::config::MachineConfig;
use crate::engine::dispatch::Dispatch;
use crate::engine::error::EngineError;
use crate::engine::snapshot::{PublisherState, Snapshot};
use chrono::Utc;
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback receiving every event an instance records.
///
/// Invoked after the instance lock is released, so it may call back into
/// the machine.
pub type EventSink<S> = Arc<dyn Fn(&Event<S>) + Send + Sync>;

struct Consumer<S: State> {
    id: InstanceId,
    handle: Weak<Inner<S>>,
}

/// Mutable per-instance state. Only touched under `Inner::runtime`.
struct Runtime<S: State> {
    current: S,
    publishers: HashMap<InstanceId, S>,
    consumers: Vec<Consumer<S>>,
    log: EventLog<S>,
    metadata: Metadata,
    sink: Option<EventSink<S>>,
}

impl<S: State> Runtime<S> {
    fn observed(&self) -> ObservedStates<S> {
        ObservedStates::new(&self.current, self.publishers.values())
    }

    /// Upgrade consumer handles, pruning instances that were dropped.
    fn live_consumers(&mut self) -> Vec<Machine<S>> {
        self.consumers.retain(|c| c.handle.strong_count() > 0);
        self.consumers
            .iter()
            .filter_map(|c| c.handle.upgrade())
            .map(|inner| Machine { inner })
            .collect()
    }
}

struct Inner<S: State> {
    id: InstanceId,
    label: String,
    kind: Arc<MachineType<S>>,
    /// Serializes each transition together with its fan-out. Reentrant so a
    /// reaction may drive the instance that published to it.
    serial: ReentrantMutex<()>,
    runtime: Mutex<Runtime<S>>,
}

/// Handle to a running machine instance.
///
/// Cloning the handle does not clone the instance. Consumers are held
/// weakly by their publishers, so an instance is reclaimed once every
/// handle the driving code owns is dropped.
///
/// All dispatch is synchronous and depth-first on the caller's stack.
/// Attempts on one instance are serialized: the guard, body, transition and
/// broadcast fan-out of one attempt complete before another thread's attempt
/// on the same instance starts, so consumers see that instance's broadcasts
/// in the order they were applied. The state lock itself is released before
/// action bodies, reaction bodies, sinks and consumers run.
///
/// Driving a cyclic subscription graph from several threads at once can
/// deadlock, since each thread holds its own instance while fanning out to
/// the next one.
///
/// # Example
///
/// ```
/// use statemesh::builder::{broadcast_action, follow, ActionBuilder, MachineTypeBuilder};
/// use statemesh::engine::Machine;
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Street {
///         Green,
///         Red,
///         Walking,
///         Waiting,
///     }
/// }
///
/// let light = MachineTypeBuilder::new("Light")
///     .bidirectional(Street::Green, Street::Red)
///     .action(broadcast_action("red", Street::Red))
///     .unwrap()
///     .define()
///     .unwrap();
///
/// let walker = MachineTypeBuilder::new("Walker")
///     .bidirectional(Street::Walking, Street::Waiting)
///     .action(ActionBuilder::new("wait").target(Street::Waiting))
///     .unwrap()
///     .reaction(follow("on_red", Street::Red, "wait"))
///     .unwrap()
///     .define()
///     .unwrap();
///
/// let light = Machine::new(light, Street::Green);
/// let walker = Machine::new(walker, Street::Walking);
/// walker.subscribe([&light]);
///
/// light.attempt("red").unwrap();
/// assert_eq!(walker.current_state(), Street::Waiting);
/// ```
pub struct Machine<S: State> {
    inner: Arc<Inner<S>>,
}

impl<S: State> Clone for Machine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State> Machine<S> {
    /// Create an instance at `initial` with default configuration.
    pub fn new(kind: Arc<MachineType<S>>, initial: S) -> Self {
        Self::with_config(kind, initial, MachineConfig::default())
    }

    /// Create an instance at `initial`.
    ///
    /// `initial` is not required to appear in the declared transitions; an
    /// instance may start outside the reachable graph. That case is logged
    /// as a warning.
    pub fn with_config(kind: Arc<MachineType<S>>, initial: S, config: MachineConfig) -> Self {
        let id = InstanceId::new();
        let label = config.label.unwrap_or_else(|| {
            let hex = id.as_uuid().simple().to_string();
            format!("{}-{}", kind.name(), hex.get(..8).unwrap_or(&hex))
        });

        if !kind.adjacency().knows(&initial) {
            tracing::warn!(
                "[{}] Initial state '{}' does not appear in any declared transition",
                label,
                initial.name()
            );
        }

        let runtime = Runtime {
            current: initial,
            publishers: HashMap::new(),
            consumers: Vec::new(),
            log: EventLog::with_capacity(config.log_capacity),
            metadata: config.metadata,
            sink: None,
        };

        Self {
            inner: Arc::new(Inner {
                id,
                label,
                kind,
                serial: ReentrantMutex::new(()),
                runtime: Mutex::new(runtime),
            }),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn machine_type(&self) -> &Arc<MachineType<S>> {
        &self.inner.kind
    }

    pub fn current_state(&self) -> S {
        self.inner.runtime.lock().current.clone()
    }

    /// Current state unioned with the last known state of every publisher.
    pub fn observed_states(&self) -> ObservedStates<S> {
        self.inner.runtime.lock().observed()
    }

    /// Last known state of each publisher.
    pub fn publishers(&self) -> HashMap<InstanceId, S> {
        self.inner.runtime.lock().publishers.clone()
    }

    /// Ids of consumers that are still alive, in registration order.
    pub fn consumers(&self) -> Vec<InstanceId> {
        self.inner
            .runtime
            .lock()
            .consumers
            .iter()
            .filter(|c| c.handle.strong_count() > 0)
            .map(|c| c.id)
            .collect()
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> Vec<Event<S>> {
        self.inner.runtime.lock().log.events().cloned().collect()
    }

    /// Number of events evicted from the bounded log.
    pub fn dropped_events(&self) -> u64 {
        self.inner.runtime.lock().log.dropped()
    }

    /// Persist an extra metadata entry merged into every later attempt.
    pub fn set_metadata(&self, key: impl Into<String>, value: serde_json::Value) {
        self.inner
            .runtime
            .lock()
            .metadata
            .insert(key.into(), value);
    }

    /// Install a callback that receives every recorded event.
    pub fn set_sink<F>(&self, sink: F)
    where
        F: Fn(&Event<S>) + Send + Sync + 'static,
    {
        self.inner.runtime.lock().sink = Some(Arc::new(sink));
    }

    pub fn clear_sink(&self) {
        self.inner.runtime.lock().sink = None;
    }

    /// Add `consumers` to this instance's delivery list.
    ///
    /// Idempotent: an instance already registered is not added twice, and
    /// an instance never registers itself. The consumers' own subscriptions
    /// are not touched.
    pub fn register<'a, I>(&self, consumers: I)
    where
        I: IntoIterator<Item = &'a Machine<S>>,
    {
        let mut runtime = self.inner.runtime.lock();
        for consumer in consumers {
            let id = consumer.id();
            if id == self.id() || runtime.consumers.iter().any(|c| c.id == id) {
                continue;
            }
            runtime.consumers.push(Consumer {
                id,
                handle: Arc::downgrade(&consumer.inner),
            });
            tracing::debug!("[{}] Registered consumer {}", self.label(), consumer.label());
        }
    }

    /// Observe `publishers`: snapshot each one's current state, then register
    /// this instance as its consumer.
    ///
    /// After subscribing, publisher states are only updated by broadcasts.
    /// Subscribing an instance to itself is ignored.
    pub fn subscribe<'a, I>(&self, publishers: I)
    where
        I: IntoIterator<Item = &'a Machine<S>>,
    {
        for publisher in publishers {
            if publisher == self {
                tracing::debug!("[{}] Ignoring subscription to itself", self.label());
                continue;
            }
            // No broadcast may slip between the snapshot and the registration.
            let _serial = publisher.inner.serial.lock();
            let state = publisher.current_state();
            self.inner
                .runtime
                .lock()
                .publishers
                .insert(publisher.id(), state);
            publisher.register([self]);
            tracing::debug!("[{}] Subscribed to {}", self.label(), publisher.label());
        }
    }

    /// Attempt the action named `action` with no arguments.
    pub fn attempt(&self, action: &str) -> Result<Dispatch<S>, EngineError> {
        self.attempt_with(action, Metadata::new())
    }

    /// Attempt the action named `action`.
    ///
    /// Persisted metadata is merged into `args` (caller keys win), then the
    /// guard is evaluated against the observed states. A rejected guard is a
    /// no-op reported as [`Dispatch::GuardRejected`].
    ///
    /// Otherwise the body runs and the target state is dispatched as an
    /// internal event. The body runs before the transition is validated: if
    /// the target turns out to be unreachable, the returned
    /// [`EngineError::Transition`] has `body_executed: true` and the body's
    /// side effects stay in place.
    pub fn attempt_with(&self, action: &str, mut args: Metadata) -> Result<Dispatch<S>, EngineError> {
        let kind = Arc::clone(&self.inner.kind);
        let descriptor = kind
            .action(action)
            .ok_or_else(|| EngineError::UnknownAction {
                machine_type: kind.name().to_string(),
                action: action.to_string(),
            })?;

        let _serial = self.inner.serial.lock();
        let observed = {
            let runtime = self.inner.runtime.lock();
            for (key, value) in &runtime.metadata {
                args.entry(key.clone()).or_insert_with(|| value.clone());
            }
            runtime.observed()
        };

        let verdict = descriptor.guard.evaluate(&observed);
        if !verdict.is_allowed() {
            tracing::debug!(
                "[{}] Guard rejected action '{}': {:?}",
                self.label(),
                action,
                verdict
            );
            return Ok(Dispatch::GuardRejected { verdict });
        }

        (descriptor.body)(self, &args);

        let event = Event::internal(
            descriptor.name.clone(),
            descriptor.target.clone(),
            args,
            descriptor.broadcast,
        );
        self.apply(event, true)
    }

    /// Central dispatcher.
    ///
    /// Internal events are validated against the adjacency map and applied;
    /// external events update the publisher's last known state and are routed
    /// to the reaction bound to that state, if any.
    /// An external event claiming to come from this instance is a no-op.
    ///
    /// Broadcast fan-out is depth-first and unguarded: a reaction that
    /// triggers a broadcasting action can re-enter the instance that
    /// published to it. A cyclic subscription graph whose reactions keep
    /// changing state recurses without bound; the engine does not detect it.
    pub fn process_event(&self, event: Event<S>) -> Result<Dispatch<S>, EngineError> {
        match event.provenance {
            Provenance::Internal { .. } => self.apply(event, false),
            Provenance::External { publisher } if publisher == self.id() => {
                tracing::debug!(
                    "[{}] Ignoring relay of its own '{}'",
                    self.label(),
                    event.name
                );
                Ok(Dispatch::Unchanged {
                    state: self.current_state(),
                })
            }
            Provenance::External { publisher } => self.observe(publisher, event),
        }
    }

    fn apply(&self, event: Event<S>, body_executed: bool) -> Result<Dispatch<S>, EngineError> {
        // Held through fan-out so relays leave in the order transitions apply.
        let _serial = self.inner.serial.lock();
        let (dispatch, consumers, sink) = {
            let mut runtime = self.inner.runtime.lock();
            let from = runtime.current.clone();

            if event.state == from {
                runtime.log.record(event.clone());
                (
                    Dispatch::Unchanged { state: from },
                    Vec::new(),
                    runtime.sink.clone(),
                )
            } else if self.inner.kind.adjacency().permits(&from, &event.state) {
                runtime.current = event.state.clone();
                runtime.log.record(event.clone());
                let consumers = if event.is_broadcast() {
                    runtime.live_consumers()
                } else {
                    Vec::new()
                };
                let dispatch = Dispatch::Transitioned {
                    from,
                    to: event.state.clone(),
                    relayed: consumers.len(),
                };
                (dispatch, consumers, runtime.sink.clone())
            } else {
                drop(runtime);
                tracing::warn!(
                    "[{}] Illegal transition {} -> {} via '{}'",
                    self.label(),
                    from.name(),
                    event.state.name(),
                    event.name
                );
                return Err(EngineError::Transition {
                    machine: self.label().to_string(),
                    action: event.name,
                    from: from.name().to_string(),
                    to: event.state.name().to_string(),
                    body_executed,
                });
            }
        };

        if let Some(sink) = sink {
            sink(&event);
        }

        match &dispatch {
            Dispatch::Transitioned { from, to, relayed } => tracing::debug!(
                "[{}] {} -> {} via '{}' (relaying to {} consumers)",
                self.label(),
                from.name(),
                to.name(),
                event.name,
                relayed
            ),
            _ => tracing::debug!(
                "[{}] '{}' left state at {}",
                self.label(),
                event.name,
                event.state.name()
            ),
        }

        for consumer in consumers {
            consumer.process_event(event.relay(self.id()))?;
        }

        Ok(dispatch)
    }

    fn observe(&self, publisher: InstanceId, event: Event<S>) -> Result<Dispatch<S>, EngineError> {
        let (observed, sink) = {
            let mut runtime = self.inner.runtime.lock();
            runtime.publishers.insert(publisher, event.state.clone());
            runtime.log.record(event.clone());
            (runtime.observed(), runtime.sink.clone())
        };

        if let Some(sink) = sink {
            sink(&event);
        }

        let kind = Arc::clone(&self.inner.kind);
        let Some(reaction) = kind.reaction(&event.state) else {
            tracing::debug!(
                "[{}] Observed {} from {} with no reaction bound",
                self.label(),
                event.state.name(),
                publisher
            );
            return Ok(Dispatch::Observed {
                publisher,
                state: event.state,
            });
        };

        let verdict = reaction.guard.evaluate(&observed);
        if !verdict.is_allowed() {
            tracing::debug!(
                "[{}] Guard rejected reaction '{}': {:?}",
                self.label(),
                reaction.name,
                verdict
            );
            return Ok(Dispatch::ReactionRejected {
                reaction: reaction.name.clone(),
                verdict,
            });
        }

        tracing::debug!(
            "[{}] Reacting to {} with '{}'",
            self.label(),
            event.state.name(),
            reaction.name
        );
        (reaction.body)(self, &event)?;

        Ok(Dispatch::Reacted {
            reaction: reaction.name.clone(),
        })
    }

    /// Serializable view of the instance for diagnostics.
    pub fn snapshot(&self) -> Snapshot<S> {
        let runtime = self.inner.runtime.lock();
        let mut publishers: Vec<PublisherState<S>> = runtime
            .publishers
            .iter()
            .map(|(id, state)| PublisherState {
                publisher: *id,
                state: state.clone(),
            })
            .collect();
        publishers.sort_by_key(|p| p.publisher);

        Snapshot {
            id: self.id(),
            label: self.label().to_string(),
            machine_type: self.inner.kind.name().to_string(),
            current: runtime.current.clone(),
            publishers,
            consumers: runtime
                .consumers
                .iter()
                .filter(|c| c.handle.strong_count() > 0)
                .map(|c| c.id)
                .collect(),
            log: runtime.log.clone(),
            taken_at: Utc::now(),
        }
    }
}

impl<S: State> PartialEq for Machine<S> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl<S: State> Eq for Machine<S> {}

impl<S: State> fmt::Debug for Machine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("machine_type", &self.inner.kind.name())
            .finish_non_exhaustive()
    }
}
