//! Machine type: the immutable table shared by every instance of a type.

use crate::core::{Adjacency, State, Transition};
use crate::definition::descriptor::{ActionDescriptor, Descriptor, ReactionDescriptor};
use crate::definition::error::DefineError;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Declared transitions, actions and reactions of one machine type.
///
/// Built once by [`MachineTypeBuilder`](crate::builder::MachineTypeBuilder)
/// and referenced through an `Arc` by every instance; never mutated after
/// construction.
#[derive(Debug)]
pub struct MachineType<S: State> {
    name: String,
    transitions: Vec<Transition<S>>,
    adjacency: Adjacency<S>,
    actions: HashMap<String, ActionDescriptor<S>>,
    reactions: HashMap<S, ReactionDescriptor<S>>,
}

impl<S: State> MachineType<S> {
    /// Compile the declaration, collecting every table violation.
    ///
    /// Fails if two actions share a name or two reactions share a trigger
    /// state. All violations are reported together.
    pub fn from_parts(
        name: impl Into<String>,
        transitions: Vec<Transition<S>>,
        descriptors: Vec<Descriptor<S>>,
    ) -> Result<Self, DefineError> {
        let name = name.into();

        if let Validation::Failure(errors) = validate(&descriptors) {
            return Err(DefineError::Rejected {
                machine: name,
                errors: errors.iter().cloned().collect(),
            });
        }

        let adjacency = Adjacency::from_transitions(&transitions);
        let mut actions = HashMap::new();
        let mut reactions = HashMap::new();
        for descriptor in descriptors {
            match descriptor {
                Descriptor::Action(a) => {
                    actions.insert(a.name.clone(), a);
                }
                Descriptor::Reaction(r) => {
                    reactions.insert(r.trigger.clone(), r);
                }
            }
        }

        Ok(Self {
            name,
            transitions,
            adjacency,
            actions,
            reactions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transitions as declared.
    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    pub fn adjacency(&self) -> &Adjacency<S> {
        &self.adjacency
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor<S>> {
        self.actions.get(name)
    }

    /// The reaction bound to `trigger`, if any.
    pub fn reaction(&self, trigger: &S) -> Option<&ReactionDescriptor<S>> {
        self.reactions.get(trigger)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor<S>> {
        self.actions.values()
    }

    pub fn reactions(&self) -> impl Iterator<Item = &ReactionDescriptor<S>> {
        self.reactions.values()
    }
}

fn validate<S: State>(descriptors: &[Descriptor<S>]) -> Validation<(), NonEmptyVec<DefineError>> {
    let mut seen_actions: HashSet<&str> = HashSet::new();
    let mut seen_triggers: HashMap<&S, &str> = HashMap::new();
    let mut checks: Vec<Validation<(), NonEmptyVec<DefineError>>> = Vec::new();

    for descriptor in descriptors {
        let check = match descriptor {
            Descriptor::Action(a) => {
                if !seen_actions.insert(a.name.as_str()) {
                    Validation::fail(DefineError::DuplicateAction {
                        action: a.name.clone(),
                    })
                } else {
                    Validation::success(())
                }
            }
            Descriptor::Reaction(r) => match seen_triggers.get(&r.trigger) {
                Some(first) => Validation::fail(DefineError::DuplicateReaction {
                    state: r.trigger.name().to_string(),
                    first: (*first).to_string(),
                    second: r.name.clone(),
                }),
                None => {
                    seen_triggers.insert(&r.trigger, r.name.as_str());
                    Validation::success(())
                }
            },
        };
        checks.push(check);
    }

    Validation::all_vec(checks).map(|_| ())
}
