//! Guard predicates for actions and reactions.
//!
//! A guard is a pair of optional state sets evaluated against the
//! observed-state-set of an instance: its own current state together with
//! the last known state of every publisher it subscribes to.

use super::state::State;
use std::collections::HashSet;

/// The set of states an instance can see at a given moment.
///
/// Always recomputed at evaluation time; never cached across calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedStates<S: State> {
    states: HashSet<S>,
}

impl<S: State> ObservedStates<S> {
    /// Build the set from the local state and the publisher states.
    pub fn new<'a, I>(current: &S, publishers: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
    {
        let mut states = HashSet::new();
        states.insert(current.clone());
        states.extend(publishers.into_iter().cloned());
        Self { states }
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }
}

/// Outcome of evaluating a guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The guard passed.
    Allow,
    /// `when` was present and none of its states were observed.
    WhenUnmet,
    /// `unless` was present and one of its states was observed.
    UnlessMatched,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// `when`/`unless` predicate over observed states.
///
/// `when` is evaluated before `unless`. An absent set imposes no constraint;
/// a present but empty `when` set is disjoint from everything and therefore
/// always rejects.
///
/// # Example
///
/// ```rust
/// use statemesh::core::{Guard, ObservedStates, Verdict};
/// use statemesh::state_enum;
///
/// state_enum! {
///     enum Lamp {
///         On,
///         Off,
///         Broken,
///     }
/// }
///
/// let guard = Guard::new().when([Lamp::On]).unless([Lamp::Broken]);
///
/// let healthy = ObservedStates::new(&Lamp::On, []);
/// assert_eq!(guard.evaluate(&healthy), Verdict::Allow);
///
/// let off = ObservedStates::new(&Lamp::Off, []);
/// assert_eq!(guard.evaluate(&off), Verdict::WhenUnmet);
///
/// let broken = ObservedStates::new(&Lamp::On, [&Lamp::Broken]);
/// assert_eq!(guard.evaluate(&broken), Verdict::UnlessMatched);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guard<S: State> {
    when: Option<HashSet<S>>,
    unless: Option<HashSet<S>>,
}

impl<S: State> Default for Guard<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Guard<S> {
    /// A guard with neither set; it always allows.
    pub fn new() -> Self {
        Self {
            when: None,
            unless: None,
        }
    }

    /// Require at least one of `states` to be observed.
    pub fn when<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.when = Some(states.into_iter().collect());
        self
    }

    /// Block if any of `states` is observed.
    pub fn unless<I: IntoIterator<Item = S>>(mut self, states: I) -> Self {
        self.unless = Some(states.into_iter().collect());
        self
    }

    pub fn when_states(&self) -> Option<&HashSet<S>> {
        self.when.as_ref()
    }

    pub fn unless_states(&self) -> Option<&HashSet<S>> {
        self.unless.as_ref()
    }

    /// True when neither `when` nor `unless` is set.
    pub fn is_unconditional(&self) -> bool {
        self.when.is_none() && self.unless.is_none()
    }

    /// Evaluate the guard. Pure: same input, same verdict.
    pub fn evaluate(&self, observed: &ObservedStates<S>) -> Verdict {
        if let Some(when) = &self.when {
            if !when.iter().any(|s| observed.contains(s)) {
                return Verdict::WhenUnmet;
            }
        }

        if let Some(unless) = &self.unless {
            if unless.iter().any(|s| observed.contains(s)) {
                return Verdict::UnlessMatched;
            }
        }

        Verdict::Allow
    }

    pub fn allows(&self, observed: &ObservedStates<S>) -> bool {
        self.evaluate(observed).is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
        Failed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
                Self::Failed => "Failed",
            }
        }
    }

    fn observed(current: TestState, remote: &[TestState]) -> ObservedStates<TestState> {
        ObservedStates::new(&current, remote.iter())
    }

    #[test]
    fn observed_set_unions_local_and_remote() {
        let set = observed(TestState::Initial, &[TestState::Processing, TestState::Initial]);

        assert_eq!(set.len(), 2);
        assert!(set.contains(&TestState::Initial));
        assert!(set.contains(&TestState::Processing));
        assert!(!set.contains(&TestState::Failed));
    }

    #[test]
    fn unconditional_guard_always_allows() {
        let guard = Guard::<TestState>::new();

        assert!(guard.is_unconditional());
        assert!(guard.allows(&observed(TestState::Initial, &[])));
        assert!(guard.allows(&observed(TestState::Failed, &[TestState::Complete])));
    }

    #[test]
    fn when_requires_intersection() {
        let guard = Guard::new().when([TestState::Processing]);

        assert_eq!(
            guard.evaluate(&observed(TestState::Initial, &[])),
            Verdict::WhenUnmet
        );
        assert_eq!(
            guard.evaluate(&observed(TestState::Initial, &[TestState::Processing])),
            Verdict::Allow
        );
    }

    #[test]
    fn unless_blocks_on_intersection() {
        let guard = Guard::new().unless([TestState::Failed]);

        assert!(guard.allows(&observed(TestState::Initial, &[TestState::Complete])));
        assert_eq!(
            guard.evaluate(&observed(TestState::Initial, &[TestState::Failed])),
            Verdict::UnlessMatched
        );
    }

    #[test]
    fn unless_beats_satisfied_when() {
        let guard = Guard::new()
            .when([TestState::Processing])
            .unless([TestState::Processing]);

        assert_eq!(
            guard.evaluate(&observed(TestState::Processing, &[])),
            Verdict::UnlessMatched
        );
    }

    #[test]
    fn when_is_checked_before_unless() {
        let guard = Guard::new()
            .when([TestState::Complete])
            .unless([TestState::Initial]);

        // Both fail; the verdict names the first rule applied.
        assert_eq!(
            guard.evaluate(&observed(TestState::Initial, &[])),
            Verdict::WhenUnmet
        );
    }

    #[test]
    fn empty_when_rejects_everything() {
        let guard = Guard::<TestState>::new().when([]);

        assert_eq!(
            guard.evaluate(&observed(TestState::Initial, &[TestState::Complete])),
            Verdict::WhenUnmet
        );
    }

    #[test]
    fn guard_is_deterministic() {
        let set = observed(TestState::Processing, &[TestState::Complete]);
        let guard = Guard::new().when([TestState::Complete]);

        assert_eq!(guard.evaluate(&set), guard.evaluate(&set));
    }
}
