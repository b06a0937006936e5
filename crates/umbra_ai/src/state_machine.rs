//! Finite state machine driven by an explicit transition table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Copy + Eq + Hash + Debug {}

/// An event that may move the machine between states
pub trait Event: Copy + Eq + Hash + Debug {}

/// Table-driven state machine: (state, event) -> state
#[derive(Debug, Clone)]
pub struct StateMachine<S: State, E: Event> {
    /// Current state
    current: S,
    /// Previous state
    previous: Option<S>,
    /// Transition table
    transitions: HashMap<(S, E), S>,
}

impl<S: State, E: Event> StateMachine<S, E> {
    /// Create a new state machine
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            transitions: HashMap::new(),
        }
    }

    /// Add a transition
    pub fn add_transition(&mut self, from: S, event: E, to: S) {
        self.transitions.insert((from, event), to);
    }

    /// Builder-style add
    pub fn with_transition(mut self, from: S, event: E, to: S) -> Self {
        self.add_transition(from, event, to);
        self
    }

    /// Get current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Get previous state
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Check if in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Where `event` would lead from the current state
    pub fn next(&self, event: E) -> Option<S> {
        self.transitions.get(&(self.current, event)).copied()
    }

    /// Apply an event. Returns the new state, or `None` if the table has no
    /// entry for it (the machine stays put).
    pub fn handle(&mut self, event: E) -> Option<S> {
        let to = self.next(event)?;
        self.previous = Some(self.current);
        self.current = to;
        Some(to)
    }
}

/// Behavioural category of a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GuardArchetype {
    /// Stands at a post and returns to it after a chase
    StandingDuty,
    /// Walks a waypoint route
    #[default]
    Patrollable,
}

/// Top-level guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardState {
    Idle,
    Patrol,
    Chasing,
}

impl State for GuardState {}

impl GuardState {
    /// State a fresh guard of this archetype starts in
    pub fn initial(archetype: GuardArchetype) -> Self {
        match archetype {
            GuardArchetype::StandingDuty => Self::Idle,
            GuardArchetype::Patrollable => Self::Patrol,
        }
    }
}

impl std::fmt::Display for GuardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Patrol => write!(f, "Patrol"),
            Self::Chasing => write!(f, "Chasing"),
        }
    }
}

/// Events that move a guard between states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardEvent {
    /// Sustained sight reached the detection threshold
    TargetDetected,
    /// Lose and inspection timers both ran out
    TargetLost,
}

impl Event for GuardEvent {}

/// Pure transition table for a guard archetype
pub fn guard_transition(
    state: GuardState,
    event: GuardEvent,
    archetype: GuardArchetype,
) -> Option<GuardState> {
    use GuardEvent::*;
    use GuardState::*;

    match (state, event) {
        (Idle | Patrol, TargetDetected) => Some(Chasing),
        (Chasing, TargetLost) => Some(GuardState::initial(archetype)),
        _ => None,
    }
}

/// Build the state machine for a guard archetype
pub fn guard_machine(archetype: GuardArchetype) -> StateMachine<GuardState, GuardEvent> {
    let states = [GuardState::Idle, GuardState::Patrol, GuardState::Chasing];
    let events = [GuardEvent::TargetDetected, GuardEvent::TargetLost];

    let mut machine = StateMachine::new(GuardState::initial(archetype));
    for from in states {
        for event in events {
            if let Some(to) = guard_transition(from, event, archetype) {
                machine.add_transition(from, event, to);
            }
        }
    }
    machine
}
