//! Game outcome notifier

use serde::{Deserialize, Serialize};

/// Time scale applied once the game has been decided
pub const GAME_OVER_TIME_SCALE: f32 = 0.05;

/// How the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The target reached a win zone
    Won,
    /// A guard caught the target
    Lost,
}

/// Receiver of terminal game signals.
///
/// Both calls are idempotent: the first one decides the game, every later
/// call is a no-op and returns `false`.
pub trait OutcomeNotifier {
    /// Signal that the target was caught
    fn trigger_lose(&mut self) -> bool;
    /// Signal that the target escaped
    fn trigger_win(&mut self) -> bool;
    /// The decided outcome, if any
    fn outcome(&self) -> Option<Outcome>;
}

/// Single-instance game outcome service owned by the simulation root
#[derive(Debug, Clone)]
pub struct GameOutcome {
    outcome: Option<Outcome>,
    time_scale: f32,
    input_frozen: bool,
    menu_open: bool,
}

impl GameOutcome {
    /// Create an undecided, running game
    pub fn new() -> Self {
        Self {
            outcome: None,
            time_scale: 1.0,
            input_frozen: false,
            menu_open: false,
        }
    }

    /// Whether the game has been decided
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Multiplier applied to the simulation delta time
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Whether target input should be ignored
    pub fn input_frozen(&self) -> bool {
        self.input_frozen
    }

    /// Whether the pause menu is open
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open or close the pause menu. Ignored once the game is decided.
    pub fn toggle_menu(&mut self) -> bool {
        if self.is_game_over() {
            log::debug!("Menu toggle ignored: game already ended");
            return self.menu_open;
        }

        self.menu_open = !self.menu_open;
        self.time_scale = if self.menu_open { 0.0 } else { 1.0 };
        self.menu_open
    }

    /// Reset to a fresh, undecided game
    pub fn reload(&mut self) {
        *self = Self::new();
    }

    fn decide(&mut self, outcome: Outcome) -> bool {
        if let Some(existing) = self.outcome {
            log::debug!("Ignoring {:?}: game already ended with {:?}", outcome, existing);
            return false;
        }

        self.outcome = Some(outcome);
        self.menu_open = false;
        self.input_frozen = true;
        self.time_scale = GAME_OVER_TIME_SCALE;
        log::info!("Game over: {:?}", outcome);
        true
    }
}

impl Default for GameOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeNotifier for GameOutcome {
    fn trigger_lose(&mut self) -> bool {
        self.decide(Outcome::Lost)
    }

    fn trigger_win(&mut self) -> bool {
        self.decide(Outcome::Won)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}
