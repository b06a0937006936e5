//! Per-guard orchestration: brain, patroller and navigation agent

use crate::guard::{GuardBrain, GuardContext, GuardPose, GuardSignal};
use crate::navigation::{NavAgent, NavigationService};
use crate::patrol::WaypointPatroller;
use crate::state_machine::GuardState;

/// A guard as the simulation drives it
#[derive(Debug, Clone)]
pub struct GuardController {
    brain: GuardBrain,
    patroller: WaypointPatroller,
    agent: NavAgent,
}

impl GuardController {
    /// Assemble a guard; a patrolling guard heads for its first waypoint
    pub fn new(brain: GuardBrain, mut patroller: WaypointPatroller, mut agent: NavAgent) -> Self {
        if brain.state() == GuardState::Patrol {
            if let Some(first) = patroller.start() {
                agent.set_destination(first);
            }
        }

        Self {
            brain,
            patroller,
            agent,
        }
    }

    pub fn brain(&self) -> &GuardBrain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut GuardBrain {
        &mut self.brain
    }

    pub fn patroller(&self) -> &WaypointPatroller {
        &self.patroller
    }

    pub fn agent(&self) -> &NavAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut NavAgent {
        &mut self.agent
    }

    /// Current pose from the agent
    pub fn pose(&self) -> GuardPose {
        GuardPose::new(self.agent.position, self.agent.forward)
    }

    /// Run the brain, then drive the patroller only while patrolling, then
    /// move the agent.
    pub fn tick(&mut self, delta_time: f32, context: &GuardContext<'_>) {
        let pose = self.pose();
        self.brain.tick(delta_time, &pose, context, &mut self.agent);

        let patrolling = self.brain.is_active() && self.brain.state() == GuardState::Patrol;
        self.patroller.set_enabled(patrolling);
        self.patroller.drive(delta_time, &mut self.agent);

        self.agent.update(delta_time);
    }

    /// Take the brain's signals
    pub fn drain_signals(&mut self) -> Vec<GuardSignal> {
        self.brain.drain_signals()
    }

    /// Tear the guard down; pending deferred actions are dropped
    pub fn shutdown(&mut self) {
        self.brain.shutdown();
        self.patroller.set_enabled(false);
        self.agent.halt(true);
    }
}
