//! A minimal goal-seeking world.
//!
//! Every walker starts at the same point and may move one step up, right, down
//! or left per tick. Fitness is the negated distance to the goal at the end of
//! the episode, so walkers that end closer score higher.

use evonet_engine::{Brain, NetworkError};
use evonet_training::{
    agent::{self, Agent},
    genetic::Individual,
};

use crate::config::ArenaConfig;

/// Goal offset (x, y) and velocity (x, y).
pub const INPUT_COUNT: usize = 4;
/// Up, right, down, left, and an output that maps to no movement.
pub const OUTPUT_COUNT: usize = 5;

/// Goal offsets are divided by this before being fed to the network.
const OFFSET_SCALE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    #[must_use]
    pub fn from_action(action: usize) -> Option<Self> {
        match action {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    fn direction(self) -> [f64; 2] {
        match self {
            Self::Up => [0.0, 1.0],
            Self::Right => [1.0, 0.0],
            Self::Down => [0.0, -1.0],
            Self::Left => [-1.0, 0.0],
        }
    }
}

/// The physical state of one walker.
#[derive(Debug, Clone)]
pub struct Body {
    arena: ArenaConfig,
    position: [f64; 2],
    velocity: [f64; 2],
}

impl Body {
    fn new(arena: ArenaConfig) -> Self {
        Self {
            arena,
            position: arena.start,
            velocity: [0.0; 2],
        }
    }

    fn goal_offset(&self) -> [f64; 2] {
        [
            self.arena.goal[0] - self.position[0],
            self.arena.goal[1] - self.position[1],
        ]
    }
}

impl Agent for Body {
    fn observe(&self, inputs: &mut [f64]) {
        let [dx, dy] = self.goal_offset();
        inputs.copy_from_slice(&[
            dx / OFFSET_SCALE,
            dy / OFFSET_SCALE,
            self.velocity[0],
            self.velocity[1],
        ]);
    }

    fn act(&mut self, action: Option<usize>) {
        let Some(step) = action.and_then(Move::from_action) else {
            self.velocity = [0.0; 2];
            return;
        };
        let [x, y] = step.direction();
        self.velocity = [x * self.arena.speed, y * self.arena.speed];
        self.position[0] += self.velocity[0] * self.arena.tick_seconds;
        self.position[1] += self.velocity[1] * self.arena.tick_seconds;
    }
}

/// A network-controlled body: one member of the training population.
#[derive(Debug, Clone)]
pub struct Walker<B> {
    brain: B,
    body: Body,
    best: bool,
}

impl<B> Walker<B>
where
    B: Brain,
{
    pub fn new(brain: B, arena: ArenaConfig) -> Self {
        Self {
            brain,
            body: Body::new(arena),
            best: false,
        }
    }

    #[must_use]
    pub fn distance_to_goal(&self) -> f64 {
        let [dx, dy] = self.body.goal_offset();
        dx.hypot(dy)
    }

    /// Plays one episode from the current state.
    pub fn run_episode(&mut self) -> Result<(), NetworkError> {
        let mut inputs = Vec::with_capacity(INPUT_COUNT);
        for _ in 0..self.body.arena.ticks_per_generation {
            agent::run_tick(&self.brain, &mut self.body, &mut inputs)?;
        }
        Ok(())
    }
}

impl<B> Individual for Walker<B>
where
    B: Brain,
{
    type Brain = B;

    fn brain(&self) -> &B {
        &self.brain
    }

    fn set_brain(&mut self, brain: B) {
        self.brain = brain;
    }

    fn fitness(&self) -> f64 {
        -self.distance_to_goal()
    }

    fn reset(&mut self) {
        self.body = Body::new(self.body.arena);
        self.best = false;
    }

    fn mark_best(&mut self) {
        self.best = true;
    }
}
