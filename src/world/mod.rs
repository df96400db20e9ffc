//! Episodic environments.
//!
//! A [`World`] owns its own simulation state and a step counter; its
//! `num_actions` is fixed at construction. Wrapper worlds compose a base
//! world to reshape observations ([`wrappers::Scale`], [`wrappers::OneHot`])
//! or to extend the action set with memory-carrying "device" actions
//! ([`wrappers::Integrator`], [`wrappers::Freeze`]).

pub mod grid;
pub mod polar_grid;
pub mod tmaze;
pub mod wrappers;

pub use grid::GridWorld;
pub use polar_grid::PolarGridWorld;
pub use tmaze::TMazeWorld;

/// Outcome of a single [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub finished: bool,
    pub reward: f32,
}

/// A stateful, episodic Markov decision process with a finite, fixed-size
/// discrete action space.
///
/// Out-of-range actions are undefined behavior at the contract level:
/// callers must honor [`num_actions`](World::num_actions). Implementations
/// are not required to validate this themselves.
pub trait World: Send {
    /// The number of actions available at every state.
    fn num_actions(&self) -> usize;

    /// Begin a new episode. Must be called before [`initial_state`](World::initial_state).
    fn reset(&mut self);

    /// Write the state the agent observes first in the current episode.
    fn initial_state(&self, out: &mut Vec<f32>);

    /// Apply `action`, writing the successor state into `out`.
    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult;

    /// Replay a recorded transition against this world, driving it to
    /// `target_state` rather than trusting its own sample.
    ///
    /// The default implementation has no special supervised behavior: it
    /// performs an ordinary [`step`](World::step) and ignores
    /// `target_state`/`reward`. Worlds backed by a learned model (see
    /// [`crate::model_world::ModelWorld`]) override this to force their
    /// internal state to the recorded successor.
    fn step_supervised(
        &mut self,
        action: usize,
        _target_state: &[f32],
        _reward: f32,
        out: &mut Vec<f32>,
    ) -> StepResult {
        self.step(action, out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A trivial world used across unit tests: returns a fixed state, two
    /// actions, never terminates.
    pub struct FixedWorld {
        pub state: Vec<f32>,
        pub counter: u32,
    }

    impl FixedWorld {
        pub fn new(state: Vec<f32>) -> Self {
            Self { state, counter: 0 }
        }
    }

    impl World for FixedWorld {
        fn num_actions(&self) -> usize {
            2
        }

        fn reset(&mut self) {
            self.counter = 0;
        }

        fn initial_state(&self, out: &mut Vec<f32>) {
            out.clear();
            out.extend_from_slice(&self.state);
        }

        fn step(&mut self, _action: usize, out: &mut Vec<f32>) -> StepResult {
            self.counter += 1;
            out.clear();
            out.extend_from_slice(&self.state);
            StepResult {
                finished: false,
                reward: 0.0,
            }
        }
    }
}
