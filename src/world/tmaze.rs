use rand::Rng;

use crate::world::{StepResult, World};

/// A T-maze memory task (Bakker 2001-style): the agent walks down a
/// corridor of `length` cells, observing a hint at the start that
/// indicates which way to turn at the junction. Three actions: `0`
/// advances down the corridor (or is a losing "go straight" at the
/// junction), `1`/`2` turn left/right at the junction.
///
/// Per the `tmaze` CLI token, the hint is only included in the
/// observation for the world's first `info_time` real [`step`](World::step)
/// calls across the whole run (not per-episode) — after that it is
/// zeroed, forcing the agent to carry the hint across corridor steps
/// itself (e.g. via [`Freeze`](crate::world::wrappers::Freeze)) instead of
/// relying on it being re-observable at every position.
pub struct TMazeWorld {
    length: u32,
    info_time: u64,
    elapsed: u64,
    pos: u32,
    hint: f32,
}

impl TMazeWorld {
    pub fn new(length: u32, info_time: u64) -> Self {
        Self {
            length,
            info_time,
            elapsed: 0,
            pos: 0,
            hint: 1.0,
        }
    }

    fn hint_signal(&self) -> f32 {
        if self.pos == 0 && self.elapsed < self.info_time {
            self.hint
        } else {
            0.0
        }
    }
}

impl World for TMazeWorld {
    fn num_actions(&self) -> usize {
        3
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.hint = if rand::thread_rng().gen_bool(0.5) {
            1.0
        } else {
            -1.0
        };
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        out.clear();
        out.push(self.pos as f32);
        out.push(self.hint_signal());
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        self.elapsed += 1;

        let res = if self.pos < self.length {
            self.pos += 1;
            StepResult {
                finished: false,
                reward: -1.0,
            }
        } else {
            let correct = (self.hint > 0.0 && action == 1) || (self.hint < 0.0 && action == 2);
            StepResult {
                finished: true,
                reward: if correct { 10.0 } else { -10.0 },
            }
        };

        out.clear();
        out.push(self.pos as f32);
        out.push(self.hint_signal());
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_turn_at_junction_is_rewarded() {
        let mut world = TMazeWorld::new(2, 1000);
        world.reset();
        let mut out = Vec::new();
        world.step(0, &mut out);
        world.step(0, &mut out); // now at the junction

        let action = if world.hint > 0.0 { 1 } else { 2 };
        let res = world.step(action, &mut out);
        assert!(res.finished);
        assert_eq!(res.reward, 10.0);
    }

    #[test]
    fn hint_is_hidden_after_info_time_elapses() {
        let mut world = TMazeWorld::new(5, 2);
        world.reset();
        let mut out = Vec::new();
        world.initial_state(&mut out);
        assert_eq!(out[1], world.hint, "hint visible before info_time elapses");

        world.step(0, &mut out);
        world.step(0, &mut out);
        world.reset();
        world.initial_state(&mut out);
        assert_eq!(out[1], 0.0, "hint hidden once info_time has elapsed");
    }
}
