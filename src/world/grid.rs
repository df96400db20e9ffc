use rand::Rng;

use crate::world::{StepResult, World};

/// A 10x5 discrete grid world. Observation is the agent's `(x, y)`
/// position. Four actions move the agent one cell up/down/left/right,
/// clamped to the grid bounds; the obstacle cell blocks movement (the
/// agent stays put). Reaching the goal ends the episode with reward
/// `+10`; every other step costs `-1`.
pub struct GridWorld {
    width: i32,
    height: i32,
    start: (i32, i32),
    goal: (i32, i32),
    obstacle: (i32, i32),
    pos: (i32, i32),
    random_initial: bool,
}

impl GridWorld {
    pub fn new(width: i32, height: i32, start: (i32, i32), goal: (i32, i32), obstacle: (i32, i32)) -> Self {
        Self {
            width,
            height,
            start,
            goal,
            obstacle,
            pos: start,
            random_initial: false,
        }
    }

    /// The 10x5 geometry installed by the `gridworld` CLI token.
    pub fn standard() -> Self {
        Self::new(10, 5, (0, 2), (9, 2), (5, 2))
    }

    /// Randomize the initial cell on each [`reset`](World::reset),
    /// excluding the goal and obstacle cells (the `randominitial` CLI token).
    pub fn with_random_initial(mut self) -> Self {
        self.random_initial = true;
        self
    }

    fn clamp(&self, pos: (i32, i32)) -> (i32, i32) {
        (pos.0.clamp(0, self.width - 1), pos.1.clamp(0, self.height - 1))
    }

    fn delta(action: usize) -> (i32, i32) {
        match action {
            0 => (0, -1), // up
            1 => (0, 1),  // down
            2 => (-1, 0), // left
            _ => (1, 0),  // right
        }
    }
}

impl World for GridWorld {
    fn num_actions(&self) -> usize {
        4
    }

    fn reset(&mut self) {
        self.pos = if self.random_initial {
            let mut rng = rand::thread_rng();
            loop {
                let p = (rng.gen_range(0..self.width), rng.gen_range(0..self.height));
                if p != self.goal && p != self.obstacle {
                    break p;
                }
            }
        } else {
            self.start
        };
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        out.clear();
        out.push(self.pos.0 as f32);
        out.push(self.pos.1 as f32);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let next = self.clamp((self.pos.0 + Self::delta(action).0, self.pos.1 + Self::delta(action).1));
        self.pos = if next == self.obstacle { self.pos } else { next };

        out.clear();
        out.push(self.pos.0 as f32);
        out.push(self.pos.1 as f32);

        if self.pos == self.goal {
            StepResult {
                finished: true,
                reward: 10.0,
            }
        } else {
            StepResult {
                finished: false,
                reward: -1.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaching_the_goal_terminates_with_positive_reward() {
        let mut world = GridWorld::standard();
        world.reset();
        let mut out = Vec::new();
        let mut res = StepResult {
            finished: false,
            reward: 0.0,
        };
        for _ in 0..9 {
            res = world.step(3, &mut out); // right
        }
        assert_eq!(out, vec![9.0, 2.0]);
        assert!(res.finished);
        assert_eq!(res.reward, 10.0);
    }

    #[test]
    fn obstacle_blocks_movement() {
        let mut world = GridWorld::standard();
        world.reset();
        let mut out = Vec::new();
        for _ in 0..5 {
            world.step(3, &mut out); // move to (5, 2), the obstacle
        }
        assert_eq!(out, vec![4.0, 2.0], "agent cannot enter the obstacle cell");
    }
}
