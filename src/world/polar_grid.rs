use crate::world::grid::GridWorld;
use crate::world::{StepResult, World};

/// The same 10x5 geometry as [`GridWorld`], but the observation reported
/// to the agent is `(heading, distance_to_wall_ahead)` instead of raw
/// `(x, y)` coordinates — each of the four actions both moves the agent
/// and sets its heading to that direction.
pub struct PolarGridWorld {
    grid: GridWorld,
    width: i32,
    height: i32,
    heading: i32,
}

impl PolarGridWorld {
    pub fn standard() -> Self {
        Self {
            grid: GridWorld::standard(),
            width: 10,
            height: 5,
            heading: 3, // facing right
        }
    }

    pub fn with_random_initial(mut self) -> Self {
        self.grid = self.grid.with_random_initial();
        self
    }

    fn distance_to_wall(&self, pos: (i32, i32)) -> i32 {
        match self.heading {
            0 => pos.1,                  // facing up
            1 => self.height - 1 - pos.1, // facing down
            2 => pos.0,                  // facing left
            _ => self.width - 1 - pos.0, // facing right
        }
    }

    fn pos_from_last(&self, raw: &[f32]) -> (i32, i32) {
        (raw[0] as i32, raw[1] as i32)
    }
}

impl World for PolarGridWorld {
    fn num_actions(&self) -> usize {
        self.grid.num_actions()
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.heading = 3;
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        let mut raw = Vec::new();
        self.grid.initial_state(&mut raw);
        let pos = self.pos_from_last(&raw);
        out.clear();
        out.push(self.heading as f32);
        out.push(self.distance_to_wall(pos) as f32);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let mut raw = Vec::new();
        let res = self.grid.step(action, &mut raw);
        self.heading = action as i32;
        let pos = self.pos_from_last(&raw);
        out.clear();
        out.push(self.heading as f32);
        out.push(self.distance_to_wall(pos) as f32);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_tracks_last_action_and_distance_shrinks() {
        let mut world = PolarGridWorld::standard();
        world.reset();
        let mut out = Vec::new();
        world.step(3, &mut out); // move right, now at (1,2), facing right
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 8.0); // 10 - 1 - 1
    }
}
