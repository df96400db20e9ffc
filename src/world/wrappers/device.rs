use crate::world::{StepResult, World};

/// A local register that owns one or more "device" actions appended after
/// a base world's real actions. Device actions never advance the base
/// world; they only mutate the device's own state and carry information
/// across time for an otherwise memoryless model.
pub trait Device: Send {
    /// Number of device-local actions, appended after the base world's.
    fn num_actions(&self) -> usize;

    /// Called once per episode with the base world's unprocessed initial state.
    fn init(&mut self, base_state: &[f32]);

    /// Handle device-local action `local_action` (already offset to `0..num_actions()`).
    /// `last_state` is the most recently cached, unprocessed base observation.
    ///
    /// Returns the reward for this local transition.
    fn handle(&mut self, local_action: usize, last_state: &[f32]) -> f32;

    /// Append this device's owned observations onto `out`, which already
    /// contains the (possibly stale) base state.
    fn process_state(&self, out: &mut Vec<f32>);
}

/// Wraps a base world, extending its action set with a [`Device`]'s local
/// actions. Actions below the base world's count are forwarded; actions at
/// or above it are handled by the device without advancing the base world.
pub struct DeviceWorld<D: Device> {
    inner: Box<dyn World>,
    device: D,
    last_state: Vec<f32>,
}

impl<D: Device> DeviceWorld<D> {
    pub fn new(inner: Box<dyn World>, device: D) -> Self {
        Self {
            inner,
            device,
            last_state: Vec::new(),
        }
    }
}

impl<D: Device> World for DeviceWorld<D> {
    fn num_actions(&self) -> usize {
        self.inner.num_actions() + self.device.num_actions()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.inner.initial_state(&mut self.last_state);
        let base = self.last_state.clone();
        self.device.init(&base);
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.last_state);
        self.device.process_state(out);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let base_actions = self.inner.num_actions();
        out.clear();
        if action < base_actions {
            let res = self.inner.step(action, &mut self.last_state);
            out.extend_from_slice(&self.last_state);
            self.device.process_state(out);
            res
        } else {
            let local = action - base_actions;
            let reward = self.device.handle(local, &self.last_state);
            out.extend_from_slice(&self.last_state);
            self.device.process_state(out);
            StepResult {
                finished: false,
                reward,
            }
        }
    }
}

/// Holds a clamped counter in `[min, max]`, initially `0`. Action `0` is
/// `+1`, action `1` is `-1`; the counter clamps at the bounds. A nudge that
/// changes the counter costs `-1`; a nudge blocked by a bound costs `-2`.
/// The current counter value is appended to the observation.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    min: i32,
    max: i32,
    counter: i32,
}

impl Integrator {
    pub fn new(min: i32, max: i32) -> Self {
        assert!(max >= min, "max ({max}) must be >= min ({min})");
        Self {
            min,
            max,
            counter: 0,
        }
    }
}

impl Device for Integrator {
    fn num_actions(&self) -> usize {
        2
    }

    fn init(&mut self, _base_state: &[f32]) {
        self.counter = 0;
    }

    fn handle(&mut self, local_action: usize, _last_state: &[f32]) -> f32 {
        let delta = if local_action == 0 { 1 } else { -1 };
        let next = (self.counter + delta).clamp(self.min, self.max);
        let reward = if next == self.counter { -2.0 } else { -1.0 };
        self.counter = next;
        reward
    }

    fn process_state(&self, out: &mut Vec<f32>) {
        out.push(self.counter as f32);
    }
}

/// Holds a frozen snapshot of the base state, initially the base world's
/// initial state. The single freeze action copies the most recent cached
/// base observation into the snapshot, for a reward of `-1`. The snapshot
/// is appended to the current observation.
#[derive(Debug, Clone, Default)]
pub struct Freeze {
    snapshot: Vec<f32>,
}

impl Freeze {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Device for Freeze {
    fn num_actions(&self) -> usize {
        1
    }

    fn init(&mut self, base_state: &[f32]) {
        self.snapshot = base_state.to_vec();
    }

    fn handle(&mut self, _local_action: usize, last_state: &[f32]) -> f32 {
        self.snapshot = last_state.to_vec();
        -1.0
    }

    fn process_state(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::FixedWorld;

    #[test]
    fn integrator_clamps_and_rewards_per_spec_trace() {
        let inner = Box::new(FixedWorld::new(vec![7.0]));
        let mut world = DeviceWorld::new(inner, Integrator::new(0, 3));
        world.reset();

        let actions = [2, 2, 2, 2, 3]; // device +,+,+,+,- (base world has 2 actions)
        let expected_counters = [1.0, 2.0, 3.0, 3.0, 2.0];
        let expected_rewards = [-1.0, -1.0, -1.0, -2.0, -1.0];

        let mut out = Vec::new();
        for i in 0..5 {
            let res = world.step(actions[i], &mut out);
            assert_eq!(out, vec![7.0, expected_counters[i]]);
            assert_eq!(res.reward, expected_rewards[i]);
        }
    }

    #[test]
    fn integrator_plus_action_leaves_base_world_unchanged() {
        let inner = Box::new(FixedWorld::new(vec![7.0]));
        let mut world = DeviceWorld::new(inner, Integrator::new(0, 3));
        world.reset();
        let mut out = Vec::new();
        let res = world.step(2, &mut out); // device action 0 == "+"
        assert_eq!(out, vec![7.0, 1.0]);
        assert_eq!(res.reward, -1.0);
    }

    #[test]
    fn freeze_snapshot_matches_most_recent_base_observation() {
        let inner = Box::new(FixedWorld::new(vec![1.0, 2.0]));
        let mut world = DeviceWorld::new(inner, Freeze::new());
        world.reset();

        let mut out = Vec::new();
        world.step(0, &mut out); // advance base world (state stays [1,2] for FixedWorld)
        let res = world.step(2, &mut out); // freeze action
        assert_eq!(res.reward, -1.0);
        assert_eq!(out, vec![1.0, 2.0, 1.0, 2.0]);
    }
}
