//! A [`World`] whose transitions are produced by a trained [`Model`]
//! instead of ground truth, used by [`crate::dyna::DynaModel`] and
//! [`crate::texplore::TEXPLOREModel`] to run simulated rollouts.

use crate::episode::Episode;
use crate::model::Model;
use crate::world::{StepResult, World};

/// Wraps a [`Model`] so it can be driven through the ordinary [`World`]
/// interface. Internally maintains a separate "model episode" whose stored
/// states are `(state, action)` concatenations and whose stored values are
/// the model's predicted `(Δstate, reward, finished)` tuples — this is a
/// different episode from the one the agent loop records, purely an
/// implementation detail of how the wrapped [`Model`] gets queried.
pub struct ModelWorld {
    model: Box<dyn Model>,
    num_actions: usize,
    state_size: usize,
    initial_state: Vec<f32>,
    current_state: Vec<f32>,
    model_episode: Episode,
}

impl ModelWorld {
    pub fn new(model: Box<dyn Model>, initial_state: Vec<f32>, num_actions: usize) -> Self {
        let state_size = initial_state.len();
        Self {
            model,
            num_actions,
            state_size,
            current_state: initial_state.clone(),
            initial_state,
            model_episode: Episode::new(state_size + 2, 1, None),
        }
    }

    fn value_size(&self) -> usize {
        self.state_size + 2
    }

    /// Forward to the wrapped model's own `swap_models`, used by
    /// [`crate::texplore::TEXPLOREModel`]'s world-model learner thread.
    pub fn swap_models(&mut self) {
        self.model.swap_models();
    }

    fn query(&self, action: usize) -> Vec<f32> {
        let mut query = self.current_state.clone();
        query.push(action as f32);
        query
    }

    /// Train the wrapped model on real transitions. Preserves each real
    /// episode's `aborted` flag: the `finished` target is `1.0` only on the
    /// last transition of an episode that ended on a true terminal, never
    /// on one that merely hit the step cap.
    pub fn learn(&mut self, real_episodes: &[Episode]) {
        let mut derived = Vec::with_capacity(real_episodes.len());
        for e in real_episodes {
            if e.length() < 2 {
                continue;
            }
            let value_size = e.state_size() + 2;
            let mut model_episode = Episode::new(value_size, 1, None);
            let last_t = e.length() - 2;
            for t in 0..=last_t {
                let s0 = e.state(t).to_vec();
                let s1 = e.state(t + 1).to_vec();
                let action = e.action(t) as f32;

                let mut query = s0.clone();
                query.push(action);
                model_episode.add_state(&query);

                let mut v: Vec<f32> = s0.iter().zip(&s1).map(|(a, b)| b - a).collect();
                v.push(e.reward(t));
                v.push(if t == last_t && !e.aborted() { 1.0 } else { 0.0 });
                model_episode.add_values(&v);
            }
            derived.push(model_episode);
        }
        self.model.learn(&derived);
    }
}

impl World for ModelWorld {
    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn reset(&mut self) {
        self.current_state = self.initial_state.clone();
        self.model_episode = Episode::new(self.value_size(), 1, None);
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend_from_slice(&self.current_state);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let query = self.query(action);
        self.model_episode.add_state(&query);

        let mut v = Vec::new();
        self.model.values(&self.model_episode, &mut v);
        self.model_episode.add_values(&v);

        for (s, delta) in self.current_state.iter_mut().zip(&v) {
            *s += delta;
        }
        let reward = v[self.state_size];
        let finished = v[self.state_size + 1] > 0.5;

        out.clear();
        out.extend_from_slice(&self.current_state);
        StepResult { finished, reward }
    }

    fn step_supervised(&mut self, action: usize, target_state: &[f32], reward: f32, out: &mut Vec<f32>) -> StepResult {
        let query = self.query(action);
        self.model_episode.add_state(&query);
        self.model_episode.add_values(&vec![0.0; self.value_size()]);

        self.current_state = target_state.to_vec();
        out.clear();
        out.extend_from_slice(&self.current_state);
        StepResult {
            finished: false,
            reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn real_episode(states: &[&[f32]], actions: &[usize], rewards: &[f32], aborted: bool) -> Episode {
        let mut e = Episode::new(1, actions.len().max(1), None);
        e.add_state(states[0]);
        e.add_values(&[0.0]);
        for i in 0..actions.len() {
            e.add_action(actions[i]);
            e.add_reward(rewards[i]);
            e.add_state(states[i + 1]);
            e.add_values(&[0.0]);
        }
        e.set_aborted(aborted);
        e
    }

    #[test]
    fn table_backed_model_world_reproduces_observed_transitions_exactly() {
        let model = Box::new(Table::new(4)); // state_size=2 => value_size = 2+2
        let mut world = ModelWorld::new(model, vec![0.0, 2.0], 4);

        let e = real_episode(&[&[0.0, 2.0], &[1.0, 2.0]], &[3], &[-1.0], false);
        world.learn(std::slice::from_ref(&e));

        world.reset();
        let mut out = Vec::new();
        let res = world.step(3, &mut out);
        assert_eq!(out, vec![1.0, 2.0]);
        assert_eq!(res.reward, -1.0);
        assert!(res.finished, "a non-aborted real episode's last transition targets finished=true");
    }

    #[test]
    fn aborted_episode_never_targets_finished_true() {
        let model = Box::new(Table::new(3));
        let mut world = ModelWorld::new(model, vec![0.0], 2);
        let e = real_episode(&[&[0.0], &[1.0]], &[0], &[1.0], true);
        world.learn(std::slice::from_ref(&e));

        world.reset();
        let mut out = Vec::new();
        let res = world.step(0, &mut out);
        assert!(!res.finished, "an aborted real episode must never train a finished=true target");
    }

    #[test]
    fn step_supervised_forces_internal_state_to_target() {
        let model = Box::new(Table::new(3));
        let mut world = ModelWorld::new(model, vec![0.0], 2);
        world.reset();
        let mut out = Vec::new();
        let res = world.step_supervised(1, &[42.0], -5.0, &mut out);
        assert_eq!(out, vec![42.0]);
        assert_eq!(res.reward, -5.0);
        assert!(!res.finished);
    }
}
