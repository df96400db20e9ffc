//! Single-threaded model-based planning: on each `values` call, run
//! simulated rollouts through a learned world model to update a wrapped
//! value model before answering.

use crate::agent::sample_action;
use crate::episode::{Encoder, Episode};
use crate::model::Model;
use crate::model_world::ModelWorld;
use crate::selector::Selector;

/// Configuration for [`DynaModel`].
#[derive(Debug, Clone, Copy)]
pub struct DynaConfig {
    /// Simulated steps per rollout episode.
    ///
    /// **Default:** `20`
    pub rollout_length: usize,
    /// Rollout episodes run per real `values` call.
    ///
    /// **Default:** `5`
    pub num_rollouts: usize,
    /// Whether the value model learns after every individual rollout
    /// (`true`, matching the apparent original intent) or once on the
    /// batch of all `num_rollouts` rollouts.
    ///
    /// **Default:** `true`
    pub learn_after_each_rollout: bool,
}

impl Default for DynaConfig {
    fn default() -> Self {
        Self {
            rollout_length: 20,
            num_rollouts: 5,
            learn_after_each_rollout: true,
        }
    }
}

/// Composes a world model (wrapped in a [`ModelWorld`]), a value model, and
/// a [`Selector`] used to act during simulated rollouts. Implements [`Model`]
/// itself so it can be dropped into an [`crate::agent::Agent`] in place of a
/// plain value model.
pub struct DynaModel {
    model_world: ModelWorld,
    value_model: Box<dyn Model>,
    selector: Box<dyn Selector>,
    num_actions: usize,
    encoder: Option<Encoder>,
    config: DynaConfig,
}

impl DynaModel {
    pub fn new(
        world_model: Box<dyn Model>,
        value_model: Box<dyn Model>,
        selector: Box<dyn Selector>,
        initial_state: Vec<f32>,
        num_actions: usize,
        encoder: Option<Encoder>,
        config: DynaConfig,
    ) -> Self {
        let model_world = ModelWorld::new(world_model, initial_state, num_actions);
        Self {
            model_world,
            value_model,
            selector,
            num_actions,
            encoder,
            config,
        }
    }

    /// Train the wrapped world model directly, bypassing the `Model` trait
    /// (used by [`learn`](Model::learn) and exposed for tests).
    pub fn learn_world_model(&mut self, real_episodes: &[Episode]) {
        self.model_world.learn(real_episodes);
    }

    /// Run one simulated episode through `self.model_world`, seeded at
    /// `seed`'s current position via `step_supervised` replay, choosing
    /// actions with `self.selector` against `self.value_model`'s
    /// predictions.
    fn rollout(&mut self, seed: &Episode) -> Episode {
        use crate::world::World;

        self.model_world.reset();
        let mut s = Vec::new();
        self.model_world.initial_state(&mut s);
        for t in 0..seed.length().saturating_sub(1) {
            let action = seed.action(t);
            let target = seed.state(t + 1);
            let reward = seed.reward(t);
            self.model_world.step_supervised(action, target, reward, &mut s);
        }

        let value_size = self.selector.value_size(self.num_actions);
        let mut episode = Episode::new(value_size, self.num_actions, self.encoder.clone());
        episode.add_state(&s);
        self.value_model.next_episode();
        let mut v = Vec::new();
        self.value_model.values(&episode, &mut v);
        episode.add_values(&v);

        let mut steps = 0usize;
        let mut finished = false;
        let mut probs = Vec::new();
        let mut td_error = 0.0;

        while steps < self.config.rollout_length && !finished {
            self.selector.actions(&mut episode, &mut probs, &mut td_error);
            let action = sample_action(&probs);

            let res = self.model_world.step(action, &mut s);
            finished = res.finished;

            episode.add_action(action);
            episode.add_reward(res.reward);
            episode.add_state(&s);
            self.value_model.values(&episode, &mut v);
            episode.add_values(&v);
            steps += 1;
        }

        self.selector.actions(&mut episode, &mut probs, &mut td_error);
        episode.set_aborted(!finished);
        episode
    }
}

impl Model for DynaModel {
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        let mut pending = Vec::new();
        for _ in 0..self.config.num_rollouts {
            let rollout_episode = self.rollout(episode);
            if self.config.learn_after_each_rollout {
                self.value_model.learn(std::slice::from_ref(&rollout_episode));
            } else {
                pending.push(rollout_episode);
            }
        }
        if !pending.is_empty() {
            self.value_model.learn(&pending);
        }
        self.value_model.values(episode, out);
        debug_assert!(out.iter().all(|v| v.is_finite()), "DynaModel::values produced a non-finite entry");
    }

    fn learn(&mut self, batch: &[Episode]) {
        self.value_model.learn(batch);
        self.model_world.learn(batch);
    }

    fn values_for_plotting(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        self.value_model.values_for_plotting(episode, out);
    }

    fn next_episode(&mut self) {
        self.value_model.next_episode();
    }

    fn swap_models(&mut self) {
        self.value_model.swap_models();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::Constant;
    use crate::learning::QLearning;
    use crate::model::Table;
    use crate::selector::EpsilonGreedy;

    fn episode_with(states: &[&[f32]], actions: &[usize], rewards: &[f32]) -> Episode {
        let mut e = Episode::new(2, 2, None);
        e.add_state(states[0]);
        e.add_values(&[0.0, 0.0]);
        for i in 0..actions.len() {
            e.add_action(actions[i]);
            e.add_reward(rewards[i]);
            e.add_state(states[i + 1]);
            e.add_values(&[0.0, 0.0]);
        }
        e
    }

    #[test]
    fn values_runs_rollouts_and_still_returns_a_value_size_vector() {
        let world_model = Box::new(Table::new(3)); // state_size=1 => value_size=3
        let value_model = Box::new(Table::new(2));
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.5)));
        let config = DynaConfig {
            rollout_length: 3,
            num_rollouts: 2,
            learn_after_each_rollout: true,
        };
        let mut dyna = DynaModel::new(world_model, value_model, selector, vec![0.0], 2, None, config);

        let seed = episode_with(&[&[0.0], &[1.0]], &[0], &[-1.0]);
        let mut out = Vec::new();
        dyna.values(&seed, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn learn_trains_both_value_and_world_models() {
        let world_model = Box::new(Table::new(3));
        let value_model = Box::new(Table::new(2));
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.5)));
        let mut dyna = DynaModel::new(world_model, value_model, selector, vec![0.0], 2, None, DynaConfig::default());

        let batch = vec![episode_with(&[&[0.0], &[1.0]], &[0], &[-1.0])];
        dyna.learn(&batch);
        // No panics and a subsequent values() call succeeds is the observable contract here,
        // since both internal models are behind the Model trait.
        let mut out = Vec::new();
        dyna.values(&batch[0], &mut out);
        assert_eq!(out.len(), 2);
    }
}
