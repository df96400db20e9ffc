//! The agent loop: reset, select, step, record, train-batch.

use rand::Rng;

use crate::episode::{Encoder, Episode};
use crate::interrupt;
use crate::model::Model;
use crate::selector::Selector;
use crate::world::World;

/// Hyperparameters governing one [`Agent::run`].
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    /// Step cap per episode, after which it is marked `aborted`.
    ///
    /// **Default:** `200`
    pub max_steps: usize,
    /// Number of completed episodes accumulated before `Model::learn` runs.
    ///
    /// **Default:** `10`
    pub batch_size: usize,
    /// Number of episodes to run.
    ///
    /// **Default:** `1000`
    pub num_episodes: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 200,
            batch_size: 10,
            num_episodes: 1000,
        }
    }
}

impl AgentConfig {
    fn validate(&self) {
        assert!(self.max_steps > 0, "max_steps must be positive");
        assert!(self.batch_size > 0, "batch_size must be positive");
        assert!(self.num_episodes > 0, "num_episodes must be positive");
    }
}

/// Sample an action index from a probability vector via inverse-CDF over a
/// uniform draw on `[0, 1)`. Floating-point rounding can leave the
/// cumulative sum just short of the draw even after the last bucket; the
/// fallthrough clamps to the last action rather than panicking, the only
/// way to guarantee a valid action is always returned.
pub(crate) fn sample_action(probs: &[f32]) -> usize {
    let u: f32 = rand::thread_rng().gen();
    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return i;
        }
    }
    probs.len() - 1
}

/// Drives a [`World`] / [`Model`] / [`Selector`] triple through repeated
/// episodes, accumulating completed episodes into batches for
/// [`Model::learn`] and tracking the element-wise min/max of every observed
/// state (for plot-file axis ranges).
pub struct Agent {
    world: Box<dyn World>,
    model: Box<dyn Model>,
    selector: Box<dyn Selector>,
    encoder: Option<Encoder>,
    config: AgentConfig,
    batch: Vec<Episode>,
    min_state: Vec<f32>,
    max_state: Vec<f32>,
}

impl Agent {
    pub fn new(
        world: Box<dyn World>,
        model: Box<dyn Model>,
        selector: Box<dyn Selector>,
        encoder: Option<Encoder>,
        config: AgentConfig,
    ) -> Self {
        config.validate();
        Self {
            world,
            model,
            selector,
            encoder,
            config,
            batch: Vec::new(),
            min_state: Vec::new(),
            max_state: Vec::new(),
        }
    }

    pub fn min_state(&self) -> &[f32] {
        &self.min_state
    }

    pub fn max_state(&self) -> &[f32] {
        &self.max_state
    }

    fn update_min_max(&mut self, state: &[f32]) {
        if self.min_state.is_empty() {
            self.min_state = state.to_vec();
            self.max_state = state.to_vec();
            return;
        }
        for ((min, max), x) in self.min_state.iter_mut().zip(self.max_state.iter_mut()).zip(state) {
            if x < min {
                *min = *x;
            }
            if x > max {
                *max = *x;
            }
        }
    }

    /// Run `self.config.num_episodes` episodes, returning each episode's
    /// cumulative reward in order (written to `rewards.dat` by the caller).
    pub fn run(&mut self) -> Vec<f32> {
        let mut rewards = Vec::with_capacity(self.config.num_episodes);
        for episode_index in 0..self.config.num_episodes {
            if interrupt::is_interrupted() {
                log::warn!("interrupt received before episode {episode_index}, stopping");
                break;
            }
            let episode = self.run_episode(None);
            rewards.push(episode.cumulative_reward());
            self.batch.push(episode);
            if self.batch.len() >= self.config.batch_size {
                log::info!("training model on a batch of {} episodes", self.batch.len());
                self.model.learn(&self.batch);
                self.batch.clear();
            }
        }
        rewards
    }

    /// Run one episode. If `start_episode` is given, its action/state pairs
    /// are replayed via `step_supervised` before the main loop begins,
    /// driving `self.world` to the same position the supervised episode
    /// ended at (used by [`crate::dyna::DynaModel`] / [`crate::texplore::TEXPLOREModel`]
    /// to seed a rollout at the real agent's current position).
    pub fn run_episode(&mut self, start_episode: Option<&Episode>) -> Episode {
        self.world.reset();
        let num_actions = self.world.num_actions();
        let value_size = self.selector.value_size(num_actions);
        let mut episode = Episode::new(value_size, num_actions, self.encoder.clone());

        let mut s = Vec::new();
        self.world.initial_state(&mut s);
        if let Some(seed) = start_episode {
            for t in 0..seed.length().saturating_sub(1) {
                let action = seed.action(t);
                let target = seed.state(t + 1);
                let reward = seed.reward(t);
                self.world.step_supervised(action, target, reward, &mut s);
            }
        }

        episode.add_state(&s);
        self.update_min_max(&s);
        self.model.next_episode();
        let mut v = Vec::new();
        self.model.values(&episode, &mut v);
        episode.add_values(&v);

        let mut steps = 0usize;
        let mut finished = false;
        let mut probs = Vec::new();
        let mut td_error = 0.0;

        while steps < self.config.max_steps && !finished && !interrupt::is_interrupted() {
            self.selector.actions(&mut episode, &mut probs, &mut td_error);
            let action = sample_action(&probs);

            let res = self.world.step(action, &mut s);
            finished = res.finished;
            self.update_min_max(&s);

            episode.add_action(action);
            episode.add_reward(res.reward);
            episode.add_state(&s);

            self.model.values(&episode, &mut v);
            episode.add_values(&v);

            steps += 1;
        }

        // Back up the terminal state's values so the last step's TD target is grounded.
        self.selector.actions(&mut episode, &mut probs, &mut td_error);
        episode.set_aborted(!finished);

        if interrupt::is_interrupted() {
            log::warn!(
                "episode interrupted after {steps} steps, cumulative reward {}",
                episode.cumulative_reward()
            );
        }
        log::debug!(
            "episode done: steps={steps} cumulative_reward={} aborted={}",
            episode.cumulative_reward(),
            episode.aborted()
        );

        episode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::QLearning;
    use crate::model::Table;
    use crate::selector::EpsilonGreedy;
    use crate::world::grid::GridWorld;
    use crate::decay::Constant;

    #[test]
    fn runs_the_configured_number_of_episodes() {
        let world = Box::new(GridWorld::standard());
        let model = Box::new(Table::new(4));
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.1)));
        let config = AgentConfig {
            max_steps: 20,
            batch_size: 5,
            num_episodes: 7,
        };
        let mut agent = Agent::new(world, model, selector, None, config);
        let rewards = agent.run();
        assert_eq!(rewards.len(), 7);
    }

    #[test]
    fn min_max_state_tracks_every_observed_coordinate() {
        let world = Box::new(GridWorld::standard());
        let model = Box::new(Table::new(4));
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.5)));
        let config = AgentConfig {
            max_steps: 50,
            batch_size: 100,
            num_episodes: 3,
        };
        let mut agent = Agent::new(world, model, selector, None, config);
        agent.run();
        assert!(agent.min_state()[0] <= agent.max_state()[0]);
        assert!(agent.min_state()[1] <= agent.max_state()[1]);
    }
}
