//! Concurrent model-based planning: three workers coordinate through a
//! model-swap protocol instead of the single-threaded rollout loop in
//! [`crate::dyna`].
//!
//! - **Actor** (the calling thread, driven by [`crate::agent::Agent`]):
//!   `values` reads under the value-model lock, then publishes a clone of
//!   the current episode as the rollout seed.
//! - **World-model learner**: blocks on the episode queue's condition
//!   variable, drains it, trains the world model, then swaps it.
//! - **Rollout learner**: holds the world-model lock for one whole rollout
//!   (so the world model can never be swapped mid-rollout), then trains and
//!   swaps the value model.
//!
//! Lock order (acquire high-to-low): world-model ≺ value-model ≺
//! episode-queue. No code in this module acquires a lower lock while
//! holding one above it in that order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::agent::sample_action;
use crate::episode::{Encoder, Episode};
use crate::model::Model;
use crate::model_world::ModelWorld;
use crate::selector::Selector;

const ROLLOUT_LEARNER_IDLE_SLEEP: Duration = Duration::from_micros(200);
const WORLD_MODEL_LEARNER_POLL: Duration = Duration::from_millis(20);

/// Value model plus the currently published rollout seed, guarded by a
/// single lock (the "value-model lock") so a seed swap and a value-model
/// swap can never interleave into a torn read.
struct ValueModelState {
    model: Box<dyn Model>,
    seed: Option<Arc<Episode>>,
}

/// Configuration for [`TEXPLOREModel`].
#[derive(Debug, Clone, Copy)]
pub struct TexploreConfig {
    /// Simulated steps per rollout episode.
    ///
    /// **Default:** `20`
    pub rollout_length: usize,
}

impl Default for TexploreConfig {
    fn default() -> Self {
        Self { rollout_length: 20 }
    }
}

/// The three-worker concurrent counterpart to [`crate::dyna::DynaModel`].
pub struct TEXPLOREModel {
    value_state: Arc<Mutex<ValueModelState>>,
    world_model: Arc<Mutex<ModelWorld>>,
    queue: Arc<(Mutex<VecDeque<Episode>>, Condvar)>,
    finish: Arc<AtomicBool>,
    world_model_learner: Option<JoinHandle<()>>,
    rollout_learner: Option<JoinHandle<()>>,
    num_actions: usize,
}

impl TEXPLOREModel {
    pub fn new(
        world_model: Box<dyn Model>,
        value_model: Box<dyn Model>,
        selector: Box<dyn Selector>,
        initial_state: Vec<f32>,
        num_actions: usize,
        encoder: Option<Encoder>,
        config: TexploreConfig,
    ) -> Self {
        let world_model = Arc::new(Mutex::new(ModelWorld::new(world_model, initial_state, num_actions)));
        let value_state = Arc::new(Mutex::new(ValueModelState {
            model: value_model,
            seed: None,
        }));
        let queue: Arc<(Mutex<VecDeque<Episode>>, Condvar)> = Arc::new((Mutex::new(VecDeque::new()), Condvar::new()));
        let finish = Arc::new(AtomicBool::new(false));

        let world_model_learner = {
            let world_model = Arc::clone(&world_model);
            let queue = Arc::clone(&queue);
            let finish = Arc::clone(&finish);
            thread::spawn(move || world_model_learner_loop(world_model, queue, finish))
        };

        let rollout_learner = {
            let world_model = Arc::clone(&world_model);
            let value_state = Arc::clone(&value_state);
            let finish = Arc::clone(&finish);
            thread::spawn(move || rollout_learner_loop(world_model, value_state, selector, encoder, num_actions, config, finish))
        };

        log::debug!("TEXPLOREModel spawned world-model and rollout-learner workers");

        Self {
            value_state,
            world_model,
            queue,
            finish,
            world_model_learner: Some(world_model_learner),
            rollout_learner: Some(rollout_learner),
            num_actions,
        }
    }
}

impl Model for TEXPLOREModel {
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        {
            let mut state = self.value_state.lock().expect("value-model lock poisoned");
            state.model.values(episode, out);
        }
        debug_assert!(out.iter().all(|v| v.is_finite()), "TEXPLOREModel::values produced a non-finite entry");

        let seed = Arc::new(episode.clone());
        let mut state = self.value_state.lock().expect("value-model lock poisoned");
        state.seed = Some(seed); // old Arc, if any, is dropped (retired) right here under the lock.
    }

    fn learn(&mut self, batch: &[Episode]) {
        {
            let (lock, cvar) = &*self.queue;
            let mut q = lock.lock().expect("episode-queue lock poisoned");
            q.extend(batch.iter().cloned());
            cvar.notify_one();
        }
        self.value_state
            .lock()
            .expect("value-model lock poisoned")
            .model
            .learn(batch);
    }

    fn values_for_plotting(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        // Ensures no background contention during dense grid sampling.
        self.finish.store(true, Ordering::SeqCst);
        self.values(episode, out);
    }

    fn next_episode(&mut self) {
        self.value_state.lock().expect("value-model lock poisoned").model.next_episode();
    }

    fn swap_models(&mut self) {
        self.value_state.lock().expect("value-model lock poisoned").model.swap_models();
    }
}

impl Drop for TEXPLOREModel {
    fn drop(&mut self) {
        self.finish.store(true, Ordering::SeqCst);
        self.queue.1.notify_all();
        if let Some(handle) = self.world_model_learner.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.rollout_learner.take() {
            let _ = handle.join();
        }
        log::debug!("TEXPLOREModel workers joined");
    }
}

fn world_model_learner_loop(
    world_model: Arc<Mutex<ModelWorld>>,
    queue: Arc<(Mutex<VecDeque<Episode>>, Condvar)>,
    finish: Arc<AtomicBool>,
) {
    let (lock, cvar) = &*queue;
    loop {
        if finish.load(Ordering::SeqCst) {
            return;
        }
        let drained: Vec<Episode> = {
            let mut q = lock.lock().expect("episode-queue lock poisoned");
            while q.is_empty() && !finish.load(Ordering::SeqCst) {
                let (guard, _timeout) = cvar
                    .wait_timeout(q, WORLD_MODEL_LEARNER_POLL)
                    .expect("episode-queue lock poisoned");
                q = guard;
            }
            q.drain(..).collect()
        };
        if finish.load(Ordering::SeqCst) {
            return;
        }
        if !drained.is_empty() {
            log::trace!("world-model learner training on {} queued episodes", drained.len());
            let mut world = world_model.lock().expect("world-model lock poisoned");
            world.learn(&drained);
            world.swap_models();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn rollout_learner_loop(
    world_model: Arc<Mutex<ModelWorld>>,
    value_state: Arc<Mutex<ValueModelState>>,
    selector: Box<dyn Selector>,
    encoder: Option<Encoder>,
    num_actions: usize,
    config: TexploreConfig,
    finish: Arc<AtomicBool>,
) {
    use crate::world::World;

    loop {
        if finish.load(Ordering::SeqCst) {
            return;
        }

        let seed = value_state.lock().expect("value-model lock poisoned").seed.clone();
        let Some(seed) = seed else {
            thread::sleep(ROLLOUT_LEARNER_IDLE_SLEEP);
            continue;
        };

        let rollout_episode = {
            // Held for the whole rollout: the world model must not be swapped mid-rollout.
            let mut world = world_model.lock().expect("world-model lock poisoned");
            run_rollout(&mut world, &seed, &selector, &encoder, num_actions, config.rollout_length, &value_state)
        };

        {
            let mut state = value_state.lock().expect("value-model lock poisoned");
            state.model.learn(std::slice::from_ref(&rollout_episode));
            state.model.swap_models();
        }

        thread::sleep(ROLLOUT_LEARNER_IDLE_SLEEP);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_rollout(
    world: &mut ModelWorld,
    seed: &Episode,
    selector: &dyn Selector,
    encoder: &Option<Encoder>,
    num_actions: usize,
    rollout_length: usize,
    value_state: &Mutex<ValueModelState>,
) -> Episode {
    world.reset();
    let mut s = Vec::new();
    world.initial_state(&mut s);
    for t in 0..seed.length().saturating_sub(1) {
        let action = seed.action(t);
        let target = seed.state(t + 1);
        let reward = seed.reward(t);
        world.step_supervised(action, target, reward, &mut s);
    }

    let value_size = selector.value_size(num_actions);
    let mut episode = Episode::new(value_size, num_actions, encoder.clone());
    episode.add_state(&s);

    let mut v = Vec::new();
    {
        let mut state = value_state.lock().expect("value-model lock poisoned");
        state.model.values(&episode, &mut v);
    }
    episode.add_values(&v);

    let mut steps = 0usize;
    let mut finished = false;
    let mut probs = Vec::new();
    let mut td_error = 0.0;

    while steps < rollout_length && !finished {
        selector.actions(&mut episode, &mut probs, &mut td_error);
        let action = sample_action(&probs);

        let res = world.step(action, &mut s);
        finished = res.finished;

        episode.add_action(action);
        episode.add_reward(res.reward);
        episode.add_state(&s);
        {
            let mut state = value_state.lock().expect("value-model lock poisoned");
            state.model.values(&episode, &mut v);
        }
        episode.add_values(&v);
        steps += 1;
    }

    selector.actions(&mut episode, &mut probs, &mut td_error);
    episode.set_aborted(!finished);
    episode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::Constant;
    use crate::learning::QLearning;
    use crate::model::Table;
    use crate::selector::EpsilonGreedy;
    use std::sync::atomic::AtomicU64;

    /// A model whose `values` reports the parity of an atomic counter that
    /// `swap_models` increments — used to probe for torn reads across the
    /// value-model lock (§8 scenario 5).
    struct ParityModel {
        counter: Arc<AtomicU64>,
    }

    impl Model for ParityModel {
        fn values(&mut self, _episode: &Episode, out: &mut Vec<f32>) {
            out.clear();
            out.push((self.counter.load(Ordering::SeqCst) % 2) as f32);
        }

        fn learn(&mut self, _batch: &[Episode]) {}

        fn swap_models(&mut self) {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn episode_with(states: &[&[f32]], actions: &[usize], rewards: &[f32]) -> Episode {
        let mut e = Episode::new(1, 2, None);
        e.add_state(states[0]);
        e.add_values(&[0.0]);
        for i in 0..actions.len() {
            e.add_action(actions[i]);
            e.add_reward(rewards[i]);
            e.add_state(states[i + 1]);
            e.add_values(&[0.0]);
        }
        e
    }

    #[test]
    fn actor_predictions_never_tear_across_a_model_swap() {
        let counter = Arc::new(AtomicU64::new(0));
        let world_model = Box::new(Table::new(3));
        let value_model: Box<dyn Model> = Box::new(ParityModel {
            counter: Arc::clone(&counter),
        });
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.5)));
        let mut texplore = TEXPLOREModel::new(
            world_model,
            value_model,
            selector,
            vec![0.0],
            2,
            None,
            TexploreConfig { rollout_length: 2 },
        );

        let seed = episode_with(&[&[0.0], &[1.0]], &[0], &[-1.0]);
        let mut out = Vec::new();
        for _ in 0..10_000 {
            texplore.values(&seed, &mut out);
            assert!(out[0] == 0.0 || out[0] == 1.0, "torn read: got {}", out[0]);
        }
        assert!(counter.load(Ordering::SeqCst) > 0, "rollout learner should have swapped at least once");
    }

    #[test]
    fn learn_pushes_onto_the_episode_queue_and_trains_the_value_model_directly() {
        let world_model = Box::new(Table::new(3));
        let value_model = Box::new(Table::new(2));
        let selector = Box::new(EpsilonGreedy::new(QLearning::default(), Constant::new(0.5)));
        let mut texplore = TEXPLOREModel::new(world_model, value_model, selector, vec![0.0], 2, None, TexploreConfig::default());

        let batch = vec![episode_with(&[&[0.0], &[1.0]], &[0], &[-1.0])];
        texplore.learn(&batch);

        let mut out = Vec::new();
        texplore.values(&batch[0], &mut out);
        assert_eq!(out.len(), 2);
    }
}
