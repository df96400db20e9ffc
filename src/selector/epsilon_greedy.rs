use std::sync::atomic::{AtomicU64, Ordering};

use crate::assert_probability;
use crate::decay::Decay;
use crate::episode::Episode;
use crate::learning::Learning;
use crate::selector::{argmax, Selector};

/// Gives the argmax action mass `1 - ε` and splits `ε` evenly over every
/// other action. `ε` follows a [`Decay`] schedule indexed by the number of
/// calls made so far, tracked with an atomic counter so the selector can
/// stay a `&self` wrapper.
pub struct EpsilonGreedy<L: Learning, D: Decay> {
    learner: L,
    epsilon: D,
    steps: AtomicU64,
}

impl<L: Learning, D: Decay> EpsilonGreedy<L, D> {
    pub fn new(learner: L, epsilon: D) -> Self {
        Self {
            learner,
            epsilon,
            steps: AtomicU64::new(0),
        }
    }
}

impl<L: Learning, D: Decay> Selector for EpsilonGreedy<L, D> {
    fn value_size(&self, num_actions: usize) -> usize {
        self.learner.value_size(num_actions)
    }

    fn actions(&self, episode: &mut Episode, probs: &mut Vec<f32>, td_error: &mut f32) {
        let mut scores = Vec::new();
        self.learner.actions(episode, &mut scores, td_error);

        let n = scores.len();
        let t = self.steps.fetch_add(1, Ordering::Relaxed) as f32;
        let eps = self.epsilon.evaluate(t);
        assert_probability!(eps);

        let other_mass = if n > 1 { eps / (n - 1) as f32 } else { 0.0 };
        probs.clear();
        probs.resize(n, other_mass);
        probs[argmax(&scores)] = 1.0 - eps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::Constant;
    use crate::learning::QLearning;

    #[test]
    fn argmax_gets_one_minus_epsilon_and_the_rest_split_evenly() {
        let selector = EpsilonGreedy::new(QLearning::default(), Constant::new(0.2));
        let mut e = Episode::new(3, 3, None);
        e.add_state(&[0.0]);
        e.add_values(&[1.0, 5.0, 2.0]);

        let mut probs = Vec::new();
        let mut td_error = 0.0;
        selector.actions(&mut e, &mut probs, &mut td_error);

        assert_eq!(probs[1], 0.8);
        assert_eq!(probs[0], 0.1);
        assert_eq!(probs[2], 0.1);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}
