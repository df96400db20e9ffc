use crate::episode::Episode;
use crate::learning::Learning;
use crate::selector::{softmax_probs, Selector};

/// `p_i ∝ exp(score_i / T)` at a fixed temperature `T > 0`.
pub struct Softmax<L: Learning> {
    learner: L,
    temperature: f32,
}

impl<L: Learning> Softmax<L> {
    pub fn new(learner: L, temperature: f32) -> Self {
        assert!(temperature > 0.0, "temperature ({temperature}) must be positive");
        Self { learner, temperature }
    }
}

impl<L: Learning> Selector for Softmax<L> {
    fn value_size(&self, num_actions: usize) -> usize {
        self.learner.value_size(num_actions)
    }

    fn actions(&self, episode: &mut Episode, probs: &mut Vec<f32>, td_error: &mut f32) {
        let mut scores = Vec::new();
        self.learner.actions(episode, &mut scores, td_error);
        softmax_probs(&scores, self.temperature, probs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::QLearning;

    #[test]
    fn ratio_of_two_probabilities_matches_exp_of_score_gap() {
        let selector = Softmax::new(QLearning::default(), 2.0);
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0]);
        e.add_values(&[1.0, 3.0]);

        let mut probs = Vec::new();
        let mut td_error = 0.0;
        selector.actions(&mut e, &mut probs, &mut td_error);

        let ratio = probs[1] / probs[0];
        assert!((ratio - ((3.0f32 - 1.0) / 2.0).exp()).abs() < 1e-5);
    }
}
