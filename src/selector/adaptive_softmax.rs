use crate::episode::Episode;
use crate::learning::Learning;
use crate::selector::{softmax_probs, Selector};

/// Softmax whose temperature is itself predicted per-step and biases
/// exploration toward states with historically high TD error. Needs one
/// extra value slot (`num_actions + 1`) to store the running temperature
/// prediction alongside each step's action scores.
pub struct AdaptiveSoftmax<L: Learning> {
    learner: L,
    /// Decay applied to the carried-forward temperature prediction.
    gamma: f32,
    /// Floor below which the predicted temperature is never allowed to fall.
    min_temperature: f32,
}

impl<L: Learning> AdaptiveSoftmax<L> {
    pub fn new(learner: L, gamma: f32) -> Self {
        Self {
            learner,
            gamma,
            min_temperature: 0.2,
        }
    }
}

impl<L: Learning> Selector for AdaptiveSoftmax<L> {
    fn value_size(&self, num_actions: usize) -> usize {
        self.learner.value_size(num_actions) + 1
    }

    fn actions(&self, episode: &mut Episode, probs: &mut Vec<f32>, td_error: &mut f32) {
        let mut scores = Vec::new();
        self.learner.actions(episode, &mut scores, td_error);

        let t = episode.length() - 1;
        let temp_slot = episode.num_actions();
        let predicted_temperature = episode.values(t)[temp_slot];
        let temperature = predicted_temperature.max(self.min_temperature);

        softmax_probs(&scores, temperature, probs);

        if t > 0 {
            let carried = td_error.abs() + self.gamma * predicted_temperature;
            episode.update_value(t - 1, temp_slot, carried);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::QLearning;

    fn episode_with_temp_slot(values: &[f32]) -> Episode {
        let mut e = Episode::new(3, 2, None);
        e.add_state(&[0.0]);
        e.add_values(values);
        e
    }

    #[test]
    fn predicted_temperature_below_floor_is_clamped() {
        let selector = AdaptiveSoftmax::new(QLearning::default(), 0.9);
        let mut e = episode_with_temp_slot(&[1.0, 3.0, 0.0]); // predicted T_hat = 0.0
        let mut probs = Vec::new();
        let mut td_error = 0.0;
        selector.actions(&mut e, &mut probs, &mut td_error);

        let ratio = probs[1] / probs[0];
        assert!((ratio - ((3.0f32 - 1.0) / 0.2).exp()).abs() < 1e-4);
    }

    #[test]
    fn no_carry_write_on_the_very_first_step() {
        let selector = AdaptiveSoftmax::new(QLearning::default(), 0.9);
        let mut e = episode_with_temp_slot(&[1.0, 3.0, 5.0]);
        let mut probs = Vec::new();
        let mut td_error = 0.0;
        // length() == 1 here, so t == 0 and there is no previous step to write into.
        selector.actions(&mut e, &mut probs, &mut td_error);
        assert_eq!(e.length(), 1);
    }
}
