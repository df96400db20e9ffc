use crate::episode::Episode;
use crate::learning::{max_value, read_final_scores, td_backward, Learning, TdConfig};

/// `δ = r_{t-1} + γ · max_a Q(t, a) − Q(t-1, a_{t-1})`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QLearning {
    config: TdConfig,
}

impl QLearning {
    pub fn new(config: TdConfig) -> Self {
        config.validate();
        Self { config }
    }
}

impl Learning for QLearning {
    fn actions(&self, episode: &mut Episode, out: &mut Vec<f32>, td_error: &mut f32) {
        let num_actions = episode.num_actions();
        let gamma = self.config.gamma;
        *td_error = td_backward(episode, &self.config, |episode, t| {
            let a = episode.action(t - 1);
            let r = episode.reward(t - 1);
            let q_next = max_value(episode.values(t), num_actions);
            let q_prev = episode.values(t - 1)[a];
            r + gamma * q_next - q_prev
        });
        read_final_scores(episode, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_update_matches_the_closed_form() {
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0]);
        e.add_values(&[0.0, 0.0]);
        e.add_action(0);
        e.add_reward(1.0);
        e.add_state(&[1.0]);
        e.add_values(&[5.0, 3.0]);

        let config = TdConfig {
            gamma: 0.9,
            alpha: 0.3,
            lambda: 0.0,
        };
        let learner = QLearning::new(config);
        let mut out = Vec::new();
        let mut td_error = 0.0;
        learner.actions(&mut e, &mut out, &mut td_error);

        let expected_delta = 1.0 + 0.9 * 5.0 - 0.0;
        assert_eq!(td_error, expected_delta);
        assert_eq!(e.values(0)[0], 0.3 * expected_delta);
        assert_eq!(out, vec![5.0, 3.0]);
    }
}
