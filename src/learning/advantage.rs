use crate::episode::Episode;
use crate::learning::{max_value, read_final_scores, td_backward, Learning, TdConfig};

/// `δ = V(t-1) + (r_{t-1} + γ·V(t) − V(t-1))/κ − A(t-1, a_{t-1})`, where `V`
/// is `max_a` of the stored values and `A` is the stored value of the taken
/// action. With `κ < 1`, advantages are sharpened relative to the baseline.
#[derive(Debug, Clone, Copy)]
pub struct Advantage {
    config: TdConfig,
    kappa: f32,
}

impl Advantage {
    pub fn new(config: TdConfig, kappa: f32) -> Self {
        config.validate();
        assert!(kappa > 0.0 && kappa <= 1.0, "kappa ({kappa}) must be in (0, 1]");
        Self { config, kappa }
    }
}

impl Learning for Advantage {
    fn actions(&self, episode: &mut Episode, out: &mut Vec<f32>, td_error: &mut f32) {
        let num_actions = episode.num_actions();
        let gamma = self.config.gamma;
        let kappa = self.kappa;
        *td_error = td_backward(episode, &self.config, |episode, t| {
            let a = episode.action(t - 1);
            let r = episode.reward(t - 1);
            let v_prev = max_value(episode.values(t - 1), num_actions);
            let v_next = max_value(episode.values(t), num_actions);
            let advantage = episode.values(t - 1)[a];
            v_prev + (r + gamma * v_next - v_prev) / kappa - advantage
        });
        read_final_scores(episode, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kappa_one_reduces_to_plain_bellman_residual() {
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0]);
        e.add_values(&[2.0, 0.0]); // V(0) = 2.0, A(0,0) = 2.0
        e.add_action(0);
        e.add_reward(1.0);
        e.add_state(&[1.0]);
        e.add_values(&[5.0, 3.0]); // V(1) = 5.0

        let config = TdConfig {
            gamma: 0.9,
            alpha: 1.0,
            lambda: 0.0,
        };
        let learner = Advantage::new(config, 1.0);
        let mut out = Vec::new();
        let mut td_error = 0.0;
        learner.actions(&mut e, &mut out, &mut td_error);

        // kappa=1: delta = V(0) + (r + gamma*V(1) - V(0)) - A(0,0) = r + gamma*V(1) - A(0,0)
        let expected = 1.0 + 0.9 * 5.0 - 2.0;
        assert_eq!(td_error, expected);
    }

    #[test]
    #[should_panic]
    fn kappa_out_of_range_panics() {
        Advantage::new(TdConfig::default(), 0.0);
    }
}
