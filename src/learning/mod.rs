//! Temporal-difference learning rules.
//!
//! A [`Learning`] rule owns no state beyond its hyperparameters; given a
//! mutable [`Episode`] it walks backward applying eligibility-traced TD
//! updates to the stored value column, then reports the current (last
//! state's) per-action score vector plus the most recent TD error.

mod advantage;
mod q_learning;

pub use advantage::Advantage;
pub use q_learning::QLearning;

use crate::assert_interval;
use crate::episode::Episode;

/// Shared hyperparameters for a temporal-difference update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdConfig {
    /// Discount factor.
    ///
    /// **Default:** `0.9`
    pub gamma: f32,
    /// Learning rate.
    ///
    /// **Default:** `0.1`
    pub alpha: f32,
    /// Eligibility trace decay.
    ///
    /// **Default:** `0.9`
    pub lambda: f32,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            alpha: 0.1,
            lambda: 0.9,
        }
    }
}

impl TdConfig {
    fn validate(&self) {
        assert_interval!(self.gamma, 0.0, 1.0);
        assert_interval!(self.alpha, 0.0, 1.0);
        assert_interval!(self.lambda, 0.0, 1.0);
    }
}

/// Stop accumulating eligibility once it decays below this; traces this
/// thin contribute negligibly and are not worth a further backward step.
const ELIGIBILITY_FLOOR: f32 = 1e-2;

pub trait Learning: Send {
    /// Number of per-step value slots this learner needs, given the
    /// world's action count. Default: one per action, no bookkeeping slots.
    fn value_size(&self, num_actions: usize) -> usize {
        num_actions
    }

    /// Apply the backward TD update to `episode`'s stored values, then
    /// write the current (final-state) per-action score vector to `out`
    /// and the most recent TD error to `td_error`.
    fn actions(&self, episode: &mut Episode, out: &mut Vec<f32>, td_error: &mut f32);
}

/// Walk `episode` backward from `length - 1` to `1`, applying `delta` at
/// each step with an eligibility trace decaying by `config.lambda`, early
/// stopping once the trace falls below [`ELIGIBILITY_FLOOR`]. Returns the
/// `delta` computed at the most recent (highest-`t`) step, or `0.0` if the
/// episode is too short for an update (§7 Transient).
///
/// `delta(episode, t)` must read only `episode.values(t)` and
/// `episode.values(t - 1)` as they stand *before* this call's own updates —
/// each call happens before the corresponding `update_value`, so the
/// backward recursion sees each step's freshly updated value as the "next
/// state" value for the step before it, exactly as TD(λ) backward view
/// requires.
fn td_backward(episode: &mut Episode, config: &TdConfig, mut delta: impl FnMut(&Episode, usize) -> f32) -> f32 {
    let length = episode.length();
    if length < 2 {
        return 0.0;
    }

    let mut td_error = 0.0;
    let mut eligibility = 1.0f32;
    let mut first = true;

    for t in (1..length).rev() {
        if eligibility < ELIGIBILITY_FLOOR {
            break;
        }
        let d = delta(episode, t);
        if first {
            td_error = d;
            first = false;
        }
        let a = episode.action(t - 1);
        let prev = episode.values(t - 1)[a];
        episode.update_value(t - 1, a, prev + config.alpha * eligibility * d);
        eligibility *= config.lambda;
    }

    td_error
}

fn read_final_scores(episode: &Episode, out: &mut Vec<f32>) {
    let t = episode.length() - 1;
    let n = episode.num_actions();
    out.clear();
    out.extend_from_slice(&episode.values(t)[..n]);
    debug_assert!(out.iter().all(|v| v.is_finite()), "learning rule produced a non-finite score");
}

fn max_value(values: &[f32], num_actions: usize) -> f32 {
    values[..num_actions].iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_shorter_than_two_steps_is_a_no_op() {
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0]);
        e.add_values(&[0.0, 0.0]);
        let config = TdConfig::default();
        let err = td_backward(&mut e, &config, |_, _| 1.0);
        assert_eq!(err, 0.0);
    }

    #[test]
    fn eligibility_trace_stops_updates_past_the_floor() {
        let mut e = Episode::new(1, 1, None);
        e.add_state(&[0.0]);
        e.add_values(&[0.0]);
        for _ in 0..10 {
            e.add_action(0);
            e.add_reward(0.0);
            e.add_state(&[0.0]);
            e.add_values(&[0.0]);
        }
        let config = TdConfig {
            gamma: 0.9,
            alpha: 1.0,
            lambda: 0.1,
        };
        td_backward(&mut e, &config, |_, _| 1.0);
        // lambda^k < 1e-2 once k >= 2, so only the last two transitions update.
        assert_eq!(e.values(e.length() - 2)[0], 1.0);
        assert_eq!(e.values(e.length() - 3)[0], 0.1);
        assert_eq!(e.values(0)[0], 0.0, "trace floor reached before the earliest step");
    }
}
