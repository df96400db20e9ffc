//! Action selectors: stateless wrappers over a [`Learning`](crate::learning::Learning)
//! rule that turn its per-action score vector into a probability distribution.

mod adaptive_softmax;
mod epsilon_greedy;
mod softmax;

pub use adaptive_softmax::AdaptiveSoftmax;
pub use epsilon_greedy::EpsilonGreedy;
pub use softmax::Softmax;

use crate::episode::Episode;

pub trait Selector: Send {
    /// Forwarded to the wrapped learner, plus any bookkeeping slots this
    /// selector itself needs (e.g. adaptive softmax's temperature slot).
    fn value_size(&self, num_actions: usize) -> usize;

    /// Update `episode`'s stored values (via the wrapped learner), then
    /// write a probability distribution over `num_actions` actions to
    /// `probs` (summing to 1) and the learner's TD error to `td_error`.
    fn actions(&self, episode: &mut Episode, probs: &mut Vec<f32>, td_error: &mut f32);
}

fn argmax(scores: &[f32]) -> usize {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .expect("scores must be non-empty")
}

fn softmax_probs(scores: &[f32], temperature: f32, probs: &mut Vec<f32>) {
    let max_score = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| ((s - max_score) / temperature).exp()).collect();
    let sum: f32 = exps.iter().sum();
    probs.clear();
    probs.extend(exps.iter().map(|e| e / sum));
    debug_assert!(
        (probs.iter().sum::<f32>() - 1.0).abs() < 1e-5,
        "softmax probabilities must sum to 1"
    );
}
