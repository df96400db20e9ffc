//! Value-function approximators.
//!
//! A [`Model`] maps an [`Episode`]'s current (last) state to a vector of
//! `value_size` scores — one real prediction per action, zero-padded for
//! any bookkeeping slots a [learning rule](crate::learning) declared (e.g.
//! adaptive softmax's per-step temperature). Implementations may hold two
//! internal approximators, swapped atomically by [`swap_models`](Model::swap_models),
//! so a background thread can train one copy while the foreground reads
//! the other (used by [`crate::dyna`] and [`crate::texplore`]).

pub mod feedforward;
pub mod gaussian_mixture;
pub mod recurrent;
pub mod table;

pub use feedforward::{FeedForward, FeedForwardConfig};
pub use gaussian_mixture::{GaussianMixture, GaussianMixtureConfig};
pub use recurrent::RecurrentModel;
pub use table::Table;

use crate::episode::Episode;

/// Pad `values` (one entry per real action) with zeros up to `value_size`.
pub(crate) fn pad(mut values: Vec<f32>, value_size: usize) -> Vec<f32> {
    values.resize(value_size, 0.0);
    values
}

pub trait Model: Send {
    /// Write per-action scores for the final state of `episode` into `out`,
    /// zero-padded to this model's configured `value_size`.
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>);

    /// Update internal parameters from a batch of completed episodes.
    fn learn(&mut self, batch: &[Episode]);

    /// A side-effect-free variant of [`values`](Model::values), used for
    /// dense grid sampling when producing plot files. Defaults to `values`.
    fn values_for_plotting(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        self.values(episode, out);
    }

    /// Reset any in-model sequence state (recurrent hidden state, PSR
    /// belief, ...) at the start of a new episode. No-op by default.
    fn next_episode(&mut self) {}

    /// Atomically exchange the "learning" and "predicting" internal
    /// approximators. A no-op for models that don't separate the two.
    fn swap_models(&mut self) {}
}
