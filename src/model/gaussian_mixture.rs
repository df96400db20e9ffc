use rand_distr::{Distribution, Normal};

use crate::episode::Episode;
use crate::assert_interval;
use crate::model::{pad, Model};

/// Configuration for [`GaussianMixture`].
#[derive(Debug, Clone)]
pub struct GaussianMixtureConfig {
    /// Distance (in units of standard deviation, summed over dimensions) beyond
    /// which a sample spawns a new cluster rather than updating the nearest one.
    ///
    /// **Default:** `3.0`
    pub novelty_threshold: f32,
    /// Variance assigned to a freshly spawned cluster.
    ///
    /// **Default:** `1.0`
    pub initial_variance: f32,
    /// Exponential-moving-average rate for a cluster's stored value.
    ///
    /// **Default:** `0.1`
    pub value_lr: f32,
    /// Standard deviation of Gaussian noise injected into inputs on `learn`
    /// only (not `predict`), preventing clusters from degenerating to zero
    /// variance on noise-free discrete input.
    ///
    /// **Default:** `0.05`
    pub input_noise_std: f32,
}

impl Default for GaussianMixtureConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: 3.0,
            initial_variance: 1.0,
            value_lr: 0.1,
            input_noise_std: 0.05,
        }
    }
}

impl GaussianMixtureConfig {
    fn validate(&self) {
        assert_interval!(self.value_lr, 0.0, 1.0);
        assert!(self.novelty_threshold > 0.0, "novelty_threshold must be positive");
        assert!(self.initial_variance > 0.0, "initial_variance must be positive");
    }
}

#[derive(Debug, Clone)]
struct Cluster {
    mean: Vec<f32>,
    var: Vec<f32>,
    value: f32,
    count: u32,
}

impl Cluster {
    fn spawn(state: &[f32], initial_variance: f32, value: f32) -> Self {
        Self {
            mean: state.to_vec(),
            var: vec![initial_variance; state.len()],
            value,
            count: 1,
        }
    }

    /// Summed squared distance in units of standard deviation.
    fn distance(&self, state: &[f32]) -> f32 {
        self.mean
            .iter()
            .zip(&self.var)
            .zip(state)
            .map(|((m, v), x)| (x - m).powi(2) / v.max(1e-6))
            .sum()
    }

    fn update(&mut self, state: &[f32], target: f32, value_lr: f32) {
        self.count += 1;
        let n = self.count as f32;
        for ((m, v), x) in self.mean.iter_mut().zip(self.var.iter_mut()).zip(state) {
            let delta = x - *m;
            *m += delta / n;
            *v = (*v + (delta * (x - *m) - *v) / n).max(1e-6);
        }
        self.value += value_lr * (target - self.value);
    }
}

/// A per-action online Gaussian mixture used as a lightweight stand-in for
/// the function-approximator family. Each action owns an independent set of
/// diagonal-covariance clusters; `values` predicts a density-weighted
/// average of each cluster's stored scalar value, `learn` either updates the
/// nearest cluster or spawns a new one when the sample is far (in standard
/// deviations) from every existing cluster for that action.
pub struct GaussianMixture {
    value_size: usize,
    num_actions: usize,
    config: GaussianMixtureConfig,
    clusters: Vec<Vec<Cluster>>,
}

impl GaussianMixture {
    pub fn new(num_actions: usize, value_size: usize, config: GaussianMixtureConfig) -> Self {
        config.validate();
        Self {
            value_size,
            num_actions,
            config,
            clusters: vec![Vec::new(); num_actions],
        }
    }

    fn predict_action(&self, action: usize, state: &[f32]) -> f32 {
        let clusters = &self.clusters[action];
        if clusters.is_empty() {
            return 0.0;
        }
        let weights: Vec<f32> = clusters.iter().map(|c| (-0.5 * c.distance(state)).exp()).collect();
        let total: f32 = weights.iter().sum();
        if total <= 1e-12 {
            // every cluster is vanishingly far; fall back to the nearest one.
            return clusters
                .iter()
                .min_by(|a, b| a.distance(state).total_cmp(&b.distance(state)))
                .map(|c| c.value)
                .unwrap_or(0.0);
        }
        clusters.iter().zip(&weights).map(|(c, w)| c.value * w).sum::<f32>() / total
    }
}

impl Model for GaussianMixture {
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        let t = episode.length() - 1;
        let state = episode.encoded_state(t);
        let row: Vec<f32> = (0..self.num_actions).map(|a| self.predict_action(a, &state)).collect();
        *out = pad(row, self.value_size);
        debug_assert!(out.iter().all(|v| v.is_finite()), "GaussianMixture::values produced a non-finite entry");
    }

    fn learn(&mut self, batch: &[Episode]) {
        let noise = Normal::new(0.0f32, self.config.input_noise_std).expect("input_noise_std must be finite");
        let mut rng = rand::thread_rng();
        for episode in batch {
            if episode.length() < 2 {
                continue;
            }
            for t in 0..episode.length() - 1 {
                let action = episode.action(t);
                let target = episode.values(t)[action];
                let raw = episode.encoded_state(t);
                let noisy: Vec<f32> = raw.iter().map(|x| x + noise.sample(&mut rng)).collect();

                let clusters = &mut self.clusters[action];
                let nearest = clusters
                    .iter_mut()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| a.distance(&noisy).total_cmp(&b.distance(&noisy)));

                match nearest {
                    Some((_, cluster)) if cluster.distance(&noisy) <= self.config.novelty_threshold => {
                        cluster.update(&noisy, target, self.config.value_lr);
                    }
                    _ => clusters.push(Cluster::spawn(&noisy, self.config.initial_variance, target)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_with(states: &[&[f32]], actions: &[usize], rewards: &[f32], values: &[&[f32]]) -> Episode {
        let mut e = Episode::new(values[0].len(), actions.len().max(1) + 1, None);
        e.add_state(states[0]);
        e.add_values(values[0]);
        for i in 0..actions.len() {
            e.add_action(actions[i]);
            e.add_reward(rewards[i]);
            e.add_state(states[i + 1]);
            e.add_values(values[i + 1]);
        }
        e
    }

    #[test]
    fn untrained_mixture_predicts_zero() {
        let mut model = GaussianMixture::new(2, 2, GaussianMixtureConfig::default());
        let e = episode_with(&[&[0.0]], &[], &[], &[&[0.0, 0.0]]);
        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn repeated_training_near_one_point_converges_toward_its_target() {
        let mut model = GaussianMixture::new(
            2,
            2,
            GaussianMixtureConfig {
                input_noise_std: 0.0,
                ..Default::default()
            },
        );
        let e = episode_with(&[&[5.0], &[5.0]], &[0], &[0.0], &[&[0.0, 0.0], &[9.0, 0.0]]);
        for _ in 0..50 {
            model.learn(std::slice::from_ref(&e));
        }

        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert!((out[0] - 9.0).abs() < 1e-3, "got {}", out[0]);
    }

    #[test]
    fn far_apart_samples_spawn_distinct_clusters() {
        let mut model = GaussianMixture::new(1, 1, GaussianMixtureConfig::default());
        let near = episode_with(&[&[0.0], &[0.0]], &[0], &[0.0], &[&[0.0], &[1.0]]);
        let far = episode_with(&[&[1000.0], &[1000.0]], &[0], &[0.0], &[&[0.0], &[-1.0]]);
        model.learn(&[near.clone(), far.clone()]);
        assert_eq!(model.clusters[0].len(), 2, "samples 1000 stddevs apart must not merge");
    }
}
