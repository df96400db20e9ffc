use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{AdamW, AdamWConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use crate::episode::Episode;
use crate::model::{pad, Model};

type Backend = Autodiff<NdArray<f32>>;
type AdamWOptimizer<M, B> =
    OptimizerAdaptor<AdamW<<B as AutodiffBackend>::InnerBackend>, M, B>;

/// A shared trunk with one output per action, adapted from the teacher's
/// `DQNModel`/`DQNAgent` machinery but stripped of the target-network
/// machinery — the TD target here is already baked into the episode's
/// stored value column by the [learning rule](crate::learning), so there is
/// nothing left for a separate target net to stabilize.
#[derive(Module, Debug)]
struct Net<B: burn::tensor::backend::Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    activation: Relu,
}

impl<B: burn::tensor::backend::Backend> Net<B> {
    fn new(device: &B::Device, input: usize, hidden: usize, output: usize) -> Self {
        Self {
            fc1: LinearConfig::new(input, hidden).init(device),
            fc2: LinearConfig::new(hidden, output).init(device),
            activation: Relu::new(),
        }
    }

    fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.fc1.forward(x));
        self.fc2.forward(x)
    }
}

/// Configuration for [`FeedForward`].
#[derive(Debug, Clone)]
pub struct FeedForwardConfig {
    /// Width of the single hidden layer.
    ///
    /// **Default:** `64`
    pub hidden_size: usize,
    /// Optimizer learning rate.
    ///
    /// **Default:** `1e-3`
    pub lr: f64,
}

impl Default for FeedForwardConfig {
    fn default() -> Self {
        Self {
            hidden_size: 64,
            lr: 1e-3,
        }
    }
}

/// A `burn`-backed feed-forward value model: one Q-value output per real
/// action, trained with a masked mean-squared-error loss so only the taken
/// action's column of a batch row contributes to the gradient.
pub struct FeedForward {
    net: Option<Net<Backend>>,
    optimizer: AdamWOptimizer<Net<Backend>, Backend>,
    device: NdArrayDevice,
    state_size: usize,
    num_actions: usize,
    value_size: usize,
    lr: f64,
}

impl FeedForward {
    pub fn new(state_size: usize, num_actions: usize, value_size: usize, config: FeedForwardConfig) -> Self {
        let device = NdArrayDevice::default();
        let net = Net::new(&device, state_size, config.hidden_size, num_actions);
        let optimizer = AdamWConfig::new().init();
        Self {
            net: Some(net),
            optimizer,
            device,
            state_size,
            num_actions,
            value_size,
            lr: config.lr,
        }
    }

    fn row_tensor(&self, state: &[f32]) -> Tensor<Backend, 2> {
        assert_eq!(state.len(), self.state_size, "state_size mismatch in FeedForward input");
        Tensor::<Backend, 1>::from_floats(state, &self.device).reshape([1, self.state_size])
    }
}

impl Model for FeedForward {
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        let t = episode.length() - 1;
        let state = episode.encoded_state(t);
        let prediction = self.net.as_ref().expect("net taken during learn").forward(self.row_tensor(&state));
        let row: Vec<f32> = prediction.into_data().value;
        *out = pad(row, self.value_size);
        debug_assert!(out.iter().all(|v| v.is_finite()), "FeedForward::values produced a non-finite entry");
    }

    fn learn(&mut self, batch: &[Episode]) {
        let mut states = Vec::new();
        let mut targets = Vec::new();
        let mut mask = Vec::new();
        let mut rows = 0usize;

        for episode in batch {
            if episode.length() < 2 {
                continue;
            }
            for t in 0..episode.length() - 1 {
                let action = episode.action(t);
                let target_value = episode.values(t)[action];
                states.extend_from_slice(&episode.encoded_state(t));
                for a in 0..self.num_actions {
                    targets.push(if a == action { target_value } else { 0.0 });
                    mask.push(if a == action { 1.0 } else { 0.0 });
                }
                rows += 1;
            }
        }

        if rows == 0 {
            return;
        }

        let x = Tensor::<Backend, 1>::from_floats(states.as_slice(), &self.device).reshape([rows, self.state_size]);
        let target = Tensor::<Backend, 1>::from_floats(targets.as_slice(), &self.device).reshape([rows, self.num_actions]);
        let mask = Tensor::<Backend, 1>::from_floats(mask.as_slice(), &self.device).reshape([rows, self.num_actions]);

        let net = self.net.take().expect("net taken during learn");
        let prediction = net.forward(x);
        let diff = (prediction - target) * mask.clone();
        let count = mask.sum();
        let loss = diff.powf_scalar(2.0).sum() / count;

        let grads = GradientsParams::from_grads(loss.backward(), &net);
        self.net = Some(self.optimizer.step(self.lr, net, grads));
    }
}
