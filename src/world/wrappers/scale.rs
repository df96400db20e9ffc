use crate::world::{StepResult, World};

/// Multiplies the inner world's observation element-wise by a fixed weight
/// vector. Zeroing a coordinate induces partial observability — used by
/// the `pomdp` CLI token to hide state the agent shouldn't see.
pub struct Scale {
    inner: Box<dyn World>,
    weights: Vec<f32>,
}

impl Scale {
    /// **Panics** if `weights` is empty.
    pub fn new(inner: Box<dyn World>, weights: Vec<f32>) -> Self {
        assert!(!weights.is_empty(), "weights must not be empty");
        Self { inner, weights }
    }

    fn apply(&self, state: &mut [f32]) {
        for (x, w) in state.iter_mut().zip(self.weights.iter().cycle()) {
            *x *= w;
        }
    }
}

impl World for Scale {
    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        self.inner.initial_state(out);
        self.apply(out);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let res = self.inner.step(action, out);
        self.apply(out);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::FixedWorld;

    #[test]
    fn zeroes_masked_coordinates() {
        let inner = Box::new(FixedWorld::new(vec![3.0, 4.0]));
        let mut world = Scale::new(inner, vec![1.0, 0.0]);
        let mut out = Vec::new();
        world.initial_state(&mut out);
        assert_eq!(out, vec![3.0, 0.0]);

        world.step(0, &mut out);
        assert_eq!(out, vec![3.0, 0.0]);
    }
}
