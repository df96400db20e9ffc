use crate::world::{StepResult, World};

/// The inclusive integer range `[min, max]` of one state coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        assert!(max >= min, "range max ({max}) must be >= min ({min})");
        Self { min, max }
    }

    fn bins(&self) -> usize {
        (self.max - self.min).round() as usize + 1
    }
}

/// Expands each integer-valued coordinate into a one-hot sub-vector using
/// a triangular kernel of width 1: cell `k` receives
/// `max(0, 1 - |k - (x - min)|)`. For an exactly integer-valued `x` this
/// is a clean one-hot vector — every neighbour is exactly distance 1 away
/// and so contributes `0`, not a fractional `0.5` — fractional `x` shares
/// activation mass between its two nearest cells.
pub struct OneHot {
    inner: Box<dyn World>,
    ranges: Vec<Range>,
}

impl OneHot {
    /// **Panics** if `ranges` is empty.
    pub fn new(inner: Box<dyn World>, ranges: Vec<Range>) -> Self {
        assert!(!ranges.is_empty(), "ranges must not be empty");
        Self { inner, ranges }
    }

    /// The length of the encoded vector: the sum of each coordinate's bin count.
    pub fn encoded_len(&self) -> usize {
        self.ranges.iter().map(Range::bins).sum()
    }

    /// Encode a raw state vector. **Panics** if `state.len() != ranges.len()`.
    pub fn encode(&self, state: &[f32]) -> Vec<f32> {
        assert_eq!(
            state.len(),
            self.ranges.len(),
            "expected {} coordinates, got {}",
            self.ranges.len(),
            state.len()
        );
        let mut out = Vec::with_capacity(self.encoded_len());
        for (&x, range) in state.iter().zip(self.ranges.iter()) {
            let offset = x - range.min;
            for k in 0..range.bins() {
                let raw = (1.0 - (k as f32 - offset).abs()).max(0.0);
                out.push(raw);
            }
        }
        out
    }
}

impl World for OneHot {
    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn initial_state(&self, out: &mut Vec<f32>) {
        let mut raw = Vec::new();
        self.inner.initial_state(&mut raw);
        *out = self.encode(&raw);
    }

    fn step(&mut self, action: usize, out: &mut Vec<f32>) -> StepResult {
        let mut raw = Vec::new();
        let res = self.inner.step(action, &mut raw);
        *out = self.encode(&raw);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::FixedWorld;

    #[test]
    fn one_hot_length_and_activation() {
        let inner = Box::new(FixedWorld::new(vec![3.0, 2.0]));
        let world = OneHot::new(inner, vec![Range::new(0.0, 9.0), Range::new(0.0, 4.0)]);

        assert_eq!(world.encoded_len(), 15);

        let encoded = world.encode(&[3.0, 2.0]);
        assert_eq!(encoded.len(), 15);
        assert_eq!(encoded[3], 1.0);
        assert_eq!(encoded[10 + 2], 1.0);

        // an integer-valued coordinate's neighbours are exactly distance 1 away,
        // so they contribute 0, not a fractional 0.5
        for (i, &v) in encoded.iter().enumerate() {
            if i != 3 && i != 12 {
                assert_eq!(v, 0.0, "index {i} should be exactly 0.0");
            }
        }
    }

    #[test]
    fn fractional_input_shares_mass_with_nearest_cells() {
        let inner = Box::new(FixedWorld::new(vec![3.5]));
        let world = OneHot::new(inner, vec![Range::new(0.0, 9.0)]);
        let encoded = world.encode(&[3.5]);
        assert_eq!(encoded[3], 0.5);
        assert_eq!(encoded[4], 0.5);
    }
}
