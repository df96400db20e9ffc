use std::sync::Arc;

/// A pure function `state -> state'`, used to derive an alternate
/// observation (e.g. one-hot expansion) without mutating the stored raw
/// state.
pub type Encoder = Arc<dyn Fn(&[f32]) -> Vec<f32> + Send + Sync>;

/// A time-indexed record of one trajectory, stored as four parallel
/// columnar arrays.
///
/// `states` and `values` hold one entry per time step including the
/// initial state (`length` entries); `actions` and `rewards` hold one
/// entry per transition (`length - 1` entries). `state_size` is fixed by
/// the first call to [`add_state`](Episode::add_state) and every
/// subsequent state must match it exactly — a mismatch is a programming
/// error and panics.
#[derive(Clone)]
pub struct Episode {
    state_size: Option<usize>,
    value_size: usize,
    num_actions: usize,
    states: Vec<f32>,
    values: Vec<f32>,
    rewards: Vec<f32>,
    actions: Vec<usize>,
    aborted: bool,
    encoder: Option<Encoder>,
    encoded_state_size: Option<usize>,
}

impl Episode {
    /// Construct an empty episode.
    ///
    /// `value_size` must be at least `num_actions`; learners that need
    /// bookkeeping slots (e.g. adaptive softmax's temperature prediction)
    /// request a larger `value_size`.
    pub fn new(value_size: usize, num_actions: usize, encoder: Option<Encoder>) -> Self {
        assert!(
            value_size >= num_actions,
            "value_size ({value_size}) must be >= num_actions ({num_actions})"
        );
        Self {
            state_size: None,
            value_size,
            num_actions,
            states: Vec::new(),
            values: Vec::new(),
            rewards: Vec::new(),
            actions: Vec::new(),
            aborted: false,
            encoder,
            encoded_state_size: None,
        }
    }

    /// Number of recorded time steps, including the initial state.
    pub fn length(&self) -> usize {
        match self.state_size {
            Some(n) if n > 0 => self.states.len() / n,
            _ => 0,
        }
    }

    pub fn state_size(&self) -> usize {
        self.state_size.unwrap_or(0)
    }

    pub fn value_size(&self) -> usize {
        self.value_size
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn set_aborted(&mut self, aborted: bool) {
        self.aborted = aborted;
    }

    /// Append a state. The first call fixes `state_size`; later calls
    /// must supply a slice of the same length.
    pub fn add_state(&mut self, state: &[f32]) {
        match self.state_size {
            None => self.state_size = Some(state.len()),
            Some(n) => assert_eq!(
                n,
                state.len(),
                "state_size mismatch: episode was fixed at {n}, got {}",
                state.len()
            ),
        }
        self.states.extend_from_slice(state);
    }

    /// Append a value tuple. Must have `value_size` entries.
    pub fn add_values(&mut self, values: &[f32]) {
        assert_eq!(
            values.len(),
            self.value_size,
            "expected {} values, got {}",
            self.value_size,
            values.len()
        );
        self.values.extend_from_slice(values);
    }

    pub fn add_reward(&mut self, reward: f32) {
        self.rewards.push(reward);
    }

    pub fn add_action(&mut self, action: usize) {
        self.actions.push(action);
    }

    /// Read the raw state at time `t`.
    ///
    /// **Panics** if `t >= length()`.
    pub fn state(&self, t: usize) -> &[f32] {
        let n = self.state_size();
        assert!(t < self.length(), "state index {t} out of range");
        &self.states[t * n..(t + 1) * n]
    }

    /// Read the state at time `t` through the attached [`Encoder`], or the
    /// raw state if none is attached.
    pub fn encoded_state(&self, t: usize) -> Vec<f32> {
        let s = self.state(t);
        match &self.encoder {
            Some(f) => f(s),
            None => s.to_vec(),
        }
    }

    /// The dimension of [`encoded_state`](Episode::encoded_state), computed
    /// lazily by encoding the first stored state.
    pub fn encoded_state_size(&mut self) -> usize {
        if let Some(n) = self.encoded_state_size {
            return n;
        }
        let n = self.encoded_state(0).len();
        self.encoded_state_size = Some(n);
        n
    }

    /// Read the value tuple at time `t`.
    ///
    /// **Panics** if `t >= length()`.
    pub fn values(&self, t: usize) -> &[f32] {
        let n = self.value_size;
        assert!(t < self.length(), "values index {t} out of range");
        &self.values[t * n..(t + 1) * n]
    }

    /// Read the reward earned on the transition from `t` to `t+1`.
    ///
    /// **Panics** if `t >= length() - 1`.
    pub fn reward(&self, t: usize) -> f32 {
        self.rewards[t]
    }

    pub fn cumulative_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    /// Read the action taken on the transition from `t` to `t+1`.
    ///
    /// **Panics** if `t >= length() - 1`.
    pub fn action(&self, t: usize) -> usize {
        self.actions[t]
    }

    /// Overwrite a single action's stored value at time `t`.
    ///
    /// **Panics** if `t >= length()` or `action_index >= value_size`.
    pub fn update_value(&mut self, t: usize, action_index: usize, new_value: f32) {
        let n = self.value_size;
        assert!(t < self.length(), "values index {t} out of range");
        assert!(action_index < n, "action_index {action_index} out of range");
        self.values[t * n + action_index] = new_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(e: &mut Episode, a: usize, r: f32, s: &[f32], v: &[f32]) {
        e.add_action(a);
        e.add_reward(r);
        e.add_state(s);
        e.add_values(v);
    }

    #[test]
    fn records_a_trajectory_with_matching_lengths() {
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0, 0.0]);
        e.add_values(&[0.0, 0.0]);
        step(&mut e, 0, -1.0, &[1.0, 0.0], &[0.1, 0.2]);
        step(&mut e, 1, 10.0, &[1.0, 1.0], &[0.3, 0.4]);
        e.set_aborted(false);

        assert_eq!(e.length(), 3);
        assert_eq!(e.state_size(), 2);
        assert_eq!(e.cumulative_reward(), 9.0);
        assert_eq!(e.action(1), 1);
        assert_eq!(e.reward(0), -1.0);
        assert_eq!(e.values(2), &[0.3, 0.4]);
        assert!(!e.aborted());
    }

    #[test]
    fn update_value_is_exact() {
        let mut e = Episode::new(2, 2, None);
        e.add_state(&[0.0]);
        e.add_values(&[1.0, 2.0]);
        e.update_value(0, 1, 42.0);
        assert_eq!(e.values(0), &[1.0, 42.0]);
    }

    #[test]
    #[should_panic]
    fn state_size_mismatch_panics() {
        let mut e = Episode::new(1, 2, None);
        e.add_state(&[0.0, 0.0]);
        e.add_state(&[0.0]);
    }

    #[test]
    #[should_panic]
    fn reading_out_of_range_panics() {
        let e = Episode::new(1, 2, None);
        e.state(0);
    }

    #[test]
    fn encoder_is_applied_lazily_and_cached() {
        let encoder: Encoder = Arc::new(|s: &[f32]| s.iter().map(|x| x * 2.0).collect());
        let mut e = Episode::new(1, 1, Some(encoder));
        e.add_state(&[1.0, 2.0, 3.0]);
        assert_eq!(e.encoded_state(0), vec![2.0, 4.0, 6.0]);
        assert_eq!(e.encoded_state_size(), 3);
    }
}
