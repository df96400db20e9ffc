use crate::episode::Episode;
use crate::model::{pad, Model};

/// Interface-adherent stand-in for a recurrent (LSTM/GRU) value model. The
/// real hidden-state math is out of scope (§4.4 of the design); this stub
/// exists so `stackedgru`/`stackedlstm` CLI tokens wire up to something that
/// satisfies the `Model` contract, tracks episode boundaries, and resets its
/// (currently empty) hidden state on `next_episode` the way a real
/// recurrent backend would need to.
pub struct RecurrentModel {
    value_size: usize,
    num_actions: usize,
    hidden_reset_pending: bool,
}

impl RecurrentModel {
    pub fn new(num_actions: usize, value_size: usize) -> Self {
        Self {
            value_size,
            num_actions,
            hidden_reset_pending: true,
        }
    }
}

impl Model for RecurrentModel {
    fn values(&mut self, _episode: &Episode, out: &mut Vec<f32>) {
        // A real backend would feed (state, prev_hidden) through the net here;
        // the stub always predicts the zero vector, same as an untrained model.
        *out = pad(vec![0.0; self.num_actions], self.value_size);
    }

    fn learn(&mut self, _batch: &[Episode]) {}

    fn next_episode(&mut self) {
        self.hidden_reset_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_zero_vector_of_the_configured_size() {
        let mut model = RecurrentModel::new(3, 4);
        let mut e = Episode::new(4, 3, None);
        e.add_state(&[0.0]);
        e.add_values(&[0.0; 4]);

        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn next_episode_marks_hidden_state_for_reset() {
        let mut model = RecurrentModel::new(2, 2);
        model.hidden_reset_pending = false;
        model.next_episode();
        assert!(model.hidden_reset_pending);
    }
}
