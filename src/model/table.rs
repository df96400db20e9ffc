use std::collections::HashMap;

use crate::episode::Episode;
use crate::model::{pad, Model};

/// Quantization step applied before hashing a state into a table key. Two
/// states within half this distance of each other collide into the same
/// entry — `1e-3` is tight enough that any encoder producing exact integers
/// (the common case, via `OneHot`/`oneofn`) never collides unintentionally.
const QUANT: f32 = 1e-3;

fn quantize(state: &[f32]) -> Vec<i64> {
    state.iter().map(|x| (x / QUANT).round() as i64).collect()
}

/// A hash-map-backed value model: the state most directly grounded in the
/// teacher's `QTable` idiom, generalized from `(state) -> Q(state, ·)` to
/// `(state) -> value_size` so it can back either a value model or a
/// [`ModelWorld`](crate::model_world::ModelWorld)'s transition model with
/// the same code.
///
/// A completed `learn` overwrites the table in place, so there is no
/// "in-progress" copy to hide from readers — `swap_models` is a no-op here
/// (see the trait's default).
#[derive(Debug, Default, Clone)]
pub struct Table {
    value_size: usize,
    entries: HashMap<Vec<i64>, Vec<f32>>,
}

impl Table {
    pub fn new(value_size: usize) -> Self {
        Self {
            value_size,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Model for Table {
    fn values(&mut self, episode: &Episode, out: &mut Vec<f32>) {
        let t = episode.length() - 1;
        let key = quantize(&episode.encoded_state(t));
        out.clear();
        match self.entries.get(&key) {
            Some(row) => out.extend_from_slice(row),
            None => out.resize(self.value_size, 0.0),
        }
        debug_assert!(out.iter().all(|v| v.is_finite()), "Table::values produced a non-finite entry");
    }

    fn learn(&mut self, batch: &[Episode]) {
        for episode in batch {
            for t in 0..episode.length() {
                let key = quantize(&episode.encoded_state(t));
                let row = pad(episode.values(t).to_vec(), self.value_size);
                self.entries.insert(key, row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_with(states: &[&[f32]], values: &[&[f32]]) -> Episode {
        let mut e = Episode::new(values[0].len(), 2, None);
        for (s, v) in states.iter().zip(values) {
            e.add_state(s);
            e.add_values(v);
        }
        e
    }

    #[test]
    fn untrained_table_returns_zero_vector() {
        let mut model = Table::new(3);
        let e = episode_with(&[&[0.0, 0.0]], &[&[0.0, 0.0, 0.0]]);
        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn learn_then_values_reproduces_exact_row() {
        let mut model = Table::new(2);
        let e = episode_with(&[&[1.0, 2.0], &[3.0, 4.0]], &[&[0.5, -0.5], &[1.5, 2.5]]);
        model.learn(std::slice::from_ref(&e));

        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert_eq!(out, vec![1.5, 2.5], "the most recent state's exact row is memorised");

        let probe = episode_with(&[&[1.0, 2.0]], &[&[0.0, 0.0]]);
        model.values(&probe, &mut out);
        assert_eq!(out, vec![0.5, -0.5]);
    }

    #[test]
    fn swap_models_is_a_no_op_and_preserves_learned_entries() {
        let mut model = Table::new(1);
        let e = episode_with(&[&[9.0]], &[&[7.0]]);
        model.learn(std::slice::from_ref(&e));
        model.swap_models();

        let mut out = Vec::new();
        model.values(&e, &mut out);
        assert_eq!(out, vec![7.0]);
    }
}
