//! An episodic reinforcement-learning research harness.
//!
//! The crate is organized around four pluggable abstractions that the
//! [`agent`] loop drives each step: a [`world`], a [`model`], a [`learning`]
//! rule, and a [`selector`]. [`world::wrappers`] compose a base world to
//! reshape observations or add memory-carrying "device" actions, and
//! [`dyna`] / [`texplore`] compose a [`model::Model`] with a learned
//! [`model_world::ModelWorld`] to plan with simulated rollouts.

/// Per-episode driver: reset, select, step, record, train-batch.
pub mod agent;

/// Time-decaying hyperparameter schedules, reused by action-selector and
/// model configuration.
pub mod decay;

/// Configuration-time error taxonomy (§7).
pub mod error;

/// Model-based planning wrapper that runs simulated rollouts through a
/// learned world model before each real decision (single-threaded).
pub mod dyna;

/// Columnar trajectory storage.
pub mod episode;

/// Process-wide cancellation flag, installed once from SIGINT/SIGTERM.
pub mod interrupt;

/// Learning rules (temporal-difference update rules) that score actions
/// and update an episode's stored per-step values.
pub mod learning;

/// Value-function approximators.
pub mod model;

/// A [`world::World`] whose transitions are produced by a trained
/// [`model::Model`] instead of ground truth.
pub mod model_world;

/// Action selectors that wrap a learning rule and emit a probability
/// distribution over actions.
pub mod selector;

/// Concurrent model-based planning wrapper (three-worker TEXPLORE).
pub mod texplore;

/// Episodic environments and the wrappers that compose them.
pub mod world;

mod util;

pub use episode::Episode;
