//! Configuration-time error taxonomy (§7). Contract violations (bad state
//! sizes, out-of-range reads) stay as `panic!`/`assert!` — they are
//! programming errors, not recoverable configuration mistakes.

use thiserror::Error;

/// Reported by the CLI composition root before the agent loop begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no world token given (gridworld, polargridworld, or tmaze)")]
    MissingWorld,
    #[error("no model token given (table, gaussian, perceptron, stackedgru, or stackedlstm)")]
    MissingModel,
    #[error("no learner token given (qlearning or advantage)")]
    MissingLearner,
    #[error("no selector token given (softmax, adaptivesoftmax, or egreedy)")]
    MissingSelector,
    #[error("a selector token appeared before any learner token; a selector has nothing to wrap")]
    SelectorBeforeLearner,
    #[error("failed to write rewards.dat: {0}")]
    Io(#[from] std::io::Error),
}
