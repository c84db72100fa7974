use thiserror::Error;

/// The error type of the parallel lexer.
/// Offsets are byte offsets into the complete input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No rule matches at the given position.
    #[error("Worker {worker}: no rule matches at offset {offset}")]
    ScanDeadEnd {
        /// The worker that failed.
        worker: usize,
        /// The position at which no rule matched.
        offset: usize,
    },

    /// No cut point was found in the lookahead window starting at a nominal chunk boundary.
    #[error("Worker {worker}: no cut point found in the lookahead window at offset {offset}")]
    BoundaryNotFound {
        /// The worker whose chunk boundary could not be placed.
        worker: usize,
        /// The nominal boundary.
        offset: usize,
    },

    /// The action of a rule returned an error.
    #[error("Worker {worker}: the action of rule #{rule} failed at offset {offset}: {message}")]
    ActionFailed {
        /// The worker that called the action.
        worker: usize,
        /// The rule of the matched text.
        rule: usize,
        /// The start of the matched text.
        offset: usize,
        /// The message returned by the action.
        message: String,
    },

    /// The matched text is not valid UTF-8.
    #[error("Worker {worker}: the text matched at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// The worker that matched the text.
        worker: usize,
        /// The start of the matched text.
        offset: usize,
    },

    /// A token that crosses a chunk boundary could not be completed.
    #[error("The token of rule #{rule} starting at offset {offset} is not terminated")]
    UnterminatedToken {
        /// The rule of the open token.
        rule: usize,
        /// The start of the open token.
        offset: usize,
    },

    /// The fragments of a token that crosses chunk boundaries don't form a token of its rule.
    #[error("Worker {worker}: the fragments of rule #{rule} starting at offset {offset} don't form a token")]
    UnmatchedFragment {
        /// The worker that holds the first fragment.
        worker: usize,
        /// The rule of the fragments.
        rule: usize,
        /// The start of the first fragment.
        offset: usize,
    },

    /// The configuration of the lexer is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The lookahead window is shorter than the longest finite token.
    #[error("The lookahead {lookahead} is shorter than the longest finite token ({longest})")]
    LookaheadTooSmall {
        /// The configured lookahead.
        lookahead: usize,
        /// The length of the longest finite token.
        longest: usize,
    },

    /// The worker pool could not be created.
    #[error("Failed to create the worker pool: {0}")]
    ThreadPool(String),

    /// A worker did not deliver its result.
    #[error("Worker {0} did not deliver a result")]
    WorkerLost(usize),
}
