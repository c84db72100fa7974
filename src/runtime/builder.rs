use log::debug;

use crate::common::LexerAutomata;

use super::{LexError, ParallelLexer};

/// The default length of the lookahead window used to find cut points.
pub const DEFAULT_LOOKAHEAD: usize = 1024;

/// A builder for a [`ParallelLexer`].
#[derive(Debug, Clone, Default)]
pub struct ParallelLexerBuilder {
    /// The number of workers. Defaults to the available parallelism of the machine.
    workers: Option<usize>,
    /// The length of the lookahead window.
    lookahead: Option<usize>,
}

impl ParallelLexerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of workers.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the length of the lookahead window in which cut points are searched.
    pub fn lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = Some(lookahead);
        self
    }

    /// Builds the lexer for the given automata.
    /// # Errors
    /// * `InvalidConfiguration` if the number of workers is zero.
    /// * `LookaheadTooSmall` if the lookahead is shorter than the longest finite token.
    /// * `ThreadPool` if the worker threads can't be created.
    pub fn build(self, automata: LexerAutomata) -> Result<ParallelLexer, LexError> {
        let workers = match self.workers {
            Some(workers) => workers,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };
        if workers == 0 {
            return Err(LexError::InvalidConfiguration(
                "at least one worker is required".to_string(),
            ));
        }
        let lookahead = self.lookahead.unwrap_or(DEFAULT_LOOKAHEAD);
        let longest = automata.longest_finite_token();
        if lookahead < longest {
            return Err(LexError::LookaheadTooSmall { lookahead, longest });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("parscan-worker-{}", index))
            .build()
            .map_err(|e| LexError::ThreadPool(e.to_string()))?;
        debug!(
            "Created a parallel lexer with {} workers and a lookahead of {}",
            workers, lookahead
        );
        Ok(ParallelLexer::new(automata, workers, lookahead, pool))
    }
}

#[cfg(all(test, feature = "generate"))]
mod tests {
    use super::*;
    use crate::compiletime::build_lexer_automata;

    #[test]
    fn test_defaults() {
        let automata = build_lexer_automata(&["[a-z]+"], " ").unwrap();
        let lexer = ParallelLexerBuilder::new().build(automata).unwrap();
        assert!(lexer.workers() >= 1);
        assert_eq!(lexer.lookahead(), DEFAULT_LOOKAHEAD);
    }

    #[test]
    fn test_invalid_worker_count() {
        let automata = build_lexer_automata(&["[a-z]+"], " ").unwrap();
        let result = ParallelLexerBuilder::new().workers(0).build(automata);
        assert!(matches!(result, Err(LexError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_lookahead_too_small() {
        let automata = build_lexer_automata(&["[a-z]{1,8}", "[ ]+"], " ").unwrap();
        let result = ParallelLexerBuilder::new()
            .workers(2)
            .lookahead(4)
            .build(automata);
        assert_eq!(
            result.err(),
            Some(LexError::LookaheadTooSmall {
                lookahead: 4,
                longest: 8
            })
        );
    }
}
