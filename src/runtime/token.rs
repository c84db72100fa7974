use crate::common::Span;

/// What the lexer does with a matched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<S> {
    /// Drop the text, e.g. whitespace or comments.
    Skip,
    /// Emit a token with the given symbol.
    Symbol(S),
    /// Abort lexing with the given message.
    Error(String),
}

/// A text matched by a lex rule as it is handed to the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexMatch<'h> {
    /// The worker that owns the token.
    pub worker: usize,
    /// The rule that matched.
    pub rule: usize,
    /// The position of the text in the input.
    pub span: Span,
    /// The matched text.
    pub text: &'h str,
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<S> {
    /// The symbol returned by the action.
    pub symbol: S,
    /// The rule that matched.
    pub rule: usize,
    /// The position of the token in the input.
    pub span: Span,
}

/// The tokens of one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTokens<S> {
    /// The index of the worker.
    pub worker: usize,
    /// The chunk of the input assigned to the worker after boundary adjustment.
    pub span: Span,
    /// The tokens that start in the chunk in input order.
    pub tokens: Vec<Token<S>>,
}

/// The result of a successful parallel lex run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput<S> {
    workers: Vec<WorkerTokens<S>>,
}

impl<S> LexOutput<S> {
    pub(crate) fn new(workers: Vec<WorkerTokens<S>>) -> Self {
        debug_assert!(workers.iter().enumerate().all(|(i, w)| w.worker == i));
        LexOutput { workers }
    }

    /// The tokens per worker in worker order.
    pub fn workers(&self) -> &[WorkerTokens<S>] {
        &self.workers
    }

    /// All tokens in input order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token<S>> {
        self.workers.iter().flat_map(|worker| worker.tokens.iter())
    }

    /// Consume the output and return all tokens in input order.
    pub fn into_tokens(self) -> Vec<Token<S>> {
        self.workers
            .into_iter()
            .flat_map(|worker| worker.tokens)
            .collect()
    }
}
