#![forbid(missing_docs)]
//! The `parscan` crate generates the automata of a parallel scanner from a list of regex based
//! lex rules and runs the parallel maximal-munch lexer on top of them.
//!
//! The generator turns every rule into an NFA, rewrites the NFAs of rules with unbounded match
//! length into prefix and suffix accepting variants and converts everything into byte indexed
//! DFA tables. The runtime splits the input at safe cut points and lets a fixed number of
//! workers tokenize their chunks independently.

/// Module with types shared by the generator and the runtime
pub mod common;
pub use common::{DfaTable, DfaTableState, InfiniteDfaFamily, LexerAutomata, Match, Span};

/// Module with the automata construction and the code generator
#[cfg(feature = "generate")]
pub mod compiletime;
#[cfg(feature = "generate")]
pub use compiletime::{
    build_lexer_automata, generate_code, parse_regex_syntax, render_dfa, render_nfa, ByteClass,
    Dfa, Nfa, ParScanError, ParScanErrorKind, Result,
};

/// Module with the parallel lexer
#[cfg(feature = "runtime")]
pub mod runtime;
#[cfg(feature = "runtime")]
pub use runtime::{
    Action, LexError, LexMatch, LexOutput, ParallelLexer, ParallelLexerBuilder, Token,
    WorkerTokens,
};
