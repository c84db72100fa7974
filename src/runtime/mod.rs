/// Module with the error type of the lexer
mod errors;
pub use errors::LexError;

/// Module with the tokens and actions
mod token;
pub use token::{Action, LexMatch, LexOutput, Token, WorkerTokens};

/// Module that places the chunk boundaries at cut points
mod cut_point;

/// Module with the maximal-munch scanner of a single chunk
mod scanner;

/// The lexer builder module
mod builder;
pub use builder::{ParallelLexerBuilder, DEFAULT_LOOKAHEAD};

/// Module with the parallel lexer
mod lexer;
pub use lexer::ParallelLexer;
