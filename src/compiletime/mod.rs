/// Module with error definitions
mod errors;
pub use errors::{ParScanError, ParScanErrorKind, PatternOrigin, Result};

/// Module for the ID types.
mod ids;
pub(crate) use ids::StateID;

/// The parser module contains the regex syntax parser.
mod parser;
pub use parser::parse_regex_syntax;

/// Module that provides sets of bytes used as transition labels.
mod byte_class;
pub use byte_class::ByteClass;

/// The nfa module contains the NFA implementation.
mod nfa;
pub use nfa::Nfa;

/// Module with the prefix and suffix transformations of NFAs.
mod nfa_transform;

/// The module containing the conversion from Hir to Nfa
mod hir;

/// Module that provides the subset construction of DFAs
mod dfa;
pub use dfa::Dfa;

/// Module with conversion to graphviz dot format
mod dot;
pub use dot::{render_dfa, render_nfa};

/// The generator module builds all automata of a lexer and generates code from them.
mod generator;
pub use generator::{build_lexer_automata, generate_code};
