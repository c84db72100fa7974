/// Module that provides data types for the generated code
mod compiled_data;
pub use compiled_data::{DfaData, DfaStateData, InfiniteRuleData, LexerAutomataData};

/// Module that provides the byte indexed DFA table
mod dfa_table;
pub use dfa_table::{DfaTable, DfaTableState};
pub(crate) use dfa_table::ALPHABET_SIZE;

/// Module that provides the bundle of all automata a lexer needs
mod lexer_automata;
pub use lexer_automata::{InfiniteDfaFamily, LexerAutomata};

/// Module that provides a Match type
mod match_type;
pub use match_type::Match;

/// Module that provides a Span type
mod span;
pub use span::Span;
