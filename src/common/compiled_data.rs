use super::{DfaTable, DfaTableState, InfiniteDfaFamily, LexerAutomata};

/// The data of a DFA state generated as Rust code.
pub type DfaStateData = (
    // The transitions of the state as pairs of byte and target state.
    &'static [(u8, usize)],
    // True if the state is accepting.
    bool,
    // The associated rule numbers.
    &'static [usize],
);

/// The data of a DFA generated as Rust code. The state index is the position in the slice.
pub type DfaData = &'static [DfaStateData];

/// The data of the automata family of an infinite rule generated as Rust code.
pub type InfiniteRuleData = (
    // The rule number.
    usize,
    // The plain automaton.
    DfaData,
    // The prefix accepting automaton.
    DfaData,
    // The suffix accepting automaton.
    DfaData,
    // The prefix and suffix accepting automaton.
    DfaData,
);

/// The data of all lexer automata generated as Rust code.
pub type LexerAutomataData = (
    // The combined automaton of the finite rules.
    Option<DfaData>,
    // The automata families of the infinite rules.
    &'static [InfiniteRuleData],
    // The cut point automaton.
    DfaData,
    // The length of the longest finite token.
    usize,
    // The number of lex rules.
    usize,
);

impl From<&[DfaStateData]> for DfaTable {
    fn from(data: &[DfaStateData]) -> Self {
        DfaTable::new(
            data.iter()
                .map(|(transitions, is_final, rules)| {
                    let mut state = DfaTableState::new(*is_final, rules.to_vec());
                    for (byte, target_state) in transitions.iter() {
                        state.set_transition(*byte, *target_state);
                    }
                    state
                })
                .collect(),
        )
    }
}

impl From<&InfiniteRuleData> for InfiniteDfaFamily {
    fn from(data: &InfiniteRuleData) -> Self {
        InfiniteDfaFamily::new(
            data.0,
            data.1.into(),
            data.2.into(),
            data.3.into(),
            data.4.into(),
        )
    }
}

impl From<&LexerAutomataData> for LexerAutomata {
    fn from(data: &LexerAutomataData) -> Self {
        LexerAutomata::new(
            data.0.map(DfaTable::from),
            data.1.iter().map(InfiniteDfaFamily::from).collect(),
            data.2.into(),
            data.3,
            data.4,
        )
    }
}
