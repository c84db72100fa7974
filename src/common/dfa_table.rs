//! The DFA table is the immutable form of a deterministic automaton as it is consumed by the
//! lexer. Every state holds one entry per input byte, the finality flag and the rule numbers
//! that were associated with the NFA states it was built from.

/// The number of entries in a transition table, one per byte value.
pub(crate) const ALPHABET_SIZE: usize = 256;

/// A state of a [`DfaTable`].
#[derive(Clone, PartialEq, Eq)]
pub struct DfaTableState {
    /// The target state for every byte. `None` means that the byte is rejected.
    transitions: [Option<usize>; ALPHABET_SIZE],
    /// True if the state is accepting.
    is_final: bool,
    /// The associated rule numbers in construction order. May contain duplicates.
    rules: Vec<usize>,
}

impl DfaTableState {
    /// Create a new state without any transitions.
    pub fn new(is_final: bool, rules: Vec<usize>) -> Self {
        DfaTableState {
            transitions: [None; ALPHABET_SIZE],
            is_final,
            rules,
        }
    }

    /// Set the target state for the given byte.
    pub fn set_transition(&mut self, byte: u8, target_state: usize) {
        self.transitions[byte as usize] = Some(target_state);
    }

    /// Get the target state for the given byte.
    #[inline]
    pub fn transition(&self, byte: u8) -> Option<usize> {
        self.transitions[byte as usize]
    }

    /// Iterate over all defined transitions as pairs of byte and target state.
    pub fn transitions(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        (0..=u8::MAX).filter_map(|byte| self.transition(byte).map(|target| (byte, target)))
    }

    /// Returns true if the state is accepting.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// The associated rule numbers.
    pub fn rules(&self) -> &[usize] {
        &self.rules
    }

    /// The rule that wins if the state is the end of a match.
    /// Rules declared first have priority, so this is the smallest rule number.
    #[inline]
    pub fn winning_rule(&self) -> Option<usize> {
        self.rules.iter().min().copied()
    }
}

impl std::fmt::Debug for DfaTableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DfaTableState")
            .field("transitions", &self.transitions().collect::<Vec<_>>())
            .field("is_final", &self.is_final)
            .field("rules", &self.rules)
            .finish()
    }
}

/// A deterministic automaton as a flat table of states.
/// The initial state is always the first state, i.e. state 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaTable {
    states: Vec<DfaTableState>,
}

impl DfaTable {
    /// The index of the initial state.
    pub const INITIAL_STATE: usize = 0;

    /// Create a DFA table from its states.
    pub fn new(states: Vec<DfaTableState>) -> Self {
        debug_assert!(states
            .iter()
            .flat_map(|state| state.transitions())
            .all(|(_, target)| target < states.len()));
        DfaTable { states }
    }

    /// Get the states of the table.
    pub fn states(&self) -> &[DfaTableState] {
        &self.states
    }

    /// Get the number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the table has no states at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Get the state with the given index.
    #[inline]
    pub fn state(&self, state: usize) -> Option<&DfaTableState> {
        self.states.get(state)
    }

    /// Returns true if the initial state is accepting, i.e. the automaton matches the empty
    /// string.
    pub fn matches_empty(&self) -> bool {
        self.state(Self::INITIAL_STATE)
            .is_some_and(|state| state.is_final())
    }

    /// Get the target of the transition from `state` on `byte`.
    #[inline]
    pub fn next_state(&self, state: usize, byte: u8) -> Option<usize> {
        self.state(state).and_then(|s| s.transition(byte))
    }

    /// Returns true if the automaton accepts exactly the given input.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut current = Self::INITIAL_STATE;
        for byte in input {
            match self.next_state(current, *byte) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.state(current).is_some_and(|state| state.is_final())
    }

    /// Runs the automaton on `input` beginning at offset `start` and returns the end offset of
    /// the longest non-empty match together with the accepting state it ended in.
    /// The scan stops at the first rejected byte or at the end of `input`.
    pub fn longest_match(&self, input: &[u8], start: usize) -> Option<(usize, &DfaTableState)> {
        let mut current = Self::INITIAL_STATE;
        let mut last_final = None;
        for (pos, byte) in input.iter().enumerate().skip(start) {
            let Some(next) = self.next_state(current, *byte) else {
                break;
            };
            current = next;
            let state = &self.states[next];
            if state.is_final() {
                last_final = Some((pos + 1, state));
            }
        }
        last_final
    }

    /// Returns the end offset of the shortest match beginning at offset `start`.
    /// The empty match is found if the initial state is accepting.
    pub fn shortest_match(&self, input: &[u8], start: usize) -> Option<usize> {
        if self.matches_empty() {
            return Some(start);
        }
        let mut current = Self::INITIAL_STATE;
        for (pos, byte) in input.iter().enumerate().skip(start) {
            current = self.next_state(current, *byte)?;
            if self.states[current].is_final() {
                return Some(pos + 1);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A table for the language "ab+" with rule 3 associated to the accepting state.
    fn ab_plus() -> DfaTable {
        let mut s0 = DfaTableState::new(false, vec![]);
        s0.set_transition(b'a', 1);
        let mut s1 = DfaTableState::new(false, vec![]);
        s1.set_transition(b'b', 2);
        let mut s2 = DfaTableState::new(true, vec![3]);
        s2.set_transition(b'b', 2);
        DfaTable::new(vec![s0, s1, s2])
    }

    #[test]
    fn test_accepts() {
        let dfa = ab_plus();
        assert!(dfa.accepts(b"ab"));
        assert!(dfa.accepts(b"abbb"));
        assert!(!dfa.accepts(b"a"));
        assert!(!dfa.accepts(b""));
        assert!(!dfa.accepts(b"abc"));
    }

    #[test]
    fn test_longest_match() {
        let dfa = ab_plus();
        let (end, state) = dfa.longest_match(b"xabbbc", 1).unwrap();
        assert_eq!(end, 5);
        assert_eq!(state.winning_rule(), Some(3));
        assert!(dfa.longest_match(b"xabbbc", 0).is_none());
        // The match may not go beyond the end of the given input.
        assert_eq!(dfa.longest_match(&b"xabbbc"[..3], 1).unwrap().0, 3);
    }

    #[test]
    fn test_shortest_match() {
        let dfa = ab_plus();
        assert_eq!(dfa.shortest_match(b"abbb", 0), Some(2));
        assert_eq!(dfa.shortest_match(b"ba", 0), None);

        let empty = DfaTable::new(vec![DfaTableState::new(true, vec![])]);
        assert!(empty.matches_empty());
        assert_eq!(empty.shortest_match(b"xyz", 2), Some(2));
    }

    #[test]
    fn test_winning_rule() {
        let state = DfaTableState::new(true, vec![4, 1, 7, 1]);
        assert_eq!(state.winning_rule(), Some(1));
        assert_eq!(DfaTableState::new(false, vec![]).winning_rule(), None);
    }
}
