//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! The NFA is built with Thompson's construction over the byte alphabet. Every fragment has
//! exactly one initial and one final state. The combination operators consume their operands
//! and move the operand's states into the arena of the receiving NFA.

use std::collections::BTreeSet;

use itertools::Itertools;

use super::{ByteClass, StateID};

/// A non-deterministic finite automaton over bytes.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    initial_state: StateID,
    final_state: StateID,
}

impl Nfa {
    /// Create an NFA that accepts only the empty string.
    /// Initial and final state are the same state.
    pub fn empty() -> Self {
        Self {
            states: vec![NfaState::new(StateID::new(0))],
            initial_state: StateID::new(0),
            final_state: StateID::new(0),
        }
    }

    /// Create an NFA that accepts exactly the given byte.
    pub fn from_byte(byte: u8) -> Self {
        let mut nfa = Self::empty();
        let final_state = nfa.new_state();
        nfa.add_transition(nfa.initial_state, byte, final_state);
        nfa.final_state = final_state;
        nfa
    }

    /// Create an NFA that accepts any single byte of the class.
    pub fn from_byte_class(class: &ByteClass) -> Self {
        let mut nfa = Self::empty();
        let final_state = nfa.new_state();
        for byte in class.bytes() {
            nfa.add_transition(nfa.initial_state, byte, final_state);
        }
        nfa.final_state = final_state;
        nfa
    }

    /// Create an NFA that accepts exactly the given byte string.
    pub fn from_literal(literal: &[u8]) -> Self {
        let mut nfa = Self::empty();
        for byte in literal {
            let next_state = nfa.new_state();
            nfa.add_transition(nfa.final_state, *byte, next_state);
            nfa.final_state = next_state;
        }
        nfa
    }

    /// The number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn initial_state(&self) -> StateID {
        self.initial_state
    }

    pub(crate) fn final_state(&self) -> StateID {
        self.final_state
    }

    pub(crate) fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub(crate) fn set_initial_state(&mut self, state: StateID) {
        self.initial_state = state;
    }

    pub(crate) fn set_final_state(&mut self, state: StateID) {
        self.final_state = state;
    }

    pub(crate) fn new_state(&mut self) -> StateID {
        let state = StateID::new(self.states.len());
        self.states.push(NfaState::new(state));
        state
    }

    pub(crate) fn add_transition(&mut self, from: StateID, byte: u8, target_state: StateID) {
        self.states[from].transitions.push(NfaTransition {
            byte,
            target_state,
        });
    }

    pub(crate) fn add_epsilon_transition(&mut self, from: StateID, target_state: StateID) {
        self.states[from].epsilon_transitions.push(target_state);
    }

    /// Append a rule number to the rule list of the given state.
    pub(crate) fn add_rules(&mut self, state: StateID, rules: &[usize]) {
        self.states[state].rules.extend_from_slice(rules);
    }

    /// Associate a rule number with the final state.
    /// This has to happen after all concatenations because concatenation merges the final
    /// state of the left operand into the right operand.
    pub fn associate_rule(&mut self, rule: usize) {
        let final_state = self.final_state;
        self.states[final_state].rules.push(rule);
    }

    /// Apply an offset to every state number.
    pub(crate) fn shift_ids(&mut self, offset: usize) -> (StateID, StateID) {
        self.renumber(|id| id + offset);
        (self.initial_state, self.final_state)
    }

    /// Map every state number through the given function.
    fn renumber(&mut self, map: impl Fn(StateID) -> StateID) {
        for state in self.states.iter_mut() {
            state.id = map(state.id);
            for transition in state.transitions.iter_mut() {
                transition.target_state = map(transition.target_state);
            }
            for target_state in state.epsilon_transitions.iter_mut() {
                *target_state = map(*target_state);
            }
        }
        self.initial_state = map(self.initial_state);
        self.final_state = map(self.final_state);
    }

    /// Move the states of the given NFA to the current NFA and thereby consume the NFA.
    /// The states of the given NFA must have been shifted already.
    pub(crate) fn append(&mut self, mut nfa: Nfa) {
        self.states.append(nfa.states.as_mut());
        // Check the index constraints
        debug_assert!(self
            .states
            .iter()
            .enumerate()
            .all(|(i, s)| s.id().as_usize() == i));
    }

    /// Concatenates the current NFA with another NFA.
    /// The final state of the current NFA and the initial state of the other NFA are merged
    /// into one state, so the result has m + n - 1 states.
    pub fn concat(&mut self, mut nfa: Nfa) {
        let offset = self.states.len();
        let joint = self.final_state;
        let other_initial = nfa.initial_state;
        nfa.renumber(|id| match id.cmp(&other_initial) {
            std::cmp::Ordering::Less => id + offset,
            std::cmp::Ordering::Equal => joint,
            std::cmp::Ordering::Greater => StateID::new(id.as_usize() - 1) + offset,
        });
        let merged = nfa.states.remove(other_initial.as_usize());
        self.states[joint]
            .transitions
            .extend(merged.transitions);
        self.states[joint]
            .epsilon_transitions
            .extend(merged.epsilon_transitions);
        self.states[joint].rules.extend(merged.rules);
        self.final_state = nfa.final_state;
        self.append(nfa);
    }

    /// Builds the union of the current NFA and another NFA.
    /// A fresh initial and a fresh final state are added, so the result has m + n + 2 states.
    pub fn union(&mut self, mut nfa: Nfa) {
        let (other_initial, other_final) = nfa.shift_ids(self.states.len());
        self.append(nfa);

        let initial_state = self.new_state();
        self.add_epsilon_transition(initial_state, self.initial_state);
        self.add_epsilon_transition(initial_state, other_initial);

        let final_state = self.new_state();
        self.add_epsilon_transition(self.final_state, final_state);
        self.add_epsilon_transition(other_final, final_state);

        self.initial_state = initial_state;
        self.final_state = final_state;
    }

    /// Kleene star.
    pub fn zero_or_more(&mut self) {
        let initial_state = self.new_state();
        let final_state = self.new_state();
        self.add_epsilon_transition(initial_state, self.initial_state);
        self.add_epsilon_transition(initial_state, final_state);
        self.add_epsilon_transition(self.final_state, self.initial_state);
        self.add_epsilon_transition(self.final_state, final_state);
        self.initial_state = initial_state;
        self.final_state = final_state;
    }

    /// Kleene plus.
    pub fn one_or_more(&mut self) {
        let initial_state = self.new_state();
        let final_state = self.new_state();
        self.add_epsilon_transition(initial_state, self.initial_state);
        self.add_epsilon_transition(self.final_state, self.initial_state);
        self.add_epsilon_transition(self.final_state, final_state);
        self.initial_state = initial_state;
        self.final_state = final_state;
    }

    /// Optional.
    pub fn zero_or_one(&mut self) {
        let initial_state = self.new_state();
        let final_state = self.new_state();
        self.add_epsilon_transition(initial_state, self.initial_state);
        self.add_epsilon_transition(initial_state, final_state);
        self.add_epsilon_transition(self.final_state, final_state);
        self.initial_state = initial_state;
        self.final_state = final_state;
    }

    /// Calculate the epsilon closure of the given states.
    /// The result is sorted and free of duplicates, so it can serve as the key of a state set.
    pub(crate) fn epsilon_closure(&self, states: impl IntoIterator<Item = StateID>) -> Vec<StateID> {
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<StateID> = states.into_iter().collect();
        while let Some(state) = stack.pop() {
            if visited[state] {
                continue;
            }
            visited[state] = true;
            stack.extend(
                self.states[state]
                    .epsilon_transitions
                    .iter()
                    .filter(|target| !visited[**target]),
            );
        }
        visited
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(StateID::new(i)))
            .collect()
    }

    /// Calculate the set of states that can be reached from the given states by consuming the
    /// given byte.
    pub(crate) fn move_set(&self, states: &[StateID], byte: u8) -> Vec<StateID> {
        states
            .iter()
            .flat_map(|state| self.states[*state].transitions.iter())
            .filter(|transition| transition.byte == byte)
            .map(|transition| transition.target_state)
            .unique()
            .collect()
    }

    /// All states reachable from the initial state, the initial state included.
    pub(crate) fn reachable_states(&self) -> BTreeSet<StateID> {
        let mut reachable = BTreeSet::new();
        let mut stack = vec![self.initial_state];
        while let Some(state) = stack.pop() {
            if !reachable.insert(state) {
                continue;
            }
            stack.extend(self.states[state].successors());
        }
        reachable
    }

    /// All states from which the final state can be reached, the final state included.
    pub(crate) fn productive_states(&self) -> BTreeSet<StateID> {
        let mut productive = BTreeSet::from([self.final_state]);
        loop {
            let before = productive.len();
            for state in self.states.iter() {
                if state.successors().any(|target| productive.contains(&target)) {
                    productive.insert(state.id);
                }
            }
            if productive.len() == before {
                return productive;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NfaState {
    id: StateID,
    transitions: Vec<NfaTransition>,
    epsilon_transitions: Vec<StateID>,
    rules: Vec<usize>,
}

impl NfaState {
    pub(crate) fn new(id: StateID) -> Self {
        Self {
            id,
            transitions: Vec::new(),
            epsilon_transitions: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> StateID {
        self.id
    }

    pub(crate) fn transitions(&self) -> &[NfaTransition] {
        &self.transitions
    }

    pub(crate) fn epsilon_transitions(&self) -> &[StateID] {
        &self.epsilon_transitions
    }

    pub(crate) fn rules(&self) -> &[usize] {
        &self.rules
    }

    /// Targets of all transitions, epsilon transitions included.
    fn successors(&self) -> impl Iterator<Item = StateID> + '_ {
        self.transitions
            .iter()
            .map(|transition| transition.target_state)
            .chain(self.epsilon_transitions.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NfaTransition {
    byte: u8,
    target_state: StateID,
}

impl NfaTransition {
    pub(crate) fn byte(&self) -> u8 {
        self.byte
    }

    pub(crate) fn target_state(&self) -> StateID {
        self.target_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> ByteClass {
        (b'0'..=b'9').collect()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(Nfa::empty().state_count(), 1);
        assert_eq!(Nfa::from_byte(b'a').state_count(), 2);
        let class = Nfa::from_byte_class(&digits());
        assert_eq!(class.state_count(), 2);
        assert_eq!(class.states()[0].transitions().len(), 10);
        let literal = Nfa::from_literal(b"abc");
        assert_eq!(literal.state_count(), 4);
        assert_eq!(literal.initial_state().as_usize(), 0);
        assert_eq!(literal.final_state().as_usize(), 3);
    }

    #[test]
    fn test_size_additivity() {
        let mut concat = Nfa::from_literal(b"ab");
        concat.concat(Nfa::from_literal(b"cde"));
        assert_eq!(concat.state_count(), 3 + 4 - 1);
        assert_eq!(concat.final_state().as_usize(), 5);

        let mut union = Nfa::from_literal(b"ab");
        union.union(Nfa::from_literal(b"cde"));
        assert_eq!(union.state_count(), 3 + 4 + 2);

        let mut star = Nfa::from_literal(b"ab");
        star.zero_or_more();
        assert_eq!(star.state_count(), 3 + 2);

        let mut plus = Nfa::from_literal(b"ab");
        plus.one_or_more();
        assert_eq!(plus.state_count(), 3 + 2);

        let mut optional = Nfa::from_literal(b"ab");
        optional.zero_or_one();
        assert_eq!(optional.state_count(), 3 + 2);
    }

    #[test]
    fn test_concat_keeps_operand_transitions() {
        // (a|b) followed by c: the merged state has the incoming edges of the union's final
        // state and the outgoing edge of c.
        let mut nfa = Nfa::from_byte(b'a');
        nfa.union(Nfa::from_byte(b'b'));
        let joint = nfa.final_state();
        nfa.concat(Nfa::from_byte(b'c'));
        assert_eq!(nfa.state_count(), 6 + 2 - 1);
        assert_eq!(nfa.states()[joint].transitions().len(), 1);
        assert_eq!(nfa.states()[joint].transitions()[0].byte(), b'c');
        assert_eq!(
            nfa.states()[joint].transitions()[0].target_state(),
            nfa.final_state()
        );
    }

    #[test]
    fn test_associate_rule() {
        let mut nfa = Nfa::from_literal(b"if");
        nfa.associate_rule(4);
        assert_eq!(nfa.states()[nfa.final_state()].rules(), &[4]);
        assert!(nfa.states()[nfa.initial_state()].rules().is_empty());
    }

    #[test]
    fn test_epsilon_closure_idempotent() {
        let mut nfa = Nfa::from_byte(b'a');
        nfa.union(Nfa::from_byte(b'b'));
        nfa.zero_or_more();
        let closure = nfa.epsilon_closure([nfa.initial_state()]);
        // new initial, union initial, both operand initials, union final, star final
        assert!(closure.contains(&nfa.initial_state()));
        assert!(closure.contains(&nfa.final_state()));
        assert!(closure.windows(2).all(|w| w[0] < w[1]));
        let again = nfa.epsilon_closure(closure.iter().copied());
        assert_eq!(closure, again);
    }

    #[test]
    fn test_move_set() {
        let mut nfa = Nfa::from_byte(b'a');
        nfa.union(Nfa::from_byte(b'a'));
        let closure = nfa.epsilon_closure([nfa.initial_state()]);
        assert_eq!(nfa.move_set(&closure, b'a').len(), 2);
        assert!(nfa.move_set(&closure, b'b').is_empty());
    }

    #[test]
    fn test_reachable_and_productive() {
        let mut nfa = Nfa::from_literal(b"ab");
        // A state that is neither reachable nor productive.
        let orphan = nfa.new_state();
        assert_eq!(nfa.reachable_states().len(), 3);
        assert!(!nfa.reachable_states().contains(&orphan));
        assert_eq!(nfa.productive_states().len(), 3);
        assert!(!nfa.productive_states().contains(&orphan));
    }

    #[test]
    fn test_nfa_offset_states() {
        let mut nfa = Nfa::from_byte(b'a');
        let (initial_state, final_state) = nfa.shift_ids(10);
        assert_eq!(initial_state.as_usize(), 10);
        assert_eq!(final_state.as_usize(), 11);
        assert_eq!(nfa.states()[0].transitions()[0].target_state().as_usize(), 11);
    }
}
