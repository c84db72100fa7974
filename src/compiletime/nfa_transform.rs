//! Rewrites of rule NFAs that let the parallel lexer recognize the pieces of a token that is
//! split between the chunks of two workers.
//!
//! * A prefix NFA accepts every non-empty prefix of the tokens of the rule.
//! * A suffix NFA accepts every non-empty suffix.
//! * A prefix-and-suffix NFA accepts every non-empty contiguous substring.

use std::collections::BTreeSet;

use log::{error, trace};

use super::{Nfa, StateID};

impl Nfa {
    /// Rewrite the NFA so that it accepts every non-empty prefix of its language.
    ///
    /// Every state that is entered by consuming a byte and from which the old final state is
    /// still reachable gets an epsilon transition to a fresh final state. The fresh final
    /// state inherits the rules of the old one.
    pub fn to_prefix(&mut self) {
        let old_final = self.final_state();
        let rules = self.states()[old_final].rules().to_vec();
        if rules.is_empty() {
            error!(
                "The final state {} of the NFA carries no rule when building its prefix automaton",
                old_final
            );
        }

        let productive = self.productive_states();
        let linked: BTreeSet<StateID> = self
            .reachable_states()
            .iter()
            .flat_map(|state| self.states()[*state].transitions().iter())
            .map(|transition| transition.target_state())
            .filter(|target| productive.contains(target))
            .collect();

        let final_state = self.new_state();
        for state in linked.iter() {
            self.add_epsilon_transition(*state, final_state);
        }
        self.add_rules(final_state, &rules);
        self.set_final_state(final_state);
        trace!(
            "Prefix NFA: {} states linked to the new final state {}",
            linked.len(),
            final_state
        );
    }

    /// Rewrite the NFA so that it accepts every non-empty suffix of its language.
    ///
    /// A fresh initial state gets an epsilon transition to every reachable state that can not
    /// reach the final state by epsilon transitions alone. Starting in one of the other
    /// states would accept the empty string, so their byte transitions are copied onto the
    /// fresh initial state instead.
    pub fn to_suffix(&mut self) {
        let old_initial = self.initial_state();
        let reachable = self.reachable_states();
        let finals = self.epsilon_finals();

        let initial_state = self.new_state();
        let mut linked = 0;
        for state in reachable.iter() {
            if finals.contains(state) {
                let transitions = self.states()[*state].transitions().to_vec();
                for transition in transitions {
                    self.add_transition(
                        initial_state,
                        transition.byte(),
                        transition.target_state(),
                    );
                    linked += 1;
                }
            } else {
                self.add_epsilon_transition(initial_state, *state);
                linked += 1;
            }
        }
        if linked == 0 {
            self.add_epsilon_transition(initial_state, old_initial);
        }
        let rules = self.states()[old_initial].rules().to_vec();
        self.add_rules(initial_state, &rules);
        self.set_initial_state(initial_state);
        trace!(
            "Suffix NFA: {} links from the new initial state {}",
            linked,
            initial_state
        );
    }

    /// Rewrite the NFA so that it accepts every non-empty substring of its language.
    pub fn to_prefix_suffix(&mut self) {
        self.to_prefix();
        self.to_suffix();
    }

    /// The final state together with every state that reaches it by epsilon transitions only.
    fn epsilon_finals(&self) -> BTreeSet<StateID> {
        let mut finals = BTreeSet::from([self.final_state()]);
        loop {
            let before = finals.len();
            for state in self.states() {
                if state
                    .epsilon_transitions()
                    .iter()
                    .any(|target| finals.contains(target))
                {
                    finals.insert(state.id());
                }
            }
            if finals.len() == before {
                return finals;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::common::DfaTable;
    use crate::compiletime::{parse_regex_syntax, Dfa, Nfa};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn rule_nfa(pattern: &str) -> Nfa {
        let hir = parse_regex_syntax(pattern).unwrap();
        let mut nfa = Nfa::try_from(&hir).unwrap();
        nfa.associate_rule(0);
        nfa
    }

    fn table(nfa: &Nfa) -> DfaTable {
        DfaTable::from(&Dfa::from(nfa))
    }

    struct TestData {
        input: &'static str,
        prefix: bool,
        suffix: bool,
        substring: bool,
    }

    const TEST_DATA: &[TestData] = &[
        TestData {
            input: "abcdef",
            prefix: true,
            suffix: true,
            substring: true,
        },
        TestData {
            input: "abcde",
            prefix: true,
            suffix: false,
            substring: true,
        },
        TestData {
            input: "bcdef",
            prefix: false,
            suffix: true,
            substring: true,
        },
        TestData {
            input: "bcd",
            prefix: false,
            suffix: false,
            substring: true,
        },
        TestData {
            input: "c",
            prefix: false,
            suffix: false,
            substring: true,
        },
        TestData {
            input: "ce",
            prefix: false,
            suffix: false,
            substring: false,
        },
        TestData {
            input: "",
            prefix: false,
            suffix: false,
            substring: false,
        },
    ];

    #[test]
    fn test_prefix_suffix_round_trip() {
        init();
        let mut prefix = rule_nfa("abcdef");
        prefix.to_prefix();
        let mut suffix = rule_nfa("abcdef");
        suffix.to_suffix();
        let mut substring = rule_nfa("abcdef");
        substring.to_prefix_suffix();
        let (prefix, suffix, substring) = (table(&prefix), table(&suffix), table(&substring));

        for data in TEST_DATA {
            let input = data.input.as_bytes();
            assert_eq!(prefix.accepts(input), data.prefix, "prefix of '{}'", data.input);
            assert_eq!(suffix.accepts(input), data.suffix, "suffix of '{}'", data.input);
            assert_eq!(
                substring.accepts(input),
                data.substring,
                "substring of '{}'",
                data.input
            );
        }
    }

    #[test]
    fn test_prefix_of_repetition() {
        init();
        let mut nfa = rule_nfa(r"/\*[^*]*\*/");
        nfa.to_prefix();
        let dfa = table(&nfa);
        assert!(dfa.accepts(b"/"));
        assert!(dfa.accepts(b"/* cd"));
        assert!(dfa.accepts(b"/* cd */"));
        assert!(!dfa.accepts(b"*"));
        assert!(!dfa.accepts(b""));
    }

    #[test]
    fn test_suffix_of_repetition() {
        init();
        let mut nfa = rule_nfa(r"/\*[^*]*\*/");
        nfa.to_suffix();
        let dfa = table(&nfa);
        assert!(dfa.accepts(b"/"));
        assert!(dfa.accepts(b" gh */"));
        assert!(dfa.accepts(b"/* cd */"));
        assert!(!dfa.accepts(b"/*"));
        assert!(!dfa.accepts(b""));

        let mut substring = rule_nfa(r"/\*[^*]*\*/");
        substring.to_prefix_suffix();
        let dfa = table(&substring);
        assert!(dfa.accepts(b" cd ef "));
        assert!(dfa.accepts(b"*/"));
        assert!(!dfa.accepts(b"***"));
    }

    #[test]
    fn test_rules_are_kept() {
        init();
        let mut nfa = rule_nfa("[a-z]+");
        nfa.to_prefix_suffix();
        let dfa = table(&nfa);
        let (end, state) = dfa.longest_match(b"abc", 0).unwrap();
        assert_eq!(end, 3);
        assert_eq!(state.winning_rule(), Some(0));
    }

    #[test]
    fn test_prefix_without_rule_is_logged() {
        init();
        // Generation continues, the error is only logged.
        let mut nfa = Nfa::from_literal(b"ab");
        nfa.to_prefix();
        let dfa = table(&nfa);
        assert!(dfa.accepts(b"a"));
        assert!(dfa.states().iter().all(|state| state.rules().is_empty()));
    }
}
