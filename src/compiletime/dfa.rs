//! This module contains the subset construction that converts an NFA into a DFA.
//! Sets of NFA states are identified by their sorted state list. Byte 0 is reserved for the
//! empty transition of the NFA and never consumed by a DFA.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Instant;

use log::trace;

use crate::common::{DfaTable, DfaTableState};

use super::{Nfa, StateID};

/// A deterministic finite automaton created by subset construction.
/// The initial state is always the state with id 0.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    /// The number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The number of accepting states.
    pub fn final_state_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_final).count()
    }

    pub(crate) fn states(&self) -> &[DfaState] {
        &self.states
    }
}

impl From<&Nfa> for Dfa {
    fn from(nfa: &Nfa) -> Self {
        let now = Instant::now();
        let new_state = |id: StateID, nfa_states: Vec<StateID>| {
            let rules = nfa_states
                .iter()
                .flat_map(|state| nfa.states()[*state].rules().iter().copied())
                .collect();
            DfaState {
                id,
                is_final: nfa_states.contains(&nfa.final_state()),
                nfa_states,
                transitions: BTreeMap::new(),
                rules,
            }
        };

        let initial_set = nfa.epsilon_closure([nfa.initial_state()]);
        let mut known: HashMap<Vec<StateID>, StateID> = HashMap::new();
        known.insert(initial_set.clone(), StateID::new(0));
        let mut states = vec![new_state(StateID::new(0), initial_set)];
        let mut work_list = VecDeque::from([StateID::new(0)]);

        while let Some(current) = work_list.pop_front() {
            for byte in 1..=u8::MAX {
                let moved = nfa.move_set(&states[current].nfa_states, byte);
                if moved.is_empty() {
                    continue;
                }
                let target_set = nfa.epsilon_closure(moved);
                let target = match known.get(&target_set) {
                    Some(target) => *target,
                    None => {
                        let target = StateID::new(states.len());
                        known.insert(target_set.clone(), target);
                        states.push(new_state(target, target_set));
                        work_list.push_back(target);
                        target
                    }
                };
                states[current].transitions.insert(byte, target);
            }
        }

        trace!(
            "Subset construction of {} NFA states took {} milliseconds and produced {} states.",
            nfa.state_count(),
            now.elapsed().as_millis(),
            states.len()
        );
        Dfa { states }
    }
}

impl From<&Dfa> for DfaTable {
    fn from(dfa: &Dfa) -> Self {
        DfaTable::new(
            dfa.states
                .iter()
                .map(|state| {
                    let mut table_state = DfaTableState::new(state.is_final, state.rules.clone());
                    for (byte, target) in state.transitions.iter() {
                        table_state.set_transition(*byte, target.as_usize());
                    }
                    table_state
                })
                .collect(),
        )
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for state in self.states.iter() {
            write!(f, "{}", state.id)?;
            if state.is_final {
                write!(f, " (final {:?})", state.rules)?;
            }
            writeln!(f, ":")?;
            for (byte, target) in state.transitions.iter() {
                writeln!(
                    f,
                    "  {} -> {}",
                    std::ascii::escape_default(*byte),
                    target
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DfaState {
    id: StateID,
    // The sorted epsilon closure this state was created from
    nfa_states: Vec<StateID>,
    transitions: BTreeMap<u8, StateID>,
    is_final: bool,
    rules: Vec<usize>,
}

impl DfaState {
    pub(crate) fn id(&self) -> StateID {
        self.id
    }

    pub(crate) fn transitions(&self) -> &BTreeMap<u8, StateID> {
        &self.transitions
    }

    pub(crate) fn is_final(&self) -> bool {
        self.is_final
    }

    pub(crate) fn rules(&self) -> &[usize] {
        &self.rules
    }
}
