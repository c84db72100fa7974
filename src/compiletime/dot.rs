//! The `dot` module contains the conversion of NFAs and DFAs to the graphviz dot format.
//! The functions in this module are used for testing and debugging purposes.

use std::collections::BTreeMap;
use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use super::{ByteClass, Dfa, Nfa};

fn rule_label(id: usize, rules: &[usize]) -> String {
    if rules.is_empty() {
        id.to_string()
    } else {
        format!("{}\\nrules {:?}", id, rules)
    }
}

/// Collect the byte transitions of a state into one class per target state.
fn classes_by_target(transitions: impl Iterator<Item = (u8, usize)>) -> BTreeMap<usize, String> {
    let mut targets: BTreeMap<usize, ByteClass> = BTreeMap::new();
    for (byte, target) in transitions {
        targets.entry(target).or_default().insert(byte);
    }
    targets
        .into_iter()
        .map(|(target, class)| (target, class.to_string().escape_default().to_string()))
        .collect()
}

/// Render the NFA to the graphviz dot format.
/// The initial state is drawn blue, the final state red.
pub fn render_nfa<W: Write>(nfa: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in nfa.states() {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&rule_label(state.id().as_usize(), state.rules()));
            if state.id() == nfa.initial_state() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if state.id() == nfa.final_state() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        let targets = classes_by_target(
            state
                .transitions()
                .iter()
                .map(|t| (t.byte(), t.target_state().as_usize())),
        );
        for (target_state, class) in targets {
            digraph
                .edge(source_id.clone(), &format!("node_{}", target_state))
                .attributes()
                .set_label(&class);
        }
        for target_state in state.epsilon_transitions() {
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", target_state.as_usize()),
                )
                .attributes()
                .set_label("ε");
        }
    }
}

/// Render a DFA to the graphviz dot format.
/// The initial state is drawn blue, accepting states red with their rule numbers.
pub fn render_dfa<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in dfa.states() {
        let mut source_node = digraph.node_auto();
        source_node.set_label(&state.id().as_usize().to_string());
        if state.id().as_usize() == 0 {
            source_node
                .set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
        if state.is_final() {
            source_node
                .set_color(dot_writer::Color::Red)
                .set_pen_width(3.0)
                .set_label(&rule_label(state.id().as_usize(), state.rules()));
        }
    }
    for state in dfa.states() {
        let source = format!("node_{}", state.id());
        let targets = classes_by_target(
            state
                .transitions()
                .iter()
                .map(|(byte, target)| (*byte, target.as_usize())),
        );
        for (target, class) in targets {
            digraph
                .edge(&source, &format!("node_{}", target))
                .attributes()
                .set_label(&class);
        }
    }
}
