//! This module builds all automata of a lexer from its rules and generates Rust code from them.

use std::time::Instant;

use log::trace;

use crate::common::{DfaTable, InfiniteDfaFamily, LexerAutomata};

use super::{
    parse_regex_syntax, Dfa, Nfa, ParScanError, ParScanErrorKind, PatternOrigin, Result,
};

/// Parse a pattern and convert it into an NFA.
/// Errors are wrapped into a `RegexParseError` naming the pattern and its origin.
fn pattern_to_nfa(pattern: &str, origin: PatternOrigin) -> Result<(Nfa, Option<usize>)> {
    let hir = parse_regex_syntax(pattern).map_err(|e| e.in_pattern(origin, pattern))?;
    let nfa = Nfa::try_from(&hir).map_err(|e| e.in_pattern(origin, pattern))?;
    Ok((nfa, hir.properties().maximum_len()))
}

fn table_of(nfa: &Nfa) -> DfaTable {
    DfaTable::from(&Dfa::from(nfa))
}

/// Build the plain, prefix, suffix and prefix-and-suffix automata of an infinite rule.
fn infinite_family(rule: usize, nfa: Nfa) -> InfiniteDfaFamily {
    let plain = table_of(&nfa);
    let mut prefix = nfa.clone();
    prefix.to_prefix();
    let mut suffix = nfa.clone();
    suffix.to_suffix();
    let mut prefix_suffix = nfa;
    prefix_suffix.to_prefix_suffix();
    InfiniteDfaFamily::new(
        rule,
        plain,
        table_of(&prefix),
        table_of(&suffix),
        table_of(&prefix_suffix),
    )
}

/// Build all automata a parallel lexer needs.
/// # Arguments
/// * `rules` - The regexes of the lex rules. The rule number is the position in the slice.
///   Rules declared first win if two rules match the same text.
/// * `cut_points` - The regex that identifies positions at which the input may be split.
///   An empty regex allows a split everywhere.
/// # Errors
/// An error is returned if no rule is given or if any regex can't be processed.
pub fn build_lexer_automata<S: AsRef<str>>(rules: &[S], cut_points: &str) -> Result<LexerAutomata> {
    let now = Instant::now();
    if rules.is_empty() {
        return Err(ParScanError::new(ParScanErrorKind::NoRulesError));
    }

    let mut finite: Option<Nfa> = None;
    let mut infinite = Vec::new();
    let mut longest_finite_token = 0;
    for (rule, pattern) in rules.iter().enumerate() {
        let (mut nfa, maximum_len) = pattern_to_nfa(pattern.as_ref(), PatternOrigin::Rule(rule))?;
        nfa.associate_rule(rule);
        match maximum_len {
            Some(len) => {
                trace!("Rule #{} is finite with a maximum length of {}", rule, len);
                longest_finite_token = longest_finite_token.max(len);
                finite = Some(match finite {
                    Some(mut union) => {
                        union.union(nfa);
                        union
                    }
                    None => nfa,
                });
            }
            None => {
                trace!("Rule #{} is infinite", rule);
                infinite.push(infinite_family(rule, nfa));
            }
        }
    }

    let (cut_point_nfa, _) = pattern_to_nfa(cut_points, PatternOrigin::CutPoints)?;

    let automata = LexerAutomata::new(
        finite.as_ref().map(table_of),
        infinite,
        table_of(&cut_point_nfa),
        longest_finite_token,
        rules.len(),
    );
    trace!(
        "Building the automata of {} rules took {} milliseconds.",
        rules.len(),
        now.elapsed().as_millis()
    );
    Ok(automata)
}

fn write_dfa_const(output: &mut dyn std::io::Write, name: &str, dfa: &DfaTable) -> Result<()> {
    writeln!(output, "const {}: DfaData = &[", name)?;
    for (index, state) in dfa.states().iter().enumerate() {
        let transitions = state
            .transitions()
            .map(|(byte, target)| format!("({}, {})", byte, target))
            .collect::<Vec<_>>()
            .join(", ");
        let rules = state
            .rules()
            .iter()
            .map(|rule| rule.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            output,
            "    /* {} */ (&[{}], {}, &[{}]),",
            index,
            transitions,
            state.is_final(),
            rules
        )?;
    }
    writeln!(output, "];")?;
    writeln!(output)?;
    Ok(())
}

/// Generate Rust code from the lexer automata.
/// The generated code defines the constant `LEXER_AUTOMATA` and a function
/// `create_lexer_automata` that turns the constant data back into a [`LexerAutomata`].
/// # Errors
/// An error is returned if writing to `output` fails.
pub fn generate_code(automata: &LexerAutomata, output: &mut dyn std::io::Write) -> Result<()> {
    let now = Instant::now();
    writeln!(
        output,
        r"// This file was generated by parscan.

use parscan::common::{{DfaData, InfiniteRuleData, LexerAutomata, LexerAutomataData}};
"
    )?;

    if let Some(finite) = automata.finite() {
        write_dfa_const(output, "FINITE", finite)?;
    }
    for family in automata.infinite() {
        let rule = family.rule();
        write_dfa_const(output, &format!("RULE_{}_PLAIN", rule), family.plain())?;
        write_dfa_const(output, &format!("RULE_{}_PREFIX", rule), family.prefix())?;
        write_dfa_const(output, &format!("RULE_{}_SUFFIX", rule), family.suffix())?;
        write_dfa_const(
            output,
            &format!("RULE_{}_PREFIX_SUFFIX", rule),
            family.prefix_suffix(),
        )?;
    }
    write_dfa_const(output, "CUT_POINTS", automata.cut_points())?;

    writeln!(output, "const INFINITE: &[InfiniteRuleData] = &[")?;
    for family in automata.infinite() {
        let rule = family.rule();
        writeln!(
            output,
            "    (\n        {r},\n        RULE_{r}_PLAIN,\n        RULE_{r}_PREFIX,\n        RULE_{r}_SUFFIX,\n        RULE_{r}_PREFIX_SUFFIX,\n    ),",
            r = rule
        )?;
    }
    writeln!(output, "];")?;
    writeln!(output)?;

    let finite = if automata.finite().is_some() {
        "Some(FINITE)"
    } else {
        "None"
    };
    writeln!(
        output,
        r"pub const LEXER_AUTOMATA: LexerAutomataData = (
    {},
    INFINITE,
    CUT_POINTS,
    {},
    {},
);

pub fn create_lexer_automata() -> LexerAutomata {{
    LexerAutomata::from(&LEXER_AUTOMATA)
}}",
        finite,
        automata.longest_finite_token(),
        automata.rule_count()
    )?;

    trace!(
        "Code generation took {} milliseconds.",
        now.elapsed().as_millis()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DfaData, InfiniteRuleData, LexerAutomataData};

    const ARITHMETIC: &[&str] = &[
        /* 0 */ r"\+",
        /* 1 */ r"-",
        /* 2 */ r"[0-9]+",
        /* 3 */ r"[ \t]+",
        /* 4 */ r"if",
        /* 5 */ r"[a-z]{1,8}",
    ];

    #[test]
    fn test_build_lexer_automata() {
        let automata = build_lexer_automata(ARITHMETIC, " ").unwrap();
        assert_eq!(automata.rule_count(), 6);
        assert_eq!(automata.longest_finite_token(), 8);
        let infinite_rules: Vec<usize> = automata.infinite().iter().map(|f| f.rule()).collect();
        assert_eq!(infinite_rules, vec![2, 3]);

        let finite = automata.finite().unwrap();
        let (end, state) = finite.longest_match(b"if", 0).unwrap();
        assert_eq!(end, 2);
        assert_eq!(state.winning_rule(), Some(4));
        let (end, state) = finite.longest_match(b"iffy", 0).unwrap();
        assert_eq!(end, 4);
        assert_eq!(state.winning_rule(), Some(5));
        assert!(finite.longest_match(b"12", 0).is_none());

        let numbers = automata.infinite_family(2).unwrap();
        assert!(numbers.plain().accepts(b"1234"));
        assert!(numbers.prefix().accepts(b"12"));
        assert!(numbers.suffix().accepts(b"34"));
        assert!(numbers.prefix_suffix().accepts(b"3"));
        assert!(!numbers.prefix_suffix().accepts(b""));

        assert!(automata.cut_points().accepts(b" "));
        assert!(!automata.cut_points().matches_empty());
    }

    #[test]
    fn test_empty_cut_points() {
        let automata = build_lexer_automata(&["a"], "").unwrap();
        assert!(automata.cut_points().matches_empty());
        assert!(automata.infinite().is_empty());
        assert_eq!(automata.longest_finite_token(), 1);
    }

    #[test]
    fn test_no_rules() {
        let rules: &[&str] = &[];
        let result = build_lexer_automata(rules, "");
        assert!(matches!(
            result,
            Err(ref e) if matches!(*e.source, ParScanErrorKind::NoRulesError)
        ));
    }

    #[test]
    fn test_regex_parse_error_names_the_rule() {
        let result = build_lexer_automata(&["a", "[b", "c"], "");
        match result {
            Err(e) => match *e.source {
                ParScanErrorKind::RegexParseError {
                    origin,
                    ref pattern,
                    ..
                } => {
                    assert_eq!(origin, PatternOrigin::Rule(1));
                    assert_eq!(pattern, "[b");
                }
                ref kind => panic!("unexpected error {:?}", kind),
            },
            Ok(_) => panic!("the malformed rule was accepted"),
        }

        let result = build_lexer_automata(&["a"], "(");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("the cut points '('"));
    }

    #[test]
    fn test_generate_code() {
        let automata = build_lexer_automata(&[r"\+", "[0-9]+"], " ").unwrap();
        let mut output = Vec::new();
        generate_code(&automata, &mut output).unwrap();
        let code = String::from_utf8(output).unwrap();
        assert!(code.contains("const FINITE: DfaData = &["));
        assert!(code.contains("const RULE_1_PREFIX_SUFFIX: DfaData = &["));
        assert!(code.contains("const CUT_POINTS: DfaData = &["));
        assert!(code.contains("/* 0 */ (&[(43, 1)], false, &[]),"));
        assert!(code.contains("Some(FINITE)"));
        assert!(code.contains("pub fn create_lexer_automata() -> LexerAutomata"));
    }

    // The data below mirrors what `generate_code` emits for the rules `\+` and `[0-9]`.
    const FINITE: DfaData = &[
        (&[(43, 1), (48, 2), (49, 2)], false, &[]),
        (&[], true, &[0]),
        (&[], true, &[1]),
    ];
    const CUT_POINTS: DfaData = &[(&[], true, &[])];
    const INFINITE: &[InfiniteRuleData] = &[];
    const LEXER_AUTOMATA: LexerAutomataData = (Some(FINITE), INFINITE, CUT_POINTS, 1, 2);

    #[test]
    fn test_compiled_data_round_trip() {
        let automata = LexerAutomata::from(&LEXER_AUTOMATA);
        let finite = automata.finite().unwrap();
        assert_eq!(finite.longest_match(b"+", 0).unwrap().1.winning_rule(), Some(0));
        assert_eq!(finite.longest_match(b"1", 0).unwrap().1.winning_rule(), Some(1));
        assert!(automata.cut_points().matches_empty());
        assert_eq!(automata.rule_count(), 2);
    }
}
