use super::DfaTable;

/// The automata generated for a lex rule with unbounded match length.
///
/// Such a token may straddle the border between the chunks of two workers. Besides the plain
/// automaton the family holds automata that accept any non-empty prefix, any non-empty suffix
/// and any non-empty substring of the rule's tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfiniteDfaFamily {
    rule: usize,
    plain: DfaTable,
    prefix: DfaTable,
    suffix: DfaTable,
    prefix_suffix: DfaTable,
}

impl InfiniteDfaFamily {
    /// Create a new family for the given rule number.
    pub fn new(
        rule: usize,
        plain: DfaTable,
        prefix: DfaTable,
        suffix: DfaTable,
        prefix_suffix: DfaTable,
    ) -> Self {
        InfiniteDfaFamily {
            rule,
            plain,
            prefix,
            suffix,
            prefix_suffix,
        }
    }

    /// The rule number the family was generated for.
    pub fn rule(&self) -> usize {
        self.rule
    }

    /// The automaton of the complete tokens.
    pub fn plain(&self) -> &DfaTable {
        &self.plain
    }

    /// The automaton accepting non-empty prefixes of the tokens.
    pub fn prefix(&self) -> &DfaTable {
        &self.prefix
    }

    /// The automaton accepting non-empty suffixes of the tokens.
    pub fn suffix(&self) -> &DfaTable {
        &self.suffix
    }

    /// The automaton accepting non-empty substrings of the tokens.
    pub fn prefix_suffix(&self) -> &DfaTable {
        &self.prefix_suffix
    }
}

/// All automata of a generated lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerAutomata {
    /// The combined automaton of all rules with bounded match length.
    finite: Option<DfaTable>,
    /// One family per rule with unbounded match length, ordered by rule number.
    infinite: Vec<InfiniteDfaFamily>,
    /// The automaton recognizing safe cut points.
    cut_points: DfaTable,
    /// The length of the longest token the finite rules can match.
    longest_finite_token: usize,
    /// The number of lex rules.
    rule_count: usize,
}

impl LexerAutomata {
    /// Create a new bundle of lexer automata.
    pub fn new(
        finite: Option<DfaTable>,
        infinite: Vec<InfiniteDfaFamily>,
        cut_points: DfaTable,
        longest_finite_token: usize,
        rule_count: usize,
    ) -> Self {
        debug_assert!(infinite.windows(2).all(|w| w[0].rule() < w[1].rule()));
        LexerAutomata {
            finite,
            infinite,
            cut_points,
            longest_finite_token,
            rule_count,
        }
    }

    /// The combined automaton of the finite rules, if there are any.
    pub fn finite(&self) -> Option<&DfaTable> {
        self.finite.as_ref()
    }

    /// The automata families of the infinite rules.
    pub fn infinite(&self) -> &[InfiniteDfaFamily] {
        &self.infinite
    }

    /// The automata family of the given infinite rule.
    pub fn infinite_family(&self, rule: usize) -> Option<&InfiniteDfaFamily> {
        self.infinite
            .binary_search_by_key(&rule, InfiniteDfaFamily::rule)
            .ok()
            .map(|index| &self.infinite[index])
    }

    /// The cut point automaton.
    pub fn cut_points(&self) -> &DfaTable {
        &self.cut_points
    }

    /// The length of the longest finite token. The lookahead window of a parallel lexer must
    /// not be shorter.
    pub fn longest_finite_token(&self) -> usize {
        self.longest_finite_token
    }

    /// The number of lex rules.
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }
}
