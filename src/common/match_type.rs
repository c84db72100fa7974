use std::cmp::Ordering;

use super::Span;

/// A complete token candidate: the rule that matched and the bytes it covers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    rule: usize,
    span: Span,
}

impl Match {
    /// Create a new match.
    pub fn new(rule: usize, span: Span) -> Self {
        Self { rule, span }
    }

    /// The start offset of the match.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// The end offset of the match.
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// The bytes covered by the match.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The number of the rule that matched.
    pub fn rule(&self) -> usize {
        self.rule
    }

    /// Compare two candidates that start at the same offset by maximal munch.
    /// The longer match is greater. On equal length the lower rule number is greater.
    pub fn munch_cmp(&self, other: &Self) -> Ordering {
        self.span
            .len()
            .cmp(&other.span.len())
            .then_with(|| other.rule.cmp(&self.rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_munch_cmp() {
        let keyword = Match::new(0, Span::new(3, 5));
        let ident = Match::new(1, Span::new(3, 5));
        let longer = Match::new(1, Span::new(3, 7));
        assert_eq!(keyword.munch_cmp(&ident), Ordering::Greater);
        assert_eq!(longer.munch_cmp(&keyword), Ordering::Greater);
        assert_eq!(
            [ident, longer, keyword]
                .into_iter()
                .max_by(Match::munch_cmp)
                .map(|m| m.rule()),
            Some(1)
        );
    }
}
