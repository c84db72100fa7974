//! The maximal-munch scanner that tokenizes one chunk of the input.
//!
//! At every token start all finite rules and the plain automata of all infinite rules compete
//! for the longest match. If the chunk is followed by another chunk, the prefix automata of the
//! infinite rules compete too, but only with matches that reach the end of the chunk. Such a
//! match is the head of a token that may continue in the next chunk.

use log::trace;

use crate::common::{DfaTable, LexerAutomata, Match, Span};

use super::{Action, LexError, LexMatch, Token};

/// The token a scanner found at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lexeme {
    /// A complete token.
    Whole(Match),
    /// The beginning of a token that reaches the end of the chunk.
    /// Holds every infinite rule whose prefix automaton matches up to there, in rule order.
    Head { rules: Vec<usize> },
}

/// How the token of one infinite rule that was left open by a preceding chunk continues in a
/// chunk. Both parts may be present at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Continuation {
    /// The end of the longest suffix fragment that starts at the chunk start.
    pub(crate) tail: Option<usize>,
    /// The whole chunk is an inner fragment and the token may go on in the next chunk.
    pub(crate) middle: bool,
}

/// A token of one or more infinite rules that starts in one chunk and is not yet complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenToken {
    /// The worker whose chunk holds the head of the token.
    pub(crate) owner: usize,
    /// The candidate rules in rule order.
    pub(crate) rules: Vec<usize>,
    pub(crate) start: usize,
}

impl OpenToken {
    /// The candidate with the highest priority.
    pub(crate) fn rule(&self) -> usize {
        self.rules.first().copied().unwrap_or_default()
    }
}

/// The result of scanning one chunk.
#[derive(Debug)]
pub(crate) struct ChunkScan<S> {
    /// The complete tokens in input order.
    pub(crate) tokens: Vec<Token<S>>,
    /// The head fragment at the end of the chunk, if any.
    pub(crate) open: Option<OpenToken>,
}

impl<S> ChunkScan<S> {
    pub(crate) fn empty() -> Self {
        ChunkScan {
            tokens: Vec::new(),
            open: None,
        }
    }
}

/// Convert the text of a match and hand it to the action.
/// Returns `None` if the action skips the text.
pub(crate) fn apply_action<S, F>(
    action: &F,
    input: &[u8],
    worker: usize,
    rule: usize,
    span: Span,
) -> Result<Option<Token<S>>, LexError>
where
    F: Fn(&LexMatch<'_>) -> Action<S>,
{
    let text = std::str::from_utf8(span.slice(input)).map_err(|_| LexError::InvalidUtf8 {
        worker,
        offset: span.start,
    })?;
    let lex_match = LexMatch {
        worker,
        rule,
        span,
        text,
    };
    match action(&lex_match) {
        Action::Skip => Ok(None),
        Action::Symbol(symbol) => Ok(Some(Token { symbol, rule, span })),
        Action::Error(message) => Err(LexError::ActionFailed {
            worker,
            rule,
            offset: span.start,
            message,
        }),
    }
}

/// Scans the chunk of one worker.
pub(crate) struct ChunkScanner<'a, F> {
    automata: &'a LexerAutomata,
    input: &'a [u8],
    action: &'a F,
    worker: usize,
    chunk: Span,
}

impl<'a, F> ChunkScanner<'a, F> {
    pub(crate) fn new(
        automata: &'a LexerAutomata,
        input: &'a [u8],
        action: &'a F,
        worker: usize,
        chunk: Span,
    ) -> Self {
        ChunkScanner {
            automata,
            input,
            action,
            worker,
            chunk,
        }
    }

    /// True if another non-empty part of the input follows the chunk.
    #[inline]
    pub(crate) fn has_successor(&self) -> bool {
        self.chunk.end < self.input.len()
    }

    /// The longest complete token that starts at `start` and ends at or before `limit`.
    /// On equal length the lower rule number wins.
    pub(crate) fn best_whole(&self, start: usize, limit: usize) -> Option<Match> {
        let window = &self.input[..limit];
        let finite = self.automata.finite().and_then(|dfa| {
            dfa.longest_match(window, start)
                .and_then(|(end, state)| state.winning_rule().map(|rule| (rule, end)))
        });
        let infinite = self.automata.infinite().iter().filter_map(|family| {
            family
                .plain()
                .longest_match(window, start)
                .map(|(end, _)| (family.rule(), end))
        });
        finite
            .into_iter()
            .chain(infinite)
            .map(|(rule, end)| Match::new(rule, Span::new(start, end)))
            .max_by(Match::munch_cmp)
    }

    /// Find the lexeme that starts at `start`.
    pub(crate) fn next_lexeme(&self, start: usize) -> Option<Lexeme> {
        if self.has_successor() {
            // A head wins against a complete token of the same length because the token
            // might continue in the next chunk.
            let window = &self.input[..self.chunk.end];
            let first = self.input[start];
            let rules: Vec<usize> = self
                .automata
                .infinite()
                .iter()
                .filter(|family| {
                    let prefix = family.prefix();
                    prefix.next_state(DfaTable::INITIAL_STATE, first).is_some()
                        && prefix
                            .longest_match(window, start)
                            .is_some_and(|(end, _)| end == self.chunk.end)
                })
                .map(|family| family.rule())
                .collect();
            if !rules.is_empty() {
                return Some(Lexeme::Head { rules });
            }
        }
        self.best_whole(start, self.chunk.end).map(Lexeme::Whole)
    }

    /// Tokenize the chunk from `from` to its end.
    pub(crate) fn scan<S>(&self, from: usize) -> Result<ChunkScan<S>, LexError>
    where
        F: Fn(&LexMatch<'_>) -> Action<S>,
    {
        let mut result = ChunkScan::empty();
        let mut pos = from;
        while pos < self.chunk.end {
            match self.next_lexeme(pos) {
                Some(Lexeme::Whole(matched)) => {
                    if let Some(token) = apply_action(
                        self.action,
                        self.input,
                        self.worker,
                        matched.rule(),
                        matched.span(),
                    )? {
                        result.tokens.push(token);
                    }
                    pos = matched.end();
                }
                Some(Lexeme::Head { rules }) => {
                    trace!(
                        "Worker {}: token of rules {:?} at {} continues in the next chunk",
                        self.worker,
                        rules,
                        pos
                    );
                    result.open = Some(OpenToken {
                        owner: self.worker,
                        rules,
                        start: pos,
                    });
                    pos = self.chunk.end;
                }
                None => {
                    return Err(LexError::ScanDeadEnd {
                        worker: self.worker,
                        offset: pos,
                    })
                }
            }
        }
        Ok(result)
    }

    /// Determine how an open token of the given rule continues at the start of the chunk.
    /// A tail only bounds the token from above. Whether the stitched text is a token of the rule
    /// is checked with the plain automaton once the token is complete.
    pub(crate) fn continue_token(&self, rule: usize) -> Continuation {
        let Some(family) = self.automata.infinite_family(rule) else {
            return Continuation::default();
        };
        let window = &self.input[..self.chunk.end];
        Continuation {
            tail: family
                .suffix()
                .longest_match(window, self.chunk.start)
                .map(|(end, _)| end),
            middle: self.has_successor()
                && family.prefix_suffix().accepts(self.chunk.slice(self.input)),
        }
    }
}

#[cfg(all(test, feature = "generate"))]
mod tests {
    use super::*;
    use crate::compiletime::build_lexer_automata;

    const RULES: &[&str] = &[
        /* 0 */ r"if",
        /* 1 */ r"[a-z]+",
        /* 2 */ r"[ ]+",
        /* 3 */ r"/\*[^*]*\*/",
    ];

    fn symbol(lex_match: &LexMatch<'_>) -> Action<String> {
        match lex_match.rule {
            2 => Action::Skip,
            _ => Action::Symbol(lex_match.text.to_string()),
        }
    }

    #[test]
    fn test_maximal_munch() {
        let automata = build_lexer_automata(RULES, "").unwrap();
        let input = b"iffy if";
        let scanner = ChunkScanner::new(&automata, input, &symbol, 0, Span::new(0, input.len()));
        let scan = scanner.scan(0).unwrap();
        let tokens: Vec<(usize, &str)> = scan
            .tokens
            .iter()
            .map(|t| (t.rule, t.symbol.as_str()))
            .collect();
        assert_eq!(tokens, vec![(1, "iffy"), (0, "if")]);
        assert!(scan.open.is_none());
    }

    #[test]
    fn test_head_at_chunk_end() {
        let automata = build_lexer_automata(RULES, "").unwrap();
        let input = b"ab /* cd ef gh */ ij";
        let scanner = ChunkScanner::new(&automata, input, &symbol, 0, Span::new(0, 11));
        let scan = scanner.scan(0).unwrap();
        assert_eq!(scan.tokens.len(), 1);
        assert_eq!(
            scan.open,
            Some(OpenToken {
                owner: 0,
                rules: vec![3],
                start: 3
            })
        );
    }

    #[test]
    fn test_head_keeps_all_candidates() {
        let automata = build_lexer_automata(&[r"[0-9]+", r"[0-9]+\.[0-9]+"], "").unwrap();
        let input = b"12.5";
        let scanner = ChunkScanner::new(&automata, input, &symbol, 0, Span::new(0, 2));
        let scan = scanner.scan::<String>(0).unwrap();
        assert!(scan.tokens.is_empty());
        let open = scan.open.unwrap();
        assert_eq!(open.rules, vec![0, 1]);
        assert_eq!(open.rule(), 0);
        // Without a following chunk the number is complete.
        let last = ChunkScanner::new(&automata, input, &symbol, 0, Span::new(0, 4));
        assert_eq!(
            last.next_lexeme(0),
            Some(Lexeme::Whole(Match::new(1, Span::new(0, 4))))
        );
    }

    #[test]
    fn test_continuation() {
        let automata = build_lexer_automata(RULES, "").unwrap();
        let input = b"ab /* cd ef gh */ ij";
        let middle = ChunkScanner::new(&automata, input, &symbol, 1, Span::new(5, 11));
        assert_eq!(
            middle.continue_token(3),
            Continuation {
                tail: None,
                middle: true
            }
        );
        let tail = ChunkScanner::new(&automata, input, &symbol, 2, Span::new(11, 20));
        assert_eq!(
            tail.continue_token(3),
            Continuation {
                tail: Some(17),
                middle: false
            }
        );
        let broken = ChunkScanner::new(&automata, input, &symbol, 3, Span::new(17, 20));
        assert_eq!(broken.continue_token(3), Continuation::default());
        // Rule 0 is finite and never left open.
        assert_eq!(tail.continue_token(0), Continuation::default());
    }

    #[test]
    fn test_tail_and_middle_in_one_chunk() {
        let automata = build_lexer_automata(&[r"[a-z]+", r"[ ]+", r"/\*[^\n]*\*/"], " ").unwrap();
        let input = b"/* a */ b */ c d */ e";
        let scanner = ChunkScanner::new(&automata, input, &symbol, 1, Span::new(7, 14));
        assert_eq!(
            scanner.continue_token(2),
            Continuation {
                tail: Some(12),
                middle: true
            }
        );
    }

    #[test]
    fn test_scan_dead_end() {
        let automata = build_lexer_automata(RULES, "").unwrap();
        let input = b"ab # cd";
        let scanner = ChunkScanner::new(&automata, input, &symbol, 2, Span::new(0, input.len()));
        assert_eq!(
            scanner.scan::<String>(0).unwrap_err(),
            LexError::ScanDeadEnd {
                worker: 2,
                offset: 3
            }
        );
    }

    #[test]
    fn test_apply_action() {
        let input = b"ab\xffcd";
        let error = |_: &LexMatch<'_>| Action::<()>::Error("no".to_string());
        assert_eq!(
            apply_action(&error, input, 1, 4, Span::new(0, 2)),
            Err(LexError::ActionFailed {
                worker: 1,
                rule: 4,
                offset: 0,
                message: "no".to_string()
            })
        );
        assert_eq!(
            apply_action(&error, input, 1, 4, Span::new(1, 3)),
            Err(LexError::InvalidUtf8 {
                worker: 1,
                offset: 1
            })
        );
    }
}
