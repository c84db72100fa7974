use thiserror::Error;

/// The result type for the automata generation.
pub type Result<T> = std::result::Result<T, ParScanError>;

/// A macro that constructs a new ParScanError::UnsupportedFeature variant.
macro_rules! unsupported {
    ($feature:expr) => {
        $crate::compiletime::ParScanError::new(
            $crate::compiletime::ParScanErrorKind::UnsupportedFeature($feature.to_string()),
        )
    };
}
pub(crate) use unsupported;

/// The error type for the automata generation.
#[derive(Error, Debug)]
pub struct ParScanError {
    /// The source of the error.
    pub source: Box<ParScanErrorKind>,
}

impl ParScanError {
    /// Create a new `ParScanError`.
    pub fn new(kind: ParScanErrorKind) -> Self {
        ParScanError {
            source: Box::new(kind),
        }
    }

    /// Wrap the error into a `RegexParseError` that names the offending pattern.
    pub(crate) fn in_pattern(self, origin: PatternOrigin, pattern: &str) -> Self {
        ParScanError::new(ParScanErrorKind::RegexParseError {
            origin,
            pattern: pattern.to_string(),
            reason: self.to_string(),
        })
    }
}

impl std::fmt::Display for ParScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The place a regular expression came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOrigin {
    /// The lex rule with the given number.
    Rule(usize),
    /// The cut point expression.
    CutPoints,
}

impl std::fmt::Display for PatternOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternOrigin::Rule(rule) => write!(f, "rule #{}", rule),
            PatternOrigin::CutPoints => write!(f, "the cut points"),
        }
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum ParScanErrorKind {
    /// An error occurred during the parsing of the regex syntax.
    #[error(transparent)]
    RegexSyntaxError(#[from] regex_syntax::ast::Error),

    /// An error occurred during the translation of the parsed regex.
    #[error(transparent)]
    RegexTranslationError(#[from] regex_syntax::hir::Error),

    /// Used regex features that are not supported.
    #[error("Unsupported regex feature: {0}")]
    UnsupportedFeature(String),

    /// The regular expression of a lex rule or of the cut points could not be processed.
    #[error("Could not parse the regular expression of {origin} '{pattern}': {reason}")]
    RegexParseError {
        /// Where the pattern came from.
        origin: PatternOrigin,
        /// The offending pattern.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// The lexer does not contain any rule.
    #[error("The lexer does not contain any rule")]
    NoRulesError,

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<regex_syntax::ast::Error> for ParScanError {
    fn from(error: regex_syntax::ast::Error) -> Self {
        ParScanError::new(ParScanErrorKind::RegexSyntaxError(error))
    }
}

impl From<regex_syntax::hir::Error> for ParScanError {
    fn from(error: regex_syntax::hir::Error) -> Self {
        ParScanError::new(ParScanErrorKind::RegexTranslationError(error))
    }
}

impl From<std::io::Error> for ParScanError {
    fn from(error: std::io::Error) -> Self {
        ParScanError::new(ParScanErrorKind::IoError(error))
    }
}
