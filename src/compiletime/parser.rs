//! This module contains the parser for the regex syntax.
//! The parser is used to parse the regex syntax into a high-level intermediate representation.
//! We use the `regex_syntax` crate to parse the regex syntax, although we will only support a
//! subset of the regex syntax. The translation runs in byte mode, so every class is a set of
//! bytes and a non-ASCII literal matches its UTF-8 encoding.

use log::trace;
use std::time::Instant;

use regex_syntax::{
    ast::parse::Parser,
    hir::{translate::TranslatorBuilder, Hir},
};

use super::Result;

/// Parse the regex syntax into a high-level intermediate representation (HIR).
/// The function returns an error if the regex syntax is invalid.
/// # Arguments
/// * `input` - A string slice that holds the regex syntax.
/// # Returns
/// A `Hir` that represents the regex in byte mode.
/// # Errors
/// An error is returned if the regex syntax is invalid or can't be expressed over bytes.
pub fn parse_regex_syntax(input: &str) -> Result<Hir> {
    let now = Instant::now();
    let syntax_tree = Parser::new().parse(input)?;
    let hir = TranslatorBuilder::new()
        .unicode(false)
        .utf8(false)
        .build()
        .translate(input, &syntax_tree)?;
    let elapsed_time = now.elapsed();
    trace!("Parsing took {} milliseconds.", elapsed_time.as_millis());
    Ok(hir)
}

#[cfg(test)]
mod tests {
    use regex_syntax::hir::HirKind;

    use super::*;
    use crate::common::DfaTable;
    use crate::compiletime::{Dfa, Nfa, ParScanErrorKind};

    #[test]
    fn test_parse_regex_syntax_valid() {
        let hir = parse_regex_syntax(r"\d").unwrap();
        assert!(matches!(hir.kind(), HirKind::Class(_)));
        assert_eq!(hir.properties().maximum_len(), Some(1));
    }

    #[test]
    fn test_parse_regex_syntax_invalid() {
        let result = parse_regex_syntax(r"[a-z");
        assert!(matches!(
            result,
            Err(ref e) if matches!(*e.source, ParScanErrorKind::RegexSyntaxError(_))
        ));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unclosed character class"));
    }

    #[test]
    fn test_parse_regex_syntax_unicode_literal() {
        let hir = parse_regex_syntax("é+").unwrap();
        let nfa = Nfa::try_from(&hir).unwrap();
        let dfa = DfaTable::from(&Dfa::from(&nfa));
        assert!(dfa.accepts("é".as_bytes()));
        assert!(dfa.accepts("éé".as_bytes()));
        assert!(!dfa.accepts(&[0xC3]));
        assert_eq!(hir.properties().minimum_len(), Some(2));
    }

    #[test]
    fn test_parse_regex_syntax_empty() {
        let hir = parse_regex_syntax("").unwrap();
        assert!(matches!(hir.kind(), HirKind::Empty));
    }
}
