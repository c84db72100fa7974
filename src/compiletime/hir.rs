//! This module contains a TryFrom implementation for converting the HIR to an NFA.

use regex_syntax::hir::{Hir, HirKind};

use super::{errors::unsupported, ByteClass, Nfa, ParScanError, Result};

impl TryFrom<&Hir> for Nfa {
    type Error = ParScanError;

    fn try_from(hir: &Hir) -> Result<Self> {
        match hir.kind() {
            HirKind::Empty => Ok(Nfa::empty()),
            HirKind::Literal(literal) => {
                if literal.0.contains(&0) {
                    return Err(unsupported!("The NUL byte is reserved and can't be matched"));
                }
                Ok(Nfa::from_literal(&literal.0))
            }
            HirKind::Class(class) => Ok(Nfa::from_byte_class(&ByteClass::try_from(class)?)),
            HirKind::Look(look) => Err(unsupported!(format!("Assertion {:?}", look))),
            HirKind::Repetition(repetition) => {
                if !repetition.greedy {
                    return Err(unsupported!("Non-greedy repetitions"));
                }
                let sub: Nfa = repetition.sub.as_ref().try_into()?;
                match (repetition.min, repetition.max) {
                    (0, Some(1)) => {
                        let mut nfa = sub;
                        nfa.zero_or_one();
                        Ok(nfa)
                    }
                    (0, None) => {
                        let mut nfa = sub;
                        nfa.zero_or_more();
                        Ok(nfa)
                    }
                    (1, None) => {
                        let mut nfa = sub;
                        nfa.one_or_more();
                        Ok(nfa)
                    }
                    (min, max) => {
                        // Counted repetitions are expanded into copies of the sub expression.
                        let mut nfa = Nfa::empty();
                        for _ in 0..min {
                            nfa.concat(sub.clone());
                        }
                        match max {
                            None => {
                                let mut many = sub;
                                many.zero_or_more();
                                nfa.concat(many);
                            }
                            Some(max) => {
                                let mut optional = sub;
                                optional.zero_or_one();
                                for _ in min..max {
                                    nfa.concat(optional.clone());
                                }
                            }
                        }
                        Ok(nfa)
                    }
                }
            }
            HirKind::Capture(capture) => capture.sub.as_ref().try_into(),
            HirKind::Concat(hirs) => {
                let mut nfa = Nfa::empty();
                for hir in hirs.iter() {
                    nfa.concat(hir.try_into()?);
                }
                Ok(nfa)
            }
            HirKind::Alternation(hirs) => {
                let mut alternatives = hirs.iter();
                let mut nfa: Nfa = match alternatives.next() {
                    Some(hir) => hir.try_into()?,
                    None => return Ok(Nfa::empty()),
                };
                for hir in alternatives {
                    nfa.union(hir.try_into()?);
                }
                Ok(nfa)
            }
        }
    }
}
