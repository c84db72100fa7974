//! A set of bytes used as the label of NFA transitions.

use itertools::Itertools;
use regex_syntax::hir::Class;

use crate::common::ALPHABET_SIZE;

use super::{errors::unsupported, ParScanError};

/// A membership set over the 256 byte values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteClass([bool; ALPHABET_SIZE]);

impl ByteClass {
    /// Create an empty byte class.
    pub fn new() -> Self {
        ByteClass([false; ALPHABET_SIZE])
    }

    /// Add a byte to the class.
    pub fn insert(&mut self, byte: u8) {
        self.0[byte as usize] = true;
    }

    /// Add all bytes of the inclusive range to the class.
    pub fn insert_range(&mut self, start: u8, end: u8) {
        for byte in start..=end {
            self.insert(byte);
        }
    }

    /// Remove a byte from the class.
    pub fn remove(&mut self, byte: u8) {
        self.0[byte as usize] = false;
    }

    /// Returns true if the byte is a member of the class.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.0[byte as usize]
    }

    /// Returns true if the class has no members.
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|member| *member)
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|member| **member).count()
    }

    /// Iterate over the members in ascending order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|byte| self.contains(*byte))
    }

    /// The members as a sorted list of disjoint inclusive ranges.
    pub fn ranges(&self) -> Vec<(u8, u8)> {
        self.bytes()
            .map(|byte| (byte, byte))
            .coalesce(|(start, end), (next_start, next_end)| {
                if end as usize + 1 == next_start as usize {
                    Ok((start, next_end))
                } else {
                    Err(((start, end), (next_start, next_end)))
                }
            })
            .collect()
    }
}

impl Default for ByteClass {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u8> for ByteClass {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut class = ByteClass::new();
        for byte in iter {
            class.insert(byte);
        }
        class
    }
}

impl std::fmt::Display for ByteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let escaped = |byte: u8| std::ascii::escape_default(byte).to_string();
        let ranges = self.ranges();
        if let [(start, end)] = ranges.as_slice() {
            if start == end {
                return write!(f, "{}", escaped(*start));
            }
        }
        write!(f, "[")?;
        for (start, end) in ranges {
            if start == end {
                write!(f, "{}", escaped(start))?;
            } else {
                write!(f, "{}-{}", escaped(start), escaped(end))?;
            }
        }
        write!(f, "]")
    }
}

impl std::fmt::Debug for ByteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteClass({})", self)
    }
}

impl TryFrom<&Class> for ByteClass {
    type Error = ParScanError;

    /// Convert a class of the regex HIR. Unicode classes are accepted as long as they stay
    /// within ASCII. The NUL byte is reserved and silently dropped.
    fn try_from(class: &Class) -> Result<Self, Self::Error> {
        let mut byte_class = ByteClass::new();
        match class {
            Class::Bytes(bytes) => {
                for range in bytes.iter() {
                    byte_class.insert_range(range.start(), range.end());
                }
            }
            Class::Unicode(unicode) => {
                for range in unicode.iter() {
                    if !range.end().is_ascii() {
                        return Err(unsupported!(format!(
                            "Non-ASCII class range {:?}-{:?}",
                            range.start(),
                            range.end()
                        )));
                    }
                    byte_class.insert_range(range.start() as u8, range.end() as u8);
                }
            }
        }
        byte_class.remove(0);
        Ok(byte_class)
    }
}
