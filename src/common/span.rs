/// A half-open range of byte offsets into the lexer input.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start offset of the span, inclusive.
    pub start: usize,
    /// The end offset of the span, exclusive.
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Check if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Get the length of the span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Get the bytes covered by the span.
    #[inline]
    pub fn slice<'h>(&self, input: &'h [u8]) -> &'h [u8] {
        &input[self.start..self.end]
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn test_span() {
        let input = b"12 + 34";
        let span = Span::new(5, 7);
        assert_eq!(span.slice(input), b"34");
        assert_eq!(span.len(), 2);
        assert_eq!(span.to_string(), "5..7");
        assert!(Span::new(7, 7).is_empty());
    }
}
