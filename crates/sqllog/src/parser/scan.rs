//! Scan — a copyable cursor over an immutable input line.
//!
//! Parsers take a [`Cursor`] by value and hand back the advanced cursor on
//! success. A failed parse simply drops its copy, so the caller's cursor is
//! never disturbed and speculative parses need no explicit rewind.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Cursor positioned at byte offset `pos`, clamped to the input length
    /// and moved back to the nearest character boundary.
    pub fn at(input: &'a str, pos: usize) -> Self {
        let mut pos = pos.min(input.len());
        while !input.is_char_boundary(pos) {
            pos -= 1;
        }
        Self { input, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Character starting `offset` bytes past the cursor. `None` past the end
    /// of input or when the offset does not land on a character boundary.
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.input
            .get(self.pos.checked_add(offset)?..)
            .and_then(|s| s.chars().next())
    }

    /// Advance by `n` bytes, never past the end of input.
    pub fn advance(self, n: usize) -> Self {
        Self::at(self.input, self.pos.saturating_add(n))
    }

    /// Skip a maximal run of whitespace (possibly reaching end of input).
    pub fn skip_whitespace(self) -> Self {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(char::is_whitespace);
        Self {
            input: self.input,
            pos: self.pos + (rest.len() - trimmed.len()),
        }
    }
}
