//! Low-level scanning over a filter expression string.
//!
//! The grammar matches keywords and operators at the raw character cursor,
//! without token boundaries, so there is no separate tokenization pass. A
//! [`Cursor`] is constructed per parse call and never outlives it, which keeps
//! concurrent parses fully independent.

/// Call-local scanning state: the source text and a byte position into it.
pub struct Cursor<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current byte position (for error reporting and rewinds).
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to a previously recorded position.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns true if the whole input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the unconsumed remainder of the input.
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Peeks at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character, updating the position.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Consumes `prefix` if the input continues with it exactly.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consumes `keyword` if the input continues with it, ignoring ASCII case.
    ///
    /// There is no word-boundary check: `android` starts with the keyword
    /// `and`. The surface grammar depends on this.
    pub fn eat_keyword_ci(&mut self, keyword: &str) -> bool {
        let rest = self.rest().as_bytes();
        let keyword = keyword.as_bytes();
        if rest.len() >= keyword.len() && rest[..keyword.len()].eq_ignore_ascii_case(keyword) {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    /// Reads an identifier: one or more of `[A-Za-z0-9_.]`.
    ///
    /// The `.` is accepted as part of the raw capture; field paths are split
    /// on it at lookup time.
    pub fn read_identifier(&mut self) -> Option<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            None
        } else {
            Some(ident)
        }
    }

    /// Reads a run of numeric characters: `[0-9.-]`.
    ///
    /// The run is consumed unconditionally; the caller decides whether it
    /// forms a valid number.
    pub fn read_number_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                run.push(c);
                self.bump();
            } else {
                break;
            }
        }
        run
    }

    /// Reads a run of lowercase ASCII letters (regex flags).
    pub fn read_lowercase_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_lowercase() {
                run.push(c);
                self.bump();
            } else {
                break;
            }
        }
        run
    }
}
