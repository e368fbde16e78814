//! Recursive descent parser for filter expressions.

use super::ast::{CompareOp, Filter, LogicalOp, Value};
use super::cursor::Cursor;
use super::error::{FilterError, FilterResult};

/// Comparison operators ordered by descending token length, so that `>=`,
/// `<=` and `!=` are matched before their single-character prefixes.
const OPERATORS: [(&str, CompareOp); 10] = [
    ("contains_any", CompareOp::ContainsAny),
    ("contains_all", CompareOp::ContainsAll),
    ("!in", CompareOp::NotIn),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    ("!=", CompareOp::Ne),
    ("in", CompareOp::In),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
];

/// Parser for filter expressions.
///
/// # Grammar
///
/// ```text
/// expression   ::= term ( ("and" | "or") term )*
/// term         ::= "(" expression ")"
///                | fieldName comparisonOp value
///                | value
/// fieldName    ::= [A-Za-z0-9_.]+
/// comparisonOp ::= "=" | "!=" | ">" | "<" | ">=" | "<=" | "in" | "!in"
///                | "contains_any" | "contains_all"
/// value        ::= quotedString | regexLiteral | arrayLiteral | number
///                | "true" | "false" | "null"
/// ```
///
/// `and`/`or` are matched case-insensitively at the current cursor position,
/// with no word-boundary requirement.
///
/// # Non-standard precedence
///
/// Within one expression, each `and`/`or` keyword overwrites a single pending
/// operator, and the final logical node applies the *last* operator seen to
/// *all* collected terms. `a=1 and b=2 or c=3` therefore parses as one OR node
/// over three terms, not as the conventional `a=1 and (b=2 or c=3)` or
/// `(a=1 and b=2) or c=3`. Callers needing conventional grouping must
/// parenthesize. This flattening is long-standing observable behavior and is
/// preserved in both parse modes.
///
/// # Parse modes
///
/// [`FilterParser::parse`] is lenient: it never fails. On malformed input it
/// stops consuming and returns whatever tree has been built so far, which may
/// be an empty conjunction. [`FilterParser::parse_strict`] accepts exactly the
/// same language and builds the same trees, but returns the first diagnostic
/// instead of truncating.
///
/// # Example
///
/// ```
/// use recfilter_rs::filter::{CompareOp, Filter, FilterParser, Value};
///
/// let filter = FilterParser::parse(r#"status = "open""#);
/// assert_eq!(
///     filter,
///     Filter::comparison("status", CompareOp::Eq, Value::Str("open".into())),
/// );
/// ```
pub struct FilterParser<'a> {
    cursor: Cursor<'a>,
    diagnostic: Option<FilterError>,
}

impl<'a> FilterParser<'a> {
    /// Parses a filter expression leniently.
    ///
    /// Never fails: malformed syntax truncates the parse at the first
    /// unrecoverable point and yields the tree built so far. An expression
    /// with no parseable terms yields an empty conjunction, which evaluates
    /// to true.
    pub fn parse(input: &str) -> Filter {
        let mut parser = FilterParser::new(input);
        parser.parse_expression()
    }

    /// Parses a filter expression, surfacing the first syntax problem.
    ///
    /// Accepts the same language as [`FilterParser::parse`] and produces
    /// structurally identical trees on success.
    ///
    /// # Errors
    ///
    /// Returns the first diagnostic recorded while parsing, or
    /// [`FilterError::TrailingInput`] if the expression ended before the
    /// input did. Every diagnostic carries the byte position it refers to.
    pub fn parse_strict(input: &str) -> FilterResult<Filter> {
        let mut parser = FilterParser::new(input);
        let filter = parser.parse_expression();

        if let Some(err) = parser.diagnostic.take() {
            return Err(err);
        }

        parser.cursor.skip_whitespace();
        if !parser.cursor.is_at_end() {
            return Err(FilterError::TrailingInput {
                position: parser.cursor.pos(),
            });
        }

        Ok(filter)
    }

    fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            diagnostic: None,
        }
    }

    /// Records a diagnostic for strict mode; the first one wins.
    fn report(&mut self, err: FilterError) {
        if self.diagnostic.is_none() {
            self.diagnostic = Some(err);
        }
    }

    /// Parses `term ( ("and" | "or") term )*`.
    ///
    /// Each logical keyword overwrites the single pending operator; the last
    /// one seen applies to all collected terms (see the type-level docs).
    fn parse_expression(&mut self) -> Filter {
        let mut terms = Vec::new();
        let mut operator = None;

        loop {
            self.cursor.skip_whitespace();
            let Some(c) = self.cursor.peek() else { break };

            if c == ')' {
                break;
            }

            if c == '(' {
                let open_pos = self.cursor.pos();
                self.cursor.bump();
                let sub = self.parse_expression();
                if self.cursor.peek() == Some(')') {
                    self.cursor.bump();
                } else {
                    // A missing closing parenthesis is tolerated; parsing
                    // simply continues after the sub-expression.
                    self.report(FilterError::UnclosedParenthesis { position: open_pos });
                }
                terms.push(sub);
            } else if self.cursor.eat_keyword_ci("and") {
                operator = Some(LogicalOp::And);
            } else if self.cursor.eat_keyword_ci("or") {
                operator = Some(LogicalOp::Or);
            } else {
                match self.parse_term() {
                    Some(term) => terms.push(term),
                    None => break,
                }
            }
        }

        // Single-term expressions stay as the bare term, not a unary node.
        if terms.len() == 1 {
            return terms.remove(0);
        }

        Filter::Logical {
            op: operator.unwrap_or(LogicalOp::And),
            terms,
        }
    }

    /// Parses one term: a comparison when an identifier is followed by an
    /// operator, otherwise a field-less value.
    fn parse_term(&mut self) -> Option<Filter> {
        self.cursor.skip_whitespace();
        let term_start = self.cursor.pos();

        if let Some(field) = self.cursor.read_identifier() {
            self.cursor.skip_whitespace();
            let op_pos = self.cursor.pos();

            if let Some(op) = self.parse_operator() {
                self.cursor.skip_whitespace();
                let value_pos = self.cursor.pos();
                return match self.parse_value() {
                    Some(value) => Some(Filter::Comparison { field, op, value }),
                    None => {
                        self.report(FilterError::ExpectedValue {
                            position: value_pos,
                        });
                        None
                    }
                };
            }

            // An identifier with no comparison operator only survives if it
            // re-reads as a bare value literal (numbers, true/false/null).
            // Unquoted free-text words are not valid terms.
            self.cursor.set_pos(term_start);
            if let Some(value) = self.parse_value() {
                return Some(Filter::Text { value });
            }
            self.report(FilterError::ExpectedOperator { position: op_pos });
            return None;
        }

        let value_pos = self.cursor.pos();
        match self.parse_value() {
            Some(value) => Some(Filter::Text { value }),
            None => {
                self.report(FilterError::ExpectedValue {
                    position: value_pos,
                });
                None
            }
        }
    }

    /// Matches a comparison operator at the cursor, longest token first.
    fn parse_operator(&mut self) -> Option<CompareOp> {
        for (token, op) in OPERATORS {
            if self.cursor.eat_str(token) {
                return Some(op);
            }
        }
        None
    }

    /// Parses a value literal at the cursor.
    fn parse_value(&mut self) -> Option<Value> {
        self.cursor.skip_whitespace();
        let c = self.cursor.peek()?;

        match c {
            '"' | '\'' => self.parse_quoted_string(c),
            '/' => self.parse_regex(),
            '[' => self.parse_array(),
            _ if c.is_ascii_digit() || c == '.' || c == '-' => self.parse_number(),
            _ => self.parse_constant(),
        }
    }

    /// Parses a string delimited by the given quote character.
    ///
    /// No escape-sequence processing: every character up to the closing quote
    /// is literal. An unterminated quote consumes to end of input and yields
    /// no value.
    fn parse_quoted_string(&mut self, quote: char) -> Option<Value> {
        let open_pos = self.cursor.pos();
        self.cursor.bump();

        let mut text = String::new();
        while let Some(c) = self.cursor.bump() {
            if c == quote {
                return Some(Value::Str(text));
            }
            text.push(c);
        }

        self.report(FilterError::UnterminatedString { position: open_pos });
        None
    }

    /// Parses `/pattern/flags`, consuming lowercase letters as flags.
    fn parse_regex(&mut self) -> Option<Value> {
        let open_pos = self.cursor.pos();
        self.cursor.bump();

        let mut pattern = String::new();
        while let Some(c) = self.cursor.bump() {
            if c == '/' {
                let flags = self.cursor.read_lowercase_run();
                return Some(Value::Regex { pattern, flags });
            }
            pattern.push(c);
        }

        self.report(FilterError::UnterminatedRegex { position: open_pos });
        None
    }

    /// Parses `[` comma-separated values `]`; nested arrays are permitted.
    fn parse_array(&mut self) -> Option<Value> {
        let open_pos = self.cursor.pos();
        self.cursor.bump();

        let mut values = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(']') => {
                    self.cursor.bump();
                    return Some(Value::Array(values));
                }
                Some(',') => {
                    self.cursor.bump();
                }
                Some(_) => {
                    let value_pos = self.cursor.pos();
                    match self.parse_value() {
                        Some(value) => values.push(value),
                        None => {
                            self.report(FilterError::ExpectedValue {
                                position: value_pos,
                            });
                            return None;
                        }
                    }
                }
                None => {
                    self.report(FilterError::UnclosedArray { position: open_pos });
                    return None;
                }
            }
        }
    }

    /// Parses a numeric character run.
    ///
    /// The run is accepted only if it is all digits, or has exactly one `.`
    /// and is otherwise all digits. A malformed run (a stray `-`, multiple
    /// dots) is consumed but produces no number; the constants are then tried
    /// at the position after the run.
    fn parse_number(&mut self) -> Option<Value> {
        let start = self.cursor.pos();
        let run = self.cursor.read_number_run();

        if is_valid_number(&run) {
            if let Ok(number) = run.parse::<f64>() {
                return Some(Value::Number(number));
            }
        }

        self.report(FilterError::MalformedNumber {
            position: start,
            literal: run,
        });
        self.parse_constant()
    }

    /// Matches `true`, `false` or `null` exactly at the cursor.
    fn parse_constant(&mut self) -> Option<Value> {
        for (word, value) in [
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
        ] {
            if self.cursor.eat_str(word) {
                return Some(value);
            }
        }
        None
    }
}

/// A number run is valid when it contains at least one digit, at most one
/// `.`, and nothing else. Note that `-` never forms a valid number; a leading
/// minus is consumed into the run and rejects it.
fn is_valid_number(run: &str) -> bool {
    let digits = run.chars().filter(char::is_ascii_digit).count();
    let dots = run.matches('.').count();
    digits > 0 && dots <= 1 && digits + dots == run.len()
}
