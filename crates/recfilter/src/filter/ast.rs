//! Abstract Syntax Tree (AST) for filter expressions.

/// Boolean connective applied by a [`Filter::Logical`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// True iff every term is true; vacuously true over an empty term list.
    And,
    /// True iff at least one term is true; vacuously false over an empty term list.
    Or,
}

/// Comparison operator in a `field <op> value` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=` - structural equality, or substring regex match when the value is a regex.
    Eq,
    /// `!=` - negation of `=`.
    Ne,
    /// `>` - ordering, number/number or string/string only.
    Gt,
    /// `<` - ordering, number/number or string/string only.
    Lt,
    /// `>=` - ordering, number/number or string/string only.
    Ge,
    /// `<=` - ordering, number/number or string/string only.
    Le,
    /// `in` - membership of the field value in an array literal.
    In,
    /// `!in` - negation of `in`.
    NotIn,
    /// `contains_any` - the field array and the array literal share an element.
    ContainsAny,
    /// `contains_all` - every element of the array literal is in the field array.
    ContainsAll,
}

impl CompareOp {
    /// Returns the surface-syntax spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::In => "in",
            CompareOp::NotIn => "!in",
            CompareOp::ContainsAny => "contains_any",
            CompareOp::ContainsAll => "contains_all",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A literal value appearing in a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A quoted string. Quotes may be single or double; no escape processing.
    Str(String),

    /// A numeric literal (IEEE double).
    Number(f64),

    /// `true` or `false`.
    Bool(bool),

    /// `null`.
    Null,

    /// A `/pattern/flags` literal. Every consumed lowercase flag letter is
    /// stored, but only `i` (ignore case) is honored during evaluation.
    Regex { pattern: String, flags: String },

    /// A `[...]` literal; elements may be any value, including nested arrays.
    Array(Vec<Value>),
}

impl Value {
    /// Returns a short name for the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Regex { .. } => "regex",
            Value::Array(_) => "array",
        }
    }
}

/// Represents a parsed filter expression.
///
/// The `Filter` enum is the AST produced by
/// [`FilterParser`](super::FilterParser) and consumed by
/// [`FilterEvaluator`](super::FilterEvaluator). Trees are immutable after
/// parsing and safe to share across threads and across any number of
/// evaluation calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A boolean combination of terms.
    ///
    /// Note that single-term expressions never produce this variant: the
    /// parser collapses them to the bare term.
    Logical { op: LogicalOp, terms: Vec<Filter> },

    /// A `field <op> value` term. `field` keeps the raw dot-separated
    /// capture; it is split on `.` at lookup time.
    Comparison {
        field: String,
        op: CompareOp,
        value: Value,
    },

    /// A field-less value term, meaningful only in full-text mode.
    Text { value: Value },
}

impl Filter {
    /// Creates a conjunction of the given terms.
    ///
    /// # Example
    ///
    /// ```
    /// use recfilter_rs::filter::{Filter, LogicalOp, Value};
    ///
    /// let filter = Filter::all(vec![Filter::text(Value::Str("error".into()))]);
    /// assert!(matches!(filter, Filter::Logical { op: LogicalOp::And, .. }));
    /// ```
    pub fn all(terms: Vec<Filter>) -> Self {
        Filter::Logical {
            op: LogicalOp::And,
            terms,
        }
    }

    /// Creates a disjunction of the given terms.
    pub fn any(terms: Vec<Filter>) -> Self {
        Filter::Logical {
            op: LogicalOp::Or,
            terms,
        }
    }

    /// Creates a comparison term.
    pub fn comparison(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Filter::Comparison {
            field: field.into(),
            op,
            value,
        }
    }

    /// Creates a field-less text term.
    pub fn text(value: Value) -> Self {
        Filter::Text { value }
    }
}
