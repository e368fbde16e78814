//! Filter evaluation against free text and structured records.
//!
//! This module provides the [`FilterEvaluator`] for evaluating parsed filter
//! expressions against either a plain string (full-text mode) or a nested
//! JSON-like record (record mode).
//!
//! # Example
//!
//! ```
//! use recfilter_rs::filter::{FilterEvaluator, FilterInput, FilterParser};
//! use recfilter_rs::synonyms::SynonymTable;
//!
//! let filter = FilterParser::parse(r#"status = "open" and priority > 2"#);
//! let evaluator = FilterEvaluator::new(SynonymTable::new());
//!
//! let record = serde_json::json!({"status": "open", "priority": 3});
//! assert!(evaluator.check(FilterInput::Record(&record), &filter).unwrap());
//! ```

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::Value as JsonValue;

use super::ast::{CompareOp, Filter, LogicalOp, Value};
use super::error::{FilterError, FilterResult};
use crate::synonyms::SynonymTable;

/// One input to a filter check.
///
/// Full-text mode evaluates [`Filter::Text`] terms against a single string;
/// record mode resolves [`Filter::Comparison`] field paths against a nested
/// mapping. Either kind of term may appear against either input: a `Text`
/// term is simply false in record mode, and a field path resolves to the null
/// sentinel in text mode.
#[derive(Debug, Clone, Copy)]
pub enum FilterInput<'a> {
    /// A plain string (full-text mode).
    Text(&'a str),
    /// A nested mapping of string keys to JSON-like values (record mode).
    Record(&'a JsonValue),
}

/// Evaluates parsed filters against inputs.
///
/// The evaluator is bound to a [`SynonymTable`] at construction and is
/// read-only thereafter: `check` is a pure function of its inputs, safe for
/// concurrent use against the same AST from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct FilterEvaluator {
    synonyms: SynonymTable,
}

impl FilterEvaluator {
    /// Creates an evaluator bound to the given synonym table.
    ///
    /// Pass [`SynonymTable::new`] when no synonym expansion is wanted.
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Returns true if the input matches the filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::TypeMismatch`] for ordering comparisons across
    /// incompatible kinds and for set operators applied to a non-array field
    /// value; [`FilterError::InvalidRegex`] if a regex literal fails to
    /// compile; [`FilterError::InvalidTextValue`] for a text term whose value
    /// is neither a string nor a regex.
    pub fn check(&self, input: FilterInput<'_>, filter: &Filter) -> FilterResult<bool> {
        match filter {
            Filter::Logical { op, terms } => match op {
                // AND over an empty term list is vacuously true, OR false.
                LogicalOp::And => {
                    for term in terms {
                        if !self.check(input, term)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                LogicalOp::Or => {
                    for term in terms {
                        if self.check(input, term)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
            },
            Filter::Text { value } => self.check_text_term(input, value),
            Filter::Comparison { field, op, value } => {
                self.check_comparison(input, field, *op, value)
            }
        }
    }

    /// Checks a filter against a plain string (full-text mode).
    pub fn check_text(&self, text: &str, filter: &Filter) -> FilterResult<bool> {
        self.check(FilterInput::Text(text), filter)
    }

    /// Checks a filter against each record, returning one verdict per record.
    ///
    /// The AST is reused unmodified across all records.
    pub fn check_records(&self, records: &[JsonValue], filter: &Filter) -> FilterResult<Vec<bool>> {
        records
            .iter()
            .map(|record| self.check(FilterInput::Record(record), filter))
            .collect()
    }

    /// Evaluates a field-less text term.
    ///
    /// A string value matches if it, or any of its synonyms, occurs as a
    /// case-insensitive substring of the input. A regex value is searched as
    /// a substring pattern, honoring the `i` flag.
    fn check_text_term(&self, input: FilterInput<'_>, value: &Value) -> FilterResult<bool> {
        let FilterInput::Text(text) = input else {
            // Text terms never apply in record mode.
            return Ok(false);
        };

        match value {
            Value::Regex { pattern, flags } => Ok(build_regex(pattern, flags)?.is_match(text)),
            Value::Str(needle) => {
                let haystack = text.to_lowercase();
                if haystack.contains(&needle.to_lowercase()) {
                    return Ok(true);
                }
                if let Some(alternates) = self.synonyms.get(needle) {
                    for alternate in alternates {
                        if haystack.contains(&alternate.to_lowercase()) {
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
            other => Err(FilterError::InvalidTextValue { kind: other.kind() }),
        }
    }

    /// Evaluates a `field <op> value` term.
    fn check_comparison(
        &self,
        input: FilterInput<'_>,
        field: &str,
        op: CompareOp,
        value: &Value,
    ) -> FilterResult<bool> {
        // A path that cannot be resolved, including any path over a text
        // input, yields the null sentinel rather than an error.
        let null = JsonValue::Null;
        let resolved = match input {
            FilterInput::Record(record) => resolve_path(record, field),
            FilterInput::Text(_) => None,
        }
        .unwrap_or(&null);

        match op {
            CompareOp::Eq => equals(resolved, value),
            CompareOp::Ne => Ok(!equals(resolved, value)?),
            CompareOp::Gt => Ok(ordering(resolved, op, value)?.is_gt()),
            CompareOp::Lt => Ok(ordering(resolved, op, value)?.is_lt()),
            CompareOp::Ge => Ok(ordering(resolved, op, value)?.is_ge()),
            CompareOp::Le => Ok(ordering(resolved, op, value)?.is_le()),
            CompareOp::In => membership(resolved, op, value),
            CompareOp::NotIn => Ok(!membership(resolved, op, value)?),
            CompareOp::ContainsAny => {
                let (items, elements) = iterable_operands(resolved, op, value)?;
                Ok(elements
                    .iter()
                    .any(|element| items.iter().any(|item| values_equal(item, element))))
            }
            CompareOp::ContainsAll => {
                let (items, elements) = iterable_operands(resolved, op, value)?;
                Ok(elements
                    .iter()
                    .all(|element| items.iter().any(|item| values_equal(item, element))))
            }
        }
    }
}

/// Resolves a dot-separated field path by descending through nested mappings.
///
/// Returns `None` if the input is not a mapping at any step or a segment key
/// is absent.
fn resolve_path<'v>(record: &'v JsonValue, field: &str) -> Option<&'v JsonValue> {
    let mut current = record;
    for segment in field.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Equality between a resolved field value and a literal.
///
/// A regex literal is a substring search against the field value's string
/// rendering; everything else is structural, type-sensitive equality.
fn equals(resolved: &JsonValue, value: &Value) -> FilterResult<bool> {
    if let Value::Regex { pattern, flags } = value {
        return Ok(build_regex(pattern, flags)?.is_match(&render_as_text(resolved)));
    }
    Ok(values_equal(resolved, value))
}

/// Type-sensitive structural equality: the number 3 never equals the
/// string "3".
fn values_equal(resolved: &JsonValue, value: &Value) -> bool {
    match (resolved, value) {
        (JsonValue::Null, Value::Null) => true,
        (JsonValue::Bool(a), Value::Bool(b)) => a == b,
        (JsonValue::Number(a), Value::Number(b)) => a.as_f64().is_some_and(|a| a == *b),
        (JsonValue::String(a), Value::Str(b)) => a == b,
        (JsonValue::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

/// Orders a resolved field value against a literal.
///
/// Only number/number and string/string are ordered; any other pairing is a
/// type mismatch, never a silent false.
fn ordering(resolved: &JsonValue, op: CompareOp, value: &Value) -> FilterResult<Ordering> {
    let ordering = match (resolved, value) {
        (JsonValue::Number(a), Value::Number(b)) => {
            a.as_f64().and_then(|a| a.partial_cmp(b))
        }
        (JsonValue::String(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    };

    ordering.ok_or_else(|| FilterError::type_mismatch(op, json_kind(resolved), value.kind()))
}

/// Membership of the resolved field value in an array literal.
fn membership(resolved: &JsonValue, op: CompareOp, value: &Value) -> FilterResult<bool> {
    let Value::Array(elements) = value else {
        return Err(FilterError::type_mismatch(
            op,
            json_kind(resolved),
            value.kind(),
        ));
    };
    Ok(elements
        .iter()
        .any(|element| values_equal(resolved, element)))
}

/// Requires both operands of a set operator to be arrays.
fn iterable_operands<'v, 'f>(
    resolved: &'v JsonValue,
    op: CompareOp,
    value: &'f Value,
) -> FilterResult<(&'v [JsonValue], &'f [Value])> {
    let JsonValue::Array(items) = resolved else {
        return Err(FilterError::type_mismatch(
            op,
            json_kind(resolved),
            value.kind(),
        ));
    };
    let Value::Array(elements) = value else {
        return Err(FilterError::type_mismatch(op, "array", value.kind()));
    };
    Ok((items.as_slice(), elements.as_slice()))
}

/// Compiles a regex literal, honoring only the `i` flag.
fn build_regex(pattern: &str, flags: &str) -> FilterResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .build()
        .map_err(|err| FilterError::invalid_regex(pattern, &err))
}

/// Renders a resolved field value for regex matching: strings stay bare,
/// everything else uses its JSON rendering.
fn render_as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Returns a short name for a JSON value's kind, used in error messages.
fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Test Helpers ====================

    fn evaluator() -> FilterEvaluator {
        FilterEvaluator::new(SynonymTable::new())
    }

    fn evaluator_with_synonyms() -> FilterEvaluator {
        let mut table = SynonymTable::new();
        table.insert("car", vec!["automobile".to_string(), "vehicle".to_string()]);
        FilterEvaluator::new(table)
    }

    fn text_term(value: Value) -> Filter {
        Filter::Text { value }
    }

    fn comparison(field: &str, op: CompareOp, value: Value) -> Filter {
        Filter::comparison(field, op, value)
    }

    fn str_value(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    fn regex_value(pattern: &str, flags: &str) -> Value {
        Value::Regex {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        }
    }

    // ==================== Logical Tests ====================

    #[test]
    fn test_empty_and_is_vacuously_true() {
        let filter = Filter::all(vec![]);
        assert!(evaluator().check_text("anything", &filter).unwrap());
        let record = json!({});
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_empty_or_is_false() {
        let filter = Filter::any(vec![]);
        assert!(!evaluator().check_text("anything", &filter).unwrap());
    }

    #[test]
    fn test_and_requires_all_terms() {
        let filter = Filter::all(vec![
            text_term(str_value("foo")),
            text_term(str_value("bar")),
        ]);
        assert!(evaluator().check_text("foo bar", &filter).unwrap());
        assert!(!evaluator().check_text("foo baz", &filter).unwrap());
    }

    #[test]
    fn test_or_requires_any_term() {
        let filter = Filter::any(vec![
            text_term(str_value("foo")),
            text_term(str_value("bar")),
        ]);
        assert!(evaluator().check_text("only bar here", &filter).unwrap());
        assert!(!evaluator().check_text("neither", &filter).unwrap());
    }

    #[test]
    fn test_or_short_circuits_before_error() {
        // Children are side-effect-free, so short-circuiting is permitted to
        // skip a term that would otherwise error.
        let record = json!({"a": 1, "s": "x"});
        let filter = Filter::any(vec![
            comparison("a", CompareOp::Eq, Value::Number(1.0)),
            comparison("s", CompareOp::Gt, Value::Number(3.0)),
        ]);
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    // ==================== Text Term Tests ====================

    #[test]
    fn test_text_literal_case_insensitive_substring() {
        let filter = text_term(str_value("Fail"));
        assert!(evaluator().check_text("operation FAILED", &filter).unwrap());
        assert!(!evaluator().check_text("operation ok", &filter).unwrap());
    }

    #[test]
    fn test_text_regex_ignore_case() {
        let filter = text_term(regex_value("foo", "i"));
        assert!(evaluator().check_text("FOO bar", &filter).unwrap());
        assert!(!evaluator().check_text("baz", &filter).unwrap());
    }

    #[test]
    fn test_text_regex_case_sensitive_without_flag() {
        let filter = text_term(regex_value("foo", ""));
        assert!(!evaluator().check_text("FOO bar", &filter).unwrap());
        assert!(evaluator().check_text("a foo b", &filter).unwrap());
    }

    #[test]
    fn test_text_regex_substring_search() {
        // Patterns are searched, not anchored.
        let filter = text_term(regex_value("a.c", ""));
        assert!(evaluator().check_text("xxabcxx", &filter).unwrap());
    }

    #[test]
    fn test_text_regex_unknown_flags_ignored() {
        let filter = text_term(regex_value("foo", "gx"));
        assert!(evaluator().check_text("a foo b", &filter).unwrap());
    }

    #[test]
    fn test_text_synonym_expansion() {
        let filter = text_term(str_value("car"));
        let evaluator = evaluator_with_synonyms();
        assert!(evaluator
            .check_text("I drive an automobile", &filter)
            .unwrap());
        assert!(evaluator.check_text("my Vehicle is red", &filter).unwrap());
        assert!(!evaluator.check_text("I ride a bike", &filter).unwrap());
    }

    #[test]
    fn test_text_synonym_lookup_is_case_sensitive() {
        let filter = text_term(str_value("Car"));
        // "Car" is not a table key, so only the literal is matched.
        assert!(!evaluator_with_synonyms()
            .check_text("an automobile", &filter)
            .unwrap());
    }

    #[test]
    fn test_text_term_is_false_in_record_mode() {
        let record = json!({"message": "foo"});
        let filter = text_term(str_value("foo"));
        assert!(!evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_text_term_with_non_string_value_errors() {
        let filter = text_term(Value::Number(3.0));
        let result = evaluator().check_text("3", &filter);
        assert!(matches!(
            result,
            Err(FilterError::InvalidTextValue { kind: "number" })
        ));
    }

    #[test]
    fn test_invalid_regex_errors() {
        let filter = text_term(regex_value("(", ""));
        let result = evaluator().check_text("x", &filter);
        assert!(matches!(result, Err(FilterError::InvalidRegex { .. })));
    }

    // ==================== Field Resolution Tests ====================

    #[test]
    fn test_nested_field_resolution() {
        let record = json!({"a": {"b": 5}});
        let filter = comparison("a.b", CompareOp::Gt, Value::Number(3.0));
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_missing_path_resolves_to_null() {
        let record = json!({"a": {}});
        let filter = comparison("a.c", CompareOp::Eq, Value::Number(1.0));
        assert!(!evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_missing_path_equals_null() {
        let record = json!({});
        let filter = comparison("absent", CompareOp::Eq, Value::Null);
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_path_through_non_mapping_resolves_to_null() {
        let record = json!({"a": 5});
        let filter = comparison("a.b", CompareOp::Eq, Value::Null);
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_comparison_in_text_mode_resolves_to_null() {
        // Field paths never resolve against a plain string input.
        let filter = comparison("a", CompareOp::Eq, Value::Null);
        assert!(evaluator().check_text("a", &filter).unwrap());
    }

    // ==================== Equality Tests ====================

    #[test]
    fn test_eq_type_sensitive() {
        let record = json!({"n": 3, "s": "3"});
        let number = Value::Number(3.0);
        assert!(evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("n", CompareOp::Eq, number.clone())
            )
            .unwrap());
        assert!(!evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("s", CompareOp::Eq, number)
            )
            .unwrap());
    }

    #[test]
    fn test_ne_negates_eq() {
        let record = json!({"status": "open"});
        assert!(!evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("status", CompareOp::Ne, str_value("open"))
            )
            .unwrap());
        assert!(evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("status", CompareOp::Ne, str_value("closed"))
            )
            .unwrap());
    }

    #[test]
    fn test_eq_array_values() {
        let record = json!({"tags": ["a", "b"]});
        let filter = comparison(
            "tags",
            CompareOp::Eq,
            Value::Array(vec![str_value("a"), str_value("b")]),
        );
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_eq_regex_matches_field_rendering() {
        let record = json!({"status": "reopened", "count": 42});
        assert!(evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("status", CompareOp::Eq, regex_value("OPEN", "i"))
            )
            .unwrap());
        // Non-string fields are matched against their JSON rendering.
        assert!(evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("count", CompareOp::Eq, regex_value("^42$", ""))
            )
            .unwrap());
    }

    #[test]
    fn test_ne_regex_negates_match() {
        let record = json!({"status": "open"});
        let filter = comparison("status", CompareOp::Ne, regex_value("closed", ""));
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_number_ordering() {
        let record = json!({"age": 18});
        let check = |op, n| {
            evaluator()
                .check(
                    FilterInput::Record(&record),
                    &comparison("age", op, Value::Number(n)),
                )
                .unwrap()
        };
        assert!(check(CompareOp::Ge, 18.0));
        assert!(check(CompareOp::Le, 18.0));
        assert!(check(CompareOp::Gt, 17.0));
        assert!(check(CompareOp::Lt, 19.0));
        assert!(!check(CompareOp::Gt, 18.0));
    }

    #[test]
    fn test_string_ordering() {
        let record = json!({"name": "beta"});
        let filter = comparison("name", CompareOp::Gt, str_value("alpha"));
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_ordering_type_mismatch_errors() {
        let record = json!({"name": "beta"});
        let filter = comparison("name", CompareOp::Gt, Value::Number(3.0));
        let result = evaluator().check(FilterInput::Record(&record), &filter);
        assert_eq!(
            result,
            Err(FilterError::TypeMismatch {
                op: ">",
                left: "string",
                right: "number",
            })
        );
    }

    #[test]
    fn test_ordering_against_missing_field_errors() {
        // A missing path resolves to null, which cannot be ordered.
        let record = json!({});
        let filter = comparison("age", CompareOp::Ge, Value::Number(18.0));
        let result = evaluator().check(FilterInput::Record(&record), &filter);
        assert!(matches!(result, Err(FilterError::TypeMismatch { .. })));
    }

    // ==================== Membership Tests ====================

    #[test]
    fn test_in_membership() {
        let record = json!({"priority": "high"});
        let options = Value::Array(vec![str_value("high"), str_value("low")]);
        assert!(evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("priority", CompareOp::In, options.clone())
            )
            .unwrap());
        assert!(!evaluator()
            .check(
                FilterInput::Record(&record),
                &comparison("priority", CompareOp::NotIn, options)
            )
            .unwrap());
    }

    #[test]
    fn test_in_requires_array_literal() {
        let record = json!({"priority": "high"});
        let filter = comparison("priority", CompareOp::In, str_value("high"));
        let result = evaluator().check(FilterInput::Record(&record), &filter);
        assert!(matches!(result, Err(FilterError::TypeMismatch { .. })));
    }

    // ==================== Set Operator Tests ====================

    #[test]
    fn test_contains_any() {
        let record = json!({"tags": ["vip", "new"]});
        let filter = comparison(
            "tags",
            CompareOp::ContainsAny,
            Value::Array(vec![str_value("urgent"), str_value("vip")]),
        );
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_contains_all() {
        let record = json!({"tags": ["new"]});
        let filter = comparison(
            "tags",
            CompareOp::ContainsAll,
            Value::Array(vec![str_value("urgent"), str_value("vip")]),
        );
        assert!(!evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());

        let record = json!({"tags": ["vip", "urgent", "new"]});
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_contains_any_ignores_duplicates() {
        let record = json!({"tags": ["a", "a"]});
        let filter = comparison(
            "tags",
            CompareOp::ContainsAny,
            Value::Array(vec![str_value("a"), str_value("a")]),
        );
        assert!(evaluator()
            .check(FilterInput::Record(&record), &filter)
            .unwrap());
    }

    #[test]
    fn test_contains_requires_iterable_field() {
        let record = json!({"tags": "vip"});
        let filter = comparison(
            "tags",
            CompareOp::ContainsAny,
            Value::Array(vec![str_value("vip")]),
        );
        let result = evaluator().check(FilterInput::Record(&record), &filter);
        assert_eq!(
            result,
            Err(FilterError::TypeMismatch {
                op: "contains_any",
                left: "string",
                right: "array",
            })
        );
    }

    #[test]
    fn test_contains_all_requires_array_literal() {
        let record = json!({"tags": ["vip"]});
        let filter = comparison("tags", CompareOp::ContainsAll, str_value("vip"));
        let result = evaluator().check(FilterInput::Record(&record), &filter);
        assert!(matches!(result, Err(FilterError::TypeMismatch { .. })));
    }

    // ==================== check_records Tests ====================

    #[test]
    fn test_check_records_one_verdict_per_record() {
        let records = vec![json!({"status": "open"}), json!({"status": "closed"})];
        let filter = comparison("status", CompareOp::Eq, str_value("open"));
        let results = evaluator().check_records(&records, &filter).unwrap();
        assert_eq!(results, vec![true, false]);
    }

    #[test]
    fn test_check_records_propagates_errors() {
        let records = vec![json!({"n": 1}), json!({"n": "x"})];
        let filter = comparison("n", CompareOp::Gt, Value::Number(0.0));
        let result = evaluator().check_records(&records, &filter);
        assert!(matches!(result, Err(FilterError::TypeMismatch { .. })));
    }

    // ==================== Sharing Tests ====================

    #[test]
    fn test_evaluator_and_ast_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilterEvaluator>();
        assert_send_sync::<Filter>();
    }
}
