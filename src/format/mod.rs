//! Type-specific value formatters.
//!
//! One converter per [`PlaceholderKind`]:
//!
//! | Placeholder | Converter            | Output                               |
//! |-------------|----------------------|--------------------------------------|
//! | `?`         | [`format_generic`]   | SQL literal of a scalar              |
//! | `?d`        | [`format_integer`]   | decimal `i64`, or `NULL`             |
//! | `?f`        | [`format_float`]     | decimal `f64`, or `NULL`             |
//! | `?#`        | [`format_identifier`]| backtick-quoted name(s)              |
//! | `?a`        | [`format_array`]     | value list or `` `key` = value `` list |
//!
//! String escaping here is textual: single quotes and backslashes get a
//! backslash in front. It is not a driver-verified escape and must not be
//! treated as an injection boundary; bind parameters downstream when the
//! input is untrusted.

use crate::config::{CompileOptions, NumericMode};
use crate::error::{CompileError, Result};
use crate::template::PlaceholderKind;
use crate::types::{is_associative, Value};

/// Formats `value` for a placeholder of the given kind.
///
/// The skip sentinel is not handled here; the assembler intercepts it
/// before formatting.
pub fn format_value(kind: PlaceholderKind, value: &Value, options: &CompileOptions) -> Result<String> {
    match kind {
        PlaceholderKind::Generic => format_generic(value, kind),
        PlaceholderKind::Integer => format_integer(value, options.numeric),
        PlaceholderKind::Float => format_float(value, options.numeric),
        PlaceholderKind::Identifier => format_identifier(value, options.check_identifiers),
        PlaceholderKind::ArrayExpansion => format_array(value, options.check_identifiers),
    }
}

// ---------------------------------------------------------------------------
// Generic
// ---------------------------------------------------------------------------

/// Formats a scalar as an SQL literal. `placeholder` names the form that
/// asked for it, for error reporting (`?` directly, `?a` for elements).
pub fn format_generic(value: &Value, placeholder: PlaceholderKind) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(bool_digit(*b).to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(r) => finite_float(*r, placeholder),
        Value::String(s) => Ok(quote_string(s)),
        other => Err(CompileError::type_error(
            placeholder.form(),
            format!("expected a scalar, got {}", other.kind_name()),
        )),
    }
}

/// Wraps a string in single quotes, backslash-escaping `\` and `'`.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

fn bool_digit(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

fn finite_float(r: f64, placeholder: PlaceholderKind) -> Result<String> {
    if r.is_finite() {
        Ok(r.to_string())
    } else {
        Err(CompileError::type_error(
            placeholder.form(),
            format!("{r} has no SQL literal"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

/// Formats `?d`.
pub fn format_integer(value: &Value, mode: NumericMode) -> Result<String> {
    let form = PlaceholderKind::Integer.form();
    let n = match value {
        Value::Null => return Ok("NULL".to_string()),
        Value::Bool(b) => i64::from(*b),
        Value::Int(i) => *i,
        Value::Float(r) => match mode {
            // `as` saturates and maps NaN to 0.
            NumericMode::Loose => *r as i64,
            NumericMode::Strict => exact_integer(*r).ok_or_else(|| CompileError::InvalidNumber {
                placeholder: form,
                input: r.to_string(),
            })?,
        },
        Value::String(s) => match mode {
            NumericMode::Loose => loose_integer(s),
            NumericMode::Strict => s.trim().parse::<i64>().map_err(|_| CompileError::InvalidNumber {
                placeholder: form,
                input: s.clone(),
            })?,
        },
        other => {
            return Err(CompileError::type_error(
                form,
                format!("expected a number, got {}", other.kind_name()),
            ))
        }
    };
    Ok(n.to_string())
}

/// Formats `?f`.
pub fn format_float(value: &Value, mode: NumericMode) -> Result<String> {
    let kind = PlaceholderKind::Float;
    let r = match value {
        Value::Null => return Ok("NULL".to_string()),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Int(i) => *i as f64,
        Value::Float(r) => *r,
        Value::String(s) => match mode {
            NumericMode::Loose => loose_float(s),
            NumericMode::Strict => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite())
                .ok_or_else(|| CompileError::InvalidNumber {
                    placeholder: kind.form(),
                    input: s.clone(),
                })?,
        },
        other => {
            return Err(CompileError::type_error(
                kind.form(),
                format!("expected a number, got {}", other.kind_name()),
            ))
        }
    };
    finite_float(r, kind)
}

fn exact_integer(r: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if r.is_finite() && r.fract() == 0.0 && r >= -LIMIT && r < LIMIT {
        Some(r as i64)
    } else {
        None
    }
}

/// The longest prefix of `s` (after leading whitespace) that reads as a
/// decimal number: `[+-]digits[.digits][(e|E)[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut seen_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || seen_digits {
            seen_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !seen_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}

fn loose_integer(s: &str) -> i64 {
    let prefix = numeric_prefix(s);
    prefix
        .parse::<i64>()
        .unwrap_or_else(|_| prefix.parse::<f64>().map_or(0, |r| r as i64))
}

fn loose_float(s: &str) -> f64 {
    numeric_prefix(s).parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Formats `?#`: a string, or a list of strings joined by `", "`.
pub fn format_identifier(value: &Value, check: bool) -> Result<String> {
    let form = PlaceholderKind::Identifier.form();
    match value {
        Value::String(name) => quote_identifier(name, check),
        Value::List(items) => join_identifiers(items.iter(), check),
        Value::Assoc(entries) if !is_associative(entries) => {
            join_identifiers(entries.iter().map(|(_, v)| v), check)
        }
        other => Err(CompileError::type_error(
            form,
            format!("expected an identifier or a list of identifiers, got {}", other.kind_name()),
        )),
    }
}

fn join_identifiers<'v>(items: impl Iterator<Item = &'v Value>, check: bool) -> Result<String> {
    let quoted = items
        .map(|item| match item {
            Value::String(name) => quote_identifier(name, check),
            other => Err(CompileError::type_error(
                PlaceholderKind::Identifier.form(),
                format!("identifier list element is a {}", other.kind_name()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// Wraps a name in backticks.
///
/// With `check` set, names that are empty or contain a backtick or a
/// control character are rejected instead of quoted.
pub fn quote_identifier(name: &str, check: bool) -> Result<String> {
    if check {
        let reason = if name.is_empty() {
            Some("identifier is empty")
        } else if name.contains('`') {
            Some("contains a backtick")
        } else if name.chars().any(char::is_control) {
            Some("contains a control character")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CompileError::InvalidIdentifier {
                identifier: name.to_string(),
                reason: reason.to_string(),
            });
        }
    }
    Ok(format!("`{name}`"))
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

/// Formats `?a`.
///
/// A list becomes its generic-formatted elements joined by `", "`. An
/// associative key/value list becomes `` `key` = value `` pairs joined by
/// `", "`; a key/value list keyed `"0".."n-1"` in order is treated as a list.
pub fn format_array(value: &Value, check_identifiers: bool) -> Result<String> {
    let kind = PlaceholderKind::ArrayExpansion;
    let parts = match value {
        Value::List(items) => items
            .iter()
            .map(|item| format_generic(item, kind))
            .collect::<Result<Vec<_>>>()?,
        Value::Assoc(entries) if is_associative(entries) => entries
            .iter()
            .map(|(key, item)| -> Result<String> {
                Ok(format!(
                    "{} = {}",
                    quote_identifier(key, check_identifiers)?,
                    format_generic(item, kind)?
                ))
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Assoc(entries) => entries
            .iter()
            .map(|(_, item)| format_generic(item, kind))
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(CompileError::type_error(
                kind.form(),
                format!("expected a list or key/value list, got {}", other.kind_name()),
            ))
        }
    };
    Ok(parts.join(", "))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(v: impl Into<Value>) -> Result<String> {
        format_generic(&v.into(), PlaceholderKind::Generic)
    }

    #[test]
    fn generic_scalars() {
        assert_eq!(generic(Value::Null).unwrap(), "NULL");
        assert_eq!(generic(true).unwrap(), "1");
        assert_eq!(generic(false).unwrap(), "0");
        assert_eq!(generic(-42i64).unwrap(), "-42");
        assert_eq!(generic(2.5).unwrap(), "2.5");
        assert_eq!(generic(3.0).unwrap(), "3");
        assert_eq!(generic("x").unwrap(), "'x'");
    }

    #[test]
    fn generic_escapes_quotes_and_backslashes() {
        assert_eq!(generic("it's").unwrap(), r"'it\'s'");
        assert_eq!(generic(r"C:\tmp").unwrap(), r"'C:\\tmp'");
        assert_eq!(generic("").unwrap(), "''");
    }

    #[test]
    fn generic_rejects_containers_and_skip() {
        let err = generic(vec![1, 2]).unwrap_err();
        assert!(err.is_type_error());
        assert!(generic(Value::assoc([("a", 1)])).unwrap_err().is_type_error());
        assert!(generic(Value::Skip).unwrap_err().is_type_error());
    }

    #[test]
    fn generic_rejects_non_finite_floats() {
        assert!(generic(f64::NAN).unwrap_err().is_type_error());
        assert!(generic(f64::INFINITY).unwrap_err().is_type_error());
    }

    #[test]
    fn integer_loose() {
        let f = |v: Value| format_integer(&v, NumericMode::Loose).unwrap();
        assert_eq!(f(Value::Null), "NULL");
        assert_eq!(f(Value::Int(10)), "10");
        assert_eq!(f(Value::Bool(true)), "1");
        assert_eq!(f(Value::Float(3.9)), "3");
        assert_eq!(f(Value::Float(-3.9)), "-3");
        assert_eq!(f(Value::Float(f64::NAN)), "0");
        assert_eq!(f(Value::from("42")), "42");
        assert_eq!(f(Value::from("  12abc")), "12");
        assert_eq!(f(Value::from("-7.8")), "-7");
        assert_eq!(f(Value::from("1e3")), "1000");
        assert_eq!(f(Value::from("abc")), "0");
        assert_eq!(f(Value::from("")), "0");
    }

    #[test]
    fn integer_strict() {
        let f = |v: Value| format_integer(&v, NumericMode::Strict);
        assert_eq!(f(Value::from(" 42 ")).unwrap(), "42");
        assert_eq!(f(Value::Float(4.0)).unwrap(), "4");
        assert!(matches!(
            f(Value::from("12abc")),
            Err(CompileError::InvalidNumber { placeholder: "?d", .. })
        ));
        assert!(f(Value::Float(4.5)).is_err());
        assert!(f(Value::Float(1e19)).is_err());
    }

    #[test]
    fn integer_rejects_containers() {
        let err = format_integer(&Value::from(vec![1]), NumericMode::Loose).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn float_loose() {
        let f = |v: Value| format_float(&v, NumericMode::Loose).unwrap();
        assert_eq!(f(Value::Null), "NULL");
        assert_eq!(f(Value::Float(1.25)), "1.25");
        assert_eq!(f(Value::Int(2)), "2");
        assert_eq!(f(Value::Bool(false)), "0");
        assert_eq!(f(Value::from("3.5kg")), "3.5");
        assert_eq!(f(Value::from(".5")), "0.5");
        assert_eq!(f(Value::from("2.")), "2");
        assert_eq!(f(Value::from("nope")), "0");
    }

    #[test]
    fn float_strict() {
        let f = |v: Value| format_float(&v, NumericMode::Strict);
        assert_eq!(f(Value::from("0.1")).unwrap(), "0.1");
        assert!(f(Value::from("0.1x")).is_err());
        assert!(f(Value::from("inf")).is_err());
    }

    #[test]
    fn numeric_prefix_edges() {
        assert_eq!(numeric_prefix("+5x"), "+5");
        assert_eq!(numeric_prefix("-"), "");
        assert_eq!(numeric_prefix("."), "");
        assert_eq!(numeric_prefix("1e"), "1");
        assert_eq!(numeric_prefix("1e-2z"), "1e-2");
        assert_eq!(numeric_prefix("  \t9"), "9");
    }

    #[test]
    fn identifier_single_and_list() {
        assert_eq!(format_identifier(&Value::from("a"), true).unwrap(), "`a`");
        assert_eq!(
            format_identifier(&Value::from(vec!["a", "b"]), true).unwrap(),
            "`a`, `b`"
        );
        assert_eq!(format_identifier(&Value::List(vec![]), true).unwrap(), "");
    }

    #[test]
    fn identifier_rejects_unsafe_names() {
        for bad in ["", "a`b", "a\nb", "a\0"] {
            let err = format_identifier(&Value::from(bad), true).unwrap_err();
            assert!(
                matches!(err, CompileError::InvalidIdentifier { .. }),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(format_identifier(&Value::from("a`b"), false).unwrap(), "`a`b`");
    }

    #[test]
    fn identifier_rejects_non_strings() {
        assert!(format_identifier(&Value::Int(1), true).unwrap_err().is_type_error());
        assert!(format_identifier(&Value::Null, true).unwrap_err().is_type_error());
        assert!(format_identifier(&Value::from(vec![Value::Int(1)]), true)
            .unwrap_err()
            .is_type_error());
        assert!(format_identifier(&Value::assoc([("k", "v")]), true)
            .unwrap_err()
            .is_type_error());
    }

    #[test]
    fn array_list() {
        assert_eq!(format_array(&Value::from(vec![1, 2, 3]), true).unwrap(), "1, 2, 3");
        assert_eq!(
            format_array(
                &Value::List(vec![Value::from("a"), Value::Null, Value::Bool(true)]),
                true
            )
            .unwrap(),
            "'a', NULL, 1"
        );
        assert_eq!(format_array(&Value::List(vec![]), true).unwrap(), "");
    }

    #[test]
    fn array_assoc() {
        assert_eq!(
            format_array(&Value::assoc([("a", 1), ("b", 2)]), true).unwrap(),
            "`a` = 1, `b` = 2"
        );
        assert_eq!(
            format_array(&Value::assoc([("0", "x"), ("1", "y")]), true).unwrap(),
            "'x', 'y'"
        );
        assert_eq!(
            format_array(&Value::assoc([("1", "x"), ("2", "y")]), true).unwrap(),
            "`1` = 'x', `2` = 'y'"
        );
    }

    #[test]
    fn array_rejects_scalars_and_nested_containers() {
        let err = format_array(&Value::Int(1), true).unwrap_err();
        assert_eq!(
            err,
            CompileError::type_error("?a", "expected a list or key/value list, got integer")
        );
        assert!(format_array(&Value::from(vec![vec![1]]), true)
            .unwrap_err()
            .is_type_error());
        assert!(matches!(
            format_array(&Value::assoc([("a`", 1)]), true),
            Err(CompileError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn dispatch_uses_declared_kind_only() {
        let opts = CompileOptions::default();
        let v = Value::from("7");
        assert_eq!(format_value(PlaceholderKind::Generic, &v, &opts).unwrap(), "'7'");
        assert_eq!(format_value(PlaceholderKind::Integer, &v, &opts).unwrap(), "7");
        assert_eq!(format_value(PlaceholderKind::Float, &v, &opts).unwrap(), "7");
        assert_eq!(format_value(PlaceholderKind::Identifier, &v, &opts).unwrap(), "`7`");
        assert!(format_value(PlaceholderKind::ArrayExpansion, &v, &opts).is_err());
    }
}
