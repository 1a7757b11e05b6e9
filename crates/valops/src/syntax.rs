//! Operator wrapping syntax: detection, validation and extraction.
//!
//! These are the string-level building blocks shared by the single-value
//! builder, the multi-value composer and the request context.

use crate::error::{Result, ValopsError};
use crate::operator::{Operator, CLOSE, OPEN};

/// Result of splitting a raw value into its top-level operator and operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    /// The wrapping operator, or the caller's default.
    pub operator: Operator,
    /// The operand between the first `(` after the token and the last `)`,
    /// or the whole trimmed value when no candidate matched.
    pub value: String,
    /// `true` when `operator` was found in the value rather than defaulted.
    pub explicit: bool,
}

/// Returns the first candidate, in order, that wraps `value`.
pub fn find_wrapper<'a, I>(candidates: I, value: &str) -> Option<Operator>
where
    I: IntoIterator<Item = &'a Operator>,
{
    candidates.into_iter().copied().find(|op| op.wraps(value))
}

/// Returns `true` if `value` is wrapped by any operator of the vocabulary.
pub fn is_wrapped(value: &str) -> bool {
    find_wrapper(&Operator::ALL, value).is_some()
}

/// Checks the parentheses of an operator-wrapped value.
///
/// Values that do not open with an operator token are accepted as they are.
/// Otherwise every `)` must close an open `(` and all of them must be closed
/// by the end of the value. Operator legality is not checked here.
pub fn validate_composition(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if !Operator::ALL.iter().any(|op| op.opens(trimmed)) {
        return Ok(());
    }

    let mut depth: usize = 0;
    for c in trimmed.chars() {
        if c == OPEN {
            depth += 1;
        } else if c == CLOSE {
            if depth == 0 {
                return Err(ValopsError::malformed(format!(
                    "bad ordering of parentheses in '{}'",
                    value
                )));
            }
            depth -= 1;
        }
    }

    if depth != 0 {
        return Err(ValopsError::malformed(format!(
            "unterminated expression '{}'",
            value
        )));
    }
    Ok(())
}

/// Splits `value` into operator and operand.
///
/// The value is trimmed, then tested against `candidates` in order. On the
/// first match the operand is everything after `token(` up to the final `)`,
/// so nested closing parentheses stay in the operand for further parsing.
/// Without a match the default operator applies to the whole trimmed value.
///
/// ```
/// use valops::{syntax, Operator};
///
/// let u = syntax::extract("not(eq(x))", &[Operator::Eq, Operator::Not], Operator::Eq).unwrap();
/// assert_eq!(u.operator, Operator::Not);
/// assert_eq!(u.value, "eq(x)");
/// ```
pub fn extract(value: &str, candidates: &[Operator], default: Operator) -> Result<Unwrapped> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValopsError::invalid_input("value must not be blank"));
    }
    if candidates.is_empty() {
        return Err(ValopsError::invalid_input(
            "at least one candidate operator is required",
        ));
    }

    match find_wrapper(candidates, trimmed) {
        Some(operator) => {
            let start = operator.token().len() + OPEN.len_utf8();
            let end = trimmed.len() - CLOSE.len_utf8();
            Ok(Unwrapped {
                operator,
                value: trimmed[start..end].to_string(),
                explicit: true,
            })
        }
        None => Ok(Unwrapped {
            operator: default,
            value: trimmed.to_string(),
            explicit: false,
        }),
    }
}

/// Removes every operator wrapper and returns the innermost literal.
///
/// This is the value a type-conversion layer should see, for example
/// `not(ci(contains(Smith)))` becomes `Smith`. Blank input yields an empty
/// string.
pub fn strip_operators(value: &str) -> String {
    let mut current = value.trim();
    while let Some(operator) = find_wrapper(&Operator::ALL, current) {
        let start = operator.token().len() + OPEN.len_utf8();
        let end = current.len() - CLOSE.len_utf8();
        current = current[start..end].trim();
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn validate_accepts_balanced() {
        assert!(validate_composition("contains(foo)").is_ok());
        assert!(validate_composition("not(ci(eq(a(b))))").is_ok());
    }

    #[test]
    fn validate_rejects_unterminated() {
        let err = validate_composition("contains(foo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
        let err = validate_composition("not(eq(foo)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
    }

    #[test]
    fn validate_rejects_bad_ordering() {
        let err = validate_composition("contains(foo))").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
        let err = validate_composition("eq(a))(b)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
    }

    #[test]
    fn validate_ignores_unwrapped_values() {
        assert!(validate_composition("foo)").is_ok());
        assert!(validate_composition("(foo").is_ok());
        assert!(validate_composition("").is_ok());
    }

    #[test]
    fn extract_keeps_nested_parentheses() {
        let u = extract("  contains(a(b)c)  ", &[Operator::Contains], Operator::Eq).unwrap();
        assert_eq!(u.operator, Operator::Contains);
        assert_eq!(u.value, "a(b)c");
        assert!(u.explicit);
    }

    #[test]
    fn extract_falls_back_to_default() {
        let u = extract(" foo ", &[Operator::Contains], Operator::Eq).unwrap();
        assert_eq!(u.operator, Operator::Eq);
        assert_eq!(u.value, "foo");
        assert!(!u.explicit);

        // Not a candidate, so the wrapper stays part of the value
        let u = extract("gt(5)", &[Operator::Eq], Operator::Eq).unwrap();
        assert_eq!(u.value, "gt(5)");
    }

    #[test]
    fn extract_empty_operand() {
        let u = extract("eq()", &[Operator::Eq], Operator::Ne).unwrap();
        assert_eq!(u.operator, Operator::Eq);
        assert_eq!(u.value, "");
    }

    #[test]
    fn extract_rejects_blank() {
        let err = extract("   ", &[Operator::Eq], Operator::Eq).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = extract("x", &[], Operator::Eq).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn extract_only_unwraps_the_outer_operator() {
        let u = extract("and(or(x))", &[Operator::Or, Operator::And], Operator::Or).unwrap();
        assert_eq!(u.operator, Operator::And);
        assert_eq!(u.value, "or(x)");
    }

    #[test]
    fn strip_all_wrappers() {
        assert_eq!(strip_operators("not(ci(contains(Smith)))"), "Smith");
        assert_eq!(strip_operators("and(gt(5))"), "5");
        assert_eq!(strip_operators("plain"), "plain");
        assert_eq!(strip_operators(" eq( padded ) "), "padded");
        assert_eq!(strip_operators(""), "");
    }
}
