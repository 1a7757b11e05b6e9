//! Combining several raw values of one field.
//!
//! Every value may carry an `and(..)` or `or(..)` wrapper saying how it joins
//! the values before it. The first value's connective becomes the default for
//! the values that carry none; without any connective values are OR-ed. The
//! results are folded left to right, so `[a, and(b), or(c)]` is `(a AND b) OR c`.
//!
//! Values sharing a connective are joined as one balanced subtree, which keeps
//! long value lists shallow. A list may change connective at most
//! [`MAX_CONNECTIVE_SWITCHES`] times.

use std::borrow::Cow;

use tracing::debug;

use crate::backend::LeafBackend;
use crate::builder;
use crate::context::Overrides;
use crate::error::{Result, ValopsError};
use crate::expr::Expr;
use crate::field::Field;
use crate::operator::Operator;
use crate::syntax;

/// How often a value list may alternate between `and` and `or`.
pub const MAX_CONNECTIVE_SWITCHES: usize = 32;

/// Builds the predicate for all values given for `field`.
///
/// Blank values are skipped; `Ok(None)` means nothing was left to filter on.
/// Every value is checked for balanced parentheses before anything is built.
pub fn compose<B: LeafBackend + ?Sized>(
    backend: &B,
    field: &Field,
    values: &[String],
    overrides: Option<&Overrides<'_>>,
) -> Result<Option<Expr>> {
    for value in values {
        syntax::validate_composition(value)?;
    }

    match values {
        [] => Ok(None),
        [single] => compose_single(backend, field, single, overrides),
        _ => compose_many(backend, field, values, overrides),
    }
}

fn compose_single<B: LeafBackend + ?Sized>(
    backend: &B,
    field: &Field,
    value: &str,
    overrides: Option<&Overrides<'_>>,
) -> Result<Option<Expr>> {
    let mut value = match overrides.and_then(|o| o.single_value(field)) {
        Some(original) => {
            syntax::validate_composition(&original)?;
            original
        }
        None => value.to_string(),
    };

    // A lone connective has nothing to connect
    while syntax::find_wrapper(&Operator::MULTI_VALUE, value.trim()).is_some() {
        value = syntax::extract(&value, &Operator::MULTI_VALUE, Operator::Or)?.value;
    }

    if value.trim().is_empty() {
        debug!(field = field.name(), "skipping blank value");
        return Ok(None);
    }
    builder::single_value(backend, field, &value).map(Some)
}

fn compose_many<B: LeafBackend + ?Sized>(
    backend: &B,
    field: &Field,
    values: &[String],
    overrides: Option<&Overrides<'_>>,
) -> Result<Option<Expr>> {
    let values: Cow<'_, [String]> = match overrides.and_then(|o| o.all_values(field)) {
        Some(originals) => {
            for original in &originals {
                syntax::validate_composition(original)?;
            }
            Cow::Owned(originals)
        }
        None => Cow::Borrowed(values),
    };

    let mut default: Option<Operator> = None;
    let mut folded: Option<Expr> = None;
    let mut run = Run::default();
    let mut switches = 0usize;

    for raw in values.iter() {
        if raw.trim().is_empty() {
            debug!(field = field.name(), "skipping blank value");
            continue;
        }

        // `not(..)` is not a connective: it takes the default and keeps its
        // wrapper for the single-value builder.
        let unwrapped =
            syntax::extract(raw, &Operator::MULTI_VALUE, default.unwrap_or(Operator::Or))?;
        if default.is_none() {
            debug!(
                field = field.name(),
                operator = %unwrapped.operator,
                "default connective fixed by first value"
            );
            default = Some(unwrapped.operator);
        }

        if unwrapped.value.trim().is_empty() {
            debug!(field = field.name(), value = raw.as_str(), "skipping empty connective");
            continue;
        }

        let current = builder::single_value(backend, field, &unwrapped.value)?;
        if folded.is_none() {
            folded = Some(current);
            continue;
        }
        if !matches!(unwrapped.operator, Operator::And | Operator::Or) {
            return Err(ValopsError::IllegalOperator {
                op: unwrapped.operator,
                field: field.name().to_string(),
                value: raw.clone(),
            });
        }

        if run.operator.is_some_and(|op| op != unwrapped.operator) {
            switches += 1;
            if switches > MAX_CONNECTIVE_SWITCHES {
                return Err(ValopsError::invalid_input(format!(
                    "field '{}' switches between and/or more than {} times",
                    field.name(),
                    MAX_CONNECTIVE_SWITCHES
                )));
            }
            folded = run.close(folded);
        }
        run.operator = Some(unwrapped.operator);
        run.operands.push(current);
    }

    Ok(run.close(folded))
}

/// Consecutive values sharing one connective.
///
/// `((x op a) op b) op c` equals `x op (a op b op c)`, so a run is joined as
/// one balanced subtree and the tree only deepens when the connective changes.
#[derive(Default)]
struct Run {
    operator: Option<Operator>,
    operands: Vec<Expr>,
}

impl Run {
    fn close(&mut self, folded: Option<Expr>) -> Option<Expr> {
        let operands = std::mem::take(&mut self.operands);
        let operator = self.operator.take();
        let joined = match operator {
            Some(Operator::And) => Expr::all(operands),
            _ => Expr::any(operands),
        };
        match (folded, joined) {
            (Some(previous), Some(joined)) => Some(match operator {
                Some(Operator::And) => previous.and(joined),
                _ => previous.or(joined),
            }),
            (previous, None) => previous,
            (None, joined) => joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NumberBackend, TextBackend};
    use crate::context::RequestContext;
    use crate::error::ErrorKind;
    use crate::value::{Number, Value};

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn name<'a>(s: &'a String, _field: &str) -> Value<'a> {
        Value::String(s)
    }

    fn text(raw: &[&str]) -> Result<Option<Expr>> {
        compose(&TextBackend, &Field::text("name"), &values(raw), None)
    }

    #[test]
    fn no_values_no_predicate() {
        assert!(text(&[]).unwrap().is_none());
        assert!(text(&["  "]).unwrap().is_none());
        assert!(text(&["", " "]).unwrap().is_none());
        assert!(text(&["and()"]).unwrap().is_none());
    }

    #[test]
    fn plain_values_are_or_ed() {
        let expr = text(&["x", "y"]).unwrap().unwrap();
        assert!(matches!(expr, Expr::Or(_, _)));
        assert!(expr.matches(&"y".to_string(), name));
        assert!(!expr.matches(&"z".to_string(), name));
    }

    #[test]
    fn first_connective_sets_the_default() {
        let expr = text(&["and(startsWith(a))", "endsWith(z)"]).unwrap().unwrap();
        assert!(matches!(expr, Expr::And(_, _)));
        assert!(expr.matches(&"abcz".to_string(), name));
        assert!(!expr.matches(&"abc".to_string(), name));
    }

    #[test]
    fn fold_is_left_to_right() {
        // (a AND b) OR c
        let expr = text(&["startsWith(a)", "and(endsWith(b))", "or(c)"])
            .unwrap()
            .unwrap();
        match &expr {
            Expr::Or(left, _) => assert!(matches!(**left, Expr::And(_, _))),
            other => panic!("expected OR at the root, got {}", other),
        }
        assert!(expr.matches(&"c".to_string(), name));
        assert!(expr.matches(&"ab".to_string(), name));
        assert!(!expr.matches(&"a".to_string(), name));
    }

    #[test]
    fn single_value_sheds_connectives() {
        let expr = text(&["and(or(contains(x)))"]).unwrap().unwrap();
        assert!(expr.matches(&"axb".to_string(), name));
    }

    #[test]
    fn negated_values_join_with_the_default() {
        let expr = text(&["not(a)", "not(b)"]).unwrap().unwrap();
        assert!(matches!(expr, Expr::Or(_, _)));
        assert!(expr.matches(&"a".to_string(), name));

        let expr = text(&["and(not(a))", "not(b)"]).unwrap().unwrap();
        assert!(!expr.matches(&"a".to_string(), name));
        assert!(expr.matches(&"c".to_string(), name));
    }

    #[test]
    fn validation_runs_before_building() {
        let err = text(&["x", "contains(foo"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedExpression);
    }

    #[test]
    fn nested_connective_is_illegal() {
        let err = text(&["x", "not(and(y))"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalComposition);
    }

    #[test]
    fn overrides_replace_converted_values() {
        let field = Field::number("age");
        let ctx = RequestContext::new([("age", "gt(5)"), ("age", "and(lt(9))")]);
        let overrides = Overrides::new(&ctx, None);

        // What a converter left behind after dropping the operators
        let converted = values(&["5", "9"]);
        let expr = compose(&NumberBackend, &field, &converted, Some(&overrides))
            .unwrap()
            .unwrap();

        fn age<'a>(n: &'a i64, _field: &str) -> Value<'a> {
            Value::Number(Number::I64(*n))
        }
        assert!(expr.matches(&7, age));
        assert!(!expr.matches(&5, age));
        assert!(!expr.matches(&9, age));
    }

    #[test]
    fn single_override_is_used_when_present() {
        let field = Field::text("name");
        let ctx = RequestContext::new([("name", "ci(SMITH)")]);
        let overrides = Overrides::new(&ctx, None);
        let expr = compose(&TextBackend, &field, &values(&["SMITH"]), Some(&overrides))
            .unwrap()
            .unwrap();
        assert!(expr.matches(&"smith".to_string(), name));
    }

    #[test]
    fn long_value_lists_stay_shallow() {
        let raw: Vec<String> = (0..50_000).map(|i| format!("v{}", i)).collect();
        let expr = compose(&TextBackend, &Field::text("name"), &raw, None)
            .unwrap()
            .unwrap();
        assert_eq!(expr.leaf_count(), 50_000);
        assert!(expr.depth() <= 20, "depth {}", expr.depth());
        assert!(expr.matches(&"v49999".to_string(), name));
        assert!(!expr.matches(&"w".to_string(), name));
    }

    #[test]
    fn runs_keep_left_to_right_meaning() {
        // ((a OR b OR c) AND d AND e) OR f
        let expr = text(&[
            "contains(a)",
            "contains(b)",
            "contains(c)",
            "and(contains(d))",
            "and(contains(e))",
            "or(contains(f))",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(expr.leaf_count(), 6);
        assert!(expr.matches(&"bde".to_string(), name));
        assert!(expr.matches(&"f".to_string(), name));
        assert!(!expr.matches(&"ad".to_string(), name));
        assert!(!expr.matches(&"de".to_string(), name));
    }

    #[test]
    fn too_many_connective_switches_is_invalid_input() {
        let alternating = |count: usize| -> Vec<String> {
            (0..count)
                .map(|i| {
                    if i % 2 == 0 {
                        format!("or(v{})", i)
                    } else {
                        format!("and(v{})", i)
                    }
                })
                .collect()
        };
        let field = Field::text("name");

        // The first value only sets the default, so n values switch n - 2 times
        let within = alternating(MAX_CONNECTIVE_SWITCHES + 2);
        assert!(compose(&TextBackend, &field, &within, None).unwrap().is_some());

        let beyond = alternating(MAX_CONNECTIVE_SWITCHES + 3);
        let err = compose(&TextBackend, &field, &beyond, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
