//! Date and date-time fields.
//!
//! Dates do not go through the operator grammar. The raw values are parsed
//! as timestamps and combined by count: one value is an equality, two values
//! are an inclusive range, more values are alternatives.

use tracing::debug;

use super::{leaf, LeafBackend};
use crate::clause::ClauseValue;
use crate::context::Overrides;
use crate::error::Result;
use crate::expr::Expr;
use crate::field::Field;
use crate::op::Op;
use crate::operator::Operator;
use crate::value::Timestamp;

const DATE_OPERATORS: [Operator; 1] = [Operator::Eq];

/// Backend for date fields.
///
/// The registry always goes through [`LeafBackend::predicate`]. Used directly
/// with [`builder::single_value`](crate::builder::single_value), a value may
/// only be a bare date, `eq(..)` or their negation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateBackend;

impl LeafBackend for DateBackend {
    fn kind(&self) -> &'static str {
        "date"
    }

    fn supported_operators(&self) -> &'static [Operator] {
        &DATE_OPERATORS
    }

    fn eq(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        Ok(leaf(field, Op::Eq, Timestamp::parse(value)?))
    }

    fn predicate(
        &self,
        field: &Field,
        values: &[String],
        _overrides: Option<&Overrides<'_>>,
    ) -> Result<Option<Expr>> {
        let stamps = values
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Timestamp::parse(v))
            .collect::<Result<Vec<_>>>()?;

        debug!(field = field.name(), count = stamps.len(), "building date predicate");
        let expr = match stamps.as_slice() {
            [] => None,
            [single] => Some(leaf(field, Op::Eq, *single)),
            [a, b] => {
                let (low, high) = if a <= b { (*a, *b) } else { (*b, *a) };
                Some(leaf(field, Op::Between, ClauseValue::Range(low, high)))
            }
            many => Expr::any(many.iter().map(|stamp| leaf(field, Op::Eq, *stamp))),
        };
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use crate::error::ErrorKind;
    use crate::value::Value;

    fn hired() -> Field {
        Field::timestamp("hired_on")
    }

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    struct Hire(Timestamp);

    fn hired_on<'a>(hire: &'a Hire, _field: &str) -> Value<'a> {
        Value::Timestamp(hire.0)
    }

    fn check(expr: &Expr, text: &str) -> bool {
        expr.matches(&Hire(Timestamp::parse(text).unwrap()), hired_on)
    }

    #[test]
    fn single_value_is_equality() {
        let expr = DateBackend
            .predicate(&hired(), &values(&["2020-01-10"]), None)
            .unwrap()
            .unwrap();
        assert!(check(&expr, "2020-01-10"));
        assert!(!check(&expr, "2020-01-11"));
    }

    #[test]
    fn two_values_are_an_inclusive_range_in_any_order() {
        let expr = DateBackend
            .predicate(&hired(), &values(&["2020-12-31", "2020-01-01"]), None)
            .unwrap()
            .unwrap();
        assert!(matches!(
            &expr,
            Expr::Leaf(c) if c.op == Op::Between
        ));
        assert!(check(&expr, "2020-01-01"));
        assert!(check(&expr, "2020-06-15"));
        assert!(check(&expr, "2020-12-31"));
        assert!(!check(&expr, "2021-01-01"));
    }

    #[test]
    fn more_values_are_alternatives() {
        let expr = DateBackend
            .predicate(
                &hired(),
                &values(&["2020-01-01", "2020-02-01", "2020-03-01"]),
                None,
            )
            .unwrap()
            .unwrap();
        assert_eq!(expr.leaf_count(), 3);
        assert!(check(&expr, "2020-02-01"));
        assert!(!check(&expr, "2020-02-02"));
    }

    #[test]
    fn no_values_is_no_predicate() {
        assert!(DateBackend.predicate(&hired(), &[], None).unwrap().is_none());
        assert!(DateBackend
            .predicate(&hired(), &values(&["  "]), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn unparseable_date_is_invalid_input() {
        let err = DateBackend
            .predicate(&hired(), &values(&["yesterday"]), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn many_dates_stay_shallow() {
        let start = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let raw: Vec<String> = (0..20_000i64)
            .map(|day| (start + chrono::Duration::days(day)).to_string())
            .collect();
        let expr = DateBackend.predicate(&hired(), &raw, None).unwrap().unwrap();
        assert_eq!(expr.leaf_count(), 20_000);
        assert!(expr.depth() <= 18, "depth {}", expr.depth());
        assert!(check(&expr, "2010-06-15"));
        assert!(!check(&expr, "1999-12-31"));
    }

    #[test]
    fn single_values_through_the_builder() {
        // Used directly, outside a registry, the backend takes one operator
        let field = hired();
        let bare = builder::single_value(&DateBackend, &field, "2020-01-10").unwrap();
        let explicit = builder::single_value(&DateBackend, &field, "eq(2020-01-10)").unwrap();
        for expr in [&bare, &explicit] {
            assert!(check(expr, "2020-01-10"));
            assert!(!check(expr, "2020-01-11"));
        }

        let negated = builder::single_value(&DateBackend, &field, "not(2020-01-10)").unwrap();
        assert!(check(&negated, "2020-01-11"));

        let err = builder::single_value(&DateBackend, &field, "gt(2020-01-10)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    }
}
