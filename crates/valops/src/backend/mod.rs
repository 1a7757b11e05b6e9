//! Leaf backends: one per field value kind.
//!
//! A [`LeafBackend`] turns a resolved operator and literal into a
//! [`Clause`](crate::Clause) for its value kind, declares which operators it
//! accepts, and reports [`UnsupportedOperator`](crate::ValopsError::UnsupportedOperator)
//! for the rest. The default methods reject everything, so each backend only
//! implements what its kind supports.

mod date;
mod enumeration;
mod number;
mod text;

pub use date::DateBackend;
pub use enumeration::EnumBackend;
pub use number::NumberBackend;
pub use text::TextBackend;

use crate::clause::{Clause, ClauseValue};
use crate::compose;
use crate::context::Overrides;
use crate::error::{Result, ValopsError};
use crate::expr::Expr;
use crate::field::Field;
use crate::op::Op;
use crate::operator::Operator;

/// Per-kind comparison capability.
///
/// Operator methods receive the literal found at the leaf of a value
/// expression. `ignore_case` is only offered where case can matter.
pub trait LeafBackend: Send + Sync + std::fmt::Debug {
    /// Value kind name used in messages (`"text"`, `"numeric"`, ...).
    fn kind(&self) -> &'static str;

    /// Comparison operators accepted in single values, in detection order.
    ///
    /// `not` and `ci` are accepted by every backend and are not listed.
    fn supported_operators(&self) -> &'static [Operator];

    /// Whether string-oriented operators are accepted for this kind.
    fn supports_loose_values(&self) -> bool {
        false
    }

    fn eq(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        let _ = (field, value, ignore_case);
        Err(ValopsError::unsupported(Operator::Eq, self.kind()))
    }

    fn ne(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        let _ = (field, value, ignore_case);
        Err(ValopsError::unsupported(Operator::Ne, self.kind()))
    }

    fn contains(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        let _ = (field, value, ignore_case);
        Err(ValopsError::unsupported(Operator::Contains, self.kind()))
    }

    fn starts_with(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        let _ = (field, value, ignore_case);
        Err(ValopsError::unsupported(Operator::StartsWith, self.kind()))
    }

    fn ends_with(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        let _ = (field, value, ignore_case);
        Err(ValopsError::unsupported(Operator::EndsWith, self.kind()))
    }

    /// Regular expression match; there is no case flag, use inline `(?i)`.
    fn matches(&self, field: &Field, value: &str) -> Result<Expr> {
        let _ = (field, value);
        Err(ValopsError::unsupported(Operator::Matches, self.kind()))
    }

    fn gt(&self, field: &Field, value: &str) -> Result<Expr> {
        let _ = (field, value);
        Err(ValopsError::unsupported(Operator::Gt, self.kind()))
    }

    fn gte(&self, field: &Field, value: &str) -> Result<Expr> {
        let _ = (field, value);
        Err(ValopsError::unsupported(Operator::Gte, self.kind()))
    }

    fn lt(&self, field: &Field, value: &str) -> Result<Expr> {
        let _ = (field, value);
        Err(ValopsError::unsupported(Operator::Lt, self.kind()))
    }

    fn lte(&self, field: &Field, value: &str) -> Result<Expr> {
        let _ = (field, value);
        Err(ValopsError::unsupported(Operator::Lte, self.kind()))
    }

    /// Builds the predicate for all raw values given for `field`.
    ///
    /// The default runs the multi-value composer over the operator grammar.
    fn predicate(
        &self,
        field: &Field,
        values: &[String],
        overrides: Option<&Overrides<'_>>,
    ) -> Result<Option<Expr>> {
        compose::compose(self, field, values, overrides)
    }
}

/// Invokes the backend operation named by `operator`.
///
/// Only comparison operators name an operation; anything else reaching a leaf
/// is a composition error.
pub(crate) fn apply<B: LeafBackend + ?Sized>(
    backend: &B,
    operator: Operator,
    field: &Field,
    value: &str,
    ignore_case: bool,
) -> Result<Expr> {
    match operator {
        Operator::Eq => backend.eq(field, value, ignore_case),
        Operator::Ne => backend.ne(field, value, ignore_case),
        Operator::Contains => backend.contains(field, value, ignore_case),
        Operator::StartsWith => backend.starts_with(field, value, ignore_case),
        Operator::EndsWith => backend.ends_with(field, value, ignore_case),
        Operator::Matches => backend.matches(field, value),
        Operator::Gt => backend.gt(field, value),
        Operator::Gte => backend.gte(field, value),
        Operator::Lt => backend.lt(field, value),
        Operator::Lte => backend.lte(field, value),
        Operator::And | Operator::Or | Operator::Not | Operator::CaseIgnore => {
            Err(ValopsError::illegal_composition(format!(
                "'{}' does not name a comparison",
                operator
            )))
        }
    }
}

/// Builds a single-clause expression.
fn leaf(field: &Field, op: Op, value: impl Into<ClauseValue>) -> Expr {
    Expr::leaf(Clause::new(field.name(), op, value))
}
