//! Text fields.

use regex::Regex;

use super::{leaf, LeafBackend};
use crate::clause::Clause;
use crate::error::Result;
use crate::expr::Expr;
use crate::field::Field;
use crate::op::Op;
use crate::operator::Operator;

const TEXT_OPERATORS: [Operator; 6] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Matches,
];

/// Backend for free-text fields. Supports every string comparison; ordering
/// comparisons are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextBackend;

impl TextBackend {
    fn string(field: &Field, op: Op, value: &str, ignore_case: bool) -> Expr {
        let clause = Clause::new(field.name(), op, value);
        Expr::leaf(if ignore_case {
            clause.ignoring_case()
        } else {
            clause
        })
    }
}

impl LeafBackend for TextBackend {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn supported_operators(&self) -> &'static [Operator] {
        &TEXT_OPERATORS
    }

    fn supports_loose_values(&self) -> bool {
        true
    }

    fn eq(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        Ok(Self::string(field, Op::Eq, value, ignore_case))
    }

    fn ne(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        Ok(Self::string(field, Op::Ne, value, ignore_case))
    }

    fn contains(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        Ok(Self::string(field, Op::Contains, value, ignore_case))
    }

    fn starts_with(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        Ok(Self::string(field, Op::StartsWith, value, ignore_case))
    }

    fn ends_with(&self, field: &Field, value: &str, ignore_case: bool) -> Result<Expr> {
        Ok(Self::string(field, Op::EndsWith, value, ignore_case))
    }

    fn matches(&self, field: &Field, value: &str) -> Result<Expr> {
        let regex = Regex::new(value)?;
        Ok(leaf(field, Op::Regex, regex))
    }
}
