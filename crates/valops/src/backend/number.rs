//! Numeric fields.

use super::{leaf, LeafBackend};
use crate::error::Result;
use crate::expr::Expr;
use crate::field::Field;
use crate::op::Op;
use crate::operator::Operator;
use crate::value::Number;

const NUMBER_OPERATORS: [Operator; 6] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
];

/// Backend for numeric fields. Literals must parse as numbers; string
/// operators are rejected. Case never matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberBackend;

impl NumberBackend {
    fn compare(field: &Field, op: Op, value: &str) -> Result<Expr> {
        let number = Number::parse(value)?;
        Ok(leaf(field, op, number))
    }
}

impl LeafBackend for NumberBackend {
    fn kind(&self) -> &'static str {
        "numeric"
    }

    fn supported_operators(&self) -> &'static [Operator] {
        &NUMBER_OPERATORS
    }

    fn eq(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        Self::compare(field, Op::Eq, value)
    }

    fn ne(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        Self::compare(field, Op::Ne, value)
    }

    fn gt(&self, field: &Field, value: &str) -> Result<Expr> {
        Self::compare(field, Op::Gt, value)
    }

    fn gte(&self, field: &Field, value: &str) -> Result<Expr> {
        Self::compare(field, Op::Gte, value)
    }

    fn lt(&self, field: &Field, value: &str) -> Result<Expr> {
        Self::compare(field, Op::Lt, value)
    }

    fn lte(&self, field: &Field, value: &str) -> Result<Expr> {
        Self::compare(field, Op::Lte, value)
    }
}
