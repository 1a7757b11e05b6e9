//! Single-value expressions.
//!
//! One raw value such as `not(ci(contains(smith)))` is parsed into a [`Node`]
//! tree and then built into an [`Expr`] by the field's backend.
//!
//! Nesting rules:
//!
//! - `not` may wrap `not`, `ci` or a comparison, but may itself only appear
//!   at the top or directly under another `not`.
//! - `ci` may wrap `ci` or a comparison.
//! - A comparison wraps a literal only.
//! - `and` and `or` belong to the multi-value level and never appear here.

use tracing::trace;

use crate::backend::{self, LeafBackend};
use crate::error::{Result, ValopsError};
use crate::expr::Expr;
use crate::field::Field;
use crate::operator::Operator;
use crate::syntax;

/// Deepest wrapper nesting accepted in one value.
pub const MAX_DEPTH: usize = 32;

/// Parsed single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A comparison against a literal.
    Leaf {
        operator: Operator,
        value: String,
        ignore_case: bool,
    },
    /// `not(..)`
    Not(Box<Node>),
    /// `ci(..)`
    CaseIgnore(Box<Node>),
}

impl Node {
    /// Parses `value` against the operators `backend` accepts.
    ///
    /// A value without a recognised wrapper is an equality. A value wrapped by
    /// a comparison the backend does not support is rejected rather than
    /// compared literally.
    pub fn parse<B: LeafBackend + ?Sized>(backend: &B, value: &str) -> Result<Node> {
        let candidates = candidates(backend);
        parse_node(backend.kind(), &candidates, value, None, false, 0)
    }

    /// Builds the expression for `field`.
    pub fn build<B: LeafBackend + ?Sized>(&self, backend: &B, field: &Field) -> Result<Expr> {
        match self {
            Node::Leaf {
                operator,
                value,
                ignore_case,
            } => backend::apply(backend, *operator, field, value, *ignore_case),
            Node::Not(inner) => Ok(inner.build(backend, field)?.not()),
            Node::CaseIgnore(inner) => inner.build(backend, field),
        }
    }

    /// The operator at the root of this node.
    pub fn operator(&self) -> Operator {
        match self {
            Node::Leaf { operator, .. } => *operator,
            Node::Not(_) => Operator::Not,
            Node::CaseIgnore(_) => Operator::CaseIgnore,
        }
    }
}

/// Parses and builds one raw value for `field`.
///
/// ```
/// use valops::{builder, backend::TextBackend, Field, Value};
///
/// fn name<'a>(s: &'a String, _field: &str) -> Value<'a> {
///     Value::String(s)
/// }
///
/// let field = Field::text("name");
/// let expr = builder::single_value(&TextBackend, &field, "not(ci(eq(smith)))").unwrap();
/// assert!(expr.matches(&"Jones".to_string(), name));
/// assert!(!expr.matches(&"SMITH".to_string(), name));
/// ```
pub fn single_value<B: LeafBackend + ?Sized>(
    backend: &B,
    field: &Field,
    value: &str,
) -> Result<Expr> {
    let node = Node::parse(backend, value)?;
    trace!(field = field.name(), value, ?node, "parsed value");
    node.build(backend, field)
}

/// Backend operators plus the operators every backend accepts.
fn candidates<B: LeafBackend + ?Sized>(backend: &B) -> Vec<Operator> {
    let mut ops = backend.supported_operators().to_vec();
    ops.extend([Operator::Not, Operator::CaseIgnore]);
    ops
}

fn parse_node(
    kind: &'static str,
    candidates: &[Operator],
    value: &str,
    parent: Option<Operator>,
    ignore_case: bool,
    depth: usize,
) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(ValopsError::malformed(format!(
            "more than {} nested operators in '{}'",
            MAX_DEPTH, value
        )));
    }

    let trimmed = value.trim();
    if let Some(op) = syntax::find_wrapper(&Operator::MULTI_VALUE, trimmed) {
        return Err(ValopsError::illegal_composition(format!(
            "'{}' may only combine several values, found in '{}'",
            op, trimmed
        )));
    }

    let unwrapped = syntax::extract(value, candidates, Operator::Eq)?;
    if !unwrapped.explicit {
        if let Some(op) = syntax::find_wrapper(&Operator::COMPARISONS, trimmed) {
            return Err(ValopsError::unsupported(op, kind));
        }
    }

    match unwrapped.operator {
        Operator::Not => {
            if parent.is_some_and(|p| p != Operator::Not) {
                return Err(ValopsError::illegal_composition(format!(
                    "'not' may only be nested directly under 'not', found in '{}'",
                    trimmed
                )));
            }
            let inner = operand(Operator::Not, &unwrapped.value)?;
            let child = parse_node(
                kind,
                candidates,
                inner,
                Some(Operator::Not),
                ignore_case,
                depth + 1,
            )?;
            Ok(Node::Not(Box::new(child)))
        }
        Operator::CaseIgnore => {
            let inner = operand(Operator::CaseIgnore, &unwrapped.value)?;
            let child = parse_node(
                kind,
                candidates,
                inner,
                Some(Operator::CaseIgnore),
                true,
                depth + 1,
            )?;
            Ok(Node::CaseIgnore(Box::new(child)))
        }
        operator => {
            let inner = unwrapped.value.trim();
            if let Some(nested) = syntax::find_wrapper(&Operator::ALL, inner) {
                return Err(ValopsError::illegal_composition(format!(
                    "'{}' cannot wrap '{}'",
                    operator, nested
                )));
            }
            Ok(Node::Leaf {
                operator,
                value: unwrapped.value,
                ignore_case,
            })
        }
    }
}

fn operand(operator: Operator, inner: &str) -> Result<&str> {
    if inner.trim().is_empty() {
        return Err(ValopsError::malformed(format!(
            "'{}' requires an operand",
            operator
        )));
    }
    Ok(inner)
}
