//! Boolean expression trees and their in-memory evaluation.
//!
//! An [`Expr`] is what the engine hands back for one field: leaf
//! [`Clause`]s combined with AND, OR and NOT. Callers can render it, combine
//! it with other expressions, or evaluate it against a collection through an
//! accessor function.

use crate::clause::Clause;
use crate::value::Value;

/// A boolean expression over field comparisons.
///
/// # Example
///
/// ```
/// use valops::{Clause, Expr, Op, Value};
///
/// let expr = Expr::leaf(Clause::new("name", Op::StartsWith, "jo"))
///     .and(Expr::leaf(Clause::new("name", Op::EndsWith, "n")));
///
/// fn accessor<'a>(name: &'a String, _field: &str) -> Value<'a> {
///     Value::String(name)
/// }
///
/// let names = vec!["john".to_string(), "joe".to_string()];
/// assert_eq!(expr.filter(&names, accessor), vec![&names[0]]);
/// ```
#[derive(Debug, Clone)]
pub enum Expr {
    /// A single comparison.
    Leaf(Clause),
    /// Negation.
    Not(Box<Expr>),
    /// Both sides must match.
    And(Box<Expr>, Box<Expr>),
    /// Either side must match.
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Wraps a clause.
    pub fn leaf(clause: Clause) -> Self {
        Expr::Leaf(clause)
    }

    /// Combines with `other` so that both must match.
    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Combines with `other` so that either may match.
    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Negates this expression.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Conjunction of every expression, or `None` for an empty input.
    ///
    /// The tree is balanced, so its depth grows with the log of the count.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        balanced(exprs.into_iter().collect(), Expr::and)
    }

    /// Disjunction of every expression, or `None` for an empty input.
    ///
    /// Balanced like [`Expr::all`].
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        balanced(exprs.into_iter().collect(), Expr::or)
    }

    /// Length of the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Leaf(_) => 1,
            Expr::Not(inner) => 1 + inner.depth(),
            Expr::And(left, right) | Expr::Or(left, right) => {
                1 + left.depth().max(right.depth())
            }
        }
    }

    /// Number of leaf clauses in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Leaf(_) => 1,
            Expr::Not(inner) => inner.leaf_count(),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
        }
    }

    /// Visits every leaf clause, left to right.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Expr::Leaf(clause) => out.push(clause),
            Expr::Not(inner) => inner.collect_clauses(out),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_clauses(out);
                right.collect_clauses(out);
            }
        }
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches this expression.
    ///
    /// The accessor function extracts field values from the item.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.eval(item, &accessor)
    }

    fn eval<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        match self {
            Expr::Leaf(clause) => clause.matches(&accessor(item, &clause.field)),
            Expr::Not(inner) => !inner.eval(item, accessor),
            Expr::And(left, right) => left.eval(item, accessor) && right.eval(item, accessor),
            Expr::Or(left, right) => left.eval(item, accessor) || right.eval(item, accessor),
        }
    }

    /// Filters a slice, returning references to matching items in order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items
            .iter()
            .filter(|item| self.eval(*item, &accessor))
            .collect()
    }

    /// Counts the number of matching items.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().filter(|item| self.eval(*item, &accessor)).count()
    }

    /// Finds the first matching item.
    pub fn find<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items.iter().find(|item| self.eval(*item, &accessor))
    }
}

fn balanced(mut exprs: Vec<Expr>, join: fn(Expr, Expr) -> Expr) -> Option<Expr> {
    match exprs.len() {
        0 => None,
        1 => exprs.pop(),
        len => {
            let right = exprs.split_off(len / 2);
            let left = balanced(exprs, join)?;
            let right = balanced(right, join)?;
            Some(join(left, right))
        }
    }
}

impl From<Clause> for Expr {
    fn from(clause: Clause) -> Self {
        Expr::Leaf(clause)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Leaf(clause) => write!(f, "{}", clause),
            Expr::Not(inner) => write!(f, "NOT ({})", inner),
            Expr::And(left, right) => write!(f, "({}) AND ({})", left, right),
            Expr::Or(left, right) => write!(f, "({}) OR ({})", left, right),
        }
    }
}
