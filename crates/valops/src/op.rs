//! Resolved comparison operators for expression leaves.
//!
//! [`Op`] is what a leaf [`Clause`](crate::Clause) evaluates. It differs from
//! the textual [`Operator`](crate::Operator) vocabulary: backends resolve the
//! parsed operator into an `Op` (loose enum matching becomes `In`, a pair of
//! dates becomes `Between`).

use std::cmp::Ordering;

/// Comparison operator of an expression leaf.
///
/// Operators are grouped by the values they apply to:
/// - **Universal**: `Eq`, `Ne`
/// - **String**: `StartsWith`, `EndsWith`, `Contains`, `Regex`
/// - **Numeric/Timestamp**: `Gt`, `Gte`, `Lt`, `Lte`
/// - **Enum**: `In` - membership in a set of member names
/// - **Timestamp**: `Between` - inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Universal operators
    /// Equal (exact match).
    Eq,
    /// Not equal.
    Ne,

    // String operators
    /// String starts with prefix.
    StartsWith,
    /// String ends with suffix.
    EndsWith,
    /// String contains substring.
    Contains,
    /// String matches regular expression.
    Regex,

    // Numeric/Timestamp comparison operators
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    /// Enum member is one of the given set.
    In,
    /// Timestamp lies within an inclusive range.
    Between,
}

impl Op {
    /// Evaluates a comparison given an ordering result.
    ///
    /// Used for numeric and timestamp comparisons where we have an
    /// `Ordering` from comparing the field value with the clause value.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Returns the symbol used when rendering an expression.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::Regex => "=~",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "in",
            Op::Between => "between",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_eval_ordering() {
        assert!(Op::Eq.eval_ordering(Ordering::Equal));
        assert!(!Op::Eq.eval_ordering(Ordering::Less));

        assert!(!Op::Ne.eval_ordering(Ordering::Equal));
        assert!(Op::Ne.eval_ordering(Ordering::Greater));

        assert!(Op::Gt.eval_ordering(Ordering::Greater));
        assert!(!Op::Gt.eval_ordering(Ordering::Equal));

        assert!(Op::Gte.eval_ordering(Ordering::Equal));
        assert!(!Op::Gte.eval_ordering(Ordering::Less));

        assert!(Op::Lt.eval_ordering(Ordering::Less));
        assert!(!Op::Lt.eval_ordering(Ordering::Equal));

        assert!(Op::Lte.eval_ordering(Ordering::Equal));
        assert!(!Op::Lte.eval_ordering(Ordering::Greater));

        // Set and range operators are not ordering based
        assert!(!Op::In.eval_ordering(Ordering::Equal));
        assert!(!Op::Between.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn op_display() {
        assert_eq!(Op::Eq.to_string(), "==");
        assert_eq!(Op::StartsWith.to_string(), "startswith");
        assert_eq!(Op::Between.to_string(), "between");
    }
}
