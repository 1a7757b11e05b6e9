//! The textual operator vocabulary.
//!
//! Every [`Operator`] has exactly one canonical token. A value is *wrapped* by
//! an operator when it reads `token(inner)`, for example `contains(smith)` or
//! `not(eq(active))`.

/// Opening delimiter between an operator token and its operand.
pub const OPEN: char = '(';

/// Closing delimiter of an operator-wrapped value.
pub const CLOSE: char = ')';

/// Value operator, as written inside a query value.
///
/// Declaration order is the detection order used whenever a value is checked
/// against several operators at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison operators
    /// Equality; the default when a value carries no wrapper.
    Eq,
    /// Inequality.
    Ne,
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Regular expression match.
    Matches,

    // Logical operators
    /// Conjunction across several values of one field.
    And,
    /// Disjunction across several values of one field (the multi-value default).
    Or,
    /// Negation of the wrapped expression.
    Not,

    // Ordering comparisons
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    // Modifier
    /// Case-insensitive evaluation of the wrapped comparison.
    CaseIgnore,
}

/// The role an operator plays in a value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Produces a leaf comparison against the field.
    Comparison,
    /// Combines or negates expressions.
    Logical,
    /// Changes how the wrapped comparison is evaluated.
    Modifier,
}

impl Operator {
    /// All operators in declaration order.
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Matches,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::CaseIgnore,
    ];

    /// The ten comparison operators in declaration order.
    pub const COMPARISONS: [Operator; 10] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Matches,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
    ];

    /// Operators that only make sense between several values of one field.
    pub const MULTI_VALUE: [Operator; 2] = [Operator::And, Operator::Or];

    /// Returns the canonical token.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Matches => "matches",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::CaseIgnore => "ci",
        }
    }

    /// Returns the category of this operator.
    pub fn category(self) -> Category {
        match self {
            Operator::And | Operator::Or | Operator::Not => Category::Logical,
            Operator::CaseIgnore => Category::Modifier,
            _ => Category::Comparison,
        }
    }

    /// Returns `true` for comparison operators.
    pub fn is_comparison(self) -> bool {
        self.category() == Category::Comparison
    }

    /// Returns `true` for `and` and `or`.
    pub fn is_multi_value(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Looks an operator up by token, ignoring case.
    pub fn from_token(token: &str) -> Option<Operator> {
        let token = token.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.token().eq_ignore_ascii_case(token))
    }

    /// Returns `true` if `value` is wrapped by this operator.
    ///
    /// The token match is case-sensitive and must be followed directly by `(`;
    /// the value must end with `)`.
    pub fn wraps(self, value: &str) -> bool {
        self.opens(value) && value.len() > self.token().len() + 1 && value.ends_with(CLOSE)
    }

    /// Returns `true` if `value` starts with this operator's token and `(`,
    /// whether or not it is closed.
    pub fn opens(self, value: &str) -> bool {
        value
            .strip_prefix(self.token())
            .is_some_and(|rest| rest.starts_with(OPEN))
    }

    /// Renders `token(value)`.
    pub fn wrap(self, value: &str) -> String {
        format!("{}{}{}{}", self.token(), OPEN, value, CLOSE)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
