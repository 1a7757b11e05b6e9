//! Leaf comparisons of an expression tree.
//!
//! A [`Clause`] is what a leaf backend produces for one resolved operator and
//! literal: a field name, an [`Op`], a [`ClauseValue`] and a case flag.

use regex::Regex;

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A single leaf comparison.
///
/// # Example
///
/// ```
/// use valops::{Clause, ClauseValue, Op, Value};
///
/// let clause = Clause::new("name", Op::Contains, "smith").ignoring_case();
/// assert!(clause.matches(&Value::String("John Smith")));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
    /// Compare strings without regard to case.
    pub ignore_case: bool,
}

impl Clause {
    /// Creates a new case-sensitive clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
            ignore_case: false,
        }
    }

    /// Returns this clause with case-insensitive string comparison.
    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Evaluates this clause against a field value.
    ///
    /// Returns `false` if the value doesn't match, if the types are
    /// incompatible, or if the field is missing.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::String(pattern), Value::String(s)) => self.match_string(s, pattern),

            (ClauseValue::Regex(regex), Value::String(s)) => regex.is_match(s),

            (ClauseValue::Number(clause_num), Value::Number(field_num)) => {
                self.match_number(*field_num, *clause_num)
            }

            (ClauseValue::Timestamp(clause_ts), Value::Timestamp(field_ts)) => {
                self.op.eval_ordering(field_ts.cmp(clause_ts))
            }

            (ClauseValue::Range(low, high), Value::Timestamp(field_ts)) => {
                self.op == Op::Between && low <= field_ts && field_ts <= high
            }

            (ClauseValue::Enum(member), Value::Enum(name)) => match self.op {
                Op::Eq => name == member,
                Op::Ne => name != member,
                _ => false,
            },

            (ClauseValue::EnumSet(set), Value::Enum(name)) => {
                self.op == Op::In && set.iter().any(|member| member == name)
            }

            // A missing field never matches any positive assertion, Ne included
            (_, Value::None) => false,

            // Type mismatch
            _ => false,
        }
    }

    fn match_string(&self, field: &str, pattern: &str) -> bool {
        if self.ignore_case {
            let field = field.to_lowercase();
            let pattern = pattern.to_lowercase();
            return self.compare_strings(&field, &pattern);
        }
        self.compare_strings(field, pattern)
    }

    fn compare_strings(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            _ => false,
        }
    }

    fn match_number(&self, field: Number, clause: Number) -> bool {
        match field.compare(clause) {
            Some(ordering) => self.op.eval_ordering(ordering),
            None => false, // NaN comparison
        }
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            ClauseValue::Range(low, high) => {
                write!(f, "{} between {} and {}", self.field, low, high)
            }
            value => {
                write!(f, "{} {} {}", self.field, self.op, value)?;
                if self.ignore_case {
                    f.write_str(" (ci)")?;
                }
                Ok(())
            }
        }
    }
}

/// Owned comparison value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Inclusive timestamp range (for `Between`).
    Range(Timestamp, Timestamp),
    /// Single enum member name.
    Enum(String),
    /// Set of enum member names (for `In`).
    EnumSet(Vec<String>),
    /// Compiled regular expression.
    Regex(Regex),
}

impl std::fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseValue::String(s) => write!(f, "{:?}", s),
            ClauseValue::Number(n) => write!(f, "{}", n),
            ClauseValue::Timestamp(t) => write!(f, "{}", t),
            ClauseValue::Range(low, high) => write!(f, "[{}, {}]", low, high),
            ClauseValue::Enum(member) => f.write_str(member),
            ClauseValue::EnumSet(set) => write!(f, "[{}]", set.join(", ")),
            ClauseValue::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(v: Vec<String>) -> Self {
        ClauseValue::EnumSet(v)
    }
}
