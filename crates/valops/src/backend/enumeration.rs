//! Enumeration fields.
//!
//! Equality resolves the literal to a declared member. In loose value mode the
//! string operators are also accepted: they select every member whose name
//! satisfies the operator, case-insensitively, and produce an `in` clause.

use std::sync::Arc;

use moka::sync::Cache;
use regex::{Regex, RegexBuilder};
use tracing::trace;

use super::{leaf, LeafBackend};
use crate::clause::ClauseValue;
use crate::config::Settings;
use crate::error::{Result, ValopsError};
use crate::expr::Expr;
use crate::field::Field;
use crate::op::Op;
use crate::operator::Operator;

const STRICT_OPERATORS: [Operator; 2] = [Operator::Eq, Operator::Ne];

const LOOSE_OPERATORS: [Operator; 6] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Matches,
];

/// Backend for enumeration fields.
pub struct EnumBackend {
    settings: Arc<Settings>,
    /// Compiled full-match, case-insensitive patterns keyed by source.
    patterns: Cache<String, Regex>,
}

impl std::fmt::Debug for EnumBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumBackend")
            .field("loose_values", &self.settings.loose_values())
            .field("cached_patterns", &self.patterns.entry_count())
            .finish()
    }
}

impl EnumBackend {
    pub(crate) fn new(settings: Arc<Settings>) -> Self {
        let patterns = Cache::builder()
            .max_capacity(settings.regex_cache_capacity())
            .build();
        EnumBackend { settings, patterns }
    }

    /// Resolves `value` to a member: exact name first, then a unique
    /// case-insensitive match.
    fn member<'f>(&self, field: &'f Field, value: &str) -> Result<&'f str> {
        let value = value.trim();
        let members = field.members();
        if let Some(exact) = members.iter().find(|m| m.as_str() == value) {
            return Ok(exact.as_str());
        }

        let mut folded = members.iter().filter(|m| m.eq_ignore_ascii_case(value));
        match (folded.next(), folded.next()) {
            (Some(member), None) => Ok(member.as_str()),
            (Some(_), Some(_)) => Err(ValopsError::invalid_input(format!(
                "'{}' matches several members of enum field '{}'",
                value,
                field.name()
            ))),
            (None, _) => Err(ValopsError::invalid_input(format!(
                "'{}' is not a member of enum field '{}'",
                value,
                field.name()
            ))),
        }
    }

    fn require_loose(&self, op: Operator) -> Result<()> {
        if self.settings.loose_values() {
            Ok(())
        } else {
            Err(ValopsError::unsupported(op, self.kind()))
        }
    }

    /// Builds an `in` clause over the members accepted by `keep`.
    fn select<F>(field: &Field, keep: F) -> Expr
    where
        F: Fn(&str) -> bool,
    {
        let selected: Vec<String> = field
            .members()
            .iter()
            .filter(|m| keep(m.to_lowercase().as_str()))
            .cloned()
            .collect();
        leaf(field, Op::In, ClauseValue::EnumSet(selected))
    }

    fn pattern(&self, source: &str) -> Result<Regex> {
        self.patterns
            .try_get_with(source.to_string(), || {
                trace!(pattern = source, "compiling enum pattern");
                RegexBuilder::new(&format!("^(?:{})$", source))
                    .case_insensitive(true)
                    .build()
            })
            .map_err(|err| ValopsError::InvalidRegex((*err).clone()))
    }
}

impl LeafBackend for EnumBackend {
    fn kind(&self) -> &'static str {
        "enum"
    }

    fn supported_operators(&self) -> &'static [Operator] {
        if self.settings.loose_values() {
            &LOOSE_OPERATORS
        } else {
            &STRICT_OPERATORS
        }
    }

    fn supports_loose_values(&self) -> bool {
        self.settings.loose_values()
    }

    fn eq(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        let member = self.member(field, value)?;
        Ok(leaf(field, Op::Eq, ClauseValue::Enum(member.to_string())))
    }

    fn ne(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        let member = self.member(field, value)?;
        Ok(leaf(field, Op::Ne, ClauseValue::Enum(member.to_string())))
    }

    fn contains(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        self.require_loose(Operator::Contains)?;
        let needle = value.to_lowercase();
        Ok(Self::select(field, |m| m.contains(&needle)))
    }

    fn starts_with(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        self.require_loose(Operator::StartsWith)?;
        let needle = value.to_lowercase();
        Ok(Self::select(field, |m| m.starts_with(&needle)))
    }

    fn ends_with(&self, field: &Field, value: &str, _ignore_case: bool) -> Result<Expr> {
        self.require_loose(Operator::EndsWith)?;
        let needle = value.to_lowercase();
        Ok(Self::select(field, |m| m.ends_with(&needle)))
    }

    fn matches(&self, field: &Field, value: &str) -> Result<Expr> {
        self.require_loose(Operator::Matches)?;
        let regex = self.pattern(value)?;
        Ok(Self::select(field, |m| regex.is_match(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::value::Value;

    fn status() -> Field {
        Field::enumeration("status", ["ACTIVE", "INACTIVE", "SUSPENDED"])
    }

    fn backend(loose: bool) -> EnumBackend {
        let config = EngineConfig::default().with_loose_values(loose);
        EnumBackend::new(Arc::new(Settings::new(&config)))
    }

    fn check(expr: &Expr, member: &str) -> bool {
        match expr {
            Expr::Leaf(clause) => clause.matches(&Value::Enum(member)),
            other => panic!("expected a leaf, got {:?}", other),
        }
    }

    fn selected(expr: &Expr) -> Vec<String> {
        match expr {
            Expr::Leaf(clause) => match &clause.value {
                ClauseValue::EnumSet(set) => set.clone(),
                other => panic!("expected a member set, got {:?}", other),
            },
            other => panic!("expected a leaf, got {:?}", other),
        }
    }

    #[test]
    fn eq_resolves_member_case_insensitively() {
        let expr = backend(false).eq(&status(), "active", false).unwrap();
        assert!(check(&expr, "ACTIVE"));
        assert!(!check(&expr, "INACTIVE"));
    }

    #[test]
    fn unknown_member_is_invalid_input() {
        let err = backend(false).eq(&status(), "RETIRED", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn exact_member_wins_over_folded_duplicates() {
        let field = Field::enumeration("mode", ["on", "ON"]);
        let expr = backend(false).eq(&field, "ON", false).unwrap();
        assert!(check(&expr, "ON"));
        assert!(!check(&expr, "on"));

        let err = backend(false).eq(&field, "On", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn string_operators_need_loose_mode() {
        let strict = backend(false);
        let err = strict.contains(&status(), "act", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
        assert_eq!(strict.supported_operators(), &STRICT_OPERATORS);

        let loose = backend(true);
        assert!(loose.supported_operators().contains(&Operator::Matches));
        let expr = loose.contains(&status(), "ACT", false).unwrap();
        assert_eq!(selected(&expr), vec!["ACTIVE", "INACTIVE"]);
        assert!(check(&expr, "INACTIVE"));
        assert!(!check(&expr, "SUSPENDED"));
    }

    #[test]
    fn affix_operators() {
        let loose = backend(true);
        let starts = loose.starts_with(&status(), "in", false).unwrap();
        assert_eq!(selected(&starts), vec!["INACTIVE"]);
        let ends = loose.ends_with(&status(), "ED", false).unwrap();
        assert_eq!(selected(&ends), vec!["SUSPENDED"]);
    }

    #[test]
    fn matches_is_full_and_case_insensitive() {
        let loose = backend(true);
        let expr = loose.matches(&status(), "act.*").unwrap();
        assert_eq!(selected(&expr), vec!["ACTIVE"]);

        let expr = loose.matches(&status(), "ACTIVE|suspended").unwrap();
        assert_eq!(selected(&expr), vec!["ACTIVE", "SUSPENDED"]);
    }

    #[test]
    fn patterns_are_cached() {
        let loose = backend(true);
        loose.matches(&status(), "act.*").unwrap();
        loose.matches(&status(), "act.*").unwrap();
        loose.patterns.run_pending_tasks();
        assert_eq!(loose.patterns.entry_count(), 1);
    }

    #[test]
    fn concurrent_matches_share_one_pattern() {
        const THREADS: usize = 16;
        let loose = backend(true);
        let field = status();
        let barrier = std::sync::Barrier::new(THREADS);

        let selections: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        selected(&loose.matches(&field, "(in)?active").unwrap())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for selection in &selections {
            assert_eq!(selection, &["ACTIVE", "INACTIVE"]);
        }
        loose.patterns.run_pending_tasks();
        assert_eq!(loose.patterns.entry_count(), 1);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = backend(true).matches(&status(), "(").unwrap_err();
        assert!(matches!(err, ValopsError::InvalidRegex(_)));
    }
}
