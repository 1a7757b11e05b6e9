//! Turning `NAME=VALUE` parameters into one expression.
//!
//! Parameters are grouped by name in order of first appearance. Each group
//! becomes one field predicate; the predicates of different fields are
//! AND-ed here, since the engine only composes values of a single field.
//! A field may be named once per request, either by name or by alias.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;
use valops::{Expr, Field, Registry, RequestContext};

/// Splits `NAME=VALUE` at the first `=`.
pub fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Finds the field a parameter name refers to, by name first, then by alias.
pub fn resolve<'a>(registry: &Registry, catalog: &'a [Field], name: &str) -> Option<&'a Field> {
    catalog
        .iter()
        .find(|field| field.name() == name)
        .or_else(|| {
            catalog
                .iter()
                .find(|field| registry.alias(field).as_deref() == Some(name))
        })
}

/// Builds the combined expression, or `None` when nothing filters.
pub fn build(
    registry: &Registry,
    catalog: &[Field],
    params: &[(String, String)],
) -> Result<Option<Expr>> {
    let ctx = RequestContext::new(params.iter().cloned());
    let mut combined: Option<Expr> = None;
    let mut claimed: HashMap<&str, &str> = HashMap::new();

    for name in ctx.names() {
        let field = resolve(registry, catalog, name)
            .ok_or_else(|| anyhow!("unknown parameter '{}'", name))?;
        if let Some(first) = claimed.insert(field.name(), name) {
            bail!(
                "parameters '{}' and '{}' both filter field '{}'",
                first,
                name,
                field.name()
            );
        }

        // Values as a type converter would see them; the registry recovers
        // the operators from the context.
        let converted = ctx.stripped_values(name);
        let predicate = registry
            .predicate_with(field, converted, &ctx)
            .with_context(|| format!("invalid value for parameter '{}'", name))?;

        match predicate {
            Some(expr) => {
                debug!(param = name, field = field.name(), %expr, "field predicate");
                combined = Some(match combined {
                    Some(previous) => previous.and(expr),
                    None => expr,
                });
            }
            None => debug!(param = name, "no predicate"),
        }
    }

    Ok(combined)
}
