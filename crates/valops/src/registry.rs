//! The entry point: field to backend resolution and predicate building.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::backend::{DateBackend, EnumBackend, LeafBackend, NumberBackend, TextBackend};
use crate::config::{EngineConfig, Settings};
use crate::context::{OriginalValues, Overrides};
use crate::error::Result;
use crate::expr::Expr;
use crate::field::{Field, FieldKind};

/// Raw input for one field: a single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Scalar(String),
    Many(Vec<String>),
}

impl Input {
    /// The values in request order.
    pub fn into_values(self) -> Vec<String> {
        match self {
            Input::Scalar(value) => vec![value],
            Input::Many(values) => values,
        }
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Scalar(value)
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for Input {
    fn from(values: Vec<String>) -> Self {
        Input::Many(values)
    }
}

impl From<Vec<&str>> for Input {
    fn from(values: Vec<&str>) -> Self {
        Input::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Input {
    fn from(values: [&str; N]) -> Self {
        Input::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<&[String]> for Input {
    fn from(values: &[String]) -> Self {
        Input::Many(values.to_vec())
    }
}

/// Resolves fields to their backends and builds predicates.
///
/// Backends are created on first use and shared afterwards; the registry is
/// safe to use from many threads at once.
///
/// ```
/// use valops::{Field, Registry, Value};
///
/// let registry = Registry::default();
/// let age = Field::number("age");
/// let expr = registry.predicate(&age, ["gt(30)", "and(lt(40))"]).unwrap().unwrap();
///
/// fn accessor<'a>(n: &'a i64, _field: &str) -> Value<'a> {
///     Value::Number((*n).into())
/// }
/// assert!(expr.matches(&35, accessor));
/// assert!(!expr.matches(&45, accessor));
/// ```
pub struct Registry {
    settings: Arc<Settings>,
    backends: DashMap<Field, Option<Arc<dyn LeafBackend>>>,
    aliases: DashMap<Field, String>,
    config: EngineConfig,
}

impl Registry {
    pub fn new(config: EngineConfig) -> Self {
        Registry {
            settings: Arc::new(Settings::new(&config)),
            backends: DashMap::new(),
            aliases: DashMap::new(),
            config,
        }
    }

    /// Returns the backend for `field`, creating it on first request.
    ///
    /// `None` means the field's kind has no backend; that result is
    /// remembered like any other.
    pub fn backend(&self, field: &Field) -> Option<Arc<dyn LeafBackend>> {
        if let Some(existing) = self.backends.get(field) {
            return existing.value().clone();
        }
        self.backends
            .entry(field.clone())
            .or_insert_with(|| {
                let backend = create_backend(field, &self.settings);
                debug!(
                    field = field.name(),
                    kind = field.kind().as_str(),
                    supported = backend.is_some(),
                    "created backend"
                );
                backend
            })
            .value()
            .clone()
    }

    /// Builds the predicate for `field` from the converted input.
    ///
    /// Returns `Ok(None)` when the field has no backend or nothing is left to
    /// filter on.
    pub fn predicate(&self, field: &Field, input: impl Into<Input>) -> Result<Option<Expr>> {
        self.build(field, input.into(), None)
    }

    /// Like [`predicate`](Self::predicate), but prefers the original request
    /// values found in `originals` over `input`.
    pub fn predicate_with(
        &self,
        field: &Field,
        input: impl Into<Input>,
        originals: &dyn OriginalValues,
    ) -> Result<Option<Expr>> {
        self.build(field, input.into(), Some(originals))
    }

    fn build(
        &self,
        field: &Field,
        input: Input,
        originals: Option<&dyn OriginalValues>,
    ) -> Result<Option<Expr>> {
        let Some(backend) = self.backend(field) else {
            trace!(field = field.name(), "no backend, skipping field");
            return Ok(None);
        };

        let alias = self.alias(field);
        let overrides = originals.map(|source| Overrides::new(source, alias.as_deref()));
        let values = input.into_values();
        trace!(field = field.name(), ?values, "building predicate");
        backend.predicate(field, &values, overrides.as_ref())
    }

    /// Registers an alternate parameter name for `field`. Later
    /// registrations replace earlier ones; blank aliases are ignored.
    pub fn register_alias(&self, field: &Field, alias: impl Into<String>) {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return;
        }
        debug!(field = field.name(), alias = alias.as_str(), "registered alias");
        self.aliases.insert(field.clone(), alias);
    }

    /// The alias of `field`: a registered one first, then one from configuration.
    pub fn alias(&self, field: &Field) -> Option<String> {
        self.aliases
            .get(field)
            .map(|alias| alias.value().clone())
            .or_else(|| self.config.aliases.get(field.name()).cloned())
    }

    /// Switches loose value mode; applies to backends already created.
    pub fn set_loose_value_mode(&self, loose: bool) {
        debug!(loose, "loose value mode");
        self.settings.set_loose_values(loose);
    }

    pub fn loose_value_mode(&self) -> bool {
        self.settings.loose_values()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("backends", &self.backends.len())
            .field("aliases", &self.aliases.len())
            .field("loose_values", &self.loose_value_mode())
            .finish()
    }
}

fn create_backend(field: &Field, settings: &Arc<Settings>) -> Option<Arc<dyn LeafBackend>> {
    match field.kind() {
        FieldKind::Text => Some(Arc::new(TextBackend)),
        FieldKind::Number => Some(Arc::new(NumberBackend)),
        FieldKind::Enum(_) => Some(Arc::new(EnumBackend::new(Arc::clone(settings)))),
        FieldKind::Timestamp => Some(Arc::new(DateBackend)),
        FieldKind::Other(_) => None,
    }
}
