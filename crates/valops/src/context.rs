//! Access to the raw request values behind a field.
//!
//! Upstream layers may coerce or rewrite values before they reach the
//! registry, for example by splitting on commas or dropping operators a type
//! converter did not understand. An [`OriginalValues`] source hands the
//! composer the values exactly as they were sent, so operator syntax
//! survives. Sources are passed explicitly; there is no ambient request state.

use url::form_urlencoded;

use crate::field::Field;
use crate::syntax;

/// Source of the original, unconverted values of a request.
pub trait OriginalValues {
    /// The first original value for `field`, if any.
    fn single_value(&self, field: &Field, alias: Option<&str>) -> Option<String>;

    /// Every original value for `field`, in request order.
    fn all_values(&self, field: &Field, alias: Option<&str>) -> Option<Vec<String>>;
}

/// An [`OriginalValues`] source bound to the alias of one field.
#[derive(Clone, Copy)]
pub struct Overrides<'a> {
    source: &'a dyn OriginalValues,
    alias: Option<&'a str>,
}

impl<'a> Overrides<'a> {
    pub fn new(source: &'a dyn OriginalValues, alias: Option<&'a str>) -> Self {
        Overrides { source, alias }
    }

    /// The first original value, ignoring blanks.
    pub fn single_value(&self, field: &Field) -> Option<String> {
        self.source
            .single_value(field, self.alias)
            .filter(|v| !v.trim().is_empty())
    }

    /// All original values, ignoring an empty list.
    pub fn all_values(&self, field: &Field) -> Option<Vec<String>> {
        self.source
            .all_values(field, self.alias)
            .filter(|values| !values.is_empty())
    }
}

impl std::fmt::Debug for Overrides<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overrides")
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// Request parameters as ordered name/value pairs.
///
/// A field is looked up by its name with the optional root prefix removed,
/// then by its full name, then by its alias.
///
/// ```
/// use valops::{Field, OriginalValues, RequestContext};
///
/// let ctx = RequestContext::from_query("employee.last_name=ci(smith)&status=ACTIVE")
///     .with_root("employee");
/// let field = Field::text("employee.last_name");
/// assert_eq!(ctx.single_value(&field, None).as_deref(), Some("ci(smith)"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    root: Option<String>,
    params: Vec<(String, String)>,
}

impl RequestContext {
    /// Builds a context from name/value pairs, keeping their order.
    pub fn new<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RequestContext {
            root: None,
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::new(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Sets the root path stripped from qualified field names.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Every value sent under `name`, in order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value sent under `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Distinct parameter names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (k, _) in &self.params {
            if !names.contains(&k.as_str()) {
                names.push(k.as_str());
            }
        }
        names
    }

    /// The values under `name` with every operator wrapper removed.
    ///
    /// This is what a type converter should parse: `gt(5)` becomes `5`.
    pub fn stripped_values(&self, name: &str) -> Vec<String> {
        self.values(name)
            .into_iter()
            .map(syntax::strip_operators)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names to try for `field`, most specific first.
    fn candidate_names<'a>(&'a self, field: &'a Field, alias: Option<&'a str>) -> Vec<&'a str> {
        let mut names = Vec::with_capacity(3);
        if let Some(relative) = self.relative_name(field.name()) {
            names.push(relative);
        }
        names.push(field.name());
        if let Some(alias) = alias.filter(|a| !a.trim().is_empty()) {
            names.push(alias);
        }
        names
    }

    fn relative_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        let root = self.root.as_deref()?;
        name.strip_prefix(root)?.strip_prefix('.')
    }
}

impl OriginalValues for RequestContext {
    fn single_value(&self, field: &Field, alias: Option<&str>) -> Option<String> {
        self.candidate_names(field, alias)
            .into_iter()
            .find_map(|name| self.first(name))
            .map(str::to_string)
    }

    fn all_values(&self, field: &Field, alias: Option<&str>) -> Option<Vec<String>> {
        self.candidate_names(field, alias)
            .into_iter()
            .map(|name| self.values(name))
            .find(|values| !values.is_empty())
            .map(|values| values.into_iter().map(str::to_string).collect())
    }
}
