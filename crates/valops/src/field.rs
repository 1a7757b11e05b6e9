//! Field identities.
//!
//! A [`Field`] names one searchable attribute and declares its value kind.
//! It is the key the registry memoizes backends under, so two fields are the
//! same field when both name and kind are equal.

use std::sync::Arc;

use crate::traits::SearchEnum;

/// Value kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer or floating point number.
    Number,
    /// Enumeration with the given member names, in declaration order.
    Enum(Arc<[String]>),
    /// Date or date-time.
    Timestamp,
    /// A kind the engine has no backend for; carries a type name for diagnostics.
    Other(Arc<str>),
}

impl FieldKind {
    /// Short lowercase name used in messages.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "numeric",
            FieldKind::Enum(_) => "enum",
            FieldKind::Timestamp => "date",
            FieldKind::Other(name) => name,
        }
    }
}

/// A typed reference to one searchable attribute.
///
/// # Example
///
/// ```
/// use valops::{Field, FieldKind};
///
/// let status = Field::enumeration("status", ["ACTIVE", "INACTIVE"]);
/// assert_eq!(status.name(), "status");
/// assert!(matches!(status.kind(), FieldKind::Enum(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: Arc<str>,
    kind: FieldKind,
}

impl Field {
    /// Creates a field of the given kind.
    pub fn new(name: impl AsRef<str>, kind: FieldKind) -> Self {
        Field {
            name: Arc::from(name.as_ref()),
            kind,
        }
    }

    /// Creates a text field.
    pub fn text(name: impl AsRef<str>) -> Self {
        Field::new(name, FieldKind::Text)
    }

    /// Creates a numeric field.
    pub fn number(name: impl AsRef<str>) -> Self {
        Field::new(name, FieldKind::Number)
    }

    /// Creates a date field.
    pub fn timestamp(name: impl AsRef<str>) -> Self {
        Field::new(name, FieldKind::Timestamp)
    }

    /// Creates an enum field from explicit member names.
    pub fn enumeration<I, S>(name: impl AsRef<str>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        Field::new(name, FieldKind::Enum(members.into()))
    }

    /// Creates an enum field whose members come from a [`SearchEnum`] type.
    pub fn of_enum<E: SearchEnum>(name: impl AsRef<str>) -> Self {
        Field::enumeration(name, E::variant_names().iter().copied())
    }

    /// Creates a field of a kind no backend handles.
    pub fn other(name: impl AsRef<str>, type_name: impl AsRef<str>) -> Self {
        Field::new(name, FieldKind::Other(Arc::from(type_name.as_ref())))
    }

    /// The field name, as used by accessors and request parameters.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Enum member names, or an empty slice for non-enum fields.
    pub fn members(&self) -> &[String] {
        match &self.kind {
            FieldKind::Enum(members) => members,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
