//! Traits connecting user types to the engine.
//!
//! [`Searchable`] exposes a struct's fields as [`Value`]s so expressions can be
//! evaluated against it. [`SearchEnum`] and [`SearchTimestamp`] convert field
//! types into what [`Value`] carries.

use chrono::{DateTime, NaiveDate, Utc};

use crate::value::{Timestamp, Value};

/// Trait for types that expressions can be evaluated against.
///
/// # Example
///
/// ```
/// use valops::{Searchable, Value, Number};
///
/// struct Employee {
///     user_name: String,
///     age: u8,
/// }
///
/// impl Searchable for Employee {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "userName" => Value::String(&self.user_name),
///             "age" => Value::Number(Number::U64(self.age as u64)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Searchable {
    /// Returns the value of a field for comparison, or [`Value::None`] if the
    /// field does not exist or is not searchable.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns an accessor function suitable for [`Expr::matches`](crate::Expr::matches).
    ///
    /// ```ignore
    /// let hits = expr.filter(&employees, Employee::accessor);
    /// ```
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

/// Helper trait for enum types used as searchable fields.
///
/// Member names are what query values are compared against, so they should be
/// stable (usually the serialized form of the variant).
///
/// ```
/// use valops::SearchEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Active,
///     Inactive,
/// }
///
/// impl SearchEnum for Status {
///     fn variant_name(&self) -> &'static str {
///         match self {
///             Status::Active => "ACTIVE",
///             Status::Inactive => "INACTIVE",
///         }
///     }
///
///     fn variant_names() -> &'static [&'static str] {
///         &["ACTIVE", "INACTIVE"]
///     }
/// }
/// ```
pub trait SearchEnum {
    /// Returns the member name of this variant.
    fn variant_name(&self) -> &'static str;

    /// Returns every member name in declaration order.
    fn variant_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Returns this variant as a [`Value`].
    fn search_value(&self) -> Value<'static> {
        Value::Enum(self.variant_name())
    }
}

/// Helper trait for converting types to timestamps.
pub trait SearchTimestamp {
    /// Converts this value to a [`Timestamp`] for comparison.
    fn search_timestamp(&self) -> Timestamp;
}

impl SearchTimestamp for i64 {
    fn search_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl SearchTimestamp for NaiveDate {
    fn search_timestamp(&self) -> Timestamp {
        let millis = self
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Timestamp::from_millis(millis)
    }
}

impl SearchTimestamp for DateTime<Utc> {
    fn search_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Searchable for TestItem {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "count" => Value::Number(Number::I64(self.count as i64)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn searchable_manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::String("test"));
        assert_eq!(item.field_value("count"), Value::Number(Number::I64(42)));
        assert_eq!(item.field_value("unknown"), Value::None);
        assert_eq!(TestItem::accessor(&item, "name"), Value::String("test"));
    }

    #[test]
    fn timestamps_from_chrono() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
        assert_eq!(
            date.search_timestamp(),
            Timestamp::parse("2020-01-10").unwrap()
        );

        let dt = DateTime::parse_from_rfc3339("2020-01-10T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(dt.search_timestamp(), date.search_timestamp());
        assert_eq!(1000i64.search_timestamp(), Timestamp(1000));
    }
}
