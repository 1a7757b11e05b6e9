//! Employee records and their searchable fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valops::{Field, Number, SearchEnum, SearchTimestamp, Searchable, Value};

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Inactive,
    Suspended,
}

impl SearchEnum for Status {
    fn variant_name(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
            Status::Suspended => "SUSPENDED",
        }
    }

    fn variant_names() -> &'static [&'static str] {
        &["ACTIVE", "INACTIVE", "SUSPENDED"]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub status: Status,
    pub age: u32,
    pub email: String,
    pub hired_on: NaiveDate,
}

impl Searchable for Employee {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "user_name" => Value::String(&self.user_name),
            "first_name" => Value::String(&self.first_name),
            "last_name" => Value::String(&self.last_name),
            "job_title" => Value::String(&self.job_title),
            "status" => self.status.search_value(),
            "age" => Value::Number(Number::from(self.age)),
            "email" => Value::String(&self.email),
            "hired_on" => Value::Timestamp(self.hired_on.search_timestamp()),
            _ => Value::None,
        }
    }
}

/// Every field a request may filter on.
pub fn fields() -> Vec<Field> {
    vec![
        Field::text("user_name"),
        Field::text("first_name"),
        Field::text("last_name"),
        Field::text("job_title"),
        Field::of_enum::<Status>("status"),
        Field::number("age"),
        Field::text("email"),
        Field::timestamp("hired_on"),
    ]
}

const SAMPLE: &str = include_str!("../data/employees.json");

/// The built-in sample data set.
pub fn sample() -> serde_json::Result<Vec<Employee>> {
    serde_json::from_str(SAMPLE)
}
