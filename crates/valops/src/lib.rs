//! Valops - operator-wrapped query values turned into field predicates.
//!
//! A request such as `?name=ci(contains(smith))&age=gt(30)&age=and(lt(40))`
//! carries a small expression language inside each value. Valops parses those
//! values per field, checks the operators against what the field's value kind
//! supports, and returns an [`Expr`] tree that can be rendered, combined, or
//! evaluated against in-memory data.
//!
//! - Comparisons: `eq`, `ne`, `contains`, `startsWith`, `endsWith`,
//!   `matches`, `gt`, `gte`, `lt`, `lte`
//! - Modifiers: `not(..)` negates, `ci(..)` ignores case
//! - Multi-value connectives: `and(..)` and `or(..)`
//! - A value without a wrapper is an equality; several values are OR-ed
//!
//! # Quick Start
//!
//! ```rust
//! use valops::{Field, Registry, Value, Number};
//!
//! struct Employee {
//!     name: String,
//!     age: i64,
//! }
//!
//! fn accessor<'a>(e: &'a Employee, field: &str) -> Value<'a> {
//!     match field {
//!         "name" => Value::String(&e.name),
//!         "age" => Value::Number(Number::I64(e.age)),
//!         _ => Value::None,
//!     }
//! }
//!
//! let staff = vec![
//!     Employee { name: "John Smith".into(), age: 35 },
//!     Employee { name: "Jane Smithers".into(), age: 52 },
//!     Employee { name: "Bob Jones".into(), age: 31 },
//! ];
//!
//! let registry = Registry::default();
//! let name = registry
//!     .predicate(&Field::text("name"), "ci(contains(SMITH))")
//!     .unwrap()
//!     .unwrap();
//! let age = registry
//!     .predicate(&Field::number("age"), ["gt(30)", "and(lt(40))"])
//!     .unwrap()
//!     .unwrap();
//!
//! let hits = name.and(age).filter(&staff, accessor);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "John Smith");
//! ```
//!
//! # Value Kinds and Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | Text | `eq`, `ne`, `contains`, `startsWith`, `endsWith`, `matches` |
//! | Number | `eq`, `ne`, `gt`, `gte`, `lt`, `lte` |
//! | Enum | `eq`, `ne`; string operators in loose value mode |
//! | Date | one value `eq`, two values a range, more values alternatives |
//!
//! `not` and `ci` apply to every kind. Anything else is rejected with
//! [`ValopsError::UnsupportedOperator`].

pub mod backend;
pub mod builder;
mod clause;
pub mod compose;
mod config;
mod context;
mod error;
mod expr;
mod field;
mod op;
mod operator;
mod registry;
pub mod syntax;
mod traits;
mod value;

// Re-export public API
pub use backend::LeafBackend;
pub use clause::{Clause, ClauseValue};
pub use config::{EngineConfig, DEFAULT_REGEX_CACHE_CAPACITY};
pub use context::{OriginalValues, Overrides, RequestContext};
pub use error::{ErrorKind, Result, ValopsError};
pub use expr::Expr;
pub use field::{Field, FieldKind};
pub use op::Op;
pub use operator::{Category, Operator};
pub use registry::{Input, Registry};
pub use traits::{SearchEnum, SearchTimestamp, Searchable};
pub use value::{Number, Timestamp, Value};
