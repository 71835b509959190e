//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything about a todo that does not need I/O: the record and its
//! enumerated fields, request validation, the list filter shapes, and a
//! stateless client that builds and parses HTTP exchanges with the service.
//!
//! # Design
//! - `validate` turns raw request strings into typed fields, failing with the
//!   exact message the service returns.
//! - `filter` classifies the present list filters into one `FilterShape` and
//!   renders it as a parameterized SQL predicate.
//! - `TodoClient` is stateless and only holds `base_url`; the caller runs
//!   the HTTP round-trip between `build_*` and `parse_*`.

pub mod client;
pub mod error;
pub mod filter;
pub mod http;
pub mod types;
pub mod validate;

pub use client::TodoClient;
pub use error::ApiError;
pub use filter::{FilterShape, Predicate};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Category, DueDate, Priority, Status, Todo, TodoFilter, TodoPatch, TodoPayload, TodoQuery,
    UnknownValue, UpdatedField,
};
pub use validate::{ValidatedFields, ValidationError};
