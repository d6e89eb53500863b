//! Shared wire schema and I/O-free client for the todo service.
//!
//! # Overview
//! `types` defines what travels over HTTP: the `Todo` row, the `TodoInput`
//! body with its validation rules, and the `{message}` style response bodies.
//! `client` builds `HttpRequest` values and parses `HttpResponse` values for
//! the five routes without touching the network (host-does-IO pattern).
//!
//! # Design
//! - The server crate depends on these types, so the schema lives in one
//!   place and the client cannot drift from the handlers.
//! - `TodoClient` is stateless apart from its base URL and optional origin.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{coerce_id, InsertedBody, MessageBody, Todo, TodoFields, TodoInput};
