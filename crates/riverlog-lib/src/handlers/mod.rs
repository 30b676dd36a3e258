//! HTTP handlers: request parsing, validation, and repository composition.

pub mod rivers;
pub mod trips;
pub mod users;
