//! Response schemas for schema-constrained generation.

pub mod schema;
pub mod validation;

pub use schema::{CompletionSchema, SchemaHandle};
pub use validation::provider_schema;
