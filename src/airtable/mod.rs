pub mod client;
pub mod record;
pub mod schema;

pub use client::{AirtableApi, AirtableClient};
pub use record::RecordFields;
pub use schema::{missing_fields, required_fields, BaseSchema, FieldDescriptor, FieldKind, TableSchema};
