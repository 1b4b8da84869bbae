//! This module handles conversion between the JSON the server speaks and internal representations
//!
//! Server deployments of different vintages disagree on field naming (camelCase vs snake_case)
//! and on scalar types (durations as numbers or as strings, booleans as 0/1). Everything that
//! comes off the wire goes through [`parse_task`]/[`parse_entry`], which are total: whatever
//! arrives is coerced into a usable record, never an error. Outgoing bodies are assembled by
//! the builder half, one shape per endpoint.

mod parser;
pub use parser::{parse_entry, parse_task};
mod builder;
pub use builder::{entry_payload, task_payload};
