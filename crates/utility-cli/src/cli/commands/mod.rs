//! CLI command handlers, one per file.

mod checksum;
mod invoke;
mod schema;

pub use checksum::run_checksum;
pub use invoke::{invoke_json, run_invoke};
pub use schema::run_schema;
