//! `utility-provider schema` – print the resource schema.

use anyhow::Result;
use utility_core::schema;

pub fn run_schema() -> Result<()> {
    let json = serde_json::to_string_pretty(&schema::resource_schema())?;
    println!("{}", json);
    Ok(())
}
