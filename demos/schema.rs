//! Prints the JSON Schema of a flat `User` document.
//!
//! Pass `merge` to copy inline properties into the parent instead of listing
//! them under `anyOf`.

mod users;

use {
    anyhow::{Context, Result},
    serde_inline::{SchemaOptions, Strategy},
    users::User,
};

fn main() -> Result<()> {
    let strategy = match std::env::args().nth(1).as_deref() {
        Some("merge") => Strategy::Merge,
        _ => Strategy::Alternatives,
    };
    let schema = serde_inline::schema_for::<User>(SchemaOptions::default().with_strategy(strategy))
        .context("generating schema")?;
    serde_json::to_string_pretty(schema.as_value())
        .context("printing schema")
        .map(|output| println!("{output}"))
}
