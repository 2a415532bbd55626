//! Reads flat user documents. Every inline record sees the whole document,
//! so `city` lands in both `china` and `usa`.

mod users;

use {
    anyhow::{Context, Result},
    serde_inline::Inline,
    users::User,
};

const USERS: &str = r#"[
  {
    "id": 1,
    "name": "Alice",
    "email": "alice@example.com",
    "province": "Guangdong",
    "city": "Shenzhen"
  },
  {
    "id": 2,
    "name": "Bob",
    "email": "bob@example.com",
    "state": "California",
    "city": "Los Angeles"
  }
]"#;

fn main() -> Result<()> {
    let Inline(users) = serde_json::from_str::<Inline<Vec<Box<User>>>>(USERS).context("decoding users")?;
    users.iter().enumerate().try_for_each(|(idx, user)| {
        serde_inline::to_string(user)
            .with_context(|| format!("encoding user {idx}"))
            .map(|flat| println!("user {idx}: {flat}\n  {user:?}"))
    })
}
