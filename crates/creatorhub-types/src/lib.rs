pub mod api;
pub mod events;
pub mod models;

/// Whole-currency amounts are never stored; everything is in cents.
pub type Cents = u64;

/// Build a fresh entity id with a readable prefix, e.g. `p-3f2c...`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
