//! Shop persistence — one encrypted token row per installed shop.
//!
//! This module provides:
//! - `ShopRecord`, `ShopMetadata`, and token health types (`record`)
//! - The SQLite-backed `ShopStore` and shop domain validation (`store`)

pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use record::{ShopMetadata, TokenCheck, TokenHealth};
pub use store::{validate_shop_domain, ShopStore};
