pub mod client;
pub mod error;
pub mod pagination;
mod retry;
pub mod throttle;
pub mod types;

pub use client::{ClientOptions, ShopifyClient, MAX_PAGES};
pub use error::ShopifyError;
pub use throttle::CallLimit;
pub use types::{InventoryLevel, Product, ProductImage, Variant};
