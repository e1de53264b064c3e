//! Shopify Admin REST API response types.
//!
//! ## Shape notes (authenticated Admin API, versioned endpoints)
//!
//! ### Tags
//! The Admin API returns `tags` as a single comma-joined string
//! (`"summer, cotton"`), unlike the public `products.json` endpoint which
//! returns an array. `#[serde(default)]` covers untagged products, where the
//! field is the empty string.
//!
//! ### Price
//! Always a fixed-point decimal string, e.g. `"9.99"`. Modelled as
//! [`rust_decimal::Decimal`] so the exported value round-trips without
//! float artifacts.
//!
//! ### `available` on inventory levels
//! `null` when the inventory item is not tracked at that location. Treated
//! as zero when summing quantities.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level response from `GET /admin/api/{version}/products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// A single catalog product.
#[derive(Debug, Deserialize)]
pub struct Product {
    /// Shopify numeric product ID.
    pub id: i64,

    /// Display name of the product.
    pub title: String,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    /// Comma-joined tag string; empty for untagged products.
    #[serde(default)]
    pub tags: String,

    /// Full image gallery, in storefront order.
    #[serde(default)]
    pub images: Vec<ProductImage>,

    /// All purchasable variants for this product. May be empty for
    /// placeholder products, which contribute no export rows.
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A single purchasable variant of a [`Product`].
#[derive(Debug, Deserialize)]
pub struct Variant {
    /// Shopify numeric variant ID.
    pub id: i64,

    /// Stock-keeping unit; may be empty on some stores.
    #[serde(default)]
    pub sku: String,

    /// EAN barcode, or `null` when not set.
    #[serde(default)]
    pub barcode: Option<String>,

    /// Current price as a fixed-point decimal string (e.g. `"9.99"`).
    pub price: Decimal,

    /// Whether the variant is subject to tax.
    #[serde(default)]
    pub taxable: bool,

    /// Identifier used to look up stock via the inventory-levels endpoint.
    pub inventory_item_id: i64,
}

/// A product image.
#[derive(Debug, Deserialize)]
pub struct ProductImage {
    /// Shopify numeric image ID.
    #[serde(default)]
    pub id: Option<i64>,

    /// Canonical CDN URL.
    pub src: String,

    /// 1-based gallery position.
    #[serde(default)]
    pub position: Option<i32>,
}

/// Top-level response from `GET /admin/api/{version}/inventory_levels.json`.
#[derive(Debug, Deserialize)]
pub struct InventoryLevelsResponse {
    pub inventory_levels: Vec<InventoryLevel>,
}

/// Stock of one inventory item at one location.
#[derive(Debug, Deserialize)]
pub struct InventoryLevel {
    pub inventory_item_id: i64,
    pub location_id: i64,

    /// Units available for sale; `null` when untracked at this location.
    #[serde(default)]
    pub available: Option<i64>,
}
