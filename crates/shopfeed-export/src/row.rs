//! Flattening of catalog products into export rows.
//!
//! One row per variant; products with no variants contribute nothing.
//! Column semantics follow the merchant's feed format: the taxability
//! column carries the Italian labels `"soggeto iv"` / `"no"`, quantity is
//! the summed stock across the allow-listed locations, and the image
//! column is the `", "`-joined gallery in storefront order.

use shopfeed_shopify::{InventoryLevel, Product, ProductImage, Variant};

/// Taxability column value for taxable variants.
pub const TAXABLE_LABEL: &str = "soggeto iv";

/// Taxability column value for non-taxable variants.
pub const NON_TAXABLE_LABEL: &str = "no";

/// One line of the export file, fully rendered except for delimiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub sku: String,
    pub ean: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub price: String,
    pub tax_label: String,
    pub quantity: i64,
    pub images: String,
}

#[must_use]
pub fn tax_label(taxable: bool) -> &'static str {
    if taxable {
        TAXABLE_LABEL
    } else {
        NON_TAXABLE_LABEL
    }
}

/// Joins image URLs with `", "`, preserving gallery order.
#[must_use]
pub fn join_image_urls(images: &[ProductImage]) -> String {
    images
        .iter()
        .map(|image| image.src.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sums `available` across exactly the allow-listed locations.
///
/// Records for any other location are ignored even if the API returns
/// them, and untracked (`null`) counts contribute zero.
#[must_use]
pub fn sum_available(levels: &[InventoryLevel], allowed_locations: &[i64]) -> i64 {
    levels
        .iter()
        .filter(|level| allowed_locations.contains(&level.location_id))
        .map(|level| level.available.unwrap_or(0))
        .sum()
}

/// Renders one variant of a product into an export row.
#[must_use]
pub fn build_row(product: &Product, variant: &Variant, quantity: i64) -> ExportRow {
    ExportRow {
        sku: variant.sku.clone(),
        ean: variant.barcode.clone().unwrap_or_default(),
        title: product.title.clone(),
        description: product.body_html.clone().unwrap_or_default(),
        tags: product.tags.clone(),
        price: variant.price.to_string(),
        tax_label: tax_label(variant.taxable).to_owned(),
        quantity,
        images: join_image_urls(&product.images),
    }
}
