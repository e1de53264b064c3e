//! One full export pass: fetch, flatten, write, publish.

use std::path::PathBuf;

use shopfeed_core::AppConfig;
use shopfeed_shopify::ShopifyClient;

use crate::error::ExportError;
use crate::publisher::publish;
use crate::row::{build_row, sum_available, ExportRow};
use crate::writer::write_export;

/// Everything one pass needs, constructed once at startup.
///
/// Passes share no other state with the rest of the process; the download
/// server only ever touches `published_path` through the filesystem.
pub struct ExportContext {
    pub client: ShopifyClient,
    /// Inventory locations counted toward exported quantities.
    pub location_ids: Vec<i64>,
    pub page_size: u32,
    pub working_path: PathBuf,
    pub published_path: PathBuf,
}

impl ExportContext {
    #[must_use]
    pub fn new(client: ShopifyClient, config: &AppConfig) -> Self {
        Self {
            client,
            location_ids: config.location_ids.clone(),
            page_size: config.page_size,
            working_path: config.working_path.clone(),
            published_path: config.published_path.clone(),
        }
    }
}

/// Counters from a completed pass, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub pages: usize,
    pub products: usize,
    pub rows: usize,
}

/// Runs one complete catalog pass.
///
/// Fetches the full catalog, resolves each variant's quantity across the
/// location allow-list, writes all rows to the working path, and promotes
/// it to the published path. All-or-nothing: any error aborts the pass
/// before publication, so the previously published export stays intact.
///
/// # Errors
///
/// Propagates [`shopfeed_shopify::ShopifyError`]s from the catalog fetch
/// and inventory lookups, and CSV/filesystem errors from writing and
/// publishing.
pub async fn run_pass(ctx: &ExportContext) -> Result<PassSummary, ExportError> {
    let (products, pages) = ctx.client.fetch_all_products(ctx.page_size).await?;

    let mut rows: Vec<ExportRow> = Vec::new();
    for product in &products {
        // Products with no variants produce no rows.
        for variant in &product.variants {
            let levels = ctx
                .client
                .inventory_levels(variant.inventory_item_id, &ctx.location_ids)
                .await?;
            let quantity = sum_available(&levels, &ctx.location_ids);
            rows.push(build_row(product, variant, quantity));
        }
    }

    write_export(&ctx.working_path, &rows)?;
    publish(&ctx.working_path, &ctx.published_path)?;

    Ok(PassSummary {
        pages,
        products: products.len(),
        rows: rows.len(),
    })
}
