use std::path::PathBuf;

use shopfeed_shopify::ShopifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Shopify API error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
