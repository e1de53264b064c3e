//! Background export loop.

use std::time::Duration;

use shopfeed_export::{run_pass, ExportContext};

/// Runs export passes forever, sleeping a fixed interval between passes.
///
/// A failed pass is logged and skipped: the previously published export
/// keeps being served until a later pass succeeds. There is no drift
/// correction and an in-flight pass cannot be cancelled.
pub async fn run_export_loop(ctx: ExportContext, interval: Duration) {
    loop {
        match run_pass(&ctx).await {
            Ok(summary) => tracing::info!(
                pages = summary.pages,
                products = summary.products,
                rows = summary.rows,
                "export pass complete"
            ),
            Err(e) => tracing::error!(
                error = %e,
                "export pass failed — keeping previous export"
            ),
        }
        tokio::time::sleep(interval).await;
    }
}
