//! Pipe-delimited CSV writing for the export file.

use std::path::Path;

use crate::error::ExportError;
use crate::row::ExportRow;

/// Field delimiter of the export format.
pub const DELIMITER: u8 = b'|';

/// Header row, in column order.
pub const HEADER: [&str; 9] = [
    "SKU",
    "EAN",
    "Title",
    "Description",
    "Tags",
    "Price",
    "Soggeto iv o no",
    "Quantità",
    "Immagini",
];

/// Writes the header and all rows to `path`, flushing before returning.
///
/// The file at `path` is created or truncated; callers are expected to
/// write to a working path and promote it afterward.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] on write failures and [`ExportError::Io`]
/// if the final flush fails.
pub fn write_export(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for row in rows {
        let quantity = row.quantity.to_string();
        writer.write_record([
            row.sku.as_str(),
            row.ean.as_str(),
            row.title.as_str(),
            row.description.as_str(),
            row.tags.as_str(),
            row.price.as_str(),
            row.tax_label.as_str(),
            quantity.as_str(),
            row.images.as_str(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
