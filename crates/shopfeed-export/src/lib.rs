pub mod error;
pub mod pass;
pub mod publisher;
pub mod row;
pub mod writer;

pub use error::ExportError;
pub use pass::{run_pass, ExportContext, PassSummary};
pub use row::ExportRow;
