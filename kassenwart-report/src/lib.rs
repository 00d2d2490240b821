//! kassenwart-report: renders a reviewer session into the downloadable
//! multi-sheet workbook.

pub mod export;

pub use export::{export_workbook, ExportError, EXPORT_FILE_NAME, EXPORT_MIME_TYPE, SHEET_NAMES};
