//! PDF generation module

pub mod content;
pub mod images;
pub mod metadata;
pub mod sheet;

// Re-export commonly used items
pub use images::{ImageHandle, ImageStore};
pub use metadata::{summarize, PdfSummary};
pub use sheet::{generate_sheets, pages_needed, render_document, RunResult, SheetOptions};
