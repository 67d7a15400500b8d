//! Sticker Sheets Library
//!
//! Lays out QR keychain stickers on A3 sheets and writes a print-ready PDF.
//! This library provides functionality to:
//! - Scan a directory of QR images named by numeric identifier
//! - Resolve per-identifier logo overrides with a default fallback
//! - Place rows of die-cut circles on a fixed two-column grid
//! - Render ID labels, logos and QR codes with cut guides onto PDF pages
//! - Report run statistics and degradation warnings
//!
//! # Example
//!
//! ```no_run
//! use sticker_sheets::layout::GridConfig;
//! use sticker_sheets::overrides::OverrideMap;
//! use sticker_sheets::pdf::{generate_sheets, SheetOptions};
//! use std::path::PathBuf;
//!
//! let options = SheetOptions {
//!     qr_dir: PathBuf::from("qrs"),
//!     default_logo: PathBuf::from("logo.png"),
//!     overrides: OverrideMap::new(),
//!     output_path: PathBuf::from("sticker-sheets.pdf"),
//!     config: GridConfig::a3(),
//! };
//!
//! let result = generate_sheets(&options).expect("Failed to generate sheets");
//! println!("{} pages written", result.total_pages);
//! ```

pub mod catalog;
pub mod error;
pub mod layout;
pub mod overrides;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
