//! Sheet grid geometry calculations

use crate::error::{Error, Result};

/// Simple length type in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from centimeters
    pub fn from_cm(cm: f64) -> Self {
        Length(cm * 72.0 / 2.54)
    }

    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm * 72.0 / 25.4)
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0
    }

    /// Get the value in centimeters
    pub fn cm(&self) -> f64 {
        self.0 * 2.54 / 72.0
    }
}

/// Margins around the printable area, in points
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    /// Create margins with the same value on all sides
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }
}

/// Center coordinates for one row of stickers
///
/// `x` is the left edge of the row's column, `y` the vertical centerline
/// shared by the row's four circles and its label. Origin is the bottom-left
/// corner of the sheet, as in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub x: f64,
    pub y: f64,
}

/// Immutable grid constants for one generation run
///
/// All lengths are in points. Constructed once, validated before any row is
/// processed, and never mutated while a document is being generated.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub margins: Margins,
    pub columns: u32,
    pub rows_per_column: u32,
    /// Diameter of the stroked die-cut guide circle
    pub cut_diameter: f64,
    /// Diameter the logo image is scaled into
    pub logo_diameter: f64,
    /// Diameter the QR image is scaled into
    pub qr_diameter: f64,
    /// Horizontal gap between adjacent circles in a row
    pub element_gap: f64,
    /// Vertical gap between adjacent rows in a column
    pub row_gap: f64,
    /// Width reserved at the column origin for the ID label
    pub id_zone_width: f64,
    /// Gap between the ID zone and the first circle
    pub id_gap: f64,
}

impl GridConfig {
    /// Production grid: A3 portrait, two columns of 14 rows
    pub fn a3() -> Self {
        Self {
            sheet_width: Length::from_cm(29.7).pt(),
            sheet_height: Length::from_cm(42.0).pt(),
            margins: Margins::uniform(Length::from_cm(1.5).pt()),
            columns: 2,
            rows_per_column: 14,
            cut_diameter: Length::from_cm(2.6).pt(),
            logo_diameter: Length::from_cm(2.5).pt(),
            qr_diameter: Length::from_cm(2.1).pt(),
            element_gap: Length::from_cm(0.3).pt(),
            row_gap: Length::from_cm(0.5).pt(),
            id_zone_width: Length::from_cm(1.5).pt(),
            id_gap: Length::from_cm(0.8).pt(),
        }
    }

    /// Maximum number of rows a single sheet holds
    pub fn rows_per_page(&self) -> usize {
        (self.columns as usize) * (self.rows_per_column as usize)
    }

    /// Width of one column of the printable area
    pub fn column_width(&self) -> f64 {
        (self.sheet_width - self.margins.left - self.margins.right) / self.columns as f64
    }

    /// Vertical pitch between consecutive row centers in a column
    pub fn row_height(&self) -> f64 {
        self.cut_diameter + self.row_gap
    }

    /// Check that these constants describe a sheet that can actually hold rows
    ///
    /// Rejected configurations never reach the renderer; callers get an
    /// [`Error::InvalidGridConfig`] before any entry is processed.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows_per_column == 0 {
            return Err(Error::InvalidGridConfig(
                "row capacity is zero (columns and rows per column must be at least 1)".into(),
            ));
        }
        if self.cut_diameter <= 0.0 {
            return Err(Error::InvalidGridConfig(
                "die-cut circle diameter must be positive".into(),
            ));
        }
        if self.logo_diameter <= 0.0 || self.qr_diameter <= 0.0 {
            return Err(Error::InvalidGridConfig(
                "image diameters must be positive".into(),
            ));
        }
        if self.column_width() <= 0.0 {
            return Err(Error::InvalidGridConfig(
                "margins leave no horizontal room for columns".into(),
            ));
        }
        if self.sheet_height - self.margins.top - self.margins.bottom <= 0.0 {
            return Err(Error::InvalidGridConfig(
                "margins leave no vertical room for rows".into(),
            ));
        }
        if self.row_height() <= 0.0 {
            return Err(Error::InvalidGridConfig(
                "row pitch must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Placement for a row index within one page
    ///
    /// Pure function of the config and the index: the left column fills
    /// top-to-bottom first, then the right column. Valid for
    /// `0 <= index < rows_per_page()`.
    pub fn position_for_row(&self, index: usize) -> RowPlacement {
        let column = index / self.rows_per_column as usize;
        let row_in_column = index % self.rows_per_column as usize;

        let x = self.margins.left + column as f64 * self.column_width();
        let y = self.sheet_height
            - self.margins.top
            - row_in_column as f64 * self.row_height()
            - self.cut_diameter / 2.0;

        RowPlacement { x, y }
    }
}
