//! Sheet pagination, row rendering and document assembly

use std::collections::BTreeSet;
use std::mem;
use std::path::{Path, PathBuf};

use chrono::Local;
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use crate::catalog::{scan_qr_directory, QrEntry};
use crate::error::{Error, Result};
use crate::layout::{GridConfig, Length, RowPlacement};
use crate::overrides::{resolve_logo, LogoChoice, OverrideMap};
use crate::pdf::content;
use crate::pdf::images::ImageStore;

/// Document title written to the Info dictionary
pub const DOC_TITLE: &str = "Sticker Sheets - WhoKey";
/// Document author written to the Info dictionary
pub const DOC_AUTHOR: &str = "sticker-sheets";

// Label placement relative to the row's column origin and centerline.
const LABEL_INSET_CM: f64 = 0.2;
const LABEL_BASELINE_DROP: f64 = 3.0;

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct SheetOptions {
    /// Directory holding the QR images
    pub qr_dir: PathBuf,
    /// Logo used for every row without an override
    pub default_logo: PathBuf,
    /// Override snapshot, identifier → logo path
    pub overrides: OverrideMap,
    /// Output PDF path
    pub output_path: PathBuf,
    /// Grid constants for the sheet
    pub config: GridConfig,
}

/// Statistics for one completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub total_pages: usize,
    pub total_rows: usize,
    /// Always `total_rows * 2`
    pub logo_stickers: usize,
    /// Always `total_rows * 2`
    pub qr_stickers: usize,
    /// Distinct identifiers that rendered with an override logo
    pub overrides_applied: usize,
    /// Degradation warnings in the order they occurred
    pub warnings: Vec<String>,
}

/// Pages needed to hold `rows` rows under `config`
///
/// Fails with [`Error::InvalidGridConfig`] when the grid constants are
/// unusable, the same check [`render_document`] applies.
pub fn pages_needed(rows: usize, config: &GridConfig) -> Result<usize> {
    config.validate()?;
    Ok(rows.div_ceil(config.rows_per_page()))
}

/// Scan the QR directory, render every row and save the finished PDF
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use sticker_sheets::layout::GridConfig;
/// use sticker_sheets::overrides::OverrideMap;
/// use sticker_sheets::pdf::{generate_sheets, SheetOptions};
///
/// let options = SheetOptions {
///     qr_dir: PathBuf::from("qrs"),
///     default_logo: PathBuf::from("logo.png"),
///     overrides: OverrideMap::new(),
///     output_path: PathBuf::from("sticker-sheets.pdf"),
///     config: GridConfig::a3(),
/// };
///
/// let result = generate_sheets(&options)?;
/// println!("{} pages, {} rows", result.total_pages, result.total_rows);
/// # Ok::<(), sticker_sheets::Error>(())
/// ```
pub fn generate_sheets(options: &SheetOptions) -> Result<RunResult> {
    let entries = scan_qr_directory(&options.qr_dir)?;
    let (mut doc, result) = render_document(
        &entries,
        &options.config,
        &options.default_logo,
        &options.overrides,
    )?;

    // Compress and save
    doc.compress();
    doc.save(&options.output_path)?;
    log::debug!(
        "saved {} ({} pages)",
        options.output_path.display(),
        result.total_pages
    );

    Ok(result)
}

/// Render catalog entries into an in-memory document plus its statistics
///
/// Fails before anything is drawn when the grid constants are unusable, the
/// default logo is missing, or there are no entries. Per-asset problems
/// never fail the run; the affected sticker degrades to a bare die-cut
/// guide and the warning is recorded in the returned [`RunResult`].
pub fn render_document(
    entries: &[QrEntry],
    config: &GridConfig,
    default_logo: &Path,
    overrides: &OverrideMap,
) -> Result<(Document, RunResult)> {
    config.validate()?;
    if !default_logo.exists() {
        return Err(Error::MissingDefaultLogo(default_logo.to_path_buf()));
    }
    if entries.is_empty() {
        return Err(Error::NoQrEntries);
    }

    let mut doc = Document::with_version("1.5");
    let font_id = label_font(&mut doc);
    let mut images = ImageStore::new();

    let mut warnings: Vec<String> = Vec::new();
    let mut applied: BTreeSet<u64> = BTreeSet::new();

    let rows_per_page = config.rows_per_page();
    let mut page_contents: Vec<String> = Vec::new();
    let mut current_page = String::new();

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 && i % rows_per_page == 0 {
            page_contents.push(mem::take(&mut current_page));
            log::debug!("sheet {} filled", page_contents.len());
        }

        let place = config.position_for_row(i % rows_per_page);

        let choice = resolve_logo(entry.id, overrides);
        match &choice {
            LogoChoice::Override(_) => {
                applied.insert(entry.id);
            }
            LogoChoice::MissingOverride(path) => {
                let message = format!(
                    "Override logo for ID {} not found: {} (using default)",
                    entry.id,
                    path.display()
                );
                log::warn!("{}", message);
                warnings.push(message);
            }
            LogoChoice::Default => {}
        }
        let logo_path = choice.path_or(default_logo);

        draw_row(
            &mut doc,
            &mut images,
            &mut current_page,
            &mut warnings,
            entry,
            logo_path,
            place,
            config,
        );
    }
    page_contents.push(current_page);

    let total_pages = assemble_document(&mut doc, page_contents, font_id, &images, config);

    let total_rows = entries.len();
    let result = RunResult {
        total_pages,
        total_rows,
        logo_stickers: total_rows * 2,
        qr_stickers: total_rows * 2,
        overrides_applied: applied.len(),
        warnings,
    };

    Ok((doc, result))
}

/// Draw one row: ID label, two logo stickers, two QR stickers
fn draw_row(
    doc: &mut Document,
    images: &mut ImageStore,
    page: &mut String,
    warnings: &mut Vec<String>,
    entry: &QrEntry,
    logo_path: &Path,
    place: RowPlacement,
    config: &GridConfig,
) {
    content::id_label(
        page,
        &entry.id.to_string(),
        place.x + Length::from_cm(LABEL_INSET_CM).pt(),
        place.y - LABEL_BASELINE_DROP,
    );

    // Cursor tracks circle centers; the label zone sits entirely to the left.
    let mut cx = place.x + config.id_zone_width + config.id_gap;
    for _ in 0..2 {
        draw_sticker(doc, images, page, warnings, logo_path, cx, place.y, config.logo_diameter, config);
        cx += config.cut_diameter + config.element_gap;
    }
    for _ in 0..2 {
        draw_sticker(doc, images, page, warnings, &entry.path, cx, place.y, config.qr_diameter, config);
        cx += config.cut_diameter + config.element_gap;
    }
}

/// Draw one sticker: die-cut guide circle plus the centered image
///
/// The guide is drawn unconditionally; a failed image decode degrades the
/// sticker to an empty circle and records a warning.
fn draw_sticker(
    doc: &mut Document,
    images: &mut ImageStore,
    page: &mut String,
    warnings: &mut Vec<String>,
    image_path: &Path,
    cx: f64,
    cy: f64,
    image_diameter: f64,
    config: &GridConfig,
) {
    content::cut_guide_circle(page, cx, cy, config.cut_diameter / 2.0);

    match images.embed(doc, image_path) {
        Ok(handle) => {
            let (x, y, w, h) =
                content::fit_centered(handle.width, handle.height, cx, cy, image_diameter);
            content::place_image(page, &handle.name, x, y, w, h);
        }
        Err(reason) => {
            let message = format!("Could not draw image {}: {}", image_path.display(), reason);
            log::warn!("{}", message);
            warnings.push(message);
        }
    }
}

/// Use Helvetica-Bold (standard PDF font, no embedding needed for digits)
fn label_font(doc: &mut Document) -> lopdf::ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica-Bold".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Turn the accumulated page streams into a complete document tree
///
/// Every page shares one Resources dictionary carrying the label font and
/// every image embedded during the run. Returns the page count.
fn assemble_document(
    doc: &mut Document,
    page_contents: Vec<String>,
    font_id: lopdf::ObjectId,
    images: &ImageStore,
    config: &GridConfig,
) -> usize {
    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut xobjects = Dictionary::new();
    for handle in images.handles() {
        xobjects.set(handle.name.clone(), Object::Reference(handle.object_id));
    }
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources.set("XObject", Object::Dictionary(xobjects));
    let resources_id = doc.add_object(Object::Dictionary(resources));

    let media_box = Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(config.sheet_width as f32),
        Object::Real(config.sheet_height as f32),
    ]);

    // Pages id is reserved first so every page can point back to its parent.
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for ops in page_contents {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), ops.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("MediaBox", media_box.clone());
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Reference(resources_id));

        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }
    let total_pages = kids.len();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(total_pages as i64));
    pages_object.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(Object::Dictionary(info_dictionary()));
    doc.trailer.set("Info", Object::Reference(info_id));

    total_pages
}

/// Document Info dictionary: title, author, producer and creation stamp
fn info_dictionary() -> Dictionary {
    let mut info = Dictionary::new();
    info.set(
        "Title",
        Object::String(DOC_TITLE.as_bytes().to_vec(), StringFormat::Literal),
    );
    info.set(
        "Author",
        Object::String(DOC_AUTHOR.as_bytes().to_vec(), StringFormat::Literal),
    );
    info.set(
        "Producer",
        Object::String(
            format!("sticker-sheets {}", env!("CARGO_PKG_VERSION")).into_bytes(),
            StringFormat::Literal,
        ),
    );
    info.set(
        "CreationDate",
        Object::String(
            Local::now().format("D:%Y%m%d%H%M%S").to_string().into_bytes(),
            StringFormat::Literal,
        ),
    );
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_png(path: &Path) {
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])).save(path).unwrap();
    }

    #[test]
    fn test_pages_needed() {
        let config = GridConfig::a3();
        assert_eq!(pages_needed(1, &config).unwrap(), 1);
        assert_eq!(pages_needed(28, &config).unwrap(), 1);
        assert_eq!(pages_needed(29, &config).unwrap(), 2);
        assert_eq!(pages_needed(56, &config).unwrap(), 2);
        assert_eq!(pages_needed(57, &config).unwrap(), 3);
    }

    #[test]
    fn test_pages_needed_rejects_zero_capacity() {
        let mut config = GridConfig::a3();
        config.columns = 0;
        let err = pages_needed(5, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidGridConfig(_)));
    }

    #[test]
    fn test_missing_default_logo_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let qr = tmp.path().join("whokey-1.png");
        write_png(&qr);
        let entries = vec![QrEntry { id: 1, path: qr }];

        let err = render_document(
            &entries,
            &GridConfig::a3(),
            &tmp.path().join("missing-logo.png"),
            &OverrideMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingDefaultLogo(_)));
    }

    #[test]
    fn test_empty_entry_list_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let logo = tmp.path().join("logo.png");
        write_png(&logo);

        let err =
            render_document(&[], &GridConfig::a3(), &logo, &OverrideMap::new()).unwrap_err();
        assert!(matches!(err, Error::NoQrEntries));
    }

    #[test]
    fn test_invalid_grid_rejected_before_entries() {
        let tmp = TempDir::new().unwrap();
        let logo = tmp.path().join("logo.png");
        write_png(&logo);
        let qr = tmp.path().join("whokey-1.png");
        write_png(&qr);
        let entries = vec![QrEntry { id: 1, path: qr }];

        let mut config = GridConfig::a3();
        config.rows_per_column = 0;
        let err = render_document(&entries, &config, &logo, &OverrideMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidGridConfig(_)));
    }

    #[test]
    fn test_override_replaces_default_logo_entirely() {
        let tmp = TempDir::new().unwrap();
        let logo = tmp.path().join("logo.png");
        write_png(&logo);
        let special = tmp.path().join("gold.png");
        write_png(&special);
        let qr = tmp.path().join("whokey-2.png");
        write_png(&qr);
        let entries = vec![QrEntry { id: 2, path: qr }];

        let mut overrides = OverrideMap::new();
        overrides.insert(2, special);

        let (doc, result) =
            render_document(&entries, &GridConfig::a3(), &logo, &overrides).unwrap();

        assert_eq!(result.overrides_applied, 1);
        // Both logo circles use the override, so the embedded images are the
        // override logo and the QR; the default logo is never embedded.
        let image_count = doc
            .objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => matches!(
                    stream.dict.get(b"Subtype"),
                    Ok(Object::Name(name)) if name == b"Image"
                ),
                _ => false,
            })
            .count();
        assert_eq!(image_count, 2);
    }

    #[test]
    fn test_broken_image_degrades_to_warning() {
        let tmp = TempDir::new().unwrap();
        let logo = tmp.path().join("logo.png");
        write_png(&logo);
        let qr = tmp.path().join("whokey-9.png");
        std::fs::write(&qr, b"not a png").unwrap();
        let entries = vec![QrEntry { id: 9, path: qr }];

        let (_doc, result) =
            render_document(&entries, &GridConfig::a3(), &logo, &OverrideMap::new()).unwrap();

        // Both QR stickers on the row report the broken file
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("whokey-9.png"));
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.total_pages, 1);
    }
}
