//! QR image catalog scanning

use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::Regex;

use crate::error::{Error, Result};

/// Filename prefix every QR image must carry
pub const QR_FILE_PREFIX: &str = "whokey";

/// One correctly named QR image found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrEntry {
    /// Numeric identifier parsed from the filename digits
    pub id: u64,
    /// Path of the source image
    pub path: PathBuf,
}

/// Scan a directory for QR images named `whokey-<digits>.png`
///
/// Matching happens in two stages: a case-sensitive `*.png` listing, then a
/// case-insensitive match of `whokey-<digits>.png` anchored at the start of
/// the filename only. The match is not required to consume the whole name,
/// so `whokey-9.png.png` is accepted with identifier 9. Leading zeros in the
/// digit run are insignificant.
///
/// Entries come back sorted by ascending identifier. Two files parsing to
/// the same identifier are both kept, adjacent, in listing order; nothing
/// deduplicates them.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sticker_sheets::catalog::scan_qr_directory;
///
/// let entries = scan_qr_directory(Path::new("qrs"))?;
/// println!("{} QR images found", entries.len());
/// # Ok::<(), sticker_sheets::Error>(())
/// ```
pub fn scan_qr_directory(dir: &Path) -> Result<Vec<QrEntry>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let pattern = format!("{}/*.png", Pattern::escape(&dir.to_string_lossy()));
    let matcher = Regex::new(&format!(r"(?i)^{}-(\d+)\.png", QR_FILE_PREFIX)).unwrap();

    let mut entries = Vec::new();
    for item in glob::glob(&pattern)
        .map_err(|e| Error::General(format!("Invalid catalog pattern: {}", e)))?
    {
        let path = item.map_err(|e| Error::Io(e.into()))?;
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if let Some(caps) = matcher.captures(name) {
            // A digit run too long for u64 is treated as not matching.
            if let Ok(id) = caps[1].parse::<u64>() {
                entries.push(QrEntry { id, path });
            }
        }
    }

    if entries.is_empty() {
        return Err(Error::EmptyCatalog(dir.to_path_buf()));
    }

    // Stable sort keeps duplicate identifiers in listing order.
    entries.sort_by_key(|entry| entry.id);
    log::debug!("catalog: {} QR images in {}", entries.len(), dir.display());

    Ok(entries)
}
