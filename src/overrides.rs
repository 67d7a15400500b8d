//! Per-identifier logo overrides and their store snapshots

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Snapshot of the override store: identifier → logo path
///
/// Owned by the store, consumed read-only during generation. Multiple
/// identifiers may map to the same path.
pub type OverrideMap = BTreeMap<u64, PathBuf>;

/// Outcome of resolving the logo for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoChoice {
    /// No override configured; the row uses the default logo
    Default,
    /// Override configured and present on disk
    Override(PathBuf),
    /// Override configured but its file is gone; the row falls back to the
    /// default logo and the caller records a warning
    MissingOverride(PathBuf),
}

impl LogoChoice {
    /// Path this choice renders with, given the run's default logo
    pub fn path_or<'a>(&'a self, default_logo: &'a Path) -> &'a Path {
        match self {
            LogoChoice::Override(path) => path,
            _ => default_logo,
        }
    }
}

/// Decide which logo one row uses
///
/// The override file's presence is checked against the filesystem on every
/// call, so a resolved path exists at resolution time.
pub fn resolve_logo(id: u64, overrides: &OverrideMap) -> LogoChoice {
    match overrides.get(&id) {
        Some(path) if path.exists() => LogoChoice::Override(path.clone()),
        Some(path) => LogoChoice::MissingOverride(path.clone()),
        None => LogoChoice::Default,
    }
}

/// Load an override store snapshot
///
/// The store is one JSON object keyed by the identifier's decimal string,
/// mapping to a logo path. A missing file is an empty store; a file that
/// exists but does not parse is an error rather than silently ignored data.
pub fn load_override_map(path: &Path) -> Result<OverrideMap> {
    if !path.exists() {
        return Ok(OverrideMap::new());
    }
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|source| Error::OverrideStore {
        path: path.to_path_buf(),
        source,
    })
}

/// Write an override store snapshot as pretty-printed JSON
pub fn save_override_map(path: &Path, map: &OverrideMap) -> Result<()> {
    let data = serde_json::to_string_pretty(map).map_err(|source| Error::OverrideStore {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, data)?;
    Ok(())
}

/// Parse an override-assignment id list like `"1, 5, 10-12"`
///
/// Tokens are comma-separated; each is a single non-negative integer or an
/// inclusive range `a-b`. Whitespace is ignored and malformed tokens are
/// silently skipped. A reversed range like `7-3` contributes nothing. The
/// result is the deduplicated, ascending union of all resolved integers.
pub fn parse_id_list(text: &str) -> Vec<u64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let mut ids = BTreeSet::new();
    for token in cleaned.split(',') {
        if token.is_empty() {
            continue;
        }
        match token.split_once('-') {
            Some((start, end)) => {
                if let (Ok(a), Ok(b)) = (start.parse::<u64>(), end.parse::<u64>()) {
                    ids.extend(a..=b);
                }
            }
            None => {
                if let Ok(id) = token.parse::<u64>() {
                    ids.insert(id);
                }
            }
        }
    }
    ids.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_singles_and_range() {
        assert_eq!(parse_id_list("1,3,5-7"), vec![1, 3, 5, 6, 7]);
    }

    #[test]
    fn test_parse_degenerate_range() {
        assert_eq!(parse_id_list("2-2"), vec![2]);
    }

    #[test]
    fn test_parse_skips_malformed_tokens() {
        assert_eq!(parse_id_list("abc,3"), vec![3]);
        assert_eq!(parse_id_list("1-2-3,4"), vec![4]);
        assert_eq!(parse_id_list("-5,6"), vec![6]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_id_list(""), Vec::<u64>::new());
        assert_eq!(parse_id_list("  ,  "), Vec::<u64>::new());
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        assert_eq!(parse_id_list("1, 5, 10-12"), vec![1, 5, 10, 11, 12]);
    }

    #[test]
    fn test_parse_reversed_range_is_empty() {
        assert_eq!(parse_id_list("5-3"), Vec::<u64>::new());
    }

    #[test]
    fn test_parse_deduplicates() {
        assert_eq!(parse_id_list("3,3,1-3"), vec![1, 2, 3]);
    }

    #[test]
    fn test_resolve_prefers_existing_override() {
        let tmp = TempDir::new().unwrap();
        let special = tmp.path().join("special.png");
        fs::write(&special, b"").unwrap();

        let mut map = OverrideMap::new();
        map.insert(12, special.clone());

        assert_eq!(resolve_logo(12, &map), LogoChoice::Override(special));
        assert_eq!(resolve_logo(13, &map), LogoChoice::Default);
    }

    #[test]
    fn test_resolve_reports_missing_override() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("gone.png");

        let mut map = OverrideMap::new();
        map.insert(4, gone.clone());

        let choice = resolve_logo(4, &map);
        assert_eq!(choice, LogoChoice::MissingOverride(gone));

        let default = Path::new("logo.png");
        assert_eq!(choice.path_or(default), default);
    }

    #[test]
    fn test_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("overrides.json");

        let mut map = OverrideMap::new();
        map.insert(1, PathBuf::from("logos/alpha.png"));
        map.insert(42, PathBuf::from("logos/beta.png"));

        save_override_map(&store, &map).unwrap();
        let loaded = load_override_map(&store).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_store_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let map = load_override_map(&tmp.path().join("absent.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_store_rejects_corrupt_json() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("overrides.json");
        fs::write(&store, b"{ not json").unwrap();

        let err = load_override_map(&store).unwrap_err();
        assert!(matches!(err, Error::OverrideStore { .. }));
    }
}
