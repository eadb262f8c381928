use anyhow::{Context, Result};
use oralarg_model::{RunManifest, Year};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const LISTING_CACHE_FILE: &str = "listing.html";

/// Create `<base>/<year>` and return it.
pub fn prepare_year_dir(base: &Path, year: Year) -> Result<PathBuf> {
    let dir = base.join(year.to_string());
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

/// Cache the selected year panel so the listing can be re-examined without
/// re-fetching.
pub fn cache_html(dir: &Path, filename: &str, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Cached listing HTML");
    Ok(path)
}

/// Write the run manifest as pretty JSON into the year directory.
pub fn write_manifest(dir: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), cases = manifest.cases.len(), "Wrote run manifest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(y: &str) -> Year {
        Year::parse_with_current(y, 2030).unwrap()
    }

    #[test]
    fn test_prepare_year_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = prepare_year_dir(tmp.path(), year("2019")).unwrap();
        assert_eq!(dir, tmp.path().join("2019"));
        assert!(dir.is_dir());
        // Second call on an existing directory is fine.
        prepare_year_dir(tmp.path(), year("2019")).unwrap();
    }

    #[test]
    fn test_cache_and_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = prepare_year_dir(tmp.path(), year("2021")).unwrap();

        let cached = cache_html(&dir, LISTING_CACHE_FILE, "<table></table>").unwrap();
        assert_eq!(fs::read_to_string(cached).unwrap(), "<table></table>");

        let mut manifest = RunManifest::new(year("2021"), &tmp.path().display().to_string(), "https://list.test", true);
        manifest.finish();
        let path = write_manifest(&dir, &manifest).unwrap();
        let back: RunManifest = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.year, year("2021"));
        assert!(back.dry_run);
        assert!(back.cases.is_empty());
    }
}
