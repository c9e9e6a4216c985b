use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, SeedError};
use crate::model::SeedDocument;

/// Write `contents` next to `path` and rename it into place, so readers
/// never see a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SeedError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, contents).map_err(|e| SeedError::io(tmp, e))?;
    fs::rename(tmp, path).map_err(|e| SeedError::io(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Pretty-printed (two-space indent) UTF-8 JSON.
pub fn write_seed(path: &Path, seed: &SeedDocument) -> Result<()> {
    let mut json = serde_json::to_string_pretty(seed)
        .map_err(|source| SeedError::Encode { what: "seed document", source })?;
    json.push('\n');
    write_atomic(path, &json)
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SeedError::io(path, e))
}
