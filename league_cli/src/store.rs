//! JSON snapshot of every tournament.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use league_engine::Tournament;

/// Read the snapshot; a missing file is an empty snapshot
pub fn load(path: &Path) -> Result<Vec<Tournament>> {
    if !path.exists() {
        log::debug!("No snapshot at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let tournaments: Vec<Tournament> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    log::debug!("Loaded {} tournament(s) from {}", tournaments.len(), path.display());
    Ok(tournaments)
}

/// Write the snapshot, replacing the previous file
pub fn save(path: &Path, tournaments: &[Tournament]) -> Result<()> {
    let data = serde_json::to_string_pretty(tournaments).context("Failed to serialize snapshot")?;

    // Write next to the target, then rename over it
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
