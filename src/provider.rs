use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies raw source text for a unit under test and accepts fully-formed
/// replacement texts. The runner uses it to materialize ephemeral per-mutant
/// variants; removal failures are treated as non-fatal by callers.
pub trait SourceProvider: Send + Sync {
    fn read(&self, unit: &Path) -> Result<String>;
    fn write(&self, unit: &Path, text: &str) -> Result<()>;
    fn remove(&self, unit: &Path) -> Result<()>;
}

/// Plain filesystem-backed provider.
pub struct FileSourceProvider;

impl SourceProvider for FileSourceProvider {
    fn read(&self, unit: &Path) -> Result<String> {
        Ok(fs::read_to_string(unit)?)
    }

    fn write(&self, unit: &Path, text: &str) -> Result<()> {
        Ok(fs::write(unit, text)?)
    }

    fn remove(&self, unit: &Path) -> Result<()> {
        Ok(fs::remove_file(unit)?)
    }
}

/// Hidden sibling path for one mutant's source variant. The mutant id is
/// part of the name so concurrent batch members never collide.
pub fn mutant_artifact_path(source_unit: &Path, mutant_id: &str) -> PathBuf {
    let dir = source_unit.parent().unwrap_or_else(|| Path::new("."));
    let stem = source_unit
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unit");
    let extension = source_unit
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("al");
    dir.join(format!(".{stem}.mutant-{mutant_id}.{extension}"))
}
