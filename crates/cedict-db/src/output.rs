use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::Dictionary;

/// What [`write_json`] put on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriteSummary {
    pub records: usize,
    pub bytes: u64,
}

impl WriteSummary {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Write `dictionary` as an indented JSON object keyed by traditional headword.
///
/// Text is written as UTF-8 without ASCII escaping. Missing parent directories
/// are created. The document goes to a temporary file beside `path` first and
/// is renamed into place, so a failed write leaves any previous file intact.
pub fn write_json(dictionary: &Dictionary, path: impl AsRef<Path>) -> Result<WriteSummary> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;

    info!("saving to {}", path.display());
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        serde_json::to_writer_pretty(&mut writer, dictionary)
            .with_context(|| format!("serialize {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
    }
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", path.display()))?;
    set_readable(&tmp)?;

    let file = tmp
        .persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    let bytes = file
        .metadata()
        .with_context(|| format!("stat {}", path.display()))?
        .len();

    let summary = WriteSummary {
        records: dictionary.len(),
        bytes,
    };
    info!("saved {} entries", summary.records);
    info!("file size: {:.2} MB", summary.megabytes());
    Ok(summary)
}

// Temporary files are created owner-only; the output is a shared asset.
#[cfg(unix)]
fn set_readable(tmp: &NamedTempFile) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))
        .with_context(|| format!("set permissions on {}", tmp.path().display()))
}

#[cfg(not(unix))]
fn set_readable(_tmp: &NamedTempFile) -> Result<()> {
    Ok(())
}
