//! CSV persistence of the draw table.
//!
//! One header row naming every column, one row per draw. Loading resolves
//! columns by header name, so files carrying extra columns (for example a
//! leading unnamed index column) load as long as all draw columns exist.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};

use crate::models::{COLUMNS, DrawRecord, DrawTable};

/// Load a persisted table. Any malformed row is a hard error.
pub fn load_table(path: &Path) -> Result<DrawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_path(path)
        .with_context(|| format!("Failed to open draw table {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let positions = column_positions(&headers)
        .with_context(|| format!("Invalid header in {}", path.display()))?;

    let mut table = DrawTable::new();
    for (line, record) in reader.records().enumerate() {
        // header is line 1
        let line = line + 2;
        let record =
            record.with_context(|| format!("Failed to read line {line} of {}", path.display()))?;

        let fields: Vec<&str> = positions
            .iter()
            .map(|&i| record.get(i).unwrap_or_default())
            .collect();
        let draw = DrawRecord::from_text_fields(&fields)
            .with_context(|| format!("Invalid draw on line {line} of {}", path.display()))?;
        table
            .push(draw)
            .with_context(|| format!("Invalid draw on line {line} of {}", path.display()))?;
    }

    log::info!("Loaded {} draws from {}", table.len(), path.display());
    Ok(table)
}

/// Write the table in one go.
///
/// Rows go to a temporary sibling file that is renamed over `path` once
/// complete, so a failed write never leaves a partial table behind.
pub fn save_table(path: &Path, table: &DrawTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp_path = temporary_path(path);
    write_rows(&tmp_path, table).inspect_err(|_e| {
        if let Err(e) = fs::remove_file(&tmp_path) {
            log::debug!("Failed to remove {}: {e}", tmp_path.display());
        }
    })?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to move {} to {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    log::info!("Saved {} draws to {}", table.len(), path.display());
    Ok(())
}

fn write_rows(path: &Path, table: &DrawTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(COLUMNS)?;
    for draw in table {
        writer
            .write_record(draw.to_text_fields())
            .with_context(|| format!("Failed to write draw #{}", draw.draw_number))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Index of every draw column in `headers`, in `COLUMNS` order.
fn column_positions(headers: &csv::StringRecord) -> Result<Vec<usize>> {
    COLUMNS
        .iter()
        .map(|&column| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| anyhow::anyhow!("missing column `{column}`"))
        })
        .collect()
}
