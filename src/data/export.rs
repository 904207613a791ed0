use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::model::{COLUMNS, EmployeeTable};
use crate::error::{DashboardError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize the view as UTF-8 CSV with a byte-order mark: header row, then
/// one row per employee, no index column. Blank cells stay blank. An empty
/// view still gets its header.
pub fn write_csv<W: Write>(view: &EmployeeTable, mut out: W) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(COLUMNS)?;
    for employee in view {
        writer.serialize(employee)?;
    }
    writer
        .flush()
        .map_err(|e| DashboardError::Export(format!("flushing CSV: {e}")))?;
    Ok(())
}

/// Export into memory, e.g. for a clipboard or download payload.
pub fn to_bytes(view: &EmployeeTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

/// Export to a file, replacing any existing one.
pub fn save(view: &EmployeeTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| DashboardError::Export(format!("creating {}: {e}", path.display())))?;
    write_csv(view, BufWriter::new(file))?;
    log::info!("Exported {} row(s) to {}", view.len(), path.display());
    Ok(())
}
