use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::model::{COLUMNS, Employee, EmployeeTable};
use crate::error::{DashboardError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the raw employee table from a CSV file.
///
/// Expected layout: a header row naming exactly the nine schema columns
/// (`EmployeeID, Name, Age, Department, Salary, PerformanceScore,
/// YearsAtCompany, Gender, Position`) followed by one row per employee.
/// Blank cells load as nulls. A leading UTF-8 byte-order mark is skipped so
/// files written by the exporter load back unchanged.
///
/// Any failure (missing file, wrong header, wrong field count, unparsable
/// number) is reported as [`DashboardError::DataUnavailable`].
pub fn load_csv(path: &Path) -> Result<EmployeeTable> {
    let bytes = std::fs::read(path).map_err(|e| DashboardError::unavailable(path, e))?;
    parse_csv(bytes.as_slice(), path)
}

/// Parse employee rows from any reader. `source` only labels errors.
pub fn parse_csv<R: Read>(mut input: R, source: &Path) -> Result<EmployeeTable> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|e| DashboardError::unavailable(source, e))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(body);

    let headers = reader
        .headers()
        .map_err(|e| DashboardError::unavailable(source, e))?
        .clone();
    check_headers(&headers).map_err(|reason| DashboardError::unavailable(source, reason))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<Employee>().enumerate() {
        // Header is line 1.
        let employee = result
            .map_err(|e| DashboardError::unavailable(source, format!("line {}: {e}", row_no + 2)))?;
        rows.push(employee);
    }

    Ok(EmployeeTable::new(rows))
}

fn check_headers(headers: &csv::StringRecord) -> std::result::Result<(), String> {
    if headers.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            headers.len()
        ));
    }
    let missing: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing column(s): {}", missing.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// DataCache – memoized raw tables keyed by source identity
// ---------------------------------------------------------------------------

/// Identity of a source file's contents as seen by the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceFingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceFingerprint {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|e| DashboardError::unavailable(path, e))?;
        Ok(SourceFingerprint {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct CachedTable {
    fingerprint: SourceFingerprint,
    table: Arc<EmployeeTable>,
}

/// Keeps each loaded raw table in memory so repeated refreshes reuse it.
/// A table is re-read only when its file's fingerprint changes.
#[derive(Debug, Default)]
pub struct DataCache {
    entries: HashMap<PathBuf, CachedTable>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the raw table for `path`, reading the file only on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<EmployeeTable>> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let fingerprint = match SourceFingerprint::of(path) {
            Ok(fp) => fp,
            Err(e) => {
                self.entries.remove(&key);
                return Err(e);
            }
        };

        if let Some(cached) = self.entries.get(&key) {
            if cached.fingerprint == fingerprint {
                log::debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&cached.table));
            }
            log::info!("{} changed on disk, reloading", path.display());
        }

        let table = Arc::new(load_csv(path)?);
        log::info!("Loaded {} employee rows from {}", table.len(), path.display());
        self.entries.insert(
            key,
            CachedTable {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "EmployeeID,Name,Age,Department,Salary,PerformanceScore,YearsAtCompany,Gender,Position\n";

    fn parse(body: &str) -> Result<EmployeeTable> {
        parse_csv(body.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn parses_rows_and_blank_cells() {
        let table = parse(&format!(
            "{HEADER}1,Ana,30,IT,50000,85.5,3,f ,Engineer\n2,,41,HR,,70,10,M,Manager\n"
        ))
        .expect("parse");
        assert_eq!(table.len(), 2);
        let first = &table.rows[0];
        assert_eq!(first.employee_id.as_deref(), Some("1"));
        assert_eq!(first.age, Some(30));
        assert_eq!(first.salary, Some(50000.0));
        assert_eq!(first.gender.as_deref(), Some("f "));
        let second = &table.rows[1];
        assert_eq!(second.name, None);
        assert_eq!(second.salary, None);
    }

    #[test]
    fn strips_byte_order_mark() {
        let table = parse(&format!("\u{feff}{HEADER}1,Ana,30,IT,1,1,1,F,X\n")).expect("parse");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn wrong_column_count_is_unavailable() {
        let err = parse("EmployeeID,Name\n1,Ana\n").expect_err("bad header");
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));

        let err = parse(&format!("{HEADER}1,Ana,30\n")).expect_err("short row");
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn wrong_type_is_unavailable() {
        let err = parse(&format!("{HEADER}1,Ana,thirty,IT,1,1,1,F,X\n")).expect_err("bad age");
        match err {
            DashboardError::DataUnavailable { reason, .. } => assert!(reason.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cleared_cache_rereads_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("employees.csv");
        std::fs::write(&path, format!("{HEADER}1,Ana,30,IT,1,1,1,F,X\n")).expect("write");

        let mut cache = DataCache::new();
        assert!(cache.is_empty());
        let first = cache.get_or_load(&path).expect("load");
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        let second = cache.get_or_load(&path).expect("reload");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).expect_err("missing");
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }
}
