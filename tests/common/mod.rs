#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

pub const HEADER: &str =
    "EmployeeID,Name,Age,Department,Salary,PerformanceScore,YearsAtCompany,Gender,Position";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes an employee CSV with the standard header and `rows` below it.
    pub fn write_employees(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents.push('\n');
        self.write(name, &contents)
    }
}

/// A small, fully valid table: two departments, both genders, one salary
/// far above the rest.
pub const VALID_ROWS: [&str; 6] = [
    "E1,Ana,30,Sales,50000,85,3,F,Junior",
    "E2,Luis,41,Sales,55000,72,6,M,Senior",
    "E3,Marta,35,Engineering,60000,91,1,F,Mid",
    "E4,Javier,52,Engineering,65000,78,12,M,Lead",
    "E5,Lucia,28,Engineering,58000,88,2,F,Junior",
    "E6,Carlos,45,Sales,400000,95,15,M,Lead",
];
