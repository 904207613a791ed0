use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Employee – one row of the source table
// ---------------------------------------------------------------------------

/// A single employee record. Every cell is nullable because the source CSV
/// may leave any field blank; the cleaner decides what survives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "EmployeeID")]
    pub employee_id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<i64>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    #[serde(rename = "Salary")]
    pub salary: Option<f64>,
    #[serde(rename = "PerformanceScore")]
    pub performance_score: Option<f64>,
    #[serde(rename = "YearsAtCompany")]
    pub years_at_company: Option<f64>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Position")]
    pub position: Option<String>,
}

impl Employee {
    /// Number of blank cells in this row.
    pub fn null_cells(&self) -> usize {
        [
            self.employee_id.is_none(),
            self.name.is_none(),
            self.age.is_none(),
            self.department.is_none(),
            self.salary.is_none(),
            self.performance_score.is_none(),
            self.years_at_company.is_none(),
            self.gender.is_none(),
            self.position.is_none(),
        ]
        .into_iter()
        .filter(|&missing| missing)
        .count()
    }

    pub fn has_nulls(&self) -> bool {
        self.null_cells() > 0
    }
}

/// Column headers in file order.
pub const COLUMNS: [&str; 9] = [
    "EmployeeID",
    "Name",
    "Age",
    "Department",
    "Salary",
    "PerformanceScore",
    "YearsAtCompany",
    "Gender",
    "Position",
];

// ---------------------------------------------------------------------------
// Column accessors
// ---------------------------------------------------------------------------

/// Numeric columns of the employee schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Age,
    Salary,
    PerformanceScore,
    YearsAtCompany,
}

impl NumericColumn {
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Age => "Age",
            NumericColumn::Salary => "Salary",
            NumericColumn::PerformanceScore => "PerformanceScore",
            NumericColumn::YearsAtCompany => "YearsAtCompany",
        }
    }

    pub fn value(self, employee: &Employee) -> Option<f64> {
        match self {
            NumericColumn::Age => employee.age.map(|a| a as f64),
            NumericColumn::Salary => employee.salary,
            NumericColumn::PerformanceScore => employee.performance_score,
            NumericColumn::YearsAtCompany => employee.years_at_company,
        }
    }
}

/// Categorical columns; also the dimensions charts can be coloured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryColumn {
    #[default]
    Department,
    Gender,
    Position,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 3] = [
        CategoryColumn::Department,
        CategoryColumn::Gender,
        CategoryColumn::Position,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoryColumn::Department => "Department",
            CategoryColumn::Gender => "Gender",
            CategoryColumn::Position => "Position",
        }
    }

    pub fn value(self, employee: &Employee) -> Option<&str> {
        match self {
            CategoryColumn::Department => employee.department.as_deref(),
            CategoryColumn::Gender => employee.gender.as_deref(),
            CategoryColumn::Position => employee.position.as_deref(),
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A categorical cell value; `None` is a blank cell and is a selectable
/// category of its own.
pub type Category = Option<String>;

/// Label used wherever a blank category is shown.
pub fn category_label(value: &Category) -> &str {
    value.as_deref().unwrap_or("<null>")
}

// ---------------------------------------------------------------------------
// NumericRange – inclusive bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        NumericRange { min, max }
    }

    /// Bounds of the non-null values of `column`; fails on a table with no
    /// values instead of producing infinities.
    pub fn spanning(table: &EmployeeTable, column: NumericColumn) -> Result<Self> {
        let mut values = table.values(column);
        let first = values.next().ok_or(DashboardError::EmptyResult {
            column: column.name(),
        })?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Ok(NumericRange { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Restrict this range to `bounds`. A range entirely outside the bounds
    /// collapses onto the nearest edge.
    pub fn clamp_to(&self, bounds: &NumericRange) -> Self {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(bounds.min, bounds.max);
        NumericRange {
            min: min.min(max),
            max,
        }
    }
}

// ---------------------------------------------------------------------------
// EmployeeTable – ordered rows sharing the schema
// ---------------------------------------------------------------------------

/// An ordered sequence of employee rows. The raw, clean and view tables are
/// all instances of this type; each is a row-for-row subset of the previous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeTable {
    pub rows: Vec<Employee>,
}

impl EmployeeTable {
    pub fn new(rows: Vec<Employee>) -> Self {
        EmployeeTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.rows.iter()
    }

    /// Non-null values of a numeric column, in row order.
    pub fn values(&self, column: NumericColumn) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |e| column.value(e))
    }

    /// Total number of blank cells across all rows and columns.
    pub fn null_cells(&self) -> usize {
        self.rows.iter().map(Employee::null_cells).sum()
    }

    /// Distinct values of a categorical column in first-appearance order.
    pub fn distinct(&self, column: CategoryColumn) -> Vec<Category> {
        let mut seen: Vec<Category> = Vec::new();
        for employee in &self.rows {
            let value = column.value(employee).map(str::to_string);
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        seen
    }

    /// Keep only rows matching `keep`, returning how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&Employee) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }
}

impl FromIterator<Employee> for EmployeeTable {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        EmployeeTable {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EmployeeTable {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
