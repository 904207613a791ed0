use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{Employee, EmployeeTable, NumericColumn};
use super::stats;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// What to do with blank cells that survive the validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Remove every row with at least one blank cell.
    #[default]
    DropRows,
    /// Fill numeric blanks with the column mean; text blanks are kept.
    FillMean,
    /// Fill numeric blanks with `0` and text blanks with `"0"`.
    FillZero,
}

impl NullPolicy {
    pub const ALL: [NullPolicy; 3] = [NullPolicy::DropRows, NullPolicy::FillMean, NullPolicy::FillZero];

    pub fn label(self) -> &'static str {
        match self {
            NullPolicy::DropRows => "Drop rows",
            NullPolicy::FillMean => "Fill with mean",
            NullPolicy::FillZero => "Fill with 0",
        }
    }
}

/// User-adjustable cleaning inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningParams {
    pub age_min: i64,
    pub age_max: i64,
    pub null_policy: NullPolicy,
    /// Compute the salary IQR bounds and report rows outside them.
    pub detect_outliers: bool,
    /// Set by the explicit confirm action; ignored unless detection is on.
    pub remove_outliers: bool,
    /// Drop rows whose normalized gender is not `M` or `F`.
    pub drop_unknown_gender: bool,
}

impl Default for CleaningParams {
    fn default() -> Self {
        CleaningParams {
            age_min: 18,
            age_max: 65,
            null_policy: NullPolicy::DropRows,
            detect_outliers: false,
            remove_outliers: false,
            drop_unknown_gender: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The rules, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningRule {
    AgeRange,
    PositiveSalary,
    NonNegativeTenure,
    PerformanceRange,
    DuplicateId,
    UnknownGender,
    Nulls,
    SalaryOutliers,
}

impl fmt::Display for CleaningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CleaningRule::AgeRange => "age out of range",
            CleaningRule::PositiveSalary => "non-positive salary",
            CleaningRule::NonNegativeTenure => "negative tenure",
            CleaningRule::PerformanceRange => "score outside 0-100",
            CleaningRule::DuplicateId => "duplicate EmployeeID",
            CleaningRule::UnknownGender => "gender not M/F",
            CleaningRule::Nulls => "blank cells",
            CleaningRule::SalaryOutliers => "salary outliers",
        };
        f.write_str(text)
    }
}

/// Salary IQR bounds and how many rows fall outside them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierReport {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl OutlierReport {
    pub fn is_outlier(&self, salary: f64) -> bool {
        salary < self.lower || salary > self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanReport {
    pub raw_rows: usize,
    pub clean_rows: usize,
    /// Rows dropped by each rule that removed at least one.
    pub removed_by_rule: Vec<(CleaningRule, usize)>,
    /// Blank cells present when the null rule ran.
    pub null_cells: usize,
    /// Present only when outlier detection is enabled and salaries exist.
    pub outliers: Option<OutlierReport>,
}

impl CleanReport {
    pub fn removed(&self) -> usize {
        self.raw_rows - self.clean_rows
    }

    fn record(&mut self, rule: CleaningRule, removed: usize) {
        log::debug!("Cleaning rule '{rule}' removed {removed} row(s)");
        if removed > 0 {
            self.removed_by_rule.push((rule, removed));
        }
    }
}

/// Output of [`clean`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cleaned {
    pub table: EmployeeTable,
    pub report: CleanReport,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply the validation and normalization rules in their fixed order.
/// Each rule only sees rows that survived the previous ones; a row is never
/// synthesized, so the result is a row-for-row subset of `raw`.
///
/// `age_min > age_max` is not rejected: it simply keeps no rows.
pub fn clean(raw: &EmployeeTable, params: &CleaningParams) -> Cleaned {
    let mut table = raw.clone();
    let mut report = CleanReport {
        raw_rows: raw.len(),
        ..CleanReport::default()
    };

    let removed = table.retain(|e| {
        e.age
            .is_some_and(|age| age >= params.age_min && age <= params.age_max)
    });
    report.record(CleaningRule::AgeRange, removed);

    let removed = table.retain(|e| e.salary.is_some_and(|s| s > 0.0));
    report.record(CleaningRule::PositiveSalary, removed);

    let removed = table.retain(|e| e.years_at_company.is_some_and(|y| y >= 0.0));
    report.record(CleaningRule::NonNegativeTenure, removed);

    let removed = table.retain(|e| {
        e.performance_score
            .is_some_and(|p| (0.0..=100.0).contains(&p))
    });
    report.record(CleaningRule::PerformanceRange, removed);

    let mut seen: HashSet<Option<String>> = HashSet::new();
    let removed = table.retain(|e| seen.insert(e.employee_id.clone()));
    report.record(CleaningRule::DuplicateId, removed);

    for employee in &mut table.rows {
        normalize_gender(employee);
    }
    if params.drop_unknown_gender {
        let removed = table.retain(|e| matches!(e.gender.as_deref(), Some("M") | Some("F")));
        report.record(CleaningRule::UnknownGender, removed);
    }

    report.null_cells = table.null_cells();
    if report.null_cells > 0 {
        log::warn!(
            "{} blank cell(s) after validation, applying policy '{}'",
            report.null_cells,
            params.null_policy.label()
        );
        let removed = apply_null_policy(&mut table, params.null_policy);
        report.record(CleaningRule::Nulls, removed);
    }

    if params.detect_outliers {
        report.outliers = detect_salary_outliers(&table);
        if let Some(outliers) = report.outliers {
            if outliers.count > 0 {
                log::warn!(
                    "{} salary outlier(s) outside [{:.2}, {:.2}]",
                    outliers.count,
                    outliers.lower,
                    outliers.upper
                );
                if params.remove_outliers {
                    let removed = remove_salary_outliers(&mut table, &outliers);
                    report.record(CleaningRule::SalaryOutliers, removed);
                }
            }
        }
    }

    report.clean_rows = table.len();
    log::info!(
        "Cleaning kept {} of {} row(s) ({} removed)",
        report.clean_rows,
        report.raw_rows,
        report.removed()
    );
    Cleaned { table, report }
}

/// Upper-case and trim the gender cell in place. A cell holding only
/// whitespace becomes blank.
pub fn normalize_gender(employee: &mut Employee) {
    employee.gender = employee
        .gender
        .as_deref()
        .map(|g| g.trim().to_uppercase())
        .filter(|g| !g.is_empty());
}

/// Apply a null policy, returning the number of rows removed (only
/// [`NullPolicy::DropRows`] removes rows).
pub fn apply_null_policy(table: &mut EmployeeTable, policy: NullPolicy) -> usize {
    match policy {
        NullPolicy::DropRows => table.retain(|e| !e.has_nulls()),
        NullPolicy::FillMean => {
            let age = stats::mean(table.values(NumericColumn::Age)).map(|m| m.round() as i64);
            let salary = stats::mean(table.values(NumericColumn::Salary));
            let score = stats::mean(table.values(NumericColumn::PerformanceScore));
            let years = stats::mean(table.values(NumericColumn::YearsAtCompany));
            for e in &mut table.rows {
                e.age = e.age.or(age);
                e.salary = e.salary.or(salary);
                e.performance_score = e.performance_score.or(score);
                e.years_at_company = e.years_at_company.or(years);
            }
            0
        }
        NullPolicy::FillZero => {
            let zero = || Some("0".to_string());
            for e in &mut table.rows {
                e.employee_id = e.employee_id.take().or_else(zero);
                e.name = e.name.take().or_else(zero);
                e.department = e.department.take().or_else(zero);
                e.gender = e.gender.take().or_else(zero);
                e.position = e.position.take().or_else(zero);
                e.age = e.age.or(Some(0));
                e.salary = e.salary.or(Some(0.0));
                e.performance_score = e.performance_score.or(Some(0.0));
                e.years_at_company = e.years_at_company.or(Some(0.0));
            }
            0
        }
    }
}

/// Classify salaries with the 1.5 x IQR rule. Nothing is removed here.
/// `None` when the table has no salary values.
pub fn detect_salary_outliers(table: &EmployeeTable) -> Option<OutlierReport> {
    let salaries = stats::sorted(table.values(NumericColumn::Salary));
    let q1 = stats::quantile(&salaries, 0.25)?;
    let q3 = stats::quantile(&salaries, 0.75)?;
    let iqr = q3 - q1;
    let mut report = OutlierReport {
        q1,
        q3,
        iqr,
        lower: q1 - 1.5 * iqr,
        upper: q3 + 1.5 * iqr,
        count: 0,
    };
    report.count = salaries.iter().filter(|&&s| report.is_outlier(s)).count();
    Some(report)
}

/// Drop rows whose salary lies outside the report's bounds (blank salaries
/// are dropped too). Returns the number of rows removed.
pub fn remove_salary_outliers(table: &mut EmployeeTable, report: &OutlierReport) -> usize {
    let removed = table.retain(|e| e.salary.is_some_and(|s| !report.is_outlier(s)));
    log::info!("Removed {removed} salary outlier row(s)");
    removed
}
