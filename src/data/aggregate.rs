use std::collections::BTreeMap;

use super::model::{Employee, EmployeeTable, NumericColumn};
use super::stats;
use crate::config::KpiTargets;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Headline numbers for the view. Means are `None` on an empty view and are
/// shown as "no data".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub count: usize,
    pub mean_salary: Option<f64>,
    pub mean_performance: Option<f64>,
    pub mean_years: Option<f64>,
}

/// An observed aggregate next to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiDelta {
    pub actual: Option<f64>,
    pub target: f64,
}

impl KpiDelta {
    /// `actual - target`.
    pub fn delta(&self) -> Option<f64> {
        self.actual.map(|a| a - self.target)
    }

    /// A non-negative delta is favourable.
    pub fn is_favorable(&self) -> Option<bool> {
        self.delta().map(|d| d >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub performance: KpiDelta,
    pub tenure: KpiDelta,
    pub salary: KpiDelta,
}

/// A row count and its share of the view, in percent (0 on an empty view).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Share {
    pub count: usize,
    pub percent: f64,
}

/// Per-department statistics, rounded to cents.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub department: String,
    pub employees: usize,
    pub mean_salary: Option<f64>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub mean_performance: Option<f64>,
    pub mean_years: Option<f64>,
}

/// Everything the dashboard reports about a view table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metrics: Metrics,
    pub kpis: Kpis,
    pub top_performers: Share,
    pub new_hires: Share,
    /// Percent; see [`gender_pay_gap`].
    pub pay_gap: f64,
    pub departments: Vec<DepartmentSummary>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Aggregate a view table. Never fails: empty inputs degrade to `None`
/// means and zero counts/percentages.
pub fn summarize(view: &EmployeeTable, targets: &KpiTargets) -> Summary {
    let metrics = metrics(view);
    let summary = Summary {
        metrics,
        kpis: Kpis {
            performance: KpiDelta {
                actual: metrics.mean_performance,
                target: targets.performance,
            },
            tenure: KpiDelta {
                actual: metrics.mean_years,
                target: targets.tenure_years,
            },
            salary: KpiDelta {
                actual: metrics.mean_salary,
                target: targets.salary,
            },
        },
        top_performers: share(view, |e| {
            e.performance_score
                .is_some_and(|p| p >= targets.top_performer_score)
        }),
        new_hires: share(view, |e| {
            e.years_at_company.is_some_and(|y| y < targets.new_hire_years)
        }),
        pay_gap: gender_pay_gap(view),
        departments: department_summary(view),
    };
    log::debug!(
        "Summarized {} row(s): pay gap {:.1}%, {} top performer(s)",
        summary.metrics.count,
        summary.pay_gap,
        summary.top_performers.count
    );
    summary
}

pub fn metrics(view: &EmployeeTable) -> Metrics {
    Metrics {
        count: view.len(),
        mean_salary: stats::mean(view.values(NumericColumn::Salary)),
        mean_performance: stats::mean(view.values(NumericColumn::PerformanceScore)),
        mean_years: stats::mean(view.values(NumericColumn::YearsAtCompany)),
    }
}

/// Count rows matching `predicate` and their percentage of the view.
pub fn share(view: &EmployeeTable, predicate: impl Fn(&Employee) -> bool) -> Share {
    let count = view.iter().filter(|e| predicate(e)).count();
    Share {
        count,
        percent: stats::percentage(count, view.len()),
    }
}

/// `(mean salary of M - mean salary of F) / mean salary of M * 100`.
///
/// The denominator is always the `M` mean. Reported as 0 unless both groups
/// have salaries in the view.
pub fn gender_pay_gap(view: &EmployeeTable) -> f64 {
    let mean_for = |gender: &str| {
        stats::mean(
            view.iter()
                .filter(|e| e.gender.as_deref() == Some(gender))
                .filter_map(|e| e.salary),
        )
    };
    match (mean_for("M"), mean_for("F")) {
        (Some(male), Some(female)) if male != 0.0 => (male - female) / male * 100.0,
        _ => 0.0,
    }
}

/// Group by department (sorted by name; blank departments are skipped) and
/// compute counts and rounded salary/score/tenure statistics.
pub fn department_summary(view: &EmployeeTable) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, Vec<&Employee>> = BTreeMap::new();
    for employee in view {
        if let Some(department) = employee.department.as_deref() {
            groups.entry(department).or_default().push(employee);
        }
    }

    groups
        .into_iter()
        .map(|(department, rows)| {
            let column = |c: NumericColumn| group_values(&rows, c);
            let salary_range = stats::min_max(column(NumericColumn::Salary));
            DepartmentSummary {
                department: department.to_string(),
                employees: rows.len(),
                mean_salary: stats::mean(column(NumericColumn::Salary)).map(stats::round2),
                min_salary: salary_range.map(|(lo, _)| stats::round2(lo)),
                max_salary: salary_range.map(|(_, hi)| stats::round2(hi)),
                mean_performance: stats::mean(column(NumericColumn::PerformanceScore))
                    .map(stats::round2),
                mean_years: stats::mean(column(NumericColumn::YearsAtCompany)).map(stats::round2),
            }
        })
        .collect()
}

fn group_values<'a>(rows: &'a [&'a Employee], column: NumericColumn) -> impl Iterator<Item = f64> + 'a {
    rows.iter().filter_map(move |e| column.value(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gender: &str, department: &str, salary: f64, score: f64, years: f64) -> Employee {
        Employee {
            gender: Some(gender.to_string()),
            department: Some(department.to_string()),
            salary: Some(salary),
            performance_score: Some(score),
            years_at_company: Some(years),
            ..Employee::default()
        }
    }

    #[test]
    fn empty_view_degrades_to_defaults() {
        let summary = summarize(&EmployeeTable::default(), &KpiTargets::default());
        assert_eq!(summary.metrics.count, 0);
        assert_eq!(summary.metrics.mean_salary, None);
        assert_eq!(summary.top_performers, Share::default());
        assert_eq!(summary.new_hires.percent, 0.0);
        assert_eq!(summary.pay_gap, 0.0);
        assert!(summary.departments.is_empty());
        assert_eq!(summary.kpis.salary.delta(), None);
        assert_eq!(summary.kpis.salary.is_favorable(), None);
    }

    #[test]
    fn pay_gap_uses_male_mean_as_denominator() {
        let view = EmployeeTable::new(vec![
            row("M", "IT", 100.0, 50.0, 1.0),
            row("M", "IT", 200.0, 50.0, 1.0),
            row("F", "IT", 80.0, 50.0, 1.0),
            row("F", "IT", 120.0, 50.0, 1.0),
        ]);
        let gap = gender_pay_gap(&view);
        assert!((gap - 100.0 / 3.0).abs() < 1e-9, "gap was {gap}");
    }

    #[test]
    fn pay_gap_needs_both_groups() {
        let view = EmployeeTable::new(vec![row("M", "IT", 100.0, 50.0, 1.0)]);
        assert_eq!(gender_pay_gap(&view), 0.0);
    }

    #[test]
    fn kpis_and_shares() {
        let view = EmployeeTable::new(vec![
            row("M", "IT", 60_000.0, 95.0, 1.0),
            row("F", "HR", 90_000.0, 85.0, 9.0),
        ]);
        let summary = summarize(&view, &KpiTargets::default());
        assert_eq!(summary.kpis.performance.delta(), Some(10.0));
        assert_eq!(summary.kpis.performance.is_favorable(), Some(true));
        assert_eq!(summary.kpis.tenure.delta(), Some(0.0));
        assert_eq!(summary.kpis.tenure.is_favorable(), Some(true));
        assert_eq!(summary.kpis.salary.delta(), Some(5_000.0));
        assert_eq!(summary.top_performers, Share { count: 1, percent: 50.0 });
        assert_eq!(summary.new_hires, Share { count: 1, percent: 50.0 });
    }

    #[test]
    fn department_summary_is_sorted_and_rounded() {
        let view = EmployeeTable::new(vec![
            row("M", "Sales", 100.0, 70.0, 1.0),
            row("F", "IT", 100.0, 80.0, 2.0),
            row("F", "IT", 200.0, 81.0, 3.0),
            row("M", "IT", 150.0, 81.0, 3.0),
        ]);
        let groups = department_summary(&view);
        assert_eq!(groups.len(), 2);
        let it = &groups[0];
        assert_eq!(it.department, "IT");
        assert_eq!(it.employees, 3);
        assert_eq!(it.mean_salary, Some(150.0));
        assert_eq!(it.min_salary, Some(100.0));
        assert_eq!(it.max_salary, Some(200.0));
        assert_eq!(it.mean_performance, Some(80.67));
        assert_eq!(it.mean_years, Some(2.67));
        assert_eq!(groups[1].department, "Sales");
    }
}
