//! Series backing the dashboard charts. Plain data; the plotting widgets
//! live in `ui::plot`.

use std::collections::BTreeMap;

use super::model::{Category, CategoryColumn, EmployeeTable, NumericColumn};
use super::stats;

/// Number of equal-width bins in the age distribution chart.
pub const AGE_BINS: usize = 10;

/// Rows per category value, most frequent first (ties keep first appearance).
pub fn value_counts(view: &EmployeeTable, column: CategoryColumn) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for employee in view {
        let value = column.value(employee).map(str::to_string);
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Mean salary per department, lowest first.
pub fn mean_salary_by_department(view: &EmployeeTable) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for employee in view {
        if let (Some(department), Some(salary)) = (employee.department.as_deref(), employee.salary) {
            groups.entry(department).or_default().push(salary);
        }
    }
    let mut means: Vec<(String, f64)> = groups
        .into_iter()
        .filter_map(|(department, salaries)| {
            stats::mean(salaries).map(|m| (department.to_string(), m))
        })
        .collect();
    means.sort_by(|a, b| a.1.total_cmp(&b.1));
    means
}

// ---------------------------------------------------------------------------
// Age histogram
// ---------------------------------------------------------------------------

/// One right-closed bin `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl AgeBin {
    pub fn label(&self) -> String {
        format!("({}, {}]", trim_edge(self.lower), trim_edge(self.upper))
    }
}

fn trim_edge(value: f64) -> String {
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Split the age span into `bins` equal-width right-closed intervals. The
/// first edge is pushed down by 0.1% of the span so the minimum age falls in
/// the first bin; a single distinct age is widened by 0.1% on both sides.
/// Empty when no ages are present.
pub fn age_histogram(view: &EmployeeTable, bins: usize) -> Vec<AgeBin> {
    let ages: Vec<f64> = view.values(NumericColumn::Age).collect();
    let Some((min, max)) = stats::min_max(ages.iter().copied()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = if min == max {
        let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
        (min - pad, max + pad)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    edges[bins] = hi;
    if min != max {
        edges[0] -= (max - min) * 0.001;
    }

    let mut histogram: Vec<AgeBin> = edges
        .windows(2)
        .map(|w| AgeBin {
            lower: w[0],
            upper: w[1],
            count: 0,
        })
        .collect();
    for age in ages {
        if let Some(bin) = histogram
            .iter_mut()
            .find(|b| age > b.lower && age <= b.upper)
        {
            bin.count += 1;
        }
    }
    histogram
}

// ---------------------------------------------------------------------------
// Scatter series and trend line
// ---------------------------------------------------------------------------

/// Points of one colour group.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub group: Category,
    pub points: Vec<[f64; 2]>,
}

/// `(x, y)` points grouped by the colour dimension, groups in first-appearance
/// order. Rows with a blank `x` or `y` are skipped.
pub fn scatter(
    view: &EmployeeTable,
    x: NumericColumn,
    y: NumericColumn,
    color_by: CategoryColumn,
) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for employee in view {
        let (Some(px), Some(py)) = (x.value(employee), y.value(employee)) else {
            continue;
        };
        let group = color_by.value(employee).map(str::to_string);
        match series.iter_mut().find(|s| s.group == group) {
            Some(s) => s.points.push([px, py]),
            None => series.push(ScatterSeries {
                group,
                points: vec![[px, py]],
            }),
        }
    }
    series
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line of `y` on `x` over all rows of the view.
pub fn trend_line(view: &EmployeeTable, x: NumericColumn, y: NumericColumn) -> Option<TrendLine> {
    let points: Vec<[f64; 2]> = view
        .iter()
        .filter_map(|e| Some([x.value(e)?, y.value(e)?]))
        .collect();
    stats::linear_fit(&points).map(|(slope, intercept)| TrendLine { slope, intercept })
}
