use std::collections::BTreeSet;

use super::model::{Category, CategoryColumn, Employee, EmployeeTable, NumericColumn, NumericRange};

// ---------------------------------------------------------------------------
// Filter options: what the widgets can offer for a given clean table
// ---------------------------------------------------------------------------

/// Choices available for filtering, derived from the clean table.
/// A `None` range means the column has no values ("no data").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub departments: Vec<Category>,
    pub genders: Vec<Category>,
    pub salary: Option<NumericRange>,
    pub years: Option<NumericRange>,
}

impl FilterOptions {
    pub fn from_table(clean: &EmployeeTable) -> Self {
        FilterOptions {
            departments: clean.distinct(CategoryColumn::Department),
            genders: clean.distinct(CategoryColumn::Gender),
            salary: NumericRange::spanning(clean, NumericColumn::Salary).ok(),
            years: NumericRange::spanning(clean, NumericColumn::YearsAtCompany).ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter selection: the user's current choices
// ---------------------------------------------------------------------------

/// Selected values per filter. An empty category set selects nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub departments: BTreeSet<Category>,
    pub genders: BTreeSet<Category>,
    pub salary: Option<NumericRange>,
    pub years: Option<NumericRange>,
}

impl FilterSelection {
    /// Select everything the options offer.
    pub fn all(options: &FilterOptions) -> Self {
        FilterSelection {
            departments: options.departments.iter().cloned().collect(),
            genders: options.genders.iter().cloned().collect(),
            salary: options.salary,
            years: options.years,
        }
    }

    /// Fit a previous selection to new options. A category list that changed
    /// resets to "all"; a range spanning the old bounds spans the new ones,
    /// any other range is clamped.
    pub fn reconcile(self, previous: &FilterOptions, options: &FilterOptions) -> Self {
        let departments = if previous.departments == options.departments {
            self.departments
        } else {
            options.departments.iter().cloned().collect()
        };
        let genders = if previous.genders == options.genders {
            self.genders
        } else {
            options.genders.iter().cloned().collect()
        };
        FilterSelection {
            departments,
            genders,
            salary: refit(self.salary, previous.salary, options.salary),
            years: refit(self.years, previous.years, options.years),
        }
    }

    /// Copy of this selection with both ranges clamped to the option bounds.
    pub fn clamped(&self, options: &FilterOptions) -> Self {
        FilterSelection {
            departments: self.departments.clone(),
            genders: self.genders.clone(),
            salary: clamp(self.salary, options.salary),
            years: clamp(self.years, options.years),
        }
    }

    pub fn toggle_department(&mut self, value: &Category) {
        toggle(&mut self.departments, value);
    }

    pub fn toggle_gender(&mut self, value: &Category) {
        toggle(&mut self.genders, value);
    }

    /// Set the salary range, clamped to the option bounds.
    pub fn set_salary(&mut self, range: NumericRange, options: &FilterOptions) {
        self.salary = clamp(Some(range), options.salary);
    }

    /// Set the tenure range, clamped to the option bounds.
    pub fn set_years(&mut self, range: NumericRange, options: &FilterOptions) {
        self.years = clamp(Some(range), options.years);
    }
}

fn toggle(set: &mut BTreeSet<Category>, value: &Category) {
    if !set.remove(value) {
        set.insert(value.clone());
    }
}

fn clamp(range: Option<NumericRange>, bounds: Option<NumericRange>) -> Option<NumericRange> {
    match (range, bounds) {
        (Some(range), Some(bounds)) => Some(range.clamp_to(&bounds)),
        (None, bounds) => bounds,
        (Some(_), None) => None,
    }
}

fn refit(
    range: Option<NumericRange>,
    previous: Option<NumericRange>,
    bounds: Option<NumericRange>,
) -> Option<NumericRange> {
    if range.is_none() || range == previous {
        bounds
    } else {
        clamp(range, bounds)
    }
}

// ---------------------------------------------------------------------------
// Applying a selection
// ---------------------------------------------------------------------------

/// Whether one employee passes every active predicate. Range bounds are
/// inclusive; a blank numeric cell fails an active range.
pub fn matches(employee: &Employee, selection: &FilterSelection, filter_by_gender: bool) -> bool {
    let category = |column: CategoryColumn| column.value(employee).map(str::to_string);
    let in_range = |range: &Option<NumericRange>, column: NumericColumn| match range {
        Some(range) => column.value(employee).is_some_and(|v| range.contains(v)),
        None => true,
    };

    selection
        .departments
        .contains(&category(CategoryColumn::Department))
        && (!filter_by_gender || selection.genders.contains(&category(CategoryColumn::Gender)))
        && in_range(&selection.salary, NumericColumn::Salary)
        && in_range(&selection.years, NumericColumn::YearsAtCompany)
}

/// Build the view table: rows of `clean` passing the conjunction of all
/// predicates, in their original order. Pure in its inputs.
pub fn apply(clean: &EmployeeTable, selection: &FilterSelection, filter_by_gender: bool) -> EmployeeTable {
    let view: EmployeeTable = clean
        .iter()
        .filter(|e| matches(e, selection, filter_by_gender))
        .cloned()
        .collect();
    log::debug!("Filters kept {} of {} clean row(s)", view.len(), clean.len());
    view
}
