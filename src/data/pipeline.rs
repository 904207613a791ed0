use super::aggregate::{self, Summary};
use super::clean::{self, Cleaned, CleaningParams};
use super::filter::{self, FilterOptions, FilterSelection};
use super::model::EmployeeTable;
use crate::config::KpiTargets;

/// Everything derived from the raw table for one set of user inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cleaned: Cleaned,
    pub options: FilterOptions,
    /// The selection actually applied (ranges clamped to `options`).
    pub selection: FilterSelection,
    pub view: EmployeeTable,
    pub summary: Summary,
}

impl Snapshot {
    pub fn clean(&self) -> &EmployeeTable {
        &self.cleaned.table
    }
}

/// Run clean, filter and aggregate from scratch.
///
/// `selection = None` selects every option of the freshly cleaned table.
/// Pure: the same inputs always produce the same snapshot.
pub fn recompute(
    raw: &EmployeeTable,
    cleaning: &CleaningParams,
    selection: Option<&FilterSelection>,
    filter_by_gender: bool,
    targets: &KpiTargets,
) -> Snapshot {
    let cleaned = clean::clean(raw, cleaning);
    let options = FilterOptions::from_table(&cleaned.table);
    let selection = match selection {
        Some(selection) => selection.clamped(&options),
        None => FilterSelection::all(&options),
    };
    let view = filter::apply(&cleaned.table, &selection, filter_by_gender);
    let summary = aggregate::summarize(&view, targets);
    Snapshot {
        cleaned,
        options,
        selection,
        view,
        summary,
    }
}
