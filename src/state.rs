use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::clean::{CleaningParams, NullPolicy};
use crate::data::export;
use crate::data::filter::{FilterOptions, FilterSelection};
use crate::data::loader::DataCache;
use crate::data::model::{Category, CategoryColumn, EmployeeTable, NumericRange};
use crate::data::pipeline::{self, Snapshot};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Widgets mutate inputs through the setters below; each setter marks the
/// state dirty and [`AppState::refresh`] re-runs the whole pipeline once.
pub struct AppState {
    pub config: DashboardConfig,

    cache: DataCache,

    /// Raw table as loaded (None until loaded or after a load failure).
    raw: Option<Arc<EmployeeTable>>,

    /// Cleaning inputs.
    pub cleaning: CleaningParams,

    /// Filter inputs; None selects everything on the next refresh.
    selection: Option<FilterSelection>,

    /// Last pipeline result. None while data is unavailable.
    pub snapshot: Option<Snapshot>,

    /// Which categorical column colours the scatter charts.
    pub color_by: CategoryColumn,

    /// Active colour map for `color_by`.
    pub color_map: Option<ColorMap>,

    /// Overlay a least-squares line on the scatter charts.
    pub show_trend: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    dirty: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cleaning = CleaningParams {
            drop_unknown_gender: config.variant.drop_unknown_gender,
            ..CleaningParams::default()
        };
        Self {
            config,
            cache: DataCache::new(),
            raw: None,
            cleaning,
            selection: None,
            snapshot: None,
            color_by: CategoryColumn::default(),
            color_map: None,
            show_trend: false,
            status_message: None,
            dirty: true,
        }
    }

    /// (Re)load the configured source through the cache. On failure the
    /// dashboard shows only the error: no stale numbers stay visible.
    pub fn load(&mut self) -> Result<()> {
        let path = self.config.data_path.clone();
        match self.cache.get_or_load(&path) {
            Ok(raw) => {
                self.raw = Some(raw);
                self.status_message = None;
                self.dirty = true;
                self.refresh();
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load employee data: {e}");
                self.raw = None;
                self.snapshot = None;
                self.color_map = None;
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Drop cached tables and read the source again, even if unchanged.
    pub fn reload(&mut self) -> Result<()> {
        self.cache.clear();
        self.load()
    }

    pub fn raw(&self) -> Option<&EmployeeTable> {
        self.raw.as_deref()
    }

    pub fn options(&self) -> Option<&FilterOptions> {
        self.snapshot.as_ref().map(|s| &s.options)
    }

    pub fn selection(&self) -> Option<&FilterSelection> {
        self.snapshot.as_ref().map(|s| &s.selection)
    }

    /// Re-run clean → filter → aggregate if any input changed since the
    /// last run.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let Some(raw) = self.raw.clone() else {
            return;
        };

        let previous_options = self.snapshot.as_ref().map(|s| s.options.clone());
        let filter_by_gender = self.config.variant.filter_by_gender;
        let targets = self.config.targets;

        let mut snapshot = pipeline::recompute(
            &raw,
            &self.cleaning,
            self.selection.as_ref(),
            filter_by_gender,
            &targets,
        );
        if let (Some(previous), Some(selection)) = (&previous_options, &self.selection) {
            if *previous != snapshot.options {
                let fitted = selection.clone().reconcile(previous, &snapshot.options);
                snapshot = pipeline::recompute(
                    &raw,
                    &self.cleaning,
                    Some(&fitted),
                    filter_by_gender,
                    &targets,
                );
            }
        }

        self.selection = Some(snapshot.selection.clone());
        self.snapshot = Some(snapshot);
        self.rebuild_color_map();
    }

    // -- cleaning inputs --

    pub fn set_age_bounds(&mut self, min: i64, max: i64) {
        if (self.cleaning.age_min, self.cleaning.age_max) != (min, max) {
            self.cleaning.age_min = min;
            self.cleaning.age_max = max;
            self.cleaning_changed();
        }
    }

    pub fn set_null_policy(&mut self, policy: NullPolicy) {
        if self.cleaning.null_policy != policy {
            self.cleaning.null_policy = policy;
            self.cleaning_changed();
        }
    }

    pub fn set_detect_outliers(&mut self, detect: bool) {
        if self.cleaning.detect_outliers != detect {
            self.cleaning.detect_outliers = detect;
            self.cleaning_changed();
        }
    }

    /// The explicit confirm action: remove the currently detected outliers.
    pub fn confirm_outlier_removal(&mut self) {
        if self.cleaning.detect_outliers && !self.cleaning.remove_outliers {
            log::info!("Outlier removal confirmed");
            self.cleaning.remove_outliers = true;
            self.dirty = true;
        }
    }

    /// Any other cleaning change withdraws a previous removal confirmation.
    fn cleaning_changed(&mut self) {
        self.cleaning.remove_outliers = false;
        self.dirty = true;
    }

    // -- filter inputs --

    fn edit_selection(&mut self, edit: impl FnOnce(&mut FilterSelection, &FilterOptions)) {
        let Some(options) = self.options().cloned() else {
            return;
        };
        // Build on edits not yet applied by a refresh.
        let mut selection = self
            .selection
            .clone()
            .unwrap_or_else(|| FilterSelection::all(&options));
        edit(&mut selection, &options);
        if Some(&selection) != self.selection.as_ref() {
            self.selection = Some(selection);
            self.dirty = true;
        }
    }

    pub fn toggle_department(&mut self, value: &Category) {
        self.edit_selection(|s, _| s.toggle_department(value));
    }

    pub fn toggle_gender(&mut self, value: &Category) {
        self.edit_selection(|s, _| s.toggle_gender(value));
    }

    pub fn set_salary_range(&mut self, range: NumericRange) {
        self.edit_selection(|s, o| s.set_salary(range, o));
    }

    pub fn set_years_range(&mut self, range: NumericRange) {
        self.edit_selection(|s, o| s.set_years(range, o));
    }

    /// Select all values in a category filter.
    pub fn select_all(&mut self, column: CategoryColumn) {
        self.edit_selection(|s, o| match column {
            CategoryColumn::Department => s.departments = o.departments.iter().cloned().collect(),
            CategoryColumn::Gender => s.genders = o.genders.iter().cloned().collect(),
            CategoryColumn::Position => {}
        });
    }

    /// Deselect all values in a category filter.
    pub fn select_none(&mut self, column: CategoryColumn) {
        self.edit_selection(|s, _| match column {
            CategoryColumn::Department => s.departments.clear(),
            CategoryColumn::Gender => s.genders.clear(),
            CategoryColumn::Position => {}
        });
    }

    // -- presentation inputs --

    /// Set colour column and rebuild the map.
    pub fn set_color_by(&mut self, column: CategoryColumn) {
        if self.color_by != column {
            self.color_by = column;
            self.rebuild_color_map();
        }
    }

    fn rebuild_color_map(&mut self) {
        self.color_map = self.snapshot.as_ref().map(|s| {
            ColorMap::new(self.color_by, &s.clean().distinct(self.color_by))
        });
    }

    // -- export --

    /// Write the current view table to `path`.
    pub fn export_view(&mut self, path: &Path) -> Result<usize> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(0);
        };
        match export::save(&snapshot.view, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} row(s) to {}",
                    snapshot.view.len(),
                    path.display()
                ));
                Ok(snapshot.view.len())
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }
}
