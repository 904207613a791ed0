use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::data::clean::NullPolicy;
use crate::data::model::{Category, CategoryColumn, NumericRange, category_label};
use crate::state::AppState;
use crate::ui::format;

const WARN: Color32 = Color32::from_rgb(230, 180, 60);
const OK: Color32 = Color32::from_rgb(110, 190, 110);

// ---------------------------------------------------------------------------
// Left side panel – cleaning, filters, export
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data cleaning");
            ui.separator();
            cleaning_controls(ui, state);
            ui.separator();
            cleaning_summary(ui, state);

            ui.add_space(8.0);
            ui.heading("Filters");
            ui.separator();
            filter_controls(ui, state);

            ui.add_space(8.0);
            ui.heading("Export");
            ui.separator();
            export_controls(ui, state);
        });

    // Recompute once after any widget changes.
    state.refresh();
}

fn cleaning_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Age");
    let mut age_min = state.cleaning.age_min;
    let mut age_max = state.cleaning.age_max;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Min");
        ui.add(DragValue::new(&mut age_min).range(0..=100));
        ui.label("Max");
        ui.add(DragValue::new(&mut age_max).range(0..=100));
    });
    state.set_age_bounds(age_min, age_max);

    let null_cells = state
        .snapshot
        .as_ref()
        .map_or(0, |s| s.cleaned.report.null_cells);
    if null_cells > 0 {
        ui.label(RichText::new(format!("{null_cells} blank value(s) found")).color(WARN));
        let mut policy = state.cleaning.null_policy;
        egui::ComboBox::from_id_salt("null_policy")
            .selected_text(policy.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in NullPolicy::ALL {
                    ui.selectable_value(&mut policy, option, option.label());
                }
            });
        state.set_null_policy(policy);
    }

    ui.add_space(4.0);
    ui.strong("Outliers");
    let mut detect = state.cleaning.detect_outliers;
    if ui.checkbox(&mut detect, "Detect salary outliers").changed() {
        state.set_detect_outliers(detect);
    }
    let report = state.snapshot.as_ref().and_then(|s| s.cleaned.report.outliers);
    if let Some(report) = report {
        if report.count == 0 {
            ui.label(RichText::new("No salary outliers").color(OK));
        } else if state.cleaning.remove_outliers {
            ui.label(RichText::new(format!("{} outlier(s) removed", report.count)).color(OK));
        } else {
            ui.label(
                RichText::new(format!(
                    "{} salary outlier(s) outside {} – {}",
                    report.count,
                    format::currency(report.lower),
                    format::currency(report.upper)
                ))
                .color(WARN),
            );
            if ui.button("Remove outliers").clicked() {
                state.confirm_outlier_removal();
            }
        }
    }
}

fn cleaning_summary(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let report = &snapshot.cleaned.report;
    ui.strong("Cleaning summary");
    ui.label(format!("Original rows: {}", report.raw_rows));
    ui.label(format!("After cleaning: {}", report.clean_rows));
    if report.removed() == 0 {
        ui.label(RichText::new("All rows are valid").color(OK));
    } else {
        ui.label(RichText::new(format!("{} row(s) removed", report.removed())).color(WARN));
        for (rule, n) in &report.removed_by_rule {
            ui.small(format!("  {rule}: {n}"));
        }
    }
}

fn filter_controls(ui: &mut Ui, state: &mut AppState) {
    let (Some(options), Some(selection)) = (state.options().cloned(), state.selection().cloned())
    else {
        ui.label("No data loaded.");
        return;
    };

    category_filter(
        ui,
        state,
        CategoryColumn::Department,
        &options.departments,
        |v| selection.departments.contains(v),
    );
    if state.config.variant.filter_by_gender {
        category_filter(
            ui,
            state,
            CategoryColumn::Gender,
            &options.genders,
            |v| selection.genders.contains(v),
        );
    }

    ui.strong("Salary");
    match (options.salary, selection.salary) {
        (Some(bounds), Some(range)) => {
            if let Some(range) = range_editor(ui, "salary", bounds, range, 1000.0) {
                state.set_salary_range(range);
            }
        }
        _ => {
            ui.label(format::NO_DATA);
        }
    }

    ui.strong("Years at company");
    match (options.years, selection.years) {
        (Some(bounds), Some(range)) => {
            if let Some(range) = range_editor(ui, "years", bounds, range, 0.5) {
                state.set_years_range(range);
            }
        }
        _ => {
            ui.label(format::NO_DATA);
        }
    }
}

/// Checkbox list for one categorical filter (collapsible).
fn category_filter(
    ui: &mut Ui,
    state: &mut AppState,
    column: CategoryColumn,
    values: &[Category],
    is_selected: impl Fn(&Category) -> bool,
) {
    let n_selected = values.iter().filter(|v| is_selected(*v)).count();
    let header_text = format!("{column}  ({n_selected}/{})", values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.name())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in values {
                let mut text = RichText::new(category_label(value));
                if state.color_by == column {
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(value));
                    }
                }
                let mut checked = is_selected(value);
                if ui.checkbox(&mut checked, text).changed() {
                    match column {
                        CategoryColumn::Department => state.toggle_department(value),
                        CategoryColumn::Gender => state.toggle_gender(value),
                        CategoryColumn::Position => {}
                    }
                }
            }
        });
}

/// Two drag values bounded by `bounds`. Returns the new range when edited.
fn range_editor(
    ui: &mut Ui,
    id: &str,
    bounds: NumericRange,
    range: NumericRange,
    speed: f64,
) -> Option<NumericRange> {
    let mut lo = range.min;
    let mut hi = range.max;
    let changed = ui
        .push_id(id, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                let a = ui.add(DragValue::new(&mut lo).range(bounds.min..=hi).speed(speed));
                ui.label("to");
                let b = ui.add(DragValue::new(&mut hi).range(lo..=bounds.max).speed(speed));
                a.changed() || b.changed()
            })
            .inner
        })
        .inner;
    changed.then(|| NumericRange::new(lo, hi))
}

fn export_controls(ui: &mut Ui, state: &mut AppState) {
    let rows = state.snapshot.as_ref().map_or(0, |s| s.view.len());
    let enabled = state.snapshot.is_some();
    if ui
        .add_enabled(enabled, egui::Button::new(format!("Export {rows} row(s) to CSV…")))
        .clicked()
    {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload data").clicked() {
                // Failures are shown through the status message.
                if let Err(e) = state.reload() {
                    log::debug!("Reload failed: {e}");
                }
                ui.close_menu();
            }
            if ui.button("Export view…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(raw) = state.raw() {
            let visible = state.snapshot.as_ref().map_or(0, |s| s.view.len());
            ui.label(format!(
                "{} employees loaded from {}, {} visible",
                raw.len(),
                state.config.data_path.display(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                OK
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered employees")
        .set_file_name(state.config.variant.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        // Failures are shown through the status message.
        if let Err(e) = state.export_view(&path) {
            log::debug!("Export to {} failed: {e}", path.display());
        }
    }
}
