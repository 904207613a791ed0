mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{TestWorkspace, VALID_ROWS};
use employee_dashboard::config::{DashboardConfig, Variant};
use employee_dashboard::data::clean::CleaningParams;
use employee_dashboard::data::loader::{self, DataCache};
use employee_dashboard::data::model::NumericRange;
use employee_dashboard::data::{export, pipeline};
use employee_dashboard::error::DashboardError;
use employee_dashboard::state::AppState;

fn config_for(path: std::path::PathBuf, variant: Variant) -> DashboardConfig {
    DashboardConfig {
        data_path: path,
        variant,
        ..DashboardConfig::default()
    }
}

#[test]
fn cache_reuses_table_until_file_changes() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS[..3]);

    let mut cache = DataCache::new();
    let first = cache.get_or_load(&path).expect("first load");
    let second = cache.get_or_load(&path).expect("cached load");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 3);

    ws.write_employees("employees.csv", &VALID_ROWS);
    let third = cache.get_or_load(&path).expect("reload");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), VALID_ROWS.len());
    assert_eq!(cache.len(), 1);
}

#[test]
fn missing_file_is_data_unavailable() {
    let ws = TestWorkspace::new();
    let err = loader::load_csv(&ws.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DashboardError::DataUnavailable { .. }));
}

#[test]
fn exported_view_reloads_identically() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let raw = loader::load_csv(&path).expect("load");

    let snapshot = pipeline::recompute(
        &raw,
        &CleaningParams::default(),
        None,
        true,
        &Default::default(),
    );
    let out = ws.path().join("export.csv");
    export::save(&snapshot.view, &out).expect("export");

    let reloaded = loader::load_csv(&out).expect("reload export");
    assert_eq!(reloaded, snapshot.view);
}

#[test]
fn state_without_data_shows_only_the_error() {
    let ws = TestWorkspace::new();
    let mut state = AppState::new(config_for(ws.path().join("missing.csv"), Variant::cleaning()));

    assert!(state.load().is_err());
    assert!(state.snapshot.is_none());
    assert!(state.raw().is_none());
    let msg = state.status_message.clone().expect("status message");
    assert!(msg.starts_with("Error"));
}

#[test]
fn failed_reload_clears_previous_numbers() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path.clone(), Variant::cleaning()));
    state.load().expect("load");
    assert!(state.snapshot.is_some());

    std::fs::remove_file(&path).expect("remove");
    assert!(state.load().is_err());
    assert!(state.snapshot.is_none());
}

#[test]
fn outliers_are_removed_only_after_confirmation() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path, Variant::cleaning()));
    state.load().expect("load");
    assert_eq!(state.snapshot.as_ref().map(|s| s.view.len()), Some(6));

    // Confirming without detection does nothing.
    state.confirm_outlier_removal();
    state.refresh();
    assert_eq!(state.snapshot.as_ref().map(|s| s.view.len()), Some(6));

    state.set_detect_outliers(true);
    state.refresh();
    let snapshot = state.snapshot.as_ref().expect("snapshot");
    assert_eq!(snapshot.cleaned.report.outliers.map(|o| o.count), Some(1));
    assert_eq!(snapshot.view.len(), 6);

    state.confirm_outlier_removal();
    state.refresh();
    assert_eq!(state.snapshot.as_ref().map(|s| s.view.len()), Some(5));

    // Any other cleaning change withdraws the confirmation.
    state.set_age_bounds(18, 64);
    state.refresh();
    assert!(!state.cleaning.remove_outliers);
    assert_eq!(state.snapshot.as_ref().map(|s| s.view.len()), Some(6));
}

#[test]
fn narrowing_cleaning_reconciles_the_selection() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path, Variant::cleaning()));
    state.load().expect("load");

    // A full salary range stays full when the clean table shrinks.
    state.set_age_bounds(18, 44);
    state.refresh();
    let snapshot = state.snapshot.as_ref().expect("snapshot");
    assert_eq!(snapshot.view.len(), 4);
    assert_eq!(snapshot.options.salary, Some(NumericRange::new(50_000.0, 60_000.0)));
    assert_eq!(snapshot.selection.salary, snapshot.options.salary);
    assert_eq!(snapshot.selection.years, Some(NumericRange::new(1.0, 6.0)));
}

#[test]
fn filter_edits_narrow_the_view() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path, Variant::hr()));
    state.load().expect("load");

    state.toggle_department(&Some("Sales".to_string()));
    state.refresh();
    let snapshot = state.snapshot.as_ref().expect("snapshot");
    assert_eq!(snapshot.view.len(), 3);
    let departments: BTreeSet<_> = snapshot.view.iter().map(|e| e.department.clone()).collect();
    assert_eq!(departments, BTreeSet::from([Some("Engineering".to_string())]));

    state.set_salary_range(NumericRange::new(59_000.0, 70_000.0));
    state.refresh();
    assert_eq!(state.snapshot.as_ref().map(|s| s.view.len()), Some(2));

    state.select_none(employee_dashboard::data::model::CategoryColumn::Department);
    state.refresh();
    let snapshot = state.snapshot.as_ref().expect("snapshot");
    assert!(snapshot.view.is_empty());
    assert_eq!(snapshot.summary.metrics.count, 0);
    assert!(snapshot.summary.metrics.mean_salary.is_none());
}

#[test]
fn export_from_state_writes_current_view() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path, Variant::cleaning()));
    state.load().expect("load");
    state.toggle_gender(&Some("M".to_string()));
    state.refresh();

    let out = ws.path().join(&state.config.variant.export_file_name);
    let written = state.export_view(&out).expect("export");
    assert_eq!(written, 3);
    let reloaded = loader::load_csv(&out).expect("reload");
    assert!(reloaded.iter().all(|e| e.gender.as_deref() == Some("F")));
}

#[test]
fn reload_reads_the_source_again() {
    let ws = TestWorkspace::new();
    let path = ws.write_employees("employees.csv", &VALID_ROWS);
    let mut state = AppState::new(config_for(path, Variant::cleaning()));
    state.load().expect("load");

    state.reload().expect("reload");
    assert_eq!(state.raw().map(|raw| raw.len()), Some(VALID_ROWS.len()));
    assert!(state.snapshot.is_some());
    assert!(state.status_message.is_none());
}
