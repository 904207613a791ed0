use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{KpiDelta, Summary};
use crate::data::model::{CategoryColumn, Employee, EmployeeTable, NumericColumn};
use crate::state::AppState;
use crate::ui::{format, plot};

const GOOD: Color32 = Color32::from_rgb(110, 190, 110);
const BAD: Color32 = Color32::from_rgb(220, 90, 90);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics, tables and charts for the current view.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Employee analysis dashboard");

    let Some(snapshot) = state.snapshot.clone() else {
        // Data unavailable: show only the message, never stale numbers.
        ui.centered_and_justified(|ui: &mut Ui| {
            let msg = state
                .status_message
                .clone()
                .unwrap_or_else(|| "Loading employee data…".to_string());
            ui.label(RichText::new(msg).color(BAD).heading());
        });
        return;
    };
    let summary = &snapshot.summary;
    let view = &snapshot.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if view.is_empty() {
                ui.label(
                    RichText::new("No employees match the current cleaning and filters.")
                        .color(BAD),
                );
            }

            metric_row(ui, summary);
            ui.add_space(6.0);
            kpi_row(ui, summary);
            ui.add_space(6.0);
            people_row(ui, summary);

            ui.separator();
            egui::CollapsingHeader::new(RichText::new("Department summary").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| department_table(ui, summary));

            egui::CollapsingHeader::new(RichText::new("Data").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| data_table(ui, view));

            ui.separator();
            chart_controls(ui, state);
            charts(ui, state, view);
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).heading().strong());
    });
}

fn metric_row(ui: &mut Ui, summary: &Summary) {
    let m = &summary.metrics;
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Employees", m.count.to_string());
        metric(&mut cols[1], "Mean salary", format::optional_currency(m.mean_salary));
        metric(&mut cols[2], "Mean performance", format::optional(m.mean_performance, 1));
        metric(&mut cols[3], "Mean years at company", format::optional(m.mean_years, 1));
    });
}

/// Observed value with its signed distance from target, green when
/// favorable.
fn kpi(
    ui: &mut Ui,
    label: &str,
    kpi: &KpiDelta,
    show: impl Fn(f64) -> String,
    delta_text: impl Fn(f64) -> String,
) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(format!("{label} (target {})", show(kpi.target)));
        match (kpi.actual, kpi.delta(), kpi.is_favorable()) {
            (Some(actual), Some(delta), Some(good)) => {
                ui.label(RichText::new(show(actual)).heading().strong());
                let color = if good { GOOD } else { BAD };
                ui.label(RichText::new(delta_text(delta)).color(color));
            }
            _ => {
                ui.label(RichText::new(format::NO_DATA).heading());
            }
        }
    });
}

fn kpi_row(ui: &mut Ui, summary: &Summary) {
    let k = &summary.kpis;
    ui.columns(3, |cols| {
        kpi(
            &mut cols[0],
            "Performance",
            &k.performance,
            |v| format!("{v:.1}"),
            |d| format::delta(d, 1),
        );
        kpi(
            &mut cols[1],
            "Tenure",
            &k.tenure,
            |v| format!("{v:.1} yrs"),
            |d| format!("{} yrs", format::delta(d, 1)),
        );
        kpi(
            &mut cols[2],
            "Salary",
            &k.salary,
            format::currency,
            |d| {
                let sign = if d >= 0.0 { "+" } else { "" };
                format!("{sign}{}", format::currency(d))
            },
        );
    });
}

fn people_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(3, |cols| {
        metric(
            &mut cols[0],
            "Top performers",
            format!(
                "{} ({:.1}%)",
                summary.top_performers.count, summary.top_performers.percent
            ),
        );
        metric(&mut cols[1], "Gender pay gap", format!("{:.1}%", summary.pay_gap));
        metric(
            &mut cols[2],
            "New hires",
            format!("{} ({:.1}%)", summary.new_hires.count, summary.new_hires.percent),
        );
    });
}

fn department_table(ui: &mut Ui, summary: &Summary) {
    if summary.departments.is_empty() {
        ui.label(format::NO_DATA);
        return;
    }
    egui::Grid::new("department_summary")
        .striped(true)
        .num_columns(7)
        .show(ui, |ui: &mut Ui| {
            for header in [
                "Department",
                "Employees",
                "Mean salary",
                "Min salary",
                "Max salary",
                "Mean performance",
                "Mean years",
            ] {
                ui.strong(header);
            }
            ui.end_row();

            for d in &summary.departments {
                ui.label(&d.department);
                ui.label(d.employees.to_string());
                ui.label(format::optional_currency_cents(d.mean_salary));
                ui.label(format::optional_currency_cents(d.min_salary));
                ui.label(format::optional_currency_cents(d.max_salary));
                ui.label(format::optional(d.mean_performance, 2));
                ui.label(format::optional(d.mean_years, 2));
                ui.end_row();
            }
        });
}

fn cell_text(employee: &Employee, column: usize) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    match column {
        0 => text(&employee.employee_id),
        1 => text(&employee.name),
        2 => employee.age.map(|a| a.to_string()).unwrap_or_default(),
        3 => text(&employee.department),
        4 => number(employee.salary),
        5 => number(employee.performance_score),
        6 => number(employee.years_at_company),
        7 => text(&employee.gender),
        _ => text(&employee.position),
    }
}

fn data_table(ui: &mut Ui, view: &EmployeeTable) {
    let columns = crate::data::model::COLUMNS;
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().resizable(true), columns.len())
        .header(20.0, |mut header| {
            for name in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, view.len(), |mut row| {
                let employee = &view.rows[row.index()];
                for column in 0..columns.len() {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell_text(employee, column));
                    });
                }
            });
        });
}

fn chart_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Color by");
        let mut color_by = state.color_by;
        egui::ComboBox::from_id_salt("color_by")
            .selected_text(color_by.name())
            .show_ui(ui, |ui: &mut Ui| {
                for column in CategoryColumn::ALL {
                    ui.selectable_value(&mut color_by, column, column.name());
                }
            });
        state.set_color_by(color_by);

        ui.checkbox(&mut state.show_trend, "Trend line");
    });

    if let Some(cm) = &state.color_map {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (label, color) in cm.legend_entries() {
                ui.label(RichText::new(format!("● {label}")).color(color));
            }
        });
    }
}

fn charts(ui: &mut Ui, state: &AppState, view: &EmployeeTable) {
    ui.columns(2, |cols| {
        plot::salary_by_department(&mut cols[0], view);
        plot::scatter(
            &mut cols[1],
            state,
            view,
            NumericColumn::YearsAtCompany,
            NumericColumn::PerformanceScore,
        );
    });
    ui.columns(2, |cols| {
        plot::employees_by(&mut cols[0], view, CategoryColumn::Gender);
        plot::age_distribution(&mut cols[1], view);
    });
    ui.columns(2, |cols| {
        plot::employees_by(&mut cols[0], view, CategoryColumn::Department);
        plot::scatter(
            &mut cols[1],
            state,
            view,
            NumericColumn::Salary,
            NumericColumn::PerformanceScore,
        );
    });
}
