use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::charts::{self, AGE_BINS};
use crate::data::model::{CategoryColumn, EmployeeTable, NumericColumn, category_label};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 220.0;
const BAR_COLOR: Color32 = Color32::from_rgb(86, 156, 214);

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per labelled value. Labels appear on hover.
fn bar_chart(ui: &mut Ui, id: &str, title: &str, values: &[(String, f64)]) {
    ui.strong(title);
    if values.is_empty() {
        ui.label(crate::ui::format::NO_DATA);
        return;
    }
    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, (label, value))| Bar::new(i as f64, *value).name(label).width(0.7))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

pub fn salary_by_department(ui: &mut Ui, view: &EmployeeTable) {
    let values = charts::mean_salary_by_department(view);
    bar_chart(ui, "salary_by_department", "Mean salary by department", &values);
}

pub fn employees_by(ui: &mut Ui, view: &EmployeeTable, column: CategoryColumn) {
    let values: Vec<(String, f64)> = charts::value_counts(view, column)
        .iter()
        .map(|(value, n)| (category_label(value).to_string(), *n as f64))
        .collect();
    let id = format!("employees_by_{}", column.name());
    bar_chart(ui, &id, &format!("Employees by {}", column.name().to_lowercase()), &values);
}

pub fn age_distribution(ui: &mut Ui, view: &EmployeeTable) {
    let values: Vec<(String, f64)> = charts::age_histogram(view, AGE_BINS)
        .iter()
        .map(|bin| (bin.label(), bin.count as f64))
        .collect();
    bar_chart(ui, "age_distribution", "Age distribution", &values);
}

// ---------------------------------------------------------------------------
// Scatter charts
// ---------------------------------------------------------------------------

/// Scatter of `y` against `x`, coloured by the state's colour dimension, with
/// an optional trend line.
pub fn scatter(ui: &mut Ui, state: &AppState, view: &EmployeeTable, x: NumericColumn, y: NumericColumn) {
    ui.strong(format!("{} vs {}", y.name(), x.name()));
    let series = charts::scatter(view, x, y, state.color_by);
    if series.is_empty() {
        ui.label(crate::ui::format::NO_DATA);
        return;
    }
    let trend = if state.show_trend {
        charts::trend_line(view, x, y)
    } else {
        None
    };
    let x_range = crate::data::stats::min_max(view.values(x));

    Plot::new(format!("scatter_{}_{}", x.name(), y.name()))
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x.name())
        .y_axis_label(y.name())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for s in &series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&s.group))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points = Points::new(PlotPoints::from(s.points.clone()))
                    .name(category_label(&s.group))
                    .color(color)
                    .radius(3.0);
                plot_ui.points(points);
            }

            if let (Some(trend), Some((lo, hi))) = (trend, x_range) {
                let line = Line::new(PlotPoints::from(vec![[lo, trend.at(lo)], [hi, trend.at(hi)]]))
                    .name("Trend")
                    .color(Color32::WHITE)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}
