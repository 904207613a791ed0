use proptest::prelude::*;

use employee_dashboard::data::clean::{self, CleaningParams, NullPolicy};
use employee_dashboard::data::filter::{self, FilterOptions, FilterSelection};
use employee_dashboard::data::model::{Employee, EmployeeTable, NumericRange};
use employee_dashboard::data::pipeline;

fn text_strategy(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::weighted(0.9, proptest::sample::select(values).prop_map(str::to_string))
}

fn employee_strategy() -> impl Strategy<Value = Employee> {
    (
        text_strategy(&["E1", "E2", "E3", "E4", "E5", "E6", "E7", "E8"]),
        proptest::option::weighted(0.9, 10i64..80),
        text_strategy(&["Sales", "Engineering", "HR", ""]),
        proptest::option::weighted(0.9, -5_000.0f64..300_000.0),
        proptest::option::weighted(0.9, -5.0f64..110.0),
        proptest::option::weighted(0.9, -1.0f64..30.0),
        text_strategy(&["M", "F", " m", "female", "X"]),
        text_strategy(&["Junior", "Senior"]),
    )
        .prop_map(
            |(employee_id, age, department, salary, performance_score, years_at_company, gender, position)| {
                Employee {
                    employee_id,
                    name: Some("n".to_string()),
                    age,
                    department,
                    salary,
                    performance_score,
                    years_at_company,
                    gender,
                    position,
                }
            },
        )
}

fn table_strategy() -> impl Strategy<Value = EmployeeTable> {
    proptest::collection::vec(employee_strategy(), 0..40).prop_map(EmployeeTable::new)
}

fn params_strategy() -> impl Strategy<Value = CleaningParams> {
    (
        0i64..40,
        30i64..90,
        proptest::sample::select(NullPolicy::ALL.to_vec()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(age_min, age_max, null_policy, detect_outliers, remove_outliers, drop_unknown_gender)| {
                CleaningParams {
                    age_min,
                    age_max,
                    null_policy,
                    detect_outliers,
                    remove_outliers,
                    drop_unknown_gender,
                }
            },
        )
}

/// Shrink both ranges towards their middle by `fraction` of the span.
fn narrowed(range: Option<NumericRange>, fraction: f64) -> Option<NumericRange> {
    range.map(|r| {
        let cut = (r.max - r.min) * fraction / 2.0;
        NumericRange::new(r.min + cut, r.max - cut)
    })
}

proptest! {
    #[test]
    fn each_stage_only_removes_rows(raw in table_strategy(), params in params_strategy()) {
        let snapshot = pipeline::recompute(&raw, &params, None, true, &Default::default());
        prop_assert!(snapshot.view.len() <= snapshot.clean().len());
        prop_assert!(snapshot.clean().len() <= raw.len());
        prop_assert_eq!(snapshot.cleaned.report.removed(), raw.len() - snapshot.clean().len());
        prop_assert_eq!(snapshot.summary.metrics.count, snapshot.view.len());
    }

    #[test]
    fn cleaning_is_idempotent_without_outlier_removal(
        raw in table_strategy(),
        params in params_strategy(),
    ) {
        let params = CleaningParams { remove_outliers: false, ..params };
        let once = clean::clean(&raw, &params).table;
        let twice = clean::clean(&once, &params).table;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filtering_is_pure(raw in table_strategy(), params in params_strategy()) {
        let cleaned = clean::clean(&raw, &params).table;
        let before = cleaned.clone();
        let options = FilterOptions::from_table(&cleaned);
        let selection = FilterSelection::all(&options);

        let first = filter::apply(&cleaned, &selection, true);
        let second = filter::apply(&cleaned, &selection, true);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&cleaned, &before);
        // Selecting every option keeps every clean row.
        prop_assert_eq!(first.len(), cleaned.len());
    }

    #[test]
    fn narrowing_a_range_never_grows_the_view(
        raw in table_strategy(),
        params in params_strategy(),
        fraction in 0.0f64..1.0,
    ) {
        let cleaned = clean::clean(&raw, &params).table;
        let options = FilterOptions::from_table(&cleaned);
        let wide = FilterSelection::all(&options);
        let mut narrow = wide.clone();
        if let Some(range) = narrowed(options.salary, fraction) {
            narrow.set_salary(range, &options);
        }
        if let Some(range) = narrowed(options.years, fraction) {
            narrow.set_years(range, &options);
        }

        let wide_view = filter::apply(&cleaned, &wide, true);
        let narrow_view = filter::apply(&cleaned, &narrow, true);
        prop_assert!(narrow_view.len() <= wide_view.len());
        for employee in narrow_view.iter() {
            prop_assert!(wide_view.iter().any(|e| e == employee));
        }
    }
}
