use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Environment variable naming a config file when none is passed on the
/// command line.
pub const CONFIG_ENV: &str = "EMPLOYEE_DASHBOARD_CONFIG";

pub const CLEANING_EXPORT_NAME: &str = "empleados_limpios_filtrados.csv";
pub const HR_EXPORT_NAME: &str = "empleados_rrhh_filtrados.csv";

// ---------------------------------------------------------------------------
// Variant – the two dashboard flavours as one flag set
// ---------------------------------------------------------------------------

/// Behavioural switches distinguishing the dashboard variants.
///
/// In JSON either a preset name (`"cleaning"` or `"hr"`) or an object with
/// the fields below is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VariantSpec")]
pub struct Variant {
    /// Drop rows whose normalized gender is not `M`/`F` while cleaning.
    pub drop_unknown_gender: bool,
    /// Apply the gender multiselect as a filter predicate.
    pub filter_by_gender: bool,
    /// Default file name offered when exporting the view.
    pub export_file_name: String,
}

impl Variant {
    /// Strict cleaning dashboard: unknown genders are dropped.
    pub fn cleaning() -> Self {
        Variant {
            drop_unknown_gender: true,
            filter_by_gender: true,
            export_file_name: CLEANING_EXPORT_NAME.to_string(),
        }
    }

    /// HR dashboard: every normalized gender value is kept.
    pub fn hr() -> Self {
        Variant {
            drop_unknown_gender: false,
            filter_by_gender: true,
            export_file_name: HR_EXPORT_NAME.to_string(),
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::cleaning()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum VariantPreset {
    Cleaning,
    Hr,
}

#[derive(Deserialize)]
struct CustomVariant {
    #[serde(default = "yes")]
    drop_unknown_gender: bool,
    #[serde(default = "yes")]
    filter_by_gender: bool,
    #[serde(default = "default_export_name")]
    export_file_name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VariantSpec {
    Preset(VariantPreset),
    Custom(CustomVariant),
}

impl From<VariantSpec> for Variant {
    fn from(spec: VariantSpec) -> Self {
        match spec {
            VariantSpec::Preset(VariantPreset::Cleaning) => Variant::cleaning(),
            VariantSpec::Preset(VariantPreset::Hr) => Variant::hr(),
            VariantSpec::Custom(c) => Variant {
                drop_unknown_gender: c.drop_unknown_gender,
                filter_by_gender: c.filter_by_gender,
                export_file_name: c.export_file_name,
            },
        }
    }
}

fn yes() -> bool {
    true
}

fn default_export_name() -> String {
    CLEANING_EXPORT_NAME.to_string()
}

// ---------------------------------------------------------------------------
// KPI targets
// ---------------------------------------------------------------------------

/// Fixed targets the KPI deltas compare against, and the thresholds for the
/// top-performer and new-hire counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiTargets {
    pub performance: f64,
    pub tenure_years: f64,
    pub salary: f64,
    /// Scores at or above this count as top performers.
    pub top_performer_score: f64,
    /// Tenures strictly below this count as new hires.
    pub new_hire_years: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        KpiTargets {
            performance: 80.0,
            tenure_years: 5.0,
            salary: 70_000.0,
            top_performer_score: 90.0,
            new_hire_years: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Source CSV. Fixed for the session; not chosen by the user.
    pub data_path: PathBuf,
    pub variant: Variant,
    pub targets: KpiTargets,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from("employees.csv"),
            variant: Variant::default(),
            targets: KpiTargets::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config_error = |reason: String| DashboardError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let mut config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;

        // A relative data path is relative to the config file.
        if config.data_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_path = dir.join(&config.data_path);
            }
        }
        Ok(config)
    }

    /// Resolve the configuration: explicit path, then [`CONFIG_ENV`], then
    /// built-in defaults.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let path = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            None => {
                log::info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_parse_by_name() {
        let config: DashboardConfig = serde_json::from_str(r#"{"variant": "hr"}"#).expect("parse");
        assert_eq!(config.variant, Variant::hr());
        assert_eq!(config.data_path, PathBuf::from("employees.csv"));
        assert_eq!(config.targets, KpiTargets::default());
    }

    #[test]
    fn custom_variant_fills_missing_flags() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"variant": {"drop_unknown_gender": false}}"#).expect("parse");
        assert!(!config.variant.drop_unknown_gender);
        assert!(config.variant.filter_by_gender);
        assert_eq!(config.variant.export_file_name, CLEANING_EXPORT_NAME);
    }

    #[test]
    fn targets_override_individually() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"targets": {"salary": 50000}}"#).expect("parse");
        assert_eq!(config.targets.salary, 50_000.0);
        assert_eq!(config.targets.performance, 80.0);
    }

    #[test]
    fn load_resolves_data_path_next_to_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dashboard.json");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(br#"{"data_path": "staff.csv"}"#).expect("write");

        let config = DashboardConfig::load(&path).expect("load");
        assert_eq!(config.data_path, dir.path().join("staff.csv"));
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = DashboardConfig::load(&path).expect_err("invalid");
        assert!(matches!(err, DashboardError::Config { .. }));
    }
}
