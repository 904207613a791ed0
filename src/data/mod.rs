//! Data layer: employee records, loading, cleaning, filtering, aggregation.
//!
//! Architecture:
//! ```text
//!   employees.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse CSV → raw EmployeeTable (memoized per file)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  clean    │  ordered validation rules → clean table + report
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  department / gender / salary / tenure → view table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────────────┐
//!   │ aggregate / charts   │  metrics, KPIs, groups, chart series
//!   └─────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  view → CSV (UTF-8 with BOM)
//!   └──────────┘
//! ```
//!
//! `pipeline::recompute` runs clean → filter → aggregate in one pure call.

pub mod aggregate;
pub mod charts;
pub mod clean;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod stats;
