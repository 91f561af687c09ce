//! # Dealing Analytics
//!
//! The filter → aggregate → present pipeline shared by every dashboard page.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Nothing here performs I/O. It depends only on `core-types`.
//! - **Stateless Calculation:** A page view is a function of (dataset, filter state).
//!   Filtering returns borrowed rows; aggregation and chart building never mutate
//!   their input.
//! - **Graceful Empty States:** Empty selections and empty groups produce empty
//!   results, never errors. Each visual reports `is_empty()` so renderers can say so.
//!
//! ## Public API
//!
//! - `FilterState` / `Predicate`: the conjunction of date-range, set-membership and
//!   equality tests.
//! - `summarize`, `group_by`, `ordered`, `pivot`, `TimeBucket`: grouped reductions and
//!   chart-ready reshaping.
//! - `BoxStats`: distribution summaries.
//! - `Table`, `CategoryChart`, `PieChart`, `BoxPlot`, `Visual`: what pages present.

pub mod aggregate;
pub mod chart;
pub mod distribution;
pub mod error;
pub mod filter;

pub use aggregate::{Matrix, Measure, Stats, TimeBucket, group_by, ordered, pivot, summarize};
pub use chart::{BoxPlot, CategoryChart, Cell, ChartKind, PieChart, PieSlice, Series, Table, Visual};
pub use distribution::BoxStats;
pub use error::AnalyticsError;
pub use filter::{FilterState, Predicate};
