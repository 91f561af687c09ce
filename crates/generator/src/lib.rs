//! # Synthetic Dataset Generator
//!
//! Fabricates the in-memory tables the dashboard pages analyse. Every dataset is a
//! pure function of its `DatasetParams`: the same seed always yields the same rows,
//! so a page can be regenerated at will and still show identical numbers.
//!
//! ## Public API
//!
//! - `broker_flow`: weekly bank × sector equity flow (full Cartesian product).
//! - `cds_quotes`: CDS quotes against executed prices, per broker and region.
//! - `fills`: fills against sampled reference prices, optionally with asset types.
//! - `calendar`: the business-day and weekly calendars the rows are drawn from.

pub mod calendar;
pub mod catalog;
pub mod error;
pub mod fills;
pub mod flow;
pub mod quotes;
pub mod sampler;

pub use error::GeneratorError;
pub use fills::{FillModel, fills};
pub use flow::broker_flow;
pub use quotes::cds_quotes;
