//! Hierarchical budget allocation engine.
//!
//! A [`Tree`](domain::Tree) of line items carries current values and
//! immutable baselines. Percentage and absolute edits
//! ([`apply_percent`](domain::apply_percent), [`apply_value`](domain::apply_value))
//! produce new trees; [`aggregate`](domain::aggregate) derives effective
//! values, variances and the grand total for display.
//!
//! Always aggregate after an edit before displaying anything: internal values
//! in an edited tree are placeholders until then.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{BudgetService, EditOutcome};
pub use domain::{
    aggregate, apply_percent, apply_value, AggregatedItem, AggregatedTree, EditMode, ItemId,
    LineItem, Tree,
};
