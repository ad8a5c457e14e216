//! Application services

pub mod budget;
pub mod loader;

pub use budget::{BudgetService, EditOutcome};
pub use loader::{parse_document, DocumentFormat, TreeLoader};
