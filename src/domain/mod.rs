//! Domain layer: the recalculation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod allocate;
pub mod entities;
pub mod error;

pub use aggregate::{aggregate, variance, AggregatedItem, AggregatedTree};
pub use allocate::{apply, apply_percent, apply_value, parse_input, EditMode};
pub use entities::*;
pub use error::DomainError;
