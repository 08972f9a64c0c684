//! Target schema mapping
//!
//! Coerces loosely-typed API records into the fixed [`TargetRecord`] shape
//! both sinks write.
//!
//! # Field mapping
//!
//! | Target                 | Source keys (first non-null wins)  |
//! |------------------------|------------------------------------|
//! | `segment`              | `segment`                          |
//! | `code`                 | `cod`, `code`                      |
//! | `asset`                | `asset`                            |
//! | `type`                 | `type`                             |
//! | `participation`        | `part`, `participation`            |
//! | `theoretical_quantity` | `theoricalQty`, `theoreticalQty`   |
//! | `update_date`          | `date`, `updateDate`               |
//!
//! Text columns keep the upstream text untouched, so a pt-BR decimal such as
//! `"0,459"` is never reinterpreted. Only the theoretical quantity is parsed,
//! accepting pt-BR thousand separators.

mod mapper;
mod types;

pub use mapper::{parse_quantity, SchemaMapper};
pub use types::{MappedDataset, SchemaViolation, TargetRecord, TARGET_COLUMNS};
