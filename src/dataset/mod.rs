//! Dataset accumulation
//!
//! Pages may finish in any order once fetching is concurrent, and some never
//! finish at all. The accumulator keeps one slot per page and only flattens
//! them at the end, so the resulting [`Dataset`] is always in ascending page
//! order with records inside a page kept in API order.

mod accumulator;
mod types;

pub use accumulator::RecordAccumulator;
pub use types::{Dataset, DatasetStats, PageRecord};
