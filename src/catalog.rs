//! Catalog model and the stages that produce it.
//!
//! `enrich` maps dataset records and curated rows onto [`CatalogEntry`],
//! `merge` combines sources without duplicate songs, and `writer` sorts,
//! summarizes and persists the result.

mod enrich;
mod entry;
mod merge;
mod writer;

pub use enrich::*;
pub use entry::*;
pub use merge::*;
pub use writer::*;

#[cfg(test)]
mod tests;
