//! Input side of the generator: the primary dataset and the curated list.
//!
//! `loader` turns raw rows into decade-tagged [`RawRecord`]s, dropping
//! anything unusable, and reads the tab-separated [`CuratedRow`]s.

mod loader;
mod record;

pub use loader::*;
pub use record::*;
