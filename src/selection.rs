//! Decade-quota selection over the loaded dataset.
//!
//! `allocation` turns a bucket's genre composition into per-genre quotas,
//! `sampler` draws a bucket down to its target with those quotas, and
//! `decade` walks the configured decades, sampling and backfilling each one.
//! All randomness comes from the caller's seeded generator.

mod allocation;
mod decade;
mod sampler;

pub use allocation::*;
pub use decade::*;
pub use sampler::*;
