//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive catalog generation (input and
//! output paths, decade quotas, seed, enrichment defaults) and helpers to load
//! them from disk and the environment.

mod load;
mod schema;

pub use schema::*;
