//! # mex-schema: Schema Reconciliation
//!
//! Proves that the schemas generated from the typed models in `mex-model`
//! describe the same entities as the hand-authored entity schema documents
//! under `schemas/entities`.
//!
//! The two sides use different notations for the same constraints:
//! class-name references against kebab-case URLs, enum references against
//! `useScheme` vocabulary bindings, identifier patterns against identifier
//! references, timestamp patterns against `date`/`date-time` formats. The
//! [`normalize`] module rewrites a field fragment of either side into one
//! canonical form; [`compare`] then checks the two schema sets axis by axis.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use mex_schema::{compare, SchemaSet};
//!
//! let generated = SchemaSet::generated();
//! let specified = SchemaSet::load_specified(Path::new("schemas/entities"))?;
//! compare(&generated, &specified).into_result()?;
//! # Ok::<(), mex_schema::ReconciliationError>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Normalization never fails. Shapes no rule recognizes pass through
//!   unchanged and surface as a field mismatch.
//! - Loading is the only fallible step; comparison reports every mismatch
//!   instead of stopping at the first.

pub mod compare;
pub mod error;
pub mod loader;
pub mod normalize;

pub use compare::{compare, Axis, ComparisonReport, Mismatch};
pub use error::{LoadError, ReconciliationError};
pub use loader::SchemaSet;
pub use normalize::{normalize_field, normalized};
