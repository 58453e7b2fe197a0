//! # mex-core: Foundational Types for the MEx Model Stack
//!
//! Every other crate in the workspace depends on `mex-core`; it depends on
//! nothing internal. It defines the value types that all metadata entities
//! are built from and the process configuration that collaborators receive
//! by reference.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes for identifiers.** `Identifier` and the per-entity
//!    `Merged*Identifier` / `Extracted*Identifier` types only hold strings
//!    matching [`MEX_ID_PATTERN`]. Each typed identifier knows the schema
//!    title it is rendered with.
//!
//! 2. **One timestamp type.** [`Timestamp`] accepts every precision matched
//!    by [`TIMESTAMP_REGEX`] and keeps that precision when rendered again.
//!
//! 3. **Canonical JSON.** Structural comparisons of schema fragments go
//!    through [`CanonicalJson`] so that key order never leaks into results.
//!
//! 4. **Explicit settings.** [`Settings`] is constructed once at process
//!    start and passed by reference. There is no global settings singleton.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mex-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod settings;
pub mod temporal;
pub mod text;
pub mod transform;

pub use canonical::{canonical_json, CanonicalJson};
pub use error::MexError;
pub use identity::{
    ExtractedOrganizationIdentifier, ExtractedOrganizationalUnitIdentifier,
    ExtractedPrimarySourceIdentifier, ExtractedResourceIdentifier,
    ExtractedVariableGroupIdentifier, ExtractedVariableIdentifier, Identifier,
    MergedOrganizationIdentifier, MergedOrganizationalUnitIdentifier,
    MergedPrimarySourceIdentifier, MergedResourceIdentifier, MergedVariableGroupIdentifier,
    MergedVariableIdentifier, TypedIdentifier, MEX_ID_PATTERN,
};
pub use settings::{IdentityProvider, Settings, Sink};
pub use temporal::{Timestamp, TimestampPrecision, TIMESTAMP_REGEX};
pub use text::{Email, Link, Text, TextLanguage};
pub use transform::{dromedary_to_kebab, sub_only_text};
