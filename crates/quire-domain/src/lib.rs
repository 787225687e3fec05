//! Quire Domain Layer
//!
//! This crate contains the data model shared by every other Quire crate:
//! the windows cut from a source file, the subject profile accumulated
//! across oracle calls, and the document extracts accepted along the way.
//!
//! ## Key Concepts
//!
//! - **Window**: a bounded, owned slice of the input line sequence
//! - **Subject Profile**: the consolidated record of the entity the documents describe
//! - **Document Extract**: one accepted document boundary with its absolute line range
//! - **Accumulated Result**: the running state threaded through an analysis run
//!
//! ## Architecture
//!
//! - Pure data and merge primitives only
//! - No I/O; infrastructure implementations live in other crates
//! - Trait definitions for the external language-model capability

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod profile;
pub mod result;
pub mod run;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use document::DocumentExtract;
pub use profile::{MultiField, ScalarField, SubjectProfile};
pub use result::AccumulatedResult;
pub use run::RunId;
pub use window::Window;
