//! Common types and utilities for the spysmith spy generator.
//!
//! This crate provides foundational types used across all spysmith crates:
//! - Diagnostics and the synthesis error taxonomy (`SynthesisError`, `Diagnostic`)
//! - Access levels and their emittable mapping (`AccessLevel`)
//! - Synthesis configuration (`SynthesisOptions`, `PreprocessorFlag`)

// Diagnostics - typed synthesis failures and their host-facing form
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, ErrorKind, SynthesisError};

// Access levels - visibility keywords and rewrite rules
pub mod access;
pub use access::AccessLevel;

// Options - configuration accepted by the engine
pub mod options;
pub use options::{PreprocessorFlag, SynthesisOptions};
