//! spysmith: call-recording spy synthesis for Swift protocols.
//!
//! The workspace is split the same way the pipeline is:
//! - `spysmith-common`: diagnostics, access levels, options
//! - `spysmith-syntax`: protocol descriptions and type shapes
//! - `spysmith-synth`: naming, tracking state, forwarding bodies, assembly
//! - `spysmith-emitter`: Swift text
//!
//! This crate re-exports the pipeline and hosts the command-line front end.

pub use spysmith_common as common;
pub use spysmith_emitter as emitter;
pub use spysmith_synth as synth;
pub use spysmith_syntax as syntax;

pub use spysmith_common::{
    AccessLevel, Diagnostic, PreprocessorFlag, SynthesisError, SynthesisOptions,
};
pub use spysmith_emitter::{SwiftPrinter, emit_swift};
pub use spysmith_synth::{SpyDeclaration, synthesize};
pub use spysmith_syntax::{Declaration, InterfaceDescription, TypeShape, parse_type};

// CLI front end (args, input documents, driver, reporter)
#[cfg(feature = "cli")]
pub mod cli;

pub mod tracing_config;

/// Synthesize a spy and render it as Swift in one step.
pub fn generate_swift(
    declaration: &Declaration,
    options: &SynthesisOptions,
) -> Result<String, SynthesisError> {
    synthesize(declaration, options).map(|spy| emit_swift(&spy))
}
