//! Swift source emission for synthesized spies.
//!
//! `SwiftPrinter` renders the `spysmith-synth` IR as Swift text. The IR is
//! already fully decided; this crate only formats it.

pub mod printer;
mod printer_helpers;

pub use printer::SwiftPrinter;

use spysmith_synth::SpyDeclaration;

/// Render a spy declaration as Swift source.
#[must_use]
pub fn emit_swift(declaration: &SpyDeclaration) -> String {
    tracing::trace!(spy = %declaration.spy.name, "emitting swift");
    SwiftPrinter::emit_declaration(declaration)
}
