//! Diagnostic types and the synthesis error taxonomy.
//!
//! Every synthesis failure is terminal for the call that produced it. The host
//! turns a `SynthesisError` into a `Diagnostic` (via `to_diagnostic`) and
//! reports it against the declaration that was being expanded.

use serde::Serialize;

/// Stable numeric codes for synthesis diagnostics.
pub mod diagnostic_codes {
    pub const NOT_AN_INTERFACE: u32 = 1001;
    pub const PROPERTY_NOT_SINGLE_BINDING: u32 = 1002;
    pub const PROPERTY_NOT_IDENTIFIER_PATTERN: u32 = 1003;
    pub const NON_LITERAL_PREPROCESSOR_FLAG: u32 = 1004;
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Note = 2,
}

/// A host-facing diagnostic message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Follow-up notes attached to the primary message
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, message: String, code: u32) -> Self {
        Self {
            file,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            notes: Vec::new(),
        }
    }

    /// Attach a note to this diagnostic.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

// =============================================================================
// Synthesis Errors
// =============================================================================

/// Coarse classification of a synthesis failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The input declaration is not interface-shaped.
    StructuralMismatch,
    /// A property declares zero or several bindings.
    PropertyBinding,
    /// A property binding is not a plain identifier.
    PropertyPattern,
    /// A configuration value is malformed.
    Configuration,
}

/// A terminal failure of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("spies can only be synthesized from a protocol; '{name}' is a {kind}")]
    NotAnInterface { name: String, kind: &'static str },
    #[error("property declarations must declare exactly one binding, found {count}")]
    PropertyNotSingleBinding { count: usize },
    #[error("property binding must be a simple identifier, found '{pattern}'")]
    PropertyNotIdentifierPattern { pattern: String },
    #[error("preprocessor flag must be a plain string literal, found '{text}'")]
    NonLiteralPreprocessorFlag { text: String },
}

impl SynthesisError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnInterface { .. } => ErrorKind::StructuralMismatch,
            Self::PropertyNotSingleBinding { .. } => ErrorKind::PropertyBinding,
            Self::PropertyNotIdentifierPattern { .. } => ErrorKind::PropertyPattern,
            Self::NonLiteralPreprocessorFlag { .. } => ErrorKind::Configuration,
        }
    }

    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::NotAnInterface { .. } => diagnostic_codes::NOT_AN_INTERFACE,
            Self::PropertyNotSingleBinding { .. } => diagnostic_codes::PROPERTY_NOT_SINGLE_BINDING,
            Self::PropertyNotIdentifierPattern { .. } => {
                diagnostic_codes::PROPERTY_NOT_IDENTIFIER_PATTERN
            }
            Self::NonLiteralPreprocessorFlag { .. } => {
                diagnostic_codes::NON_LITERAL_PREPROCESSOR_FLAG
            }
        }
    }

    /// Convert into a host-facing diagnostic reported against `file`.
    #[must_use]
    pub fn to_diagnostic(&self, file: impl Into<String>) -> Diagnostic {
        let diagnostic = Diagnostic::error(file.into(), self.to_string(), self.code());
        match self {
            Self::NotAnInterface { .. } => {
                diagnostic.with_note("declare the members on a protocol and synthesize from it")
            }
            Self::PropertyNotSingleBinding { .. } => {
                diagnostic.with_note("split the declaration into one property per line")
            }
            Self::NonLiteralPreprocessorFlag { .. } => {
                diagnostic.with_note("pass the flag as a literal such as \"DEBUG\"")
            }
            Self::PropertyNotIdentifierPattern { .. } => diagnostic,
        }
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
