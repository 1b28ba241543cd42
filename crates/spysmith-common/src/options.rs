//! Synthesis configuration.
//!
//! Options arrive either from the host (the arguments written next to the
//! protocol) or from the command line. Field names follow the host's
//! camelCase spelling so the same JSON works in both places.

use serde::{Deserialize, Serialize};

use crate::access::AccessLevel;
use crate::diagnostics::SynthesisError;

/// Configuration accepted by the synthesis engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisOptions {
    /// Visibility applied to the spy and every emitted member.
    /// `None` keeps the protocol's declared visibility.
    #[serde(default)]
    pub access_level: Option<AccessLevel>,
    /// Conditional-compilation flag wrapping the whole spy.
    #[serde(default)]
    pub preprocessor_flag: Option<PreprocessorFlag>,
    /// Base class the spy inherits from.
    #[serde(default)]
    pub inherited_type: Option<String>,
}

impl SynthesisOptions {
    #[must_use]
    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_preprocessor_flag(mut self, flag: PreprocessorFlag) -> Self {
        self.preprocessor_flag = Some(flag);
        self
    }

    #[must_use]
    pub fn with_inherited_type(mut self, base: impl Into<String>) -> Self {
        self.inherited_type = Some(base.into());
        self
    }
}

/// The raw argument text supplied for the conditional-compilation flag.
///
/// The text is kept exactly as written (`"DEBUG"`, including quotes) so that
/// non-literal arguments (`flagName`, `"\(prefix)DEBUG"`) can be rejected
/// instead of guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreprocessorFlag(String);

impl PreprocessorFlag {
    /// Wrap raw argument text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a flag from a bare name, quoting it as a literal.
    pub fn literal(name: &str) -> Self {
        Self(format!("\"{name}\""))
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Validate the argument as a plain string literal naming a single
    /// compilation condition, and return that name.
    pub fn validate(&self) -> Result<String, SynthesisError> {
        let reject = || SynthesisError::NonLiteralPreprocessorFlag {
            text: self.0.clone(),
        };

        let text = self.0.trim();
        let inner = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(reject)?;

        let inner = inner.trim();
        if !is_identifier(inner) {
            return Err(reject());
        }
        Ok(inner.to_string())
    }
}

/// A Swift identifier: a letter or `_`, then letters, digits or `_`.
/// Rejects the empty string.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
