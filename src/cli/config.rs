//! Input documents and option resolution for the CLI.
//!
//! An input file is JSON in one of three shapes:
//!
//! ```json
//! { "kind": "protocol", "name": "Service", ... }
//! [ { "kind": "protocol", ... }, { "kind": "protocol", ... } ]
//! { "declarations": [ ... ], "options": { "accessLevel": "public" } }
//! ```
//!
//! The envelope form also accepts a single `"declaration"`. Options from the
//! file are the base; command-line flags override them field by field.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use spysmith_common::{PreprocessorFlag, SynthesisOptions};
use spysmith_syntax::Declaration;

use crate::cli::args::CliArgs;

/// One parsed input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    pub declarations: Vec<Declaration>,
    pub options: SynthesisOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Envelope {
    #[serde(default)]
    declaration: Option<Declaration>,
    #[serde(default)]
    declarations: Vec<Declaration>,
    #[serde(default)]
    options: SynthesisOptions,
}

/// Parse the text of an input file.
pub fn parse_input(text: &str) -> Result<InputDocument> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;

    match value {
        Value::Array(_) => {
            let declarations: Vec<Declaration> =
                serde_json::from_value(value).context("invalid declaration list")?;
            Ok(InputDocument {
                declarations,
                options: SynthesisOptions::default(),
            })
        }
        Value::Object(ref fields) if fields.contains_key("kind") => {
            let declaration: Declaration =
                serde_json::from_value(value).context("invalid declaration")?;
            Ok(InputDocument {
                declarations: vec![declaration],
                options: SynthesisOptions::default(),
            })
        }
        Value::Object(_) => {
            let envelope: Envelope =
                serde_json::from_value(value).context("invalid input document")?;
            let mut declarations = envelope.declarations;
            if let Some(declaration) = envelope.declaration {
                declarations.insert(0, declaration);
            }
            if declarations.is_empty() {
                bail!("input document contains no declarations");
            }
            Ok(InputDocument {
                declarations,
                options: envelope.options,
            })
        }
        _ => bail!("input must be a declaration, a list of declarations, or an envelope object"),
    }
}

/// Apply command-line overrides on top of the options read from a file.
#[must_use]
pub fn resolve_options(file_options: &SynthesisOptions, args: &CliArgs) -> SynthesisOptions {
    let mut options = file_options.clone();
    if let Some(level) = args.access_level {
        options.access_level = Some(level.into());
    }
    if let Some(flag) = &args.preprocessor_flag {
        options.preprocessor_flag = Some(PreprocessorFlag::literal(flag));
    }
    if let Some(base) = &args.inherited_type {
        options.inherited_type = Some(base.clone());
    }
    options
}
