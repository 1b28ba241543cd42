use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use spysmith_common::Diagnostic;
use spysmith_emitter::emit_swift;
use spysmith_synth::{SpyDeclaration, synthesize};

use crate::cli::args::{CliArgs, EmitFormat};
use crate::cli::config::{parse_input, resolve_options};

/// One generated spy.
#[derive(Debug, Clone)]
pub struct SpyOutput {
    /// Input file the protocol came from
    pub source: PathBuf,
    pub spy_name: String,
    pub text: String,
    /// Set when the output was written under `--out-dir`
    pub written_to: Option<PathBuf>,
}

/// Result of one CLI run.
#[derive(Debug, Default)]
pub struct RunResult {
    pub outputs: Vec<SpyOutput>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_processed: usize,
}

impl RunResult {
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Default)]
struct FileResult {
    outputs: Vec<SpyOutput>,
    diagnostics: Vec<Diagnostic>,
}

/// Expand the command-line inputs into the list of files to process.
///
/// Directories are walked recursively for `*.json` files in a stable order.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("failed to walk {}", input.display()))?;
                if entry.file_type().is_file() && is_json_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("input not found: {}", input.display());
        }
    }

    let mut seen = FxHashSet::default();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Synthesize every protocol in the inputs.
///
/// Files are synthesized in parallel; outputs and diagnostics keep input
/// order. Unreadable or malformed files become diagnostics so that the
/// remaining inputs are still processed.
pub fn run(args: &CliArgs) -> Result<RunResult> {
    let files = discover_inputs(&args.inputs)?;
    info!(files = files.len(), "synthesizing spies");

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let per_file: Vec<FileResult> = files
        .par_iter()
        .map(|path| {
            process_file(path, args).unwrap_or_else(|err| FileResult {
                outputs: Vec::new(),
                diagnostics: vec![Diagnostic::error(
                    path.display().to_string(),
                    format!("{err:#}"),
                    0,
                )],
            })
        })
        .collect();

    let mut result = RunResult {
        files_processed: files.len(),
        ..RunResult::default()
    };
    for file in per_file {
        result.diagnostics.extend(file.diagnostics);
        result.outputs.extend(file.outputs);
    }

    if let Some(dir) = &args.out_dir {
        write_outputs(dir, args.emit, &mut result)?;
    }

    Ok(result)
}

/// Write every output to `<dir>/<SpyName>.<ext>`.
///
/// The first output claiming a path wins; later outputs for the same path
/// are dropped and reported against their input file.
fn write_outputs(dir: &Path, format: EmitFormat, result: &mut RunResult) -> Result<()> {
    let mut claimed: FxHashMap<PathBuf, PathBuf> = FxHashMap::default();
    let mut written = Vec::with_capacity(result.outputs.len());

    for mut output in std::mem::take(&mut result.outputs) {
        let target = dir.join(format!("{}.{}", output.spy_name, format.extension()));
        if let Some(first) = claimed.get(&target) {
            warn!(path = %target.display(), source = %output.source.display(), "output collision");
            result.diagnostics.push(
                Diagnostic::error(
                    output.source.display().to_string(),
                    format!(
                        "{} would overwrite the spy generated from {}",
                        target.display(),
                        first.display()
                    ),
                    0,
                )
                .with_note("give the protocols distinct names or generate them separately"),
            );
            continue;
        }

        std::fs::write(&target, &output.text)
            .with_context(|| format!("failed to write {}", target.display()))?;
        debug!(path = %target.display(), "wrote spy");
        claimed.insert(target.clone(), output.source.clone());
        output.written_to = Some(target);
        written.push(output);
    }

    result.outputs = written;
    Ok(())
}

fn process_file(path: &Path, args: &CliArgs) -> Result<FileResult> {
    debug!(file = %path.display(), "processing input");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = parse_input(&text)?;
    let options = resolve_options(&document.options, args);

    let mut result = FileResult::default();
    for declaration in &document.declarations {
        match synthesize(declaration, &options) {
            Ok(spy) => result.outputs.push(SpyOutput {
                source: path.to_path_buf(),
                spy_name: spy.spy.name.clone(),
                text: render(&spy, args.emit)?,
                written_to: None,
            }),
            Err(err) => {
                debug!(declaration = %declaration.name(), error = %err, "synthesis failed");
                result
                    .diagnostics
                    .push(err.to_diagnostic(path.display().to_string()));
            }
        }
    }
    Ok(result)
}

/// Render a synthesized spy in the requested format.
pub fn render(spy: &SpyDeclaration, format: EmitFormat) -> Result<String> {
    match format {
        EmitFormat::Swift => Ok(emit_swift(spy)),
        EmitFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(spy).context("failed to serialize spy")?;
            text.push('\n');
            Ok(text)
        }
    }
}
