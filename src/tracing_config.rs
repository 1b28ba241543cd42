//! Logging for spysmith runs.
//!
//! Logs always go to stderr: stdout carries the generated Swift or JSON.
//! What gets logged is decided in this order:
//!
//! 1. `SPYSMITH_LOG` (or `RUST_LOG`), with `RUST_LOG` syntax
//! 2. the `-v` count: `-v` logs one line per spy and per input file,
//!    `-vv` adds every member, prefix and property decision
//! 3. otherwise nothing is installed
//!
//! `SPYSMITH_LOG_FORMAT=text|tree|json` picks the layout.
//!
//! ```bash
//! spysmith -vv service.json
//! SPYSMITH_LOG="spysmith_synth::namer=trace" SPYSMITH_LOG_FORMAT=tree spysmith service.json
//! ```

use std::io::IsTerminal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Log layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    #[default]
    Text,
    /// Indented span tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is `Text`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Per-crate directives for a `-v` count, `None` when logging stays off.
#[must_use]
pub fn verbosity_directives(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("warn,spysmith=info,spysmith_synth=debug"),
        _ => Some("warn,spysmith=debug,spysmith_synth=trace,spysmith_emitter=trace"),
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    /// `EnvFilter` directives; `None` disables logging.
    pub directives: Option<String>,
}

impl LogSettings {
    /// Resolve settings from explicit values. Environment directives win
    /// over the verbosity count.
    #[must_use]
    pub fn resolve(
        spysmith_log: Option<String>,
        rust_log: Option<String>,
        format: Option<String>,
        verbosity: u8,
    ) -> Self {
        let directives = spysmith_log
            .or(rust_log)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| verbosity_directives(verbosity).map(str::to_string));
        Self {
            format: format.as_deref().map(LogFormat::parse).unwrap_or_default(),
            directives,
        }
    }

    /// Resolve settings from the process environment.
    #[must_use]
    pub fn from_env(verbosity: u8) -> Self {
        Self::resolve(
            std::env::var("SPYSMITH_LOG").ok(),
            std::env::var("RUST_LOG").ok(),
            std::env::var("SPYSMITH_LOG_FORMAT").ok(),
            verbosity,
        )
    }
}

/// Install the global subscriber for `verbosity` and the environment.
pub fn init_tracing(verbosity: u8) {
    let settings = LogSettings::from_env(verbosity);
    let Some(directives) = settings.directives else {
        return;
    };

    let filter = EnvFilter::builder().parse_lossy(directives);
    let ansi = std::io::stderr().is_terminal();
    match settings.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            let text_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .without_time();

            Registry::default().with(filter).with(text_layer).init();
        }
    }
}
