use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use spysmith_common::AccessLevel;

/// CLI arguments for the spysmith binary.
#[derive(Parser, Debug)]
#[command(
    name = "spysmith",
    version,
    about = "Synthesizes call-recording spy classes from Swift protocol descriptions"
)]
pub struct CliArgs {
    /// Access level applied to the spy and all of its members.
    #[arg(long, value_enum)]
    pub access_level: Option<AccessLevelArg>,

    /// Wrap the spy in `#if <NAME>` ... `#endif`.
    #[arg(long, value_name = "NAME")]
    pub preprocessor_flag: Option<String>,

    /// Base class the spy inherits from.
    #[arg(long, value_name = "TYPE")]
    pub inherited_type: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = EmitFormat::Swift)]
    pub emit: EmitFormat,

    /// Write one file per spy into this directory instead of stdout.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Disable colored diagnostics.
    #[arg(long)]
    pub no_color: bool,

    /// Log synthesis decisions to stderr (`-v` summary, `-vv` every member).
    /// `SPYSMITH_LOG` overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Protocol description files (`.json`) or directories to search.
    #[arg(value_name = "INPUTS", required = true)]
    pub inputs: Vec<PathBuf>,
}

/// `--access-level` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccessLevelArg {
    Private,
    Fileprivate,
    Internal,
    Package,
    Public,
    Open,
}

impl From<AccessLevelArg> for AccessLevel {
    fn from(value: AccessLevelArg) -> Self {
        match value {
            AccessLevelArg::Private => Self::Private,
            AccessLevelArg::Fileprivate => Self::Fileprivate,
            AccessLevelArg::Internal => Self::Internal,
            AccessLevelArg::Package => Self::Package,
            AccessLevelArg::Public => Self::Public,
            AccessLevelArg::Open => Self::Open,
        }
    }
}

/// `--emit` values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// Swift source text
    #[default]
    Swift,
    /// The structural spy declaration as JSON
    Json,
}

impl EmitFormat {
    /// File extension used under `--out-dir`.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Swift => "swift",
            Self::Json => "json",
        }
    }
}
