#![allow(clippy::print_stderr, clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use spysmith::cli::args::CliArgs;
use spysmith::cli::{driver, reporter::Reporter};

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    spysmith::tracing_config::init_tracing(args.verbose);

    let result = driver::run(&args)?;

    if args.out_dir.is_none() {
        let stdout = result
            .outputs
            .iter()
            .map(|output| output.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        print!("{stdout}");
    } else {
        for output in &result.outputs {
            if let Some(path) = &output.written_to {
                eprintln!("{} -> {}", output.source.display(), path.display());
            }
        }
    }

    if result.has_errors() {
        let color = !args.no_color && std::io::stderr().is_terminal();
        let reporter = Reporter::new(color);
        eprintln!("{}", reporter.render(&result.diagnostics));
        eprintln!(
            "\nFound {} error(s) in {} file(s).",
            result.diagnostics.len(),
            result.files_processed
        );
        return Ok(ExitCode::from(1));
    }

    Ok(ExitCode::SUCCESS)
}
