use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;

use base16_swatch::batch::{expand_inputs, run_batch};
use base16_swatch::cli::Args;
use base16_swatch::logging;

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let dispatch = logging::dispatch(logging::level_for(args.verbose, args.quiet));
    tracing::dispatcher::with_default(&dispatch, || run(&args))
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = args.config();
    let inputs = expand_inputs(&args.inputs, args.expand_globs())?;
    if config.output.is_some() && inputs.len() > 1 {
        bail!(
            "--output needs exactly one input, got {} files",
            inputs.len()
        );
    }

    let report = run_batch(&inputs, &config);
    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(
            failed = report.failed.len(),
            converted = report.converted.len(),
            "some schemes could not be converted"
        );
        Ok(ExitCode::FAILURE)
    }
}
