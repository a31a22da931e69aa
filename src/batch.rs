use std::path::{Path, PathBuf};

use crate::error::{Result, SwatchError};
use crate::output::{write_canvas, OutputFormat};
use crate::pipeline::palette::{build_palette, PaletteOptions};
use crate::pipeline::render::{render, CanvasSize};
use crate::scheme::Scheme;

/// What the batch does after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Settings shared by every file of a batch.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit output path; only meaningful for a single input.
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub size: CanvasSize,
    pub palette: PaletteOptions,
    pub on_error: ErrorPolicy,
}

impl Config {
    /// Where the swatch for `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.format.default_output_path(input),
        }
    }
}

/// Convert one scheme file and return the path of the written image.
pub fn convert_file(input: &Path, config: &Config) -> Result<PathBuf> {
    let _span = tracing::info_span!("convert", input = %input.display()).entered();

    tracing::info!("opening scheme");
    let scheme = Scheme::load(input)?;
    let palette = build_palette(&scheme, &config.palette)?;
    let canvas = render(&palette, config.size)?;

    let output = config.output_path(input);
    write_canvas(&canvas, &config.format, &output)?;
    Ok(output)
}

/// Expand shell-style patterns into paths, in argument order.
///
/// With `expand` off every argument is taken literally, as a Unix shell has
/// already globbed them. A pattern that matches nothing contributes nothing.
pub fn expand_inputs<S: AsRef<str>>(patterns: &[S], expand: bool) -> Result<Vec<PathBuf>> {
    if !expand {
        return Ok(patterns.iter().map(|p| PathBuf::from(p.as_ref())).collect());
    }

    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = glob::glob(pattern).map_err(|source| SwatchError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        let before = paths.len();
        for entry in matches {
            match entry {
                Ok(path) => paths.push(path),
                Err(err) => tracing::warn!(pattern, error = %err, "unreadable match"),
            }
        }
        if paths.len() == before {
            tracing::warn!(pattern, "pattern matched no files");
        }
    }
    Ok(paths)
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Input and output path of every converted file.
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, SwatchError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every input in order, one at a time.
pub fn run_batch(inputs: &[PathBuf], config: &Config) -> BatchReport {
    let mut report = BatchReport::default();

    if inputs.is_empty() {
        tracing::warn!("no scheme files given");
        return report;
    }

    for input in inputs {
        match convert_file(input, config) {
            Ok(output) => {
                tracing::info!(input = %input.display(), output = %output.display(), "converted");
                report.converted.push((input.clone(), output));
            }
            Err(err) => {
                tracing::error!(input = %input.display(), error = %err, "conversion failed");
                report.failed.push((input.clone(), err));
                if config.on_error == ErrorPolicy::Abort {
                    tracing::warn!(
                        skipped = inputs.len() - report.converted.len() - report.failed.len(),
                        "aborting batch"
                    );
                    break;
                }
            }
        }
    }

    report
}
