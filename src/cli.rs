use std::path::PathBuf;

use clap::Parser;

use crate::batch::{Config, ErrorPolicy};
use crate::output::OutputFormat;
use crate::pipeline::palette::{MalformedPolicy, PaletteOptions, BASE16_SLOT_COUNT};
use crate::pipeline::render::CanvasSize;

/// Render base16 color schemes as swatch images, one vertical bar per color.
#[derive(Parser, Debug)]
#[command(name = "base16-swatch", version, about)]
pub struct Args {
    /// Scheme files or glob patterns
    pub inputs: Vec<String>,

    /// Write the image here instead of beside the scheme (single input only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image format, also used as the output extension
    #[arg(short, long, default_value = "png", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Canvas size as WIDTHxHEIGHT
    #[arg(short, long, default_value_t = CanvasSize::default())]
    pub size: CanvasSize,

    /// Number of base colors a scheme must have (0 accepts any number)
    #[arg(short = 'n', long = "expect", default_value_t = BASE16_SLOT_COUNT)]
    pub expect: usize,

    /// Leave out colors that are not valid hex instead of failing the file
    #[arg(long)]
    pub skip_malformed: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Expand glob patterns in the inputs (default on Windows only)
    #[arg(long, overrides_with = "no_glob")]
    pub glob: bool,

    /// Take inputs literally
    #[arg(long, overrides_with = "glob")]
    pub no_glob: bool,

    /// More logging (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Less logging (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_name(s).map_err(|e| e.to_string())
}

impl Args {
    /// Whether inputs go through glob expansion.
    pub fn expand_globs(&self) -> bool {
        if self.glob {
            true
        } else if self.no_glob {
            false
        } else {
            cfg!(windows)
        }
    }

    pub fn config(&self) -> Config {
        Config {
            output: self.output.clone(),
            format: self.format.clone(),
            size: self.size,
            palette: PaletteOptions {
                expected_count: self.expect,
                on_malformed: if self.skip_malformed {
                    MalformedPolicy::Skip
                } else {
                    MalformedPolicy::Fail
                },
            },
            on_error: if self.fail_fast {
                ErrorPolicy::Abort
            } else {
                ErrorPolicy::Continue
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("base16-swatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["a.yaml"]);
        let config = args.config();
        assert_eq!(args.inputs, ["a.yaml"]);
        assert_eq!(config.output, None);
        assert_eq!(config.format, OutputFormat::default());
        assert_eq!(config.size, CanvasSize::new(800, 50));
        assert_eq!(config.palette, PaletteOptions::default());
        assert_eq!(config.on_error, ErrorPolicy::Continue);
        assert_eq!(args.expand_globs(), cfg!(windows));
    }

    #[test]
    fn all_options() {
        let args = parse(&[
            "-o",
            "out.bmp",
            "--format",
            "bmp",
            "--size",
            "160x20",
            "--expect",
            "0",
            "--skip-malformed",
            "--fail-fast",
            "--glob",
            "-vv",
            "x.yaml",
        ]);
        let config = args.config();
        assert_eq!(config.output, Some(PathBuf::from("out.bmp")));
        assert_eq!(config.format.format(), ImageFormat::Bmp);
        assert_eq!(config.size, CanvasSize::new(160, 20));
        assert_eq!(config.palette.expected_count, 0);
        assert_eq!(config.palette.on_malformed, MalformedPolicy::Skip);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert!(args.expand_globs());
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn last_glob_flag_wins() {
        assert!(!parse(&["--glob", "--no-glob"]).expand_globs());
        assert!(parse(&["--no-glob", "--glob"]).expand_globs());
    }

    #[test]
    fn rejects_lossy_format() {
        let result = Args::try_parse_from(["base16-swatch", "--format", "jpg", "a.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_size() {
        let result = Args::try_parse_from(["base16-swatch", "--size", "800", "a.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_inputs_are_allowed() {
        assert!(parse(&[]).inputs.is_empty());
    }
}
