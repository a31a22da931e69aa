use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{ImageError, ImageFormat};

use crate::error::{Result, SwatchError};
use crate::pipeline::render::Canvas;

/// The image container to write, plus the extension used for default output
/// names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    format: ImageFormat,
    extension: String,
}

impl OutputFormat {
    /// Look up a format by extension name (`png`, `bmp`, `tif`, ...).
    ///
    /// Only formats that store 8-bit RGB exactly are accepted.
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = name.trim().trim_start_matches('.').to_ascii_lowercase();
        let unsupported = || SwatchError::UnsupportedFormat {
            name: name.to_owned(),
        };

        let format = ImageFormat::from_extension(&extension).ok_or_else(unsupported)?;
        if !is_lossless_rgb(format) || !format.writing_enabled() {
            return Err(unsupported());
        }
        Ok(Self { format, extension })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `input` with its extension replaced by this format's.
    pub fn default_output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.extension)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            extension: "png".to_owned(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SwatchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension)
    }
}

fn is_lossless_rgb(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::Tga
            | ImageFormat::Pnm
            | ImageFormat::Qoi
            | ImageFormat::WebP
    )
}

/// Encode `canvas` to `path`. The file is flushed and closed on return.
pub fn write_canvas(canvas: &Canvas, format: &OutputFormat, path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), format = %format, "writing swatch");
    canvas
        .to_rgb_image()
        .save_with_format(path, format.format())
        .map_err(|err| match err {
            ImageError::IoError(source) => SwatchError::FileAccess {
                path: path.to_path_buf(),
                source,
            },
            source => SwatchError::Encode {
                path: path.to_path_buf(),
                source,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::pipeline::palette::Palette;
    use crate::pipeline::render::{render, CanvasSize};

    #[test]
    fn default_is_png() {
        let format = OutputFormat::default();
        assert_eq!(format.format(), ImageFormat::Png);
        assert_eq!(format.extension(), "png");
        assert_eq!(OutputFormat::from_name("png").unwrap(), format);
    }

    #[test]
    fn names_are_case_insensitive() {
        let format = OutputFormat::from_name("BMP").unwrap();
        assert_eq!(format.format(), ImageFormat::Bmp);
        assert_eq!(format.extension(), "bmp");
    }

    #[test]
    fn keeps_requested_extension() {
        let format: OutputFormat = "tif".parse().unwrap();
        assert_eq!(format.format(), ImageFormat::Tiff);
        assert_eq!(
            format.default_output_path(Path::new("schemes/ocean.yaml")),
            PathBuf::from("schemes/ocean.tif")
        );
    }

    #[test]
    fn lossy_and_unknown_formats_are_rejected() {
        for name in ["jpg", "jpeg", "avif", "gif", "ff", "doc", ""] {
            let err = OutputFormat::from_name(name).unwrap_err();
            assert!(
                matches!(err, SwatchError::UnsupportedFormat { .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn default_path_replaces_extension() {
        let format = OutputFormat::default();
        assert_eq!(
            format.default_output_path(Path::new("/tmp/base16-default-dark.yaml")),
            PathBuf::from("/tmp/base16-default-dark.png")
        );
        assert_eq!(
            format.default_output_path(Path::new("noext")),
            PathBuf::from("noext.png")
        );
    }

    #[test]
    fn written_png_keeps_exact_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        let palette =
            Palette::from_colors([Color::new(0x15, 0x15, 0x15), Color::new(0xf5, 0x00, 0x09)]);
        let canvas = render(&palette, CanvasSize::new(5, 2)).unwrap();

        write_canvas(&canvas, &OutputFormat::default(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (5, 2));
        assert_eq!(img.get_pixel(0, 0).0, [0x15, 0x15, 0x15]);
        assert_eq!(img.get_pixel(3, 1).0, [0xf5, 0x00, 0x09]);
        assert_eq!(img.get_pixel(4, 1).0, [255, 255, 255]);
    }

    #[test]
    fn unwritable_path_is_file_access_error() {
        let palette = Palette::from_colors([Color::WHITE]);
        let canvas = render(&palette, CanvasSize::new(2, 2)).unwrap();
        let err = write_canvas(
            &canvas,
            &OutputFormat::default(),
            Path::new("/nonexistent/dir/out.png"),
        )
        .unwrap_err();
        assert!(matches!(err, SwatchError::FileAccess { .. }), "{err}");
    }
}
