use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use image::RgbImage;

use crate::color::Color;
use crate::error::{Result, SwatchError};
use crate::pipeline::palette::{Palette, BASE16_SLOT_COUNT};

pub const DEFAULT_BAR_WIDTH: u32 = 50;
pub const DEFAULT_HEIGHT: u32 = 50;

/// An indexed surface can address at most this many distinct colors.
pub const MAX_INDEXED_COLORS: usize = 256;

/// Largest canvas accepted, in pixels (8192x8192).
pub const MAX_CANVAS_PIXELS: usize = 1 << 26;

/// Pixel dimensions of the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    /// 16 bars of 50x50 pixels.
    fn default() -> Self {
        Self {
            width: BASE16_SLOT_COUNT as u32 * DEFAULT_BAR_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for CanvasSize {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `800x50`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid width {w:?}: {e}"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid height {h:?}: {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("canvas size must be non-zero, got {s:?}"));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone)]
enum Surface {
    /// One table index per pixel, row-major.
    Indexed { table: Vec<Color>, pixels: Vec<u8> },
    TrueColor(RgbImage),
}

/// The rendered swatch.
///
/// Starts as an indexed surface with white at index 0 and is promoted to
/// true color if more than [`MAX_INDEXED_COLORS`] distinct colors are drawn,
/// so no requested color is ever quantized.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    surface: Surface,
}

impl Canvas {
    /// A canvas filled with white.
    pub fn new(size: CanvasSize) -> Result<Self> {
        let CanvasSize { width, height } = size;
        let area = (width as usize)
            .checked_mul(height as usize)
            .filter(|&area| area > 0 && area <= MAX_CANVAS_PIXELS)
            .ok_or(SwatchError::InvalidCanvas { width, height })?;
        Ok(Self {
            width,
            height,
            surface: Surface::Indexed {
                table: vec![Color::WHITE],
                pixels: vec![0; area],
            },
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.surface, Surface::Indexed { .. })
    }

    /// The color table of an indexed canvas, background first.
    pub fn color_table(&self) -> Option<&[Color]> {
        match &self.surface {
            Surface::Indexed { table, .. } => Some(table),
            Surface::TrueColor(_) => None,
        }
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match &self.surface {
            Surface::Indexed { table, pixels } => {
                let index = pixels[y as usize * self.width as usize + x as usize];
                Some(table[index as usize])
            }
            Surface::TrueColor(img) => Some((*img.get_pixel(x, y)).into()),
        }
    }

    /// Fill the half-open rectangle `xs` by `ys` with `color`, clipped to the
    /// canvas.
    pub fn fill_rect(&mut self, xs: Range<u32>, ys: Range<u32>, color: Color) {
        let xs = xs.start.min(self.width)..xs.end.min(self.width);
        let ys = ys.start.min(self.height)..ys.end.min(self.height);
        if xs.is_empty() || ys.is_empty() {
            return;
        }

        if let Some(index) = self.table_index(color) {
            if let Surface::Indexed { pixels, .. } = &mut self.surface {
                let stride = self.width as usize;
                for y in ys {
                    let row = y as usize * stride;
                    pixels[row + xs.start as usize..row + xs.end as usize].fill(index);
                }
            }
            return;
        }

        if let Surface::TrueColor(img) = &mut self.surface {
            let rgb = image::Rgb::from(color);
            for y in ys {
                for x in xs.clone() {
                    img.put_pixel(x, y, rgb);
                }
            }
        }
    }

    /// Index of `color` in the table, adding it if there is room. Promotes the
    /// canvas to true color and returns `None` when the table is full.
    fn table_index(&mut self, color: Color) -> Option<u8> {
        let Surface::Indexed { table, .. } = &mut self.surface else {
            return None;
        };
        if let Some(i) = table.iter().position(|&c| c == color) {
            return Some(i as u8);
        }
        if table.len() < MAX_INDEXED_COLORS {
            table.push(color);
            return Some((table.len() - 1) as u8);
        }

        tracing::debug!(
            colors = table.len() + 1,
            "color table full, switching to true color"
        );
        self.surface = Surface::TrueColor(self.to_rgb_image());
        None
    }

    /// Expand to an 8-bit RGB buffer, ready for any lossless encoder.
    pub fn to_rgb_image(&self) -> RgbImage {
        match &self.surface {
            Surface::Indexed { table, pixels } => {
                let stride = self.width as usize;
                RgbImage::from_fn(self.width, self.height, |x, y| {
                    let index = pixels[y as usize * stride + x as usize];
                    table[index as usize].into()
                })
            }
            Surface::TrueColor(img) => img.clone(),
        }
    }
}

/// Draw one full-height bar per palette color, left to right.
///
/// Every bar is `width / len` pixels wide (rounded down); the remainder on
/// the right edge stays white.
pub fn render(palette: &Palette, size: CanvasSize) -> Result<Canvas> {
    if palette.is_empty() {
        return Err(SwatchError::EmptyPalette);
    }
    let mut canvas = Canvas::new(size)?;

    let bar_width = size.width / palette.len() as u32;
    tracing::info!(%size, bars = palette.len(), bar_width, "generating swatch");
    if bar_width == 0 {
        tracing::warn!(
            width = size.width,
            colors = palette.len(),
            "canvas narrower than one pixel per color, swatch is blank"
        );
    }

    let mut offset = 0;
    for color in palette.colors() {
        canvas.fill_rect(offset..offset + bar_width, 0..size.height, color);
        offset += bar_width;
    }

    Ok(canvas)
}
