//! Render base16 color schemes as swatch images: a strip of equal-width
//! vertical bars, one per `baseXX` color, in scheme order.

pub mod batch;
pub mod cli;
pub mod color;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scheme;

pub use error::{MalformedColorError, SwatchError};
