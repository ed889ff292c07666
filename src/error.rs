use std::path::PathBuf;

use thiserror::Error;

use crate::parse::ParseColorError;

/// Failures surfaced by the palette pipelines.
///
/// Every variant is recovered at the pipeline boundary: the store is left in
/// its previous state and the notifier has already been told.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("not a recognized color: {input:?}")]
    InvalidInput {
        input: String,
        #[source]
        source: ParseColorError,
    },

    #[error("failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image")]
    ImageDecode(#[source] image::ImageError),

    #[error("failed to extract colors: {0}")]
    Quantization(String),

    #[error("failed to add extracted color {color}")]
    Processing {
        color: String,
        #[source]
        source: Box<PaletteError>,
    },

    #[error("an extraction is already in progress")]
    Busy,
}
