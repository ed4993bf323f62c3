use std::path::PathBuf;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum HandwritingError {
    #[error("there is no text to write")]
    /// The input contained nothing but whitespace
    EmptyInput,

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The settings document could not be read or written
    Settings(#[from] serde_json::Error),

    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColour(String),

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("failed to write {}: {source}", .path.display())]
    /// Writing the rendered page failed; nothing was written over an existing file
    Output {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
