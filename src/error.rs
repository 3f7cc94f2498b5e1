use crate::units::Pt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PlaceholderError>;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error(transparent)]
    /// An I/O error occurred, usually while reading the font file
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("the rasterizer rejected the font: {0}")]
    /// [fontdue] failed to prepare the font for rasterization
    Rasterizer(&'static str),

    #[error("cannot create a font face at size {0}")]
    /// The requested size cannot be turned into a face
    FaceCreation(Pt),

    #[error("invalid colour: {0:?}")]
    InvalidColour(String),

    #[error("invalid value for parameter `{name}`: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("requested size {width}x{height} exceeds the maximum of {max}x{max}")]
    SizeTooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to encode image: {0}")]
    /// [image] failed to serialize the canvas
    Encoding(#[from] image::ImageError),

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

impl PlaceholderError {
    /// The HTTP status this error is reported with: 400 for anything the
    /// client can fix by changing the request, 500 for everything else
    pub fn status_code(&self) -> u16 {
        match self {
            PlaceholderError::InvalidColour(_)
            | PlaceholderError::InvalidParameter { .. }
            | PlaceholderError::EmptyImage { .. }
            | PlaceholderError::SizeTooLarge { .. } => 400,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
