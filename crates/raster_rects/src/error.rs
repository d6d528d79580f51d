use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RectError {
    #[error("Input image not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input image {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed rectangle record: {0}")]
    MalformedRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, RectError>;
