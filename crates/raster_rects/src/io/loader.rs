use std::{io::ErrorKind, path::Path};

use image::DynamicImage;
use crate::error::{RectError, Result};

/// Read and decode the image at `path`.
///
/// A missing file, an unreadable file and undecodable bytes map to distinct errors.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => RectError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => RectError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let image = image::load_from_memory(&bytes)?;
    tracing::debug!(
        "Decoded {} as {}x{} {:?}",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image)
}
