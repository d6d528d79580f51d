use crate::{traits::PixelTransform, types::Rectangle};

/// Map pixel `(x, y)` of a `height`-row image to its rectangle in output space.
///
/// The pixel's unit square is flipped vertically (row 0 ends up on top), then
/// scaled and offset per axis. Zero or negative scales are passed through as-is.
#[allow(clippy::too_many_arguments)]
pub fn pixel_to_rect(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
) -> Rectangle {
    AffineTransform {
        scale_x,
        scale_y,
        offset_x,
        offset_y,
    }
    .pixel_to_rect(x, y, width, height)
}

/// Vertical flip followed by per-axis scale and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PixelTransform for AffineTransform {
    fn pixel_to_rect(&self, x: u32, y: u32, _width: u32, height: u32) -> Rectangle {
        let x = f64::from(x);
        let bottom = f64::from(height) - f64::from(y) - 1.0;
        let top = f64::from(height) - f64::from(y);

        Rectangle::new(
            [
                x * self.scale_x + self.offset_x,
                bottom * self.scale_y + self.offset_y,
            ],
            [
                (x + 1.0) * self.scale_x + self.offset_x,
                top * self.scale_y + self.offset_y,
            ],
        )
    }
}
