use crate::types::Rectangle;

/// Trait for deciding which pixels become rectangles
pub trait PixelClassifier: Send + Sync {
    /// `pixel` holds 3 (RGB) or 4 (RGBA) channel values
    fn is_black(&self, pixel: &[u8]) -> bool;
}

/// Trait for mapping a pixel's unit square from image space into output space
pub trait PixelTransform: Send + Sync {
    /// `x`, `y` are top-left-origin pixel coordinates inside a `width` x `height` image
    fn pixel_to_rect(&self, x: u32, y: u32, width: u32, height: u32) -> Rectangle;
}
