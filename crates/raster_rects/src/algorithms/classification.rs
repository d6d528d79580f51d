use crate::traits::PixelClassifier;

/// A pixel is black when it is not fully transparent and every RGB channel is
/// at or below `threshold`.
///
/// `pixel` must hold at least three channels; a fourth one is read as alpha.
pub fn is_black(pixel: &[u8], threshold: u8) -> bool {
    if let Some(&alpha) = pixel.get(3) {
        if alpha == 0 {
            return false;
        }
    }

    pixel[..3].iter().all(|&channel| channel <= threshold)
}

/// Per-channel threshold classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdClassifier {
    pub threshold: u8,
}

impl ThresholdClassifier {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl PixelClassifier for ThresholdClassifier {
    fn is_black(&self, pixel: &[u8]) -> bool {
        is_black(pixel, self.threshold)
    }
}
