use geo_types::{Rect, coord};
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

/// Decoded image held as one contiguous buffer, row-major from the top-left pixel.
///
/// Every pixel carries either 3 (RGB) or 4 (RGBA) channels; the channel at
/// `(y * width + x) * channels` is the red component of pixel `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Channel values of pixel `(x, y)`. Panics when the coordinate lies outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// All channel values of row `y`, left to right
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }
}

impl From<RgbImage> for PixelGrid {
    fn from(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 3,
            data: image.into_raw(),
        }
    }
}

impl From<RgbaImage> for PixelGrid {
    fn from(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 4,
            data: image.into_raw(),
        }
    }
}

impl From<&DynamicImage> for PixelGrid {
    /// Images with an alpha channel become RGBA, everything else RGB
    fn from(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            image.to_rgba8().into()
        } else {
            image.to_rgb8().into()
        }
    }
}

/// Axis-aligned box in output space (bottom-left origin, y up).
///
/// Serializes as the record `[llx, lly, urx, ury]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", from = "[f64; 4]")]
pub struct Rectangle {
    pub lower_left: [f64; 2],
    pub upper_right: [f64; 2],
}

impl Rectangle {
    pub fn new(lower_left: [f64; 2], upper_right: [f64; 2]) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// The `[llx, lly, urx, ury]` record
    pub fn to_record(&self) -> [f64; 4] {
        [
            self.lower_left[0],
            self.lower_left[1],
            self.upper_right[0],
            self.upper_right[1],
        ]
    }

    /// True when every corner coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.to_record().iter().all(|v| v.is_finite())
    }

    pub fn width(&self) -> f64 {
        self.upper_right[0] - self.lower_left[0]
    }

    pub fn height(&self) -> f64 {
        self.upper_right[1] - self.lower_left[1]
    }

    /// Convert to geo-types Rect for geometric operations
    pub fn to_geo_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.lower_left[0], y: self.lower_left[1] },
            coord! { x: self.upper_right[0], y: self.upper_right[1] },
        )
    }

    /// Closed ring ll -> lr -> ur -> ul -> ll
    pub fn ring(&self) -> [[f64; 2]; 5] {
        let [llx, lly] = self.lower_left;
        let [urx, ury] = self.upper_right;
        [[llx, lly], [urx, lly], [urx, ury], [llx, ury], [llx, lly]]
    }
}

impl From<[f64; 4]> for Rectangle {
    fn from([llx, lly, urx, ury]: [f64; 4]) -> Self {
        Self::new([llx, lly], [urx, ury])
    }
}

impl From<Rectangle> for [f64; 4] {
    fn from(rect: Rectangle) -> Self {
        rect.to_record()
    }
}

/// Result of converting one image: rectangles in scan order plus the source size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedRectangles {
    pub rectangles: Vec<Rectangle>,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl ComputedRectangles {
    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    /// Sum of the rectangle areas
    pub fn total_area(&self) -> f64 {
        use geo::Area;
        self.rectangles
            .iter()
            .map(|rect| rect.to_geo_rect().unsigned_area())
            .sum()
    }

    /// Smallest rectangle enclosing every corner, `None` when empty
    pub fn bounding_box(&self) -> Option<Rectangle> {
        let first = self.rectangles.first()?;
        let mut min = first.lower_left;
        let mut max = first.lower_left;

        for rect in &self.rectangles {
            for [x, y] in [rect.lower_left, rect.upper_right] {
                min[0] = min[0].min(x);
                min[1] = min[1].min(y);
                max[0] = max[0].max(x);
                max[1] = max[1].max(y);
            }
        }

        Some(Rectangle::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn test_grid_addressing() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([7, 8, 9]));
        let grid = PixelGrid::from(img);

        assert_eq!(grid.channels(), 3);
        assert_eq!(grid.pixel(2, 1), &[7, 8, 9]);
        assert_eq!(grid.row(1).len(), 9);
        assert_eq!(&grid.row(1)[6..9], &[7, 8, 9]);
    }

    #[test]
    fn test_grid_from_dynamic_keeps_alpha() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 0]));
        let grid = PixelGrid::from(&DynamicImage::ImageRgba8(img));
        assert!(grid.has_alpha());
        assert_eq!(grid.pixel(0, 0), &[1, 2, 3, 0]);

        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        let grid = PixelGrid::from(&gray);
        assert_eq!(grid.channels(), 3);
    }

    #[test]
    fn test_rectangle_serializes_as_record() {
        let rect = Rectangle::new([0.0, 1.0], [1.0, 2.0]);
        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, "[0.0,1.0,1.0,2.0]");

        let parsed: Rectangle = serde_json::from_str("[10, 5, 12, 8]").unwrap();
        assert_eq!(parsed, Rectangle::new([10.0, 5.0], [12.0, 8.0]));
    }

    #[test]
    fn test_area_and_bounding_box() {
        let computed = ComputedRectangles {
            rectangles: vec![
                Rectangle::new([0.0, 1.0], [1.0, 2.0]),
                Rectangle::new([3.0, 0.0], [5.0, 1.5]),
            ],
            image_width: 5,
            image_height: 2,
        };

        assert!((computed.total_area() - 4.0).abs() < 1e-9);
        assert_eq!(
            computed.bounding_box(),
            Some(Rectangle::new([0.0, 0.0], [5.0, 2.0]))
        );

        let empty = ComputedRectangles {
            rectangles: vec![],
            image_width: 0,
            image_height: 0,
        };
        assert_eq!(empty.bounding_box(), None);
        assert_eq!(empty.total_area(), 0.0);
    }
}
