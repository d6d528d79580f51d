//! # Raster Rectangles Library
//!
//! Turns the black pixels of a raster mask into unit-square rectangles, one
//! per pixel, expressed in a bottom-left-origin, y-up coordinate space after a
//! vertical flip, per-axis scale and offset.
//!
//! ## Core Features
//!
//! - **Classification**: a pixel is black when it is not fully transparent and
//!   every RGB channel is at or below the threshold
//! - **Transform**: `[x, x+1) x [y, y+1)` in image space maps to
//!   `lower_left = (x*sx + ox, (h-y-1)*sy + oy)`, `upper_right = ((x+1)*sx + ox, (h-y)*sy + oy)`
//! - **Scan order**: rectangles come out row-major from the top-left pixel, also
//!   when the scan is split over several threads
//! - **Output**: JSON `[llx, lly, urx, ury]` records or a GeoJSON FeatureCollection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use raster_rects::{OutputFormat, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .scale(0.5)
//!     .offset(10.0, 5.0)
//!     .threshold(40)
//!     .build()?;
//!
//! let result = pipeline.process_path("ring.png")?;
//! result.save("rects.json", OutputFormat::Json)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod params;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{RectError, Result};
pub use types::{ComputedRectangles, PixelGrid, Rectangle};
pub use traits::*;
pub use algorithms::*;
pub use params::{ConversionConfig, ConversionParams};
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::{OutputFormat, RectangleProperties, load_image, parse_rectangles};
