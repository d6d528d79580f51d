pub mod builder;

use std::{num::NonZeroUsize, path::Path};

use image::DynamicImage;
use crate::{
    algorithms::{scan, scan_parallel},
    error::Result,
    io::load_image,
    traits::{PixelClassifier, PixelTransform},
    types::{ComputedRectangles, PixelGrid},
};

/// Classify every pixel, transform the black ones, and collect rectangles in scan order
pub struct Pipeline {
    classifier: Box<dyn PixelClassifier>,
    transform: Box<dyn PixelTransform>,
    jobs: NonZeroUsize,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        classifier: Box<dyn PixelClassifier>,
        transform: Box<dyn PixelTransform>,
        jobs: NonZeroUsize,
    ) -> Self {
        Self {
            classifier,
            transform,
            jobs,
        }
    }

    /// Convert an already decoded grid
    pub fn process_grid(&self, grid: &PixelGrid) -> ComputedRectangles {
        let rectangles = if self.jobs.get() > 1 {
            scan_parallel(grid, &*self.classifier, &*self.transform, self.jobs)
        } else {
            scan(grid, &*self.classifier, &*self.transform)
        };

        tracing::info!(
            "Converted {}x{} image into {} rectangles",
            grid.width(),
            grid.height(),
            rectangles.len()
        );
        if rectangles.is_empty() {
            tracing::warn!("No pixel matched the black threshold");
        }

        ComputedRectangles {
            rectangles,
            image_width: grid.width(),
            image_height: grid.height(),
        }
    }

    /// Convert a decoded image
    pub fn process(&self, image: &DynamicImage) -> ComputedRectangles {
        self.process_grid(&PixelGrid::from(image))
    }

    /// Load, decode and convert the image at `path`
    pub fn process_path<P: AsRef<Path>>(&self, path: P) -> Result<ComputedRectangles> {
        let image = load_image(path)?;
        Ok(self.process(&image))
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!("Pipeline: 1 classifier, 1 transform, {} scan jobs", self.jobs)
    }
}
