use std::num::NonZeroUsize;

use crate::{
    error::{RectError, Result},
    params::ConversionParams,
    pipeline::Pipeline,
    traits::{PixelClassifier, PixelTransform},
};

/// Builder for creating conversion pipelines with a fluent API
pub struct PipelineBuilder {
    params: ConversionParams,
    classifier: Option<Box<dyn PixelClassifier>>,
    transform: Option<Box<dyn PixelTransform>>,
    jobs: usize,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            params: ConversionParams::default(),
            classifier: None,
            transform: None,
            jobs: 1,
        }
    }

    /// Start from already resolved parameters
    pub fn from_params(params: ConversionParams) -> Self {
        Self {
            params,
            ..Self::new()
        }
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.params.threshold = threshold;
        self
    }

    /// Uniform scale for both axes
    pub fn scale(self, scale: f64) -> Self {
        self.scale_x(scale).scale_y(scale)
    }

    pub fn scale_x(mut self, scale_x: f64) -> Self {
        self.params.scale_x = scale_x;
        self
    }

    pub fn scale_y(mut self, scale_y: f64) -> Self {
        self.params.scale_y = scale_y;
        self
    }

    /// Offset for both axes
    pub fn offset(self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x(offset_x).offset_y(offset_y)
    }

    pub fn offset_x(mut self, offset_x: f64) -> Self {
        self.params.offset_x = offset_x;
        self
    }

    pub fn offset_y(mut self, offset_y: f64) -> Self {
        self.params.offset_y = offset_y;
        self
    }

    /// Number of threads scanning row bands; 1 scans on the calling thread
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set the classifier (replaces the threshold classifier)
    pub fn set_classifier<C>(mut self, classifier: C) -> Self
    where
        C: PixelClassifier + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Set the transform (replaces the scale/offset transform)
    pub fn set_transform<T>(mut self, transform: T) -> Self
    where
        T: PixelTransform + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Build the pipeline, falling back to the threshold classifier and affine transform
    pub fn build(self) -> Result<Pipeline> {
        let jobs = NonZeroUsize::new(self.jobs).ok_or_else(|| {
            RectError::InvalidParameter("jobs must be at least 1".to_string())
        })?;

        if self.transform.is_none() {
            self.params.validate()?;
        }
        tracing::debug!("Building pipeline with {:?}, {} jobs", self.params, jobs);

        let classifier = self
            .classifier
            .unwrap_or_else(|| Box::new(self.params.classifier()));
        let transform = self
            .transform
            .unwrap_or_else(|| Box::new(self.params.transform()));

        Ok(Pipeline::new(classifier, transform, jobs))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
