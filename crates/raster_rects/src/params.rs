//! Conversion parameters.
//!
//! [`ConversionConfig`] is the loose form read from flags or a config file;
//! [`ConversionConfig::resolve`] validates it into [`ConversionParams`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::{AffineTransform, ThresholdClassifier},
    error::{RectError, Result},
};

/// Validated parameters for one conversion run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConversionParams {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub threshold: u8,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            threshold: 0,
        }
    }
}

impl ConversionParams {
    /// Reject non-finite scale or offset values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            if !value.is_finite() {
                return Err(RectError::InvalidParameter(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn classifier(&self) -> ThresholdClassifier {
        ThresholdClassifier::new(self.threshold)
    }

    pub fn transform(&self) -> AffineTransform {
        AffineTransform {
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

/// Unvalidated parameters; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConversionConfig {
    /// Uniform scale for both axes
    pub scale: Option<f64>,
    /// Scale in X, overrides `scale`
    pub scale_x: Option<f64>,
    /// Scale in Y, overrides `scale`
    pub scale_y: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    /// Black threshold, 0-255
    #[schemars(range(min = 0, max = 255))]
    pub threshold: Option<i64>,
}

impl ConversionConfig {
    /// Get the JSON schema for config files
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ConversionConfig)
    }

    /// Fill unset fields from `fallback`; values already set here win
    pub fn or(self, fallback: ConversionConfig) -> Self {
        Self {
            scale: self.scale.or(fallback.scale),
            scale_x: self.scale_x.or(fallback.scale_x),
            scale_y: self.scale_y.or(fallback.scale_y),
            offset_x: self.offset_x.or(fallback.offset_x),
            offset_y: self.offset_y.or(fallback.offset_y),
            threshold: self.threshold.or(fallback.threshold),
        }
    }

    /// Apply defaults and validate
    pub fn resolve(&self) -> Result<ConversionParams> {
        let defaults = ConversionParams::default();

        let threshold = match self.threshold {
            None => defaults.threshold,
            Some(value) => u8::try_from(value).map_err(|_| {
                RectError::InvalidParameter(format!("threshold must be in 0..=255, got {value}"))
            })?,
        };

        let params = ConversionParams {
            scale_x: self.scale_x.or(self.scale).unwrap_or(defaults.scale_x),
            scale_y: self.scale_y.or(self.scale).unwrap_or(defaults.scale_y),
            offset_x: self.offset_x.unwrap_or(defaults.offset_x),
            offset_y: self.offset_y.unwrap_or(defaults.offset_y),
            threshold,
        };
        params.validate()?;

        Ok(params)
    }
}
