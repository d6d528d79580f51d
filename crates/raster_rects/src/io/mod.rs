pub mod geojson;
pub mod json;
pub mod loader;

pub use self::geojson::*;
pub use self::json::*;
pub use self::loader::*;

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::{
    error::{RectError, Result},
    types::ComputedRectangles,
};

/// Textual layout of the converted rectangles
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    /// JSON array, one `[llx, lly, urx, ury]` record per line
    #[default]
    Json,
    /// JSON array through the pretty printer
    JsonPretty,
    /// GeoJSON FeatureCollection of rectangle polygons
    #[serde(rename = "geojson")]
    #[strum(serialize = "geojson")]
    GeoJson,
}

impl OutputFormat {
    /// Get a list of all format names
    pub fn names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}

impl ComputedRectangles {
    /// Render the whole result in memory
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json_string(),
            OutputFormat::JsonPretty => self.to_json_string_pretty(),
            OutputFormat::GeoJson => self.to_geojson_string(),
        }
    }

    /// Render, then write the file in one call so nothing partial is left on render errors
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render(format)?;
        std::fs::write(path, rendered).map_err(|source| RectError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Wrote {} rectangles to {}", self.len(), path.display());
        Ok(())
    }
}
