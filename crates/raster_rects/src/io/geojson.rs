use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{RectError, Result},
    types::{ComputedRectangles, Rectangle},
};

/// Properties attached to each rectangle feature
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[schemars(description = "Properties for rectangle features")]
pub struct RectangleProperties {
    #[schemars(description = "Position of the rectangle in scan order")]
    pub id: usize,
    #[schemars(description = "Area in output units")]
    pub area: f64,
}

impl ComputedRectangles {
    /// Export as a FeatureCollection of closed polygon rings
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        use geo::Area;

        super::ensure_finite(&self.rectangles)?;
        let mut features = Vec::with_capacity(self.rectangles.len());

        for (i, rect) in self.rectangles.iter().enumerate() {
            let ring = rect.ring().iter().map(|&[x, y]| vec![x, y]).collect();
            let geometry = Geometry::new(Value::Polygon(vec![ring]));

            let properties = RectangleProperties {
                id: i,
                area: rect.to_geo_rect().unsigned_area(),
            };
            let properties = match serde_json::to_value(properties)? {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            };

            features.push(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::Number(serde_json::Number::from(i))),
                properties,
                foreign_members: None,
            });
        }

        // Add metadata to foreign members of the FeatureCollection
        let mut foreign_members = JsonObject::new();
        foreign_members.insert("image_width".to_string(), self.image_width.into());
        foreign_members.insert("image_height".to_string(), self.image_height.into());
        foreign_members.insert("rectangle_count".to_string(), self.rectangles.len().into());

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to a JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    /// Load rectangles back from a GeoJSON string produced by [`Self::to_geojson_string`]
    pub fn from_geojson_string(geojson_str: &str) -> Result<Self> {
        let geojson: FeatureCollection = geojson_str.parse()?;

        let foreign_members = geojson
            .foreign_members
            .as_ref()
            .ok_or_else(|| RectError::MalformedRecord("Missing metadata in GeoJSON".to_string()))?;

        let dimension = |key: &str| {
            foreign_members
                .get(key)
                .and_then(|v| v.as_u64())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| RectError::MalformedRecord(format!("Missing or invalid {key}")))
        };
        let image_width = dimension("image_width")?;
        let image_height = dimension("image_height")?;

        let mut rectangles = Vec::with_capacity(geojson.features.len());
        for feature in geojson.features {
            let Some(geometry) = feature.geometry else {
                return Err(RectError::MalformedRecord(
                    "Feature without geometry".to_string(),
                ));
            };
            let Value::Polygon(rings) = geometry.value else {
                return Err(RectError::MalformedRecord(
                    "Expected only Polygon geometries".to_string(),
                ));
            };
            rectangles.push(rectangle_from_ring(&rings)?);
        }

        Ok(Self {
            rectangles,
            image_width,
            image_height,
        })
    }
}

/// Recover the rectangle from its ring: first vertex is lower-left, third is upper-right
fn rectangle_from_ring(rings: &[Vec<Vec<f64>>]) -> Result<Rectangle> {
    let ring = rings
        .first()
        .filter(|ring| ring.len() == 5 && ring.iter().all(|p| p.len() >= 2))
        .ok_or_else(|| RectError::MalformedRecord("Expected a closed 5-point ring".to_string()))?;

    Ok(Rectangle::new(
        [ring[0][0], ring[0][1]],
        [ring[2][0], ring[2][1]],
    ))
}
