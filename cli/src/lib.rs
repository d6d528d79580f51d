use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use raster_rects::{
    ComputedRectangles, ConversionConfig, OutputFormat, PipelineBuilder, RectError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Conversion(#[from] RectError),
    #[error("Unsupported config format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Conversion settings read from a `.toml` or `.json` file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub conversion: ConversionConfig,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration.
    ///
    /// A relative `output` is taken relative to the config file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        let parse = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml,
            Some("json") => Self::from_json,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        let content = fs::read_to_string(path_ref)?;
        let mut config = parse(&content)?;
        if let (Some(output), Some(base)) = (config.output.as_mut(), path_ref.parent()) {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
        debug!("Loaded config from {}: {:?}", path_ref.display(), config);
        Ok(config)
    }
}

/// Where the rendered rectangles go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Render fully, then write in one go
    pub fn write(&self, result: &ComputedRectangles, format: OutputFormat) -> Result<(), CliError> {
        match self {
            Self::File(path) => Ok(result.save(path, format)?),
            Self::Stdout => {
                let stdout = std::io::stdout();
                write_rendered(result, format, &mut stdout.lock())
            }
        }
    }
}

/// Render `result` and write it to `writer`, flushing at the end
pub fn write_rendered<W: Write>(
    result: &ComputedRectangles,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), CliError> {
    let rendered = result.render(format)?;
    writer
        .write_all(rendered.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|source| RectError::OutputWrite {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
    Ok(())
}

/// One image-to-rectangles run
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub config: ConversionConfig,
    pub jobs: usize,
    pub format: OutputFormat,
    pub destination: Destination,
}

impl ConversionJob {
    /// Validate parameters, convert the image, then write the output
    pub fn run(&self) -> Result<ComputedRectangles, CliError> {
        let params = self.config.resolve()?;
        let pipeline = PipelineBuilder::from_params(params).jobs(self.jobs).build()?;
        info!("Converting {} ({})", self.input.display(), pipeline.info());

        let result = pipeline.process_path(&self.input)?;
        self.destination.write(&result, self.format)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_rects::parse_rectangles;

    fn write_black_png(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("black.png");
        image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn job(input: PathBuf, destination: Destination) -> ConversionJob {
        ConversionJob {
            input,
            config: ConversionConfig::default(),
            jobs: 1,
            format: OutputFormat::Json,
            destination,
        }
    }

    #[test]
    fn test_job_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_black_png(dir.path(), 2, 2);
        let output = dir.path().join("rects.json");

        let result = job(input, Destination::File(output.clone())).run().unwrap();
        assert_eq!(result.len(), 4);

        let parsed = parse_rectangles(&fs::read_to_string(&output).unwrap()).unwrap();
        let records: Vec<[f64; 4]> = parsed.iter().map(|r| r.to_record()).collect();
        assert_eq!(
            records,
            vec![
                [0.0, 1.0, 1.0, 2.0],
                [1.0, 1.0, 2.0, 2.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 0.0, 2.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_job_with_scale_and_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_black_png(dir.path(), 1, 1);
        let output = dir.path().join("rects.geojson");

        let mut conversion = job(input, Destination::File(output.clone()));
        conversion.config = ConversionConfig {
            scale_x: Some(2.0),
            scale_y: Some(3.0),
            offset_x: Some(10.0),
            offset_y: Some(5.0),
            ..Default::default()
        };
        conversion.jobs = 4;
        conversion.format = OutputFormat::GeoJson;
        conversion.run().unwrap();

        let parsed =
            ComputedRectangles::from_geojson_string(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(parsed.rectangles[0].to_record(), [10.0, 5.0, 12.0, 8.0]);
    }

    #[test]
    fn test_job_failures_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("rects.json");

        let missing = job(dir.path().join("missing.png"), Destination::File(output.clone()));
        assert!(matches!(
            missing.run(),
            Err(CliError::Conversion(RectError::InputNotFound { .. }))
        ));

        let mut bad_threshold = job(write_black_png(dir.path(), 1, 1), Destination::File(output.clone()));
        bad_threshold.config.threshold = Some(-3);
        assert!(matches!(
            bad_threshold.run(),
            Err(CliError::Conversion(RectError::InvalidParameter(_)))
        ));

        let mut overflowing = job(write_black_png(dir.path(), 2, 1), Destination::File(output.clone()));
        overflowing.config.scale_x = Some(1e308);
        assert!(matches!(
            overflowing.run(),
            Err(CliError::Conversion(RectError::InvalidParameter(_)))
        ));

        assert!(!output.exists());
    }

    #[test]
    fn test_config_output_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("configs");
        fs::create_dir(&nested).unwrap();
        let path = nested.join("params.toml");
        fs::write(&path, "output = \"rects.json\"\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.output, Some(nested.join("rects.json")));

        let absolute = dir.path().join("abs.json");
        fs::write(&path, format!("output = {:?}\n", absolute.to_str().unwrap())).unwrap();
        assert_eq!(FileConfig::from_file(&path).unwrap().output, Some(absolute));
    }

    #[test]
    fn test_toml_config() {
        let config = FileConfig::from_toml(
            r#"
            scale = 2.0
            offset_y = -1.5
            threshold = 20
            format = "geojson"
            output = "out.geojson"
            "#,
        )
        .unwrap();

        assert_eq!(config.conversion.scale, Some(2.0));
        assert_eq!(config.conversion.offset_y, Some(-1.5));
        assert_eq!(config.conversion.threshold, Some(20));
        assert_eq!(config.format, Some(OutputFormat::GeoJson));
        assert_eq!(config.output, Some(PathBuf::from("out.geojson")));
    }

    #[test]
    fn test_json_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"scale_x": 0.5, "threshold": 300}"#).unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.conversion.scale_x, Some(0.5));
        assert!(matches!(
            config.conversion.resolve(),
            Err(RectError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unsupported_config_extension() {
        assert!(matches!(
            FileConfig::from_file("params.yaml"),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_write_rendered_to_buffer() {
        let result = ComputedRectangles {
            rectangles: vec![raster_rects::Rectangle::new([0.0, 0.0], [1.0, 1.0])],
            image_width: 1,
            image_height: 1,
        };
        let mut buffer = Vec::new();
        write_rendered(&result, OutputFormat::Json, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(parse_rectangles(&text).unwrap(), result.rectangles);
    }

    #[test]
    fn test_destination_from_option() {
        assert_eq!(Destination::from_option(None), Destination::Stdout);
        assert_eq!(
            Destination::from_option(Some(PathBuf::from("a.json"))),
            Destination::File(PathBuf::from("a.json"))
        );
    }
}
