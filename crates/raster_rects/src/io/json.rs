use crate::{
    error::{RectError, Result},
    types::{ComputedRectangles, Rectangle},
};

/// Fail when a corner overflowed to infinity or NaN; JSON would write it as `null`
pub fn ensure_finite(rectangles: &[Rectangle]) -> Result<()> {
    match rectangles.iter().position(|rect| !rect.is_finite()) {
        None => Ok(()),
        Some(index) => Err(RectError::InvalidParameter(format!(
            "rectangle {index} has non-finite coordinates {:?}; scale or offset is too large",
            rectangles[index].to_record()
        ))),
    }
}

/// Render rectangles as a JSON array with one `[llx, lly, urx, ury]` record per line
pub fn to_json_lines(rectangles: &[Rectangle]) -> Result<String> {
    ensure_finite(rectangles)?;
    if rectangles.is_empty() {
        return Ok("[]\n".to_string());
    }

    let records = rectangles
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(format!("[\n{}\n]\n", records.join(",\n")))
}

/// Render rectangles with `serde_json`'s pretty printer
pub fn to_json_pretty(rectangles: &[Rectangle]) -> Result<String> {
    ensure_finite(rectangles)?;
    let mut out = serde_json::to_string_pretty(rectangles)?;
    out.push('\n');
    Ok(out)
}

/// Parse a JSON array of 4-number records back into rectangles
pub fn parse_rectangles(json: &str) -> Result<Vec<Rectangle>> {
    Ok(serde_json::from_str(json)?)
}

impl ComputedRectangles {
    /// Serialize the rectangle list, one record per line
    pub fn to_json_string(&self) -> Result<String> {
        to_json_lines(&self.rectangles)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        to_json_pretty(&self.rectangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Rectangle> {
        vec![
            Rectangle::new([0.0, 1.0], [1.0, 2.0]),
            Rectangle::new([0.1, -2.5], [1e-3, 12345.678]),
        ]
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(to_json_lines(&[]).unwrap(), "[]\n");
        assert!(parse_rectangles(&to_json_lines(&[]).unwrap()).unwrap().is_empty());
        assert!(parse_rectangles(&to_json_pretty(&[]).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_one_record_per_line() {
        let text = to_json_lines(&sample()).unwrap();
        assert_eq!(
            text,
            "[\n[0.0,1.0,1.0,2.0],\n[0.1,-2.5,0.001,12345.678]\n]\n"
        );
    }

    #[test]
    fn test_parse_back_matches() {
        let rects = sample();
        assert_eq!(parse_rectangles(&to_json_lines(&rects).unwrap()).unwrap(), rects);
        assert_eq!(parse_rectangles(&to_json_pretty(&rects).unwrap()).unwrap(), rects);
    }

    #[test]
    fn test_nested_numeric_list_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&to_json_lines(&sample()).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.as_array().map(Vec::len) == Some(4)));
    }

    #[test]
    fn test_overflowed_corners_are_rejected() {
        let rects = vec![
            Rectangle::new([0.0, 0.0], [1e308, 1.0]),
            Rectangle::new([1e308, 0.0], [f64::INFINITY, 1.0]),
        ];
        assert!(matches!(to_json_lines(&rects), Err(RectError::InvalidParameter(_))));
        assert!(matches!(to_json_pretty(&rects), Err(RectError::InvalidParameter(_))));
        assert!(ensure_finite(&rects[..1]).is_ok());
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        assert!(parse_rectangles("[[1, 2, 3]]").is_err());
        assert!(parse_rectangles("[[1, 2, 3, 4, 5]]").is_err());
    }
}
