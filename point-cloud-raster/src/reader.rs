/// Point ingestion from text surveys and LAS/LAZ files
use crate::error::{RasterError, Result};
use crate::point::Point;
use las::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Input formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// `latitude longitude depth` per line
    Text,
    /// LAS or LAZ with planar x, y and z as depth
    Las,
}

impl PointFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("las") | Some("laz") => PointFormat::Las,
            _ => PointFormat::Text,
        }
    }
}

/// Read every sample of a survey file, normalising depths to negative down.
pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    read_points_with(path, |_| {})
}

/// [`read_points`] calling `on_point` with the number of samples read so far.
pub fn read_points_with<F>(path: &Path, on_point: F) -> Result<Vec<Point>>
where
    F: FnMut(usize),
{
    match PointFormat::from_path(path) {
        PointFormat::Text => read_text_points_with(BufReader::new(File::open(path)?), on_point),
        PointFormat::Las => read_las_points(path, on_point),
    }
}

/// Parse `latitude longitude depth` lines. Point `x` holds the longitude
/// and `y` the latitude so they can be projected as (lon, lat).
pub fn read_text_points<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    read_text_points_with(reader, |_| {})
}

fn read_text_points_with<R, F>(reader: R, mut on_point: F) -> Result<Vec<Point>>
where
    R: BufRead,
    F: FnMut(usize),
{
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        points.push(parse_point(trimmed, idx + 1)?);
        on_point(points.len());
    }
    Ok(points)
}

fn parse_point(line: &str, line_number: usize) -> Result<Point> {
    let mut fields = line.split_whitespace();
    let mut next = |name: &str| -> Result<f64> {
        let field = fields.next().ok_or_else(|| RasterError::Parse {
            line: line_number,
            message: format!("missing {name}"),
        })?;
        let value = field.parse::<f64>().map_err(|e| RasterError::Parse {
            line: line_number,
            message: format!("invalid {name} '{field}': {e}"),
        })?;
        if !value.is_finite() {
            return Err(RasterError::Parse {
                line: line_number,
                message: format!("{name} must be finite, got '{field}'"),
            });
        }
        Ok(value)
    };

    let latitude = next("latitude")?;
    let longitude = next("longitude")?;
    let depth = next("depth")?;
    Ok(Point::new(longitude, latitude, depth))
}

/// Open a LAS or LAZ survey; compression is detected from the header.
pub fn create_reader(file_path: &Path) -> Result<Reader> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Ok(Reader::new(buf_reader)?)
}

fn read_las_points<F: FnMut(usize)>(path: &Path, mut on_point: F) -> Result<Vec<Point>> {
    let mut reader = create_reader(path)?;
    let total_points = reader.header().number_of_points() as usize;

    let mut points = Vec::with_capacity(total_points);
    for point_result in reader.points() {
        let point = point_result?;
        points.push(Point::new(point.x, point.y, point.z));
        on_point(points.len());
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_latitude_longitude_depth() {
        let text = "48.20 -3.01 12.5\n48.21\t-3.02 -4\n";
        let points = read_text_points(Cursor::new(text)).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point { x: -3.01, y: 48.20, depth: -12.5 });
        assert_eq!(points[1], Point { x: -3.02, y: 48.21, depth: -4.0 });
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "# lat lon depth\n\n48.2 -3.0 1\n   \n";
        let points = read_text_points(Cursor::new(text)).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn reports_the_offending_line() {
        let text = "48.2 -3.0 1\n48.2 oops 1\n";
        match read_text_points(Cursor::new(text)) {
            Err(RasterError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("longitude"), "{message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_fields_are_rejected() {
        let text = "48.2 -3.0 1\n48.2 -3.0 nan\n";
        match read_text_points(Cursor::new(text)) {
            Err(RasterError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("depth"), "{message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }

        let err = read_text_points(Cursor::new("inf -3.0 1\n"));
        assert!(matches!(err, Err(RasterError::Parse { line: 1, .. })));
        let err = read_text_points(Cursor::new("48.2 -infinity 1\n"));
        assert!(matches!(err, Err(RasterError::Parse { line: 1, .. })));
    }

    #[test]
    fn progress_counts_parsed_samples() {
        let text = "# header\n48.2 -3.0 1\n\n48.3 -3.1 2\n";
        let mut seen = Vec::new();
        let points = read_text_points_with(Cursor::new(text), |n| seen.push(n)).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn missing_depth_is_an_error() {
        let err = read_text_points(Cursor::new("48.2 -3.0\n"));
        assert!(matches!(err, Err(RasterError::Parse { line: 1, .. })));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(PointFormat::from_path(Path::new("a/b.LAZ")), PointFormat::Las);
        assert_eq!(PointFormat::from_path(Path::new("b.las")), PointFormat::Las);
        assert_eq!(PointFormat::from_path(Path::new("survey.txt")), PointFormat::Text);
        assert_eq!(PointFormat::from_path(Path::new("survey")), PointFormat::Text);
    }
}
