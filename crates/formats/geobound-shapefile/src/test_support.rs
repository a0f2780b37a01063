//! Polygon shapefile fixtures for tests.
//!
//! Fixtures are written with the `shapefile` crate: one single-ring polygon
//! per record and two attribute columns (`NAME`, `ID`).

use std::path::{Path, PathBuf};

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};

const NAME_WIDTH: u8 = 32;
const ID_WIDTH: u8 = 10;

/// A closed ring of `(x, y)` coordinates.
pub type Ring = Vec<(f64, f64)>;

/// Builder for a polygon shapefile fixture.
#[derive(Debug, Clone)]
pub struct ShapefileFixture {
    base_name: String,
    features: Vec<(String, Ring)>,
}

impl ShapefileFixture {
    /// Starts a fixture that will be written as `<base_name>.shp` (plus siblings).
    #[must_use]
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            features: Vec::new(),
        }
    }

    /// Appends a polygon record with the given `NAME` attribute.
    #[must_use]
    pub fn with_polygon(mut self, name: impl Into<String>, ring: Ring) -> Self {
        self.features.push((name.into(), ring));
        self
    }

    /// Writes the `.shp`, `.shx` and `.dbf` files into `dir` and returns the `.shp` path.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the shapefile writer.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, shapefile::Error> {
        let shp_path = dir.join(format!("{}.shp", self.base_name));
        let table = TableWriterBuilder::new()
            .add_character_field(field_name("NAME"), NAME_WIDTH)
            .add_numeric_field(field_name("ID"), ID_WIDTH, 0);

        // The writer completes the headers when dropped at the end of this scope.
        let mut writer = Writer::from_path(&shp_path, table)?;
        for (id, (name, ring)) in self.features.iter().enumerate() {
            let points = ring.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let polygon = Polygon::new(PolygonRing::Outer(points));

            let mut record = Record::default();
            record.insert("NAME".to_string(), FieldValue::Character(Some(name.clone())));
            record.insert("ID".to_string(), FieldValue::Numeric(Some((id + 1) as f64)));
            writer.write_shape_and_record(&polygon, &record)?;
        }
        Ok(shp_path)
    }
}

fn field_name(name: &str) -> FieldName {
    FieldName::try_from(name).unwrap_or_else(|_| panic!("invalid dBase field name {name}"))
}

/// Clockwise square ring with its lower-left corner at `(x, y)`.
#[must_use]
pub fn square(x: f64, y: f64, size: f64) -> Ring {
    vec![
        (x, y),
        (x, y + size),
        (x + size, y + size),
        (x + size, y),
        (x, y),
    ]
}

/// Clockwise square ring whose edges carry `steps` small zig-zag vertices each.
///
/// The zig-zag amplitude is one percent of `size`, so any simplification
/// tolerance above that collapses the edges back to straight lines.
#[must_use]
pub fn jagged_square(x: f64, y: f64, size: f64, steps: u32) -> Ring {
    let corners = square(x, y, size);
    let amplitude = size * 0.01;
    let mut ring = Vec::new();
    for edge in corners.windows(2) {
        let (x0, y0) = edge[0];
        let (x1, y1) = edge[1];
        // Outward unit normal of a clockwise ring; vertices zig-zag inwards.
        let (nx, ny) = ((y0 - y1) / size, (x1 - x0) / size);
        for step in 0..steps {
            let t = f64::from(step) / f64::from(steps);
            let offset = if step % 2 == 1 { amplitude } else { 0.0 };
            ring.push((
                x0 + (x1 - x0) * t - nx * offset,
                y0 + (y1 - y0) * t - ny * offset,
            ));
        }
    }
    ring.push((x, y));
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_closed() {
        let ring = square(1.0, 2.0, 3.0);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_jagged_square_point_count() {
        let ring = jagged_square(0.0, 0.0, 1.0, 10);
        assert_eq!(ring.len(), 41);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_writes_sibling_files() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = ShapefileFixture::new("PAK_adm1")
            .with_polygon("A", square(0.0, 0.0, 1.0))
            .write_to(temp_dir.path())
            .unwrap();

        assert_eq!(path, temp_dir.path().join("PAK_adm1.shp"));
        for extension in ["shp", "shx", "dbf"] {
            assert!(path.with_extension(extension).is_file(), "missing .{extension}");
        }
    }
}
