//! Geometry simplification for decoded feature collections.
//!
//! Line and polygon geometries go through Ramer-Douglas-Peucker via
//! [`geo::Simplify`]; points are left untouched. The tolerance is in the
//! coordinate units of the data (degrees for GADM).

use geo::Simplify;
use geo_types::{LineString, MultiLineString, MultiPolygon, Polygon};
use geojson::{FeatureCollection, Geometry, Value};

/// Simplifies every feature geometry of `collection` in place.
///
/// A tolerance of `0` leaves the geometries unchanged. Returns the number of
/// coordinate positions remaining in the collection.
///
/// # Errors
///
/// Returns a [`geojson::Error`] if a geometry cannot be converted to
/// `geo-types`, e.g. because a position has fewer than two ordinates.
///
/// # Examples
///
/// ```
/// use geobound_core::simplify::{coordinate_count, simplify_collection};
/// use geojson::{GeoJson, FeatureCollection};
///
/// let text = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
///     "geometry":{"type":"LineString","coordinates":[[0,0],[1,0.001],[2,0]]}}]}"#;
/// let mut fc = FeatureCollection::try_from(text.parse::<GeoJson>()?)?;
/// assert_eq!(coordinate_count(&fc), 3);
/// assert_eq!(simplify_collection(&mut fc, 0.01)?, 2);
/// # Ok::<(), geojson::Error>(())
/// ```
pub fn simplify_collection(
    collection: &mut FeatureCollection,
    tolerance: f64,
) -> Result<usize, geojson::Error> {
    if tolerance > 0.0 {
        for geometry in collection
            .features
            .iter_mut()
            .filter_map(|feature| feature.geometry.as_mut())
        {
            simplify_geometry(geometry, tolerance)?;
        }
    }
    Ok(coordinate_count(collection))
}

/// Counts the coordinate positions in every feature geometry.
#[must_use]
pub fn coordinate_count(collection: &FeatureCollection) -> usize {
    collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .map(|geometry| value_count(&geometry.value))
        .sum()
}

fn simplify_geometry(geometry: &mut Geometry, tolerance: f64) -> Result<(), geojson::Error> {
    geometry.value = match &geometry.value {
        Value::Point(_) | Value::MultiPoint(_) => return Ok(()),
        value @ Value::LineString(_) => {
            Value::from(&LineString::<f64>::try_from(value)?.simplify(tolerance))
        },
        value @ Value::MultiLineString(_) => {
            Value::from(&MultiLineString::<f64>::try_from(value)?.simplify(tolerance))
        },
        value @ Value::Polygon(_) => {
            Value::from(&Polygon::<f64>::try_from(value)?.simplify(tolerance))
        },
        value @ Value::MultiPolygon(_) => {
            Value::from(&MultiPolygon::<f64>::try_from(value)?.simplify(tolerance))
        },
        Value::GeometryCollection(members) => {
            let mut members = members.clone();
            for member in &mut members {
                simplify_geometry(member, tolerance)?;
            }
            Value::GeometryCollection(members)
        },
    };
    Ok(())
}

fn value_count(value: &Value) -> usize {
    match value {
        Value::Point(_) => 1,
        Value::MultiPoint(points) | Value::LineString(points) => points.len(),
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines.iter().map(Vec::len).sum(),
        Value::MultiPolygon(polygons) => polygons.iter().flatten().map(Vec::len).sum(),
        Value::GeometryCollection(members) => members.iter().map(|g| value_count(&g.value)).sum(),
    }
}
