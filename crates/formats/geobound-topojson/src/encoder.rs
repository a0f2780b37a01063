//! `GeoJSON` to TopoJSON encoding.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, JsonValue, Position};
use topojson::{Arc, ArcIndexes, Geometry, NamedGeometry, Topology, Value};

/// Incrementally builds a [`Topology`] from feature collections.
///
/// ```
/// use geobound_topojson::TopologyEncoder;
/// use geojson::FeatureCollection;
///
/// let empty = FeatureCollection {
///     bbox: None,
///     features: vec![],
///     foreign_members: None,
/// };
/// let mut encoder = TopologyEncoder::new();
/// encoder.add_collection("adm0", &empty);
/// let topology = encoder.finish();
/// assert_eq!(topology.objects[0].name, "adm0");
/// ```
#[derive(Debug, Default)]
pub struct TopologyEncoder {
    objects: Vec<NamedGeometry>,
    arcs: Vec<Arc>,
    bounds: Option<[f64; 4]>,
}

impl TopologyEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `collection` as a `GeometryCollection` object named `key`.
    ///
    /// Adding the same key twice replaces the earlier object; its arcs stay in
    /// the topology.
    pub fn add_collection(&mut self, key: impl Into<String>, collection: &FeatureCollection) {
        let geometries = collection
            .features
            .iter()
            .map(|feature| self.encode_feature(feature))
            .collect();
        let object = NamedGeometry {
            name: key.into(),
            geometry: Geometry::new(Value::GeometryCollection(geometries)),
        };
        match self.objects.iter_mut().find(|o| o.name == object.name) {
            Some(existing) => *existing = object,
            None => self.objects.push(object),
        }
    }

    /// Finishes encoding and returns the topology.
    #[must_use]
    pub fn finish(self) -> Topology {
        Topology {
            bbox: self.bounds.map(|bounds| bounds.to_vec()),
            objects: self.objects,
            transform: None,
            arcs: self.arcs,
            foreign_members: None,
        }
    }

    fn encode_feature(&mut self, feature: &Feature) -> Geometry {
        // Features without geometry become empty collections.
        let value = match &feature.geometry {
            Some(geometry) => self.encode_value(&geometry.value),
            None => Value::GeometryCollection(Vec::new()),
        };
        let mut geometry = Geometry::new(value);
        geometry.id = feature.id.as_ref().map(|id| match id {
            Id::String(s) => JsonValue::String(s.clone()),
            Id::Number(n) => JsonValue::Number(n.clone()),
        });
        geometry.properties = feature.properties.clone();
        geometry
    }

    fn encode_value(&mut self, value: &geojson::Value) -> Value {
        use geojson::Value as In;

        match value {
            In::Point(position) => {
                self.extend_bounds(position);
                Value::Point(position.clone())
            },
            In::MultiPoint(positions) => {
                positions.iter().for_each(|p| self.extend_bounds(p));
                Value::MultiPoint(positions.clone())
            },
            In::LineString(line) => Value::LineString(vec![self.push_arc(line)]),
            In::MultiLineString(lines) => {
                Value::MultiLineString(lines.iter().map(|line| vec![self.push_arc(line)]).collect())
            },
            In::Polygon(rings) => Value::Polygon(self.push_rings(rings)),
            In::MultiPolygon(polygons) => Value::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| self.push_rings(rings))
                    .collect(),
            ),
            In::GeometryCollection(members) => Value::GeometryCollection(
                members
                    .iter()
                    .map(|member| Geometry::new(self.encode_value(&member.value)))
                    .collect(),
            ),
        }
    }

    fn push_rings(&mut self, rings: &[Vec<Position>]) -> Vec<ArcIndexes> {
        rings.iter().map(|ring| vec![self.push_arc(ring)]).collect()
    }

    fn push_arc(&mut self, positions: &[Position]) -> i32 {
        positions.iter().for_each(|p| self.extend_bounds(p));
        let index = i32::try_from(self.arcs.len()).unwrap_or(i32::MAX);
        self.arcs.push(positions.to_vec());
        index
    }

    fn extend_bounds(&mut self, position: &[f64]) {
        let [x, y, ..] = position else {
            return;
        };
        let (x, y) = (*x, *y);
        self.bounds = Some(match self.bounds {
            None => [x, y, x, y],
            Some([min_x, min_y, max_x, max_y]) => {
                [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)]
            },
        });
    }
}

/// Encodes named feature collections into one topology.
///
/// Each `(key, collection)` pair becomes an object named `key`.
pub fn encode<'a, I>(objects: I) -> Topology
where
    I: IntoIterator<Item = (&'a str, &'a FeatureCollection)>,
{
    let mut encoder = TopologyEncoder::new();
    for (key, collection) in objects {
        encoder.add_collection(key, collection);
    }
    encoder.finish()
}
