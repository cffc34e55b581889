//! GeoJSON input model and coordinate extraction.
//!
//! Only the parts framing needs are modelled: geometry coordinates (with the
//! optional third height component kept as-is) and feature properties.

use foundation::bounds::GeoRect;
use serde_json::{Map, Value};

/// A GeoJSON position: longitude and latitude in degrees, optional height in
/// meters above the WGS84 ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: Option<f64>,
}

impl GeoCoordinate {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            height_m: None,
        }
    }

    pub fn with_height(lon_deg: f64, lat_deg: f64, height_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            height_m: Some(height_m),
        }
    }

    /// True when the source tuple had three or more components.
    pub fn has_height(&self) -> bool {
        self.height_m.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoCoordinate),
    MultiPoint(Vec<GeoCoordinate>),
    LineString(Vec<GeoCoordinate>),
    MultiLineString(Vec<Vec<GeoCoordinate>>),
    Polygon(Vec<Vec<GeoCoordinate>>),
    MultiPolygon(Vec<Vec<Vec<GeoCoordinate>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Visit every position in document order.
    pub fn for_each_coordinate(&self, f: &mut impl FnMut(&GeoCoordinate)) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(f),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(f),
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    part.for_each_coordinate(&mut *f);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for a feature whose geometry is `null`.
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureError> {
        match GeoJson::from_geojson_str(payload)? {
            GeoJson::FeatureCollection(fc) => Ok(fc),
            _ => Err(FeatureError::NotGeoJson(
                "expected GeoJSON FeatureCollection".to_string(),
            )),
        }
    }
}

/// Anything framing accepts: a bare geometry, one feature, or a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl From<Geometry> for GeoJson {
    fn from(g: Geometry) -> Self {
        GeoJson::Geometry(g)
    }
}

impl From<Feature> for GeoJson {
    fn from(f: Feature) -> Self {
        GeoJson::Feature(f)
    }
}

impl From<FeatureCollection> for GeoJson {
    fn from(fc: FeatureCollection) -> Self {
        GeoJson::FeatureCollection(fc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    NotGeoJson(String),
    InvalidFeature { index: usize, reason: String },
    InvalidGeometry(String),
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::NotGeoJson(reason) => write!(f, "not GeoJSON: {reason}"),
            FeatureError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            FeatureError::InvalidGeometry(reason) => write!(f, "invalid geometry: {reason}"),
        }
    }
}

impl std::error::Error for FeatureError {}

impl GeoJson {
    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| FeatureError::NotGeoJson(format!("JSON parse error: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, FeatureError> {
        let obj = value
            .as_object()
            .ok_or_else(|| FeatureError::NotGeoJson("root must be an object".to_string()))?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| FeatureError::NotGeoJson("missing type".to_string()))?;

        match ty {
            "FeatureCollection" => {
                let features_val = obj.get("features").and_then(|v| v.as_array()).ok_or_else(
                    || FeatureError::NotGeoJson("FeatureCollection missing features".to_string()),
                )?;
                let mut features = Vec::with_capacity(features_val.len());
                for (index, feat_val) in features_val.iter().enumerate() {
                    features.push(parse_feature(feat_val).map_err(|reason| {
                        FeatureError::InvalidFeature { index, reason }
                    })?);
                }
                Ok(GeoJson::FeatureCollection(FeatureCollection { features }))
            }
            "Feature" => parse_feature(value)
                .map(GeoJson::Feature)
                .map_err(|reason| FeatureError::InvalidFeature { index: 0, reason }),
            _ => parse_geometry(value)
                .map(GeoJson::Geometry)
                .map_err(FeatureError::InvalidGeometry),
        }
    }

    /// Visit every position of every geometry in document order.
    pub fn for_each_coordinate(&self, f: &mut impl FnMut(&GeoCoordinate)) {
        match self {
            GeoJson::Geometry(g) => g.for_each_coordinate(f),
            GeoJson::Feature(feat) => {
                if let Some(g) = &feat.geometry {
                    g.for_each_coordinate(f);
                }
            }
            GeoJson::FeatureCollection(fc) => {
                for g in fc.features.iter().filter_map(|feat| feat.geometry.as_ref()) {
                    g.for_each_coordinate(&mut *f);
                }
            }
        }
    }
}

/// All positions across all geometries, flattened in document order.
///
/// Polygon rings keep their closing vertex, so it appears twice.
pub fn coord_all(input: &GeoJson) -> Vec<GeoCoordinate> {
    let mut out = Vec::new();
    input.for_each_coordinate(&mut |c| out.push(*c));
    out
}

/// Flat `[west, south, east, north]` box over every position, or `None` when
/// the input has no coordinates.
pub fn bbox(input: &GeoJson) -> Option<GeoRect> {
    let mut rect: Option<GeoRect> = None;
    input.for_each_coordinate(&mut |c| {
        rect.get_or_insert(GeoRect::new(c.lon_deg, c.lat_deg, c.lon_deg, c.lat_deg))
            .extend(c.lon_deg, c.lat_deg);
    });
    rect
}

fn parse_feature(value: &Value) -> Result<Feature, String> {
    let feat_obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry = match feat_obj.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => Some(parse_geometry(g)?),
    };

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    if ty == "GeometryCollection" {
        let parts = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or("GeometryCollection missing geometries".to_string())?;
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            out.push(parse_geometry(part)?);
        }
        return Ok(Geometry::GeometryCollection(out));
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_position(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_positions(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_positions(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_nested(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_nested(coords)?)),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                out.push(parse_nested(poly)?);
            }
            Ok(Geometry::MultiPolygon(out))
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_position(coords: &Value) -> Result<GeoCoordinate, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("position lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("position lat must be a number".to_string())?;
    match arr.get(2) {
        None => Ok(GeoCoordinate::new(lon, lat)),
        Some(h) => {
            let h = h
                .as_f64()
                .ok_or("position height must be a number".to_string())?;
            Ok(GeoCoordinate::with_height(lon, lat, h))
        }
    }
}

fn parse_positions(coords: &Value) -> Result<Vec<GeoCoordinate>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_position).collect()
}

fn parse_nested(coords: &Value) -> Result<Vec<Vec<GeoCoordinate>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of position lists".to_string())?;
    arr.iter().map(parse_positions).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        Feature, FeatureCollection, FeatureError, GeoCoordinate, GeoJson, Geometry, bbox,
        coord_all,
    };
    use foundation::bounds::GeoRect;
    use pretty_assertions::assert_eq;

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 7, "properties": {"region": "north"},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "properties": null, "geometry": null},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 3], [0, 0]]]}}
        ]
    }"#;

    #[test]
    fn parses_feature_collection_with_null_geometry() {
        let GeoJson::FeatureCollection(fc) = GeoJson::from_geojson_str(MIXED).unwrap() else {
            panic!("expected a collection");
        };
        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.features[0].id.as_deref(), Some("7"));
        assert_eq!(fc.features[0].properties["region"].as_str(), Some("north"));
        assert_eq!(fc.features[1].geometry, None);
        assert!(fc.features[1].properties.is_empty());
    }

    #[test]
    fn coord_all_flattens_in_document_order() {
        let input = GeoJson::from_geojson_str(MIXED).unwrap();
        let coords = coord_all(&input);
        assert_eq!(
            coords,
            vec![
                GeoCoordinate::new(1.0, 2.0),
                GeoCoordinate::new(0.0, 0.0),
                GeoCoordinate::new(4.0, 0.0),
                GeoCoordinate::new(4.0, 3.0),
                GeoCoordinate::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn third_component_is_height() {
        let input = GeoJson::from_geojson_str(
            r#"{"type": "LineString", "coordinates": [[10, 20, 150.5], [11, 21]]}"#,
        )
        .unwrap();
        let coords = coord_all(&input);
        assert_eq!(coords[0], GeoCoordinate::with_height(10.0, 20.0, 150.5));
        assert!(!coords[1].has_height());
    }

    #[test]
    fn geometry_collection_is_walked() {
        let input = GeoJson::from_geojson_str(
            r#"{"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [5, 5]},
                {"type": "MultiPoint", "coordinates": [[6, 6], [7, 7]]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(coord_all(&input).len(), 3);
    }

    #[test]
    fn bbox_spans_every_coordinate() {
        let input = GeoJson::from_geojson_str(MIXED).unwrap();
        assert_eq!(bbox(&input), Some(GeoRect::new(0.0, 0.0, 4.0, 3.0)));
    }

    #[test]
    fn bbox_of_empty_collection_is_none() {
        let input = GeoJson::from(FeatureCollection::default());
        assert_eq!(bbox(&input), None);
        assert!(coord_all(&input).is_empty());
    }

    #[test]
    fn single_feature_input() {
        let feature = Feature::new(Geometry::MultiLineString(vec![
            vec![GeoCoordinate::new(0.0, 1.0)],
            vec![GeoCoordinate::new(2.0, 3.0), GeoCoordinate::new(4.0, 5.0)],
        ]));
        assert_eq!(coord_all(&feature.into()).len(), 3);
    }

    #[test]
    fn rejects_bad_positions() {
        let err = GeoJson::from_geojson_str(r#"{"type": "Point", "coordinates": [1]}"#).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidGeometry(_)));

        let err = GeoJson::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": ["a", 0]}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidFeature { index: 1, .. }));
    }

    #[test]
    fn collection_parser_requires_a_collection() {
        let err = FeatureCollection::from_geojson_str(r#"{"type": "Point", "coordinates": [0, 0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }
}
