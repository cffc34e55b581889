//! Library side of the `framer` CLI, kept separate so it can be tested.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use framing::extent::{compute_extent, compute_rectangle_corners, has_height};
use framing::{
    AnimatedCamera, CameraInfo, CameraTransition, FeatureCollection, FramingConfig, GeoJson, bbox,
    camera_info, coord_all,
};
use runtime::frame::Frame;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on frames `simulate_flight` will run.
pub const MAX_SIMULATED_FRAMES: u64 = 100_000;

/// Key used for features that lack the grouping property.
pub const MISSING_KEY: &str = "undefined";

/// Count features per value of `property`.
///
/// String values are used as-is; other JSON values use their JSON text.
pub fn region_counts(collection: &FeatureCollection, property: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for feature in &collection.features {
        let key = match feature.properties.get(property) {
            None | Some(Value::Null) => MISSING_KEY.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Largest count first; ties by name.
pub fn sorted_by_count(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

pub fn format_region_summary(counts: &BTreeMap<String, usize>) -> String {
    let mut out = String::from("Feature count by region:\n");
    for (region, count) in sorted_by_count(counts) {
        out.push_str(&format!("{region}: {count}\n"));
    }
    out
}

/// Summary followed by the same counts as pretty JSON.
pub fn format_region_report(counts: &BTreeMap<String, usize>) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(counts)?;
    Ok(format!("{}\nJSON format:\n{json}\n", format_region_summary(counts)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereReport {
    pub center: [f64; 3],
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtentReport {
    pub coordinate_count: usize,
    pub has_height: bool,
    /// `[west, south, east, north]` in degrees.
    pub bbox: Option<[f64; 4]>,
    /// North-west then south-east corner, ECEF meters.
    pub corners: Option<[[f64; 3]; 2]>,
    pub sphere: Option<SphereReport>,
}

pub fn extent_report(features: &GeoJson) -> ExtentReport {
    let coords = coord_all(features);
    let rect = bbox(features);
    ExtentReport {
        coordinate_count: coords.len(),
        has_height: has_height(&coords),
        bbox: rect.map(|r| r.as_array()),
        corners: rect.map(|r| compute_rectangle_corners(r).map(|c| c.as_array())),
        sphere: compute_extent(features).map(|s| SphereReport {
            center: s.center.as_array(),
            radius: s.radius,
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightReport {
    pub arrived: bool,
    pub frames: u64,
    pub camera: CameraInfo,
}

/// Fly an [`AnimatedCamera`] to `features` at `fps` and report where it ended.
///
/// Frames run until the transition resolves or two frames past its duration,
/// never more than [`MAX_SIMULATED_FRAMES`].
pub fn simulate_flight(features: &GeoJson, config: &FramingConfig, fps: f64) -> FlightReport {
    let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
    let transition = CameraTransition::default().with_defaults(config.transition);
    let mut camera = AnimatedCamera::new(config.camera);

    let arrived = Rc::new(Cell::new(false));
    let flag = Rc::clone(&arrived);
    transition.fly_to_features(
        Some(&mut camera),
        features,
        Some(Box::new(move || flag.set(true))),
    );

    let max_frames = frame_budget(config.transition.duration_s, fps);
    let mut frames = 0;
    for frame in Frame::new(0, 1.0 / fps).following(max_frames) {
        if transition.active_flight().is_none() {
            break;
        }
        camera.update(frame);
        frames += 1;
    }

    FlightReport {
        arrived: arrived.get(),
        frames,
        camera: camera_info(&camera),
    }
}

/// `NaN` durations count as zero; infinite ones hit the cap.
fn frame_budget(duration_s: f64, fps: f64) -> u64 {
    let frames = (duration_s.max(0.0) * fps).ceil() + 2.0;
    frames.min(MAX_SIMULATED_FRAMES as f64) as u64
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use framing::{FeatureCollection, FramingConfig, FramingOptions, GeoJson};
    use pretty_assertions::assert_eq;

    use super::{
        MAX_SIMULATED_FRAMES, extent_report, format_region_report, format_region_summary,
        frame_budget, region_counts, simulate_flight, sorted_by_count,
    };

    const CITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"region": "Hangzhou"}, "geometry": {"type": "Point", "coordinates": [120.15, 30.28]}},
            {"type": "Feature", "properties": {"region": "Ningbo"}, "geometry": {"type": "Point", "coordinates": [121.55, 29.87]}},
            {"type": "Feature", "properties": {"region": "Hangzhou"}, "geometry": {"type": "Point", "coordinates": [120.2, 30.3]}},
            {"type": "Feature", "properties": {"region": 7}, "geometry": null},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [120.0, 30.0]}},
            {"type": "Feature", "properties": {"region": "Ningbo"}, "geometry": {"type": "Point", "coordinates": [121.6, 29.9]}},
            {"type": "Feature", "properties": {"region": "Hangzhou"}, "geometry": {"type": "Point", "coordinates": [120.1, 30.2]}}
        ]
    }"#;

    fn counts() -> BTreeMap<String, usize> {
        let fc = FeatureCollection::from_geojson_str(CITIES).unwrap();
        region_counts(&fc, "region")
    }

    #[test]
    fn counts_per_region() {
        let counts = counts();
        assert_eq!(counts["Hangzhou"], 3);
        assert_eq!(counts["Ningbo"], 2);
        assert_eq!(counts["7"], 1);
        assert_eq!(counts["undefined"], 1);
    }

    #[test]
    fn sorts_descending_then_by_name() {
        let counts = counts();
        assert_eq!(
            sorted_by_count(&counts),
            vec![("Hangzhou", 3), ("Ningbo", 2), ("7", 1), ("undefined", 1)]
        );
        assert_eq!(
            format_region_summary(&counts),
            "Feature count by region:\nHangzhou: 3\nNingbo: 2\n7: 1\nundefined: 1\n"
        );
    }

    #[test]
    fn region_report_separates_summary_and_json() {
        let mut counts = BTreeMap::new();
        counts.insert("Ningbo".to_string(), 2);
        counts.insert("Hangzhou".to_string(), 3);
        assert_eq!(
            format_region_report(&counts).unwrap(),
            "Feature count by region:\nHangzhou: 3\nNingbo: 2\n\nJSON format:\n{\n  \"Hangzhou\": 3,\n  \"Ningbo\": 2\n}\n"
        );
    }

    #[test]
    fn extent_report_for_points() {
        let features = GeoJson::from_geojson_str(CITIES).unwrap();
        let report = extent_report(&features);
        assert_eq!(report.coordinate_count, 6);
        assert!(!report.has_height);
        assert_eq!(report.bbox, Some([120.0, 29.87, 121.6, 30.3]));
        assert!(report.corners.is_some());
        assert!(report.sphere.unwrap().radius > 0.0);
    }

    #[test]
    fn extent_report_for_empty_input() {
        let report = extent_report(&FeatureCollection::default().into());
        assert_eq!(report.coordinate_count, 0);
        assert_eq!(report.bbox, None);
        assert_eq!(report.sphere, None);
    }

    #[test]
    fn simulated_flight_arrives_over_the_features() {
        let features = GeoJson::from_geojson_str(CITIES).unwrap();
        let config = FramingConfig {
            transition: FramingOptions {
                duration_s: 0.5,
                ..FramingOptions::default()
            },
            ..FramingConfig::default()
        };
        let report = simulate_flight(&features, &config, 30.0);
        assert!(report.arrived);
        assert!(report.frames <= 17);
        assert!((report.camera.longitude_deg - 120.8).abs() < 0.5);
        assert!((report.camera.latitude_deg - 30.1).abs() < 0.5);
    }

    #[test]
    fn frame_budget_is_bounded() {
        assert_eq!(frame_budget(1.0, 60.0), 62);
        assert_eq!(frame_budget(-5.0, 60.0), 2);
        assert_eq!(frame_budget(f64::NAN, 60.0), 2);
        assert_eq!(frame_budget(1e30, 60.0), MAX_SIMULATED_FRAMES);
        assert_eq!(frame_budget(f64::INFINITY, 60.0), MAX_SIMULATED_FRAMES);
    }

    #[test]
    fn endless_flight_stops_at_the_frame_cap() {
        let features = GeoJson::from_geojson_str(CITIES).unwrap();
        let config = FramingConfig {
            transition: FramingOptions {
                duration_s: f64::INFINITY,
                ..FramingOptions::default()
            },
            ..FramingConfig::default()
        };
        let report = simulate_flight(&features, &config, 1.0);
        assert!(!report.arrived);
        assert_eq!(report.frames, MAX_SIMULATED_FRAMES);
    }

    #[test]
    fn simulated_flight_over_nothing_stays_put() {
        let report = simulate_flight(&FeatureCollection::default().into(), &FramingConfig::default(), 60.0);
        assert!(!report.arrived);
        assert_eq!(report.frames, 0);
    }
}
