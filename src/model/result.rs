//! Computation results returned by the robot service
//!
//! These payload shapes are accepted, with or without the service's
//! `{success, data, message}` envelope:
//!
//! - viewer shape: `{"segments": [...], "tendonAnalysis": {...}}`
//! - service shape: `{"robot_positions": [...], "actuation_commands": {...},
//!   "coupling_data": {...}, "tendon_analysis": {...}, ...}`
//! - kinematics only: `{"points": [...]}`
//! - tendon analysis only: `{"actuation_commands": {...}, "tendon_analysis":
//!   {...}, ...}` with no backbone, which frames to the default
//!
//! Point arrays are read leniently: a non-numeric component becomes NaN and a
//! non-array point becomes an empty tuple, so malformed points survive
//! parsing and are filtered by [`crate::core::frame`].

use chrono::{DateTime, Utc};
use miette::{Diagnostic, NamedSource, SourceSpan};
use nalgebra::Point3;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::core::frame::{valid_point, RawSegment};

/// Errors reading a computation result
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("Invalid JSON in {filename}: {message}")]
    #[diagnostic(code(tendo::model::json))]
    Json {
        filename: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("Unrecognized result in {filename}: {message}")]
    #[diagnostic(
        code(tendo::model::shape),
        help("expected `segments`, `robot_positions`, `points` or `actuation_commands`")
    )]
    Shape { filename: String, message: String },

    #[error("Computation service reported failure: {message}")]
    #[diagnostic(code(tendo::model::backend))]
    Backend { message: String },

    #[error("Cannot read {path}")]
    #[diagnostic(code(tendo::model::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Standard response wrapper used by the computation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning a failed response into an error
    pub fn into_data(self) -> Result<T, ModelError> {
        if !self.success {
            let message = self
                .message
                .or(self.error)
                .unwrap_or_else(|| "no message".to_string());
            return Err(ModelError::Backend { message });
        }
        self.data.ok_or_else(|| ModelError::Backend {
            message: "response contained no data".to_string(),
        })
    }
}

/// Direction a tendon must be driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullDirection {
    Pull,
    Release,
    Hold,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PullDirection {
    /// Shortened tendons are pulled, lengthened ones released
    pub fn from_length_change(delta_m: f64) -> Self {
        if delta_m > 0.0 {
            PullDirection::Release
        } else if delta_m < 0.0 {
            PullDirection::Pull
        } else {
            PullDirection::Hold
        }
    }
}

impl std::fmt::Display for PullDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullDirection::Pull => write!(f, "pull"),
            PullDirection::Release => write!(f, "release"),
            PullDirection::Hold => write!(f, "hold"),
            PullDirection::Unknown => write!(f, "unknown"),
        }
    }
}

/// Actuation for one tendon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuationCommand {
    /// Total length change from the straight configuration, meters
    pub length_change_m: f64,
    #[serde(default)]
    pub pull_direction: PullDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
}

impl ActuationCommand {
    pub fn magnitude(&self) -> f64 {
        self.magnitude.unwrap_or(self.length_change_m.abs())
    }

    /// Whether the reported direction agrees with the length change
    pub fn is_consistent(&self) -> bool {
        self.pull_direction == PullDirection::from_length_change(self.length_change_m)
    }
}

/// Coupling element poses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingData {
    #[serde(deserialize_with = "lenient_points")]
    pub positions: Vec<Vec<f64>>,
    #[serde(deserialize_with = "lenient_segments")]
    pub orientations: Vec<Vec<Vec<f64>>>,
}

impl CouplingData {
    /// Positions that are valid 3D points
    pub fn valid_positions(&self) -> Vec<Point3<f64>> {
        self.positions.iter().filter_map(|p| valid_point(p)).collect()
    }
}

/// Per-tendon lengths and eyelet positions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TendonLengths {
    pub segment_lengths: Vec<Vec<f64>>,
    pub total_lengths: Vec<Vec<f64>>,
    pub length_changes: Vec<Vec<f64>>,
    pub segment_length_changes: Vec<Vec<f64>>,
    /// Indexed `[coupling element][tendon]`
    #[serde(deserialize_with = "lenient_segments")]
    pub routing_points: Vec<RawSegment>,
}

/// Polyline followed by one tendon through its eyelets
#[derive(Debug, Clone, PartialEq)]
pub struct TendonPath {
    /// 1-based tendon id
    pub id: String,
    pub points: Vec<Point3<f64>>,
}

impl TendonLengths {
    /// One path per tendon, skipping invalid eyelets
    ///
    /// Paths with fewer than two valid points are dropped.
    pub fn tendon_paths(&self) -> Vec<TendonPath> {
        let tendon_count = self.routing_points.iter().map(Vec::len).max().unwrap_or(0);
        (0..tendon_count)
            .filter_map(|tendon| {
                let points: Vec<Point3<f64>> = self
                    .routing_points
                    .iter()
                    .filter_map(|element| element.get(tendon).and_then(|p| valid_point(p)))
                    .collect();
                (points.len() >= 2).then(|| TendonPath {
                    id: (tendon + 1).to_string(),
                    points,
                })
            })
            .collect()
    }
}

/// Eyelet radius used when a result omits it, meters
pub const DEFAULT_TENDON_RADIUS: f64 = 0.03;

/// Tendon routing configuration, SI units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendonConfig {
    pub count: u32,
    /// Distance from the backbone to the eyelets
    pub radius: f64,
    pub coupling_offset: f64,
}

impl Default for TendonConfig {
    fn default() -> Self {
        Self {
            count: 3,
            radius: DEFAULT_TENDON_RADIUS,
            coupling_offset: 0.0,
        }
    }
}

/// Tendon side of a computation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TendonAnalysis {
    pub actuation_commands: BTreeMap<String, ActuationCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupling_data: Option<CouplingData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendon_analysis: Option<TendonLengths>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendon_config: Option<TendonConfig>,
}

impl TendonAnalysis {
    /// Commands ordered by numeric tendon id, non-numeric ids last
    pub fn ordered_commands(&self) -> Vec<(&str, &ActuationCommand)> {
        let mut commands: Vec<(&str, &ActuationCommand)> = self
            .actuation_commands
            .iter()
            .map(|(id, cmd)| (id.as_str(), cmd))
            .collect();
        commands.sort_by(|(a, _), (b, _)| {
            match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            }
        });
        commands
    }

    /// Eyelet paths, if routing points were returned
    pub fn tendon_paths(&self) -> Vec<TendonPath> {
        self.tendon_analysis
            .as_ref()
            .map(TendonLengths::tendon_paths)
            .unwrap_or_default()
    }

    /// Valid coupling element positions, if returned
    pub fn coupling_positions(&self) -> Vec<Point3<f64>> {
        self.coupling_data
            .as_ref()
            .map(CouplingData::valid_positions)
            .unwrap_or_default()
    }
}

/// A computation result normalized to the viewer shape
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComputationResult {
    /// Backbone points per segment
    pub segments: Vec<RawSegment>,
    #[serde(rename = "tendonAnalysis")]
    pub analysis: TendonAnalysis,
}

#[derive(Deserialize)]
struct ViewerShape {
    #[serde(deserialize_with = "lenient_segments")]
    segments: Vec<RawSegment>,
    #[serde(default, rename = "tendonAnalysis")]
    analysis: Option<TendonAnalysis>,
}

#[derive(Deserialize)]
struct KinematicsShape {
    #[serde(deserialize_with = "lenient_segments")]
    points: Vec<RawSegment>,
}

#[derive(Deserialize)]
struct ServiceShape {
    #[serde(deserialize_with = "lenient_segments")]
    robot_positions: Vec<RawSegment>,
    #[serde(flatten)]
    analysis: TendonAnalysis,
}

impl ComputationResult {
    /// Parse a result document, enveloped or bare
    pub fn from_json(content: &str, filename: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(content).map_err(|e| json_error(&e, content, filename))?;

        let payload = if value.get("success").is_some_and(Value::is_boolean) {
            let envelope: ApiEnvelope<Value> =
                serde_json::from_value(value).map_err(|e| shape_error(&e, filename))?;
            log::debug!(
                "Unwrapping service envelope{}",
                envelope
                    .message
                    .as_deref()
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            );
            envelope.into_data()?
        } else {
            value
        };

        Self::from_value(payload, filename)
    }

    fn from_value(payload: Value, filename: &str) -> Result<Self, ModelError> {
        if payload.get("segments").is_some() {
            let viewer: ViewerShape =
                serde_json::from_value(payload).map_err(|e| shape_error(&e, filename))?;
            Ok(Self {
                segments: viewer.segments,
                analysis: viewer.analysis.unwrap_or_default(),
            })
        } else if payload.get("robot_positions").is_some() {
            let service: ServiceShape =
                serde_json::from_value(payload).map_err(|e| shape_error(&e, filename))?;
            Ok(Self {
                segments: service.robot_positions,
                analysis: service.analysis,
            })
        } else if payload.get("points").is_some() {
            let kinematics: KinematicsShape =
                serde_json::from_value(payload).map_err(|e| shape_error(&e, filename))?;
            Ok(Self {
                segments: kinematics.points,
                analysis: TendonAnalysis::default(),
            })
        } else if payload.get("actuation_commands").is_some()
            || payload.get("tendon_analysis").is_some()
        {
            let analysis: TendonAnalysis =
                serde_json::from_value(payload).map_err(|e| shape_error(&e, filename))?;
            log::debug!("{} has no backbone positions", filename);
            Ok(Self {
                segments: Vec::new(),
                analysis,
            })
        } else {
            Err(ModelError::Shape {
                filename: filename.to_string(),
                message: "no backbone or tendon data found".to_string(),
            })
        }
    }
}

/// Read a result from a file, or stdin when `path` is `-`
pub fn load_result(path: &Path) -> Result<ComputationResult, ModelError> {
    let display = path.display().to_string();
    let content = if display == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| ModelError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: display.clone(),
            source,
        })?
    };
    let filename = if display == "-" { "<stdin>" } else { display.as_str() };
    ComputationResult::from_json(&content, filename)
}

fn json_error(err: &serde_json::Error, content: &str, filename: &str) -> ModelError {
    let span = (err.line() > 0).then(|| {
        let offset = line_col_offset(content, err.line(), err.column());
        SourceSpan::from((offset, 1usize))
    });
    ModelError::Json {
        filename: filename.to_string(),
        message: err.to_string(),
        src: NamedSource::new(filename, content.to_string()),
        span,
    }
}

fn shape_error(err: &serde_json::Error, filename: &str) -> ModelError {
    ModelError::Shape {
        filename: filename.to_string(),
        message: err.to_string(),
    }
}

/// Byte offset of a 1-based line and column, clamped to the content
fn line_col_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len().saturating_sub(1))
}

fn lenient_component(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn lenient_point(value: &Value) -> Vec<f64> {
    match value {
        Value::Array(components) => components.iter().map(lenient_component).collect(),
        _ => Vec::new(),
    }
}

fn lenient_point_list(value: &Value) -> Vec<Vec<f64>> {
    match value {
        Value::Array(points) => points.iter().map(lenient_point).collect(),
        _ => Vec::new(),
    }
}

fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(lenient_point_list).unwrap_or_default())
}

fn lenient_segments<'de, D>(deserializer: D) -> Result<Vec<RawSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(segments)) => segments.iter().map(lenient_point_list).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<ComputationResult, ModelError> {
        ComputationResult::from_json(&value.to_string(), "result.json")
    }

    #[test]
    fn test_viewer_shape() {
        let result = parse(json!({
            "segments": [[[0.0, 0.0, 0.0], [0.0, 0.0, 0.07]]],
            "tendonAnalysis": {
                "actuation_commands": {
                    "1": {"length_change_m": -0.002, "pull_direction": "pull", "magnitude": 0.002}
                }
            }
        }))
        .unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0][1], vec![0.0, 0.0, 0.07]);
        let cmd = &result.analysis.actuation_commands["1"];
        assert_eq!(cmd.pull_direction, PullDirection::Pull);
        assert!(cmd.is_consistent());
    }

    #[test]
    fn test_service_shape_in_envelope() {
        let result = parse(json!({
            "success": true,
            "message": "Tendon calculation completed successfully",
            "timestamp": "2025-06-01T12:00:00Z",
            "data": {
                "robot_positions": [[[0, 0, 0], [0, 0, 0.05]], [[0, 0, 0.05], [0.01, 0, 0.1]]],
                "coupling_data": {
                    "positions": [[0, 0, 0], [0, 0, 0.05], [0.01, 0, 0.1]],
                    "orientations": []
                },
                "tendon_analysis": {
                    "routing_points": [
                        [[0.03, 0, 0], [-0.015, 0.026, 0], [-0.015, -0.026, 0]],
                        [[0.03, 0, 0.05], [-0.015, 0.026, 0.05], [-0.015, -0.026, 0.05]]
                    ]
                },
                "actuation_commands": {
                    "2": {"length_change_m": 0.001, "pull_direction": "release", "magnitude": 0.001},
                    "1": {"length_change_m": -0.001, "pull_direction": "pull", "magnitude": 0.001}
                },
                "model_type": "pcc",
                "tendon_config": {"count": 3, "radius": 0.03, "coupling_offset": 0.0}
            }
        }))
        .unwrap();

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.analysis.model_type.as_deref(), Some("pcc"));
        assert_eq!(result.analysis.coupling_positions().len(), 3);
        assert_eq!(result.analysis.tendon_paths().len(), 3);
        let config = result.analysis.tendon_config.as_ref().unwrap();
        assert_eq!(config.radius, 0.03);
    }

    #[test]
    fn test_failed_envelope_is_backend_error() {
        let err = parse(json!({
            "success": false,
            "error": "COMPUTATION_ERROR",
            "message": "Error calculating tendon lengths"
        }))
        .unwrap_err();
        match err {
            ModelError::Backend { message } => {
                assert_eq!(message, "Error calculating tendon lengths")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_points_are_kept_for_filtering() {
        let result = parse(json!({
            "segments": [
                [[0, 0, 0], [1, "x", 2], null, [1, 2], [1, 2, 3]],
                "not a segment"
            ]
        }))
        .unwrap();
        let first = &result.segments[0];
        assert_eq!(first.len(), 5);
        assert!(first[1][1].is_nan());
        assert!(first[2].is_empty());
        assert_eq!(first[3].len(), 2);
        assert!(result.segments[1].is_empty());

        let frame = crate::core::frame::compute_frame(&result.segments);
        assert_eq!(frame.size, 3.0);
    }

    #[test]
    fn test_null_segments_are_empty() {
        let result = parse(json!({"segments": null})).unwrap();
        assert!(result.segments.is_empty());
    }

    #[test]
    fn test_unrecognized_shape() {
        let err = parse(json!({"vertices": []})).unwrap_err();
        assert!(matches!(err, ModelError::Shape { .. }));
    }

    #[test]
    fn test_kinematics_points_shape() {
        let result = parse(json!({"points": [[[0, 0, 0], [0, 0, 0.07]], [[0, 0, 0.07], [0.01, "x", 0.1]]]})).unwrap();
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0][1], vec![0.0, 0.0, 0.07]);
        assert!(result.segments[1][1][1].is_nan());
        assert!(result.analysis.actuation_commands.is_empty());
    }

    #[test]
    fn test_analysis_only_shape_in_envelope() {
        let result = parse(json!({
            "success": true,
            "message": "Tendon analysis completed successfully",
            "data": {
                "coupling_data": {"positions": [[0, 0, 0], [0, 0, 0.05]]},
                "tendon_analysis": {},
                "actuation_commands": {
                    "1": {"length_change_m": -0.001, "pull_direction": "pull", "magnitude": 0.001}
                },
                "tendon_config": {"count": 3, "radius": 0.03, "coupling_offset": 0.0}
            }
        }))
        .unwrap();
        assert!(result.segments.is_empty());
        assert_eq!(result.analysis.ordered_commands().len(), 1);
        assert_eq!(result.analysis.coupling_positions().len(), 2);
        assert_eq!(crate::core::frame::compute_frame(&result.segments).size, 100.0);
    }

    #[test]
    fn test_invalid_json_points_at_location() {
        let err = ComputationResult::from_json("{\n  \"segments\": [,]\n}", "bad.json").unwrap_err();
        match err {
            ModelError::Json { span, filename, .. } => {
                assert_eq!(filename, "bad.json");
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ordered_commands_sort_numerically() {
        let mut analysis = TendonAnalysis::default();
        for id in ["10", "2", "1", "aux"] {
            analysis.actuation_commands.insert(
                id.to_string(),
                ActuationCommand {
                    length_change_m: 0.0,
                    pull_direction: PullDirection::Hold,
                    magnitude: None,
                },
            );
        }
        let ids: Vec<&str> = analysis.ordered_commands().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1", "2", "10", "aux"]);
    }

    #[test]
    fn test_pull_direction_rules() {
        assert_eq!(PullDirection::from_length_change(0.01), PullDirection::Release);
        assert_eq!(PullDirection::from_length_change(-0.01), PullDirection::Pull);
        assert_eq!(PullDirection::from_length_change(0.0), PullDirection::Hold);
    }

    #[test]
    fn test_unknown_pull_direction_and_missing_magnitude() {
        let cmd: ActuationCommand =
            serde_json::from_value(json!({"length_change_m": -0.004, "pull_direction": "yank"}))
                .unwrap();
        assert_eq!(cmd.pull_direction, PullDirection::Unknown);
        assert!(!cmd.is_consistent());
        assert_eq!(cmd.magnitude(), 0.004);
    }

    #[test]
    fn test_tendon_paths_transpose_routing_points() {
        let lengths = TendonLengths {
            routing_points: vec![
                vec![vec![1.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0]],
                vec![vec![1.0, 0.0, 1.0], vec![f64::NAN, 0.0, 1.0]],
                vec![vec![1.0, 0.0, 2.0], vec![-1.0, 0.0, 2.0]],
            ],
            ..TendonLengths::default()
        };
        let paths = lengths.tendon_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].id, "1");
        assert_eq!(paths[0].points.len(), 3);
        assert_eq!(paths[1].id, "2");
        assert_eq!(paths[1].points.len(), 2);
    }

    #[test]
    fn test_tendon_config_defaults() {
        let config: TendonConfig = serde_json::from_value(json!({"count": 4})).unwrap();
        assert_eq!(config.count, 4);
        assert_eq!(config.radius, DEFAULT_TENDON_RADIUS);
        assert_eq!(config.coupling_offset, 0.0);
    }

    #[test]
    fn test_radius_must_be_a_number() {
        let result: Result<TendonConfig, _> =
            serde_json::from_value(json!({"radius": [0.01, 0.02]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_line_col_offset() {
        let content = "ab\ncd\nef";
        assert_eq!(line_col_offset(content, 1, 1), 0);
        assert_eq!(line_col_offset(content, 2, 2), 4);
        assert_eq!(line_col_offset(content, 9, 9), content.len() - 1);
    }
}
