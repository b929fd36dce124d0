//! Bounding-box framing for the robot preview
//!
//! Takes the backbone segments returned by the computation service, filters
//! out malformed points, and derives the center/extent used to position a
//! camera. An empty or fully invalid cloud frames to a fixed default instead
//! of producing NaN.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Extent used when there is nothing to frame
pub const DEFAULT_FRAME_SIZE: f64 = 100.0;

/// Raw segment as received: points of arbitrary arity
pub type RawSegment = Vec<Vec<f64>>;

/// Center and extent of a point cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingFrame {
    pub center: Point3<f64>,
    /// Largest axis-aligned extent
    pub size: f64,
}

impl BoundingFrame {
    /// Frame used for empty clouds
    pub fn fallback(config: &FramingConfig) -> Self {
        Self {
            center: Point3::origin(),
            size: config.default_size,
        }
    }

    /// Camera distances derived from this frame's size
    pub fn camera(&self, config: &FramingConfig) -> CameraBounds {
        CameraBounds::from_size(self.size, config)
    }
}

/// Camera placement limits for the preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    pub distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl CameraBounds {
    /// Scale the configured factors by `size`, falling back to fixed
    /// distances when the size is zero or not finite
    pub fn from_size(size: f64, config: &FramingConfig) -> Self {
        if size == 0.0 || !size.is_finite() {
            return Self {
                distance: config.fallback_distance,
                min_distance: config.fallback_min,
                max_distance: config.fallback_max,
            };
        }
        Self {
            distance: size * config.distance_factor,
            min_distance: size * config.min_factor,
            max_distance: size * config.max_factor,
        }
    }
}

/// Empirical framing constants for the preview scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub distance_factor: f64,
    pub min_factor: f64,
    pub max_factor: f64,
    pub fallback_distance: f64,
    pub fallback_min: f64,
    pub fallback_max: f64,
    pub default_size: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            distance_factor: 1.5,
            min_factor: 0.5,
            max_factor: 4.0,
            fallback_distance: 200.0,
            fallback_min: 50.0,
            fallback_max: 1000.0,
            default_size: DEFAULT_FRAME_SIZE,
        }
    }
}

/// Accept a tuple only if it has exactly three finite components
pub fn valid_point(coords: &[f64]) -> Option<Point3<f64>> {
    match coords {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => {
            Some(Point3::new(*x, *y, *z))
        }
        _ => None,
    }
}

/// All valid points across every segment, in order
pub fn valid_points(segments: &[RawSegment]) -> impl Iterator<Item = Point3<f64>> + '_ {
    segments
        .iter()
        .flat_map(|segment| segment.iter())
        .filter_map(|coords| valid_point(coords))
}

/// Segments that can be drawn as polylines
///
/// Invalid points are removed first; a segment left with fewer than two
/// points is dropped.
pub fn renderable_segments(segments: &[RawSegment]) -> Vec<Vec<Point3<f64>>> {
    let mut dropped_points = 0usize;
    let mut dropped_segments = 0usize;

    let renderable = segments
        .iter()
        .filter_map(|segment| {
            let points: Vec<Point3<f64>> =
                segment.iter().filter_map(|c| valid_point(c)).collect();
            dropped_points += segment.len() - points.len();
            if points.len() < 2 {
                dropped_segments += 1;
                None
            } else {
                Some(points)
            }
        })
        .collect();

    if dropped_points > 0 || dropped_segments > 0 {
        log::debug!(
            "Dropped {} invalid point(s) and {} short segment(s)",
            dropped_points,
            dropped_segments
        );
    }

    renderable
}

/// Frame a point cloud using the default configuration
pub fn compute_frame(segments: &[RawSegment]) -> BoundingFrame {
    compute_frame_with(segments, &FramingConfig::default())
}

/// Frame a point cloud
pub fn compute_frame_with(segments: &[RawSegment], config: &FramingConfig) -> BoundingFrame {
    frame_points(valid_points(segments), config)
}

/// Frame an already validated set of points
pub fn frame_points<I>(points: I, config: &FramingConfig) -> BoundingFrame
where
    I: IntoIterator<Item = Point3<f64>>,
{
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
        log::debug!("No valid points to frame, using default frame");
        return BoundingFrame::fallback(config);
    };

    let (min, max) = points.fold((first, first), |(min, max), p| {
        (
            Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
            Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
        )
    });

    let extent = max - min;
    BoundingFrame {
        center: nalgebra::center(&min, &max),
        size: extent.x.max(extent.y).max(extent.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_empty_cloud_uses_default_frame() {
        let frame = compute_frame(&[]);
        assert_eq!(frame.center, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(frame.size, 100.0);
    }

    #[test]
    fn test_fully_invalid_cloud_uses_default_frame() {
        let segments = vec![vec![
            vec![f64::NAN, 0.0, 0.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![f64::INFINITY, 1.0, 1.0],
        ]];
        let frame = compute_frame(&segments);
        assert_eq!(frame.center, Point3::origin());
        assert_eq!(frame.size, DEFAULT_FRAME_SIZE);
    }

    #[test]
    fn test_symmetric_pair() {
        let segments = vec![vec![vec![1.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0]]];
        let frame = compute_frame(&segments);
        assert!(approx(frame.center.x, 0.0));
        assert!(approx(frame.center.y, 0.0));
        assert!(approx(frame.center.z, 0.0));
        assert!(approx(frame.size, 2.0));
    }

    #[test]
    fn test_size_is_largest_axis_range() {
        let segments = vec![
            vec![vec![0.0, 0.0, 0.0], vec![0.1, 0.02, 0.3]],
            vec![vec![0.05, -0.04, 0.5]],
        ];
        let frame = compute_frame(&segments);
        assert!(approx(frame.size, 0.5));
        assert!(approx(frame.center.x, 0.05));
        assert!(approx(frame.center.y, -0.01));
        assert!(approx(frame.center.z, 0.25));
    }

    #[test]
    fn test_invalid_points_do_not_affect_frame() {
        let segments = vec![vec![
            vec![0.0, 0.0, 0.0],
            vec![f64::NAN, 100.0, 100.0],
            vec![500.0, 500.0],
            vec![0.0, 0.0, 2.0],
        ]];
        let frame = compute_frame(&segments);
        assert!(approx(frame.size, 2.0));
        assert!(approx(frame.center.z, 1.0));
    }

    #[test]
    fn test_single_point_segments_still_frame() {
        // Framing flattens all segments; only rendering drops short ones
        let segments = vec![vec![vec![3.0, 0.0, 0.0]], vec![vec![-3.0, 0.0, 0.0]]];
        let frame = compute_frame(&segments);
        assert!(approx(frame.size, 6.0));
        assert!(renderable_segments(&segments).is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let segments = vec![vec![vec![1.0, 2.0, 3.0], vec![f64::NAN, 0.0, 0.0]]];
        let before = format!("{:?}", segments);
        let _ = compute_frame(&segments);
        let _ = renderable_segments(&segments);
        assert_eq!(format!("{:?}", segments), before);
    }

    #[test]
    fn test_renderable_segments_filters_and_drops() {
        let segments = vec![
            vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 1.0], vec![1.0]],
            vec![vec![0.0, 0.0, 1.0], vec![f64::NAN, 0.0, 0.0]],
            vec![],
        ];
        let renderable = renderable_segments(&segments);
        assert_eq!(renderable.len(), 1);
        assert_eq!(renderable[0].len(), 2);
    }

    #[test]
    fn test_camera_bounds_scale_with_size() {
        let config = FramingConfig::default();
        let camera = CameraBounds::from_size(2.0, &config);
        assert!(approx(camera.distance, 3.0));
        assert!(approx(camera.min_distance, 1.0));
        assert!(approx(camera.max_distance, 8.0));
    }

    #[test]
    fn test_camera_bounds_fallback_for_zero_size() {
        let config = FramingConfig::default();
        let camera = CameraBounds::from_size(0.0, &config);
        assert_eq!(camera.distance, 200.0);
        assert_eq!(camera.min_distance, 50.0);
        assert_eq!(camera.max_distance, 1000.0);

        let camera = CameraBounds::from_size(f64::NAN, &config);
        assert_eq!(camera.distance, 200.0);
    }

    #[test]
    fn test_coincident_points_use_camera_fallback() {
        let segments = vec![vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]]];
        let frame = compute_frame(&segments);
        assert_eq!(frame.size, 0.0);
        assert_eq!(frame.camera(&FramingConfig::default()).distance, 200.0);
    }

    #[test]
    fn test_custom_default_size() {
        let config = FramingConfig {
            default_size: 0.5,
            ..FramingConfig::default()
        };
        let frame = compute_frame_with(&[], &config);
        assert_eq!(frame.size, 0.5);
    }
}
