//! Terminal visualization using braille graphics
//!
//! Projects backbone segments, tendon paths and coupling elements onto one
//! of the principal planes and renders them with Unicode braille characters.
//! The view is centered and scaled from the bounding frame.

use clap::ValueEnum;
use drawille::Canvas;
use nalgebra::Point3;

use crate::core::frame::BoundingFrame;
use crate::model::result::TendonPath;

/// Default canvas size in braille dots (2×4 dots per character)
pub const VIEW_WIDTH: u32 = 80;
pub const VIEW_HEIGHT: u32 = 80;

/// Default width of a length-change bar, in characters
pub const BAR_WIDTH: usize = 21;

/// Projection plane for the terminal view
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Plane {
    /// Front view, X right and Z up
    #[default]
    Xz,
    /// Side view, Y right and Z up
    Yz,
    /// Top view, X right and Y up
    Xy,
}

impl Plane {
    /// Horizontal and vertical coordinates of a point in this plane
    pub fn project(&self, p: &Point3<f64>) -> (f64, f64) {
        match self {
            Plane::Xz => (p.x, p.z),
            Plane::Yz => (p.y, p.z),
            Plane::Xy => (p.x, p.y),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Plane::Xz => "Front (XZ)",
            Plane::Yz => "Side (YZ)",
            Plane::Xy => "Top (XY)",
        }
    }
}

/// Maps scene coordinates onto canvas dots
#[derive(Debug, Clone, Copy)]
struct Viewport {
    width: u32,
    height: u32,
    center: (f64, f64),
    scale: f64,
}

impl Viewport {
    fn new(frame: &BoundingFrame, plane: Plane, width: u32, height: u32) -> Self {
        let usable = (width.min(height).saturating_sub(1)) as f64;
        let scale = if frame.size > 0.0 && frame.size.is_finite() {
            usable / frame.size
        } else {
            1.0
        };
        Self {
            width,
            height,
            center: plane.project(&frame.center),
            scale,
        }
    }

    fn to_canvas(&self, (h, v): (f64, f64)) -> (u32, u32) {
        let x = self.width as f64 / 2.0 + (h - self.center.0) * self.scale;
        // Y inverted
        let y = self.height as f64 / 2.0 - (v - self.center.1) * self.scale;
        let clamp = |value: f64, max: u32| value.round().clamp(0.0, max.saturating_sub(1) as f64) as u32;
        (clamp(x, self.width), clamp(y, self.height))
    }
}

/// Render a projection of the robot
///
/// Backbone segments are drawn solid, tendon paths dotted, and coupling
/// elements as small crosses.
///
/// # Example Output
/// ```text
/// Front (XZ) view:
///     ⠀⠀⠀⠀⢀⡠⠔⠊⠁
///     ⠀⠀⢀⠔⠁⠀⠀⠀⠀
///     ⠀⠀⡎⠀⠀⠀⠀⠀⠀
///     ⠀⠀⡇⠀⠀⠀⠀⠀⠀
///   size: 0.1400  center: (0.0210, 0.0000, 0.0650)
/// ```
pub fn render_view(
    segments: &[Vec<Point3<f64>>],
    tendons: &[TendonPath],
    couplings: &[Point3<f64>],
    frame: &BoundingFrame,
    plane: Plane,
    width: u32,
    height: u32,
) -> String {
    if segments.is_empty() {
        return "  (no renderable segments)".to_string();
    }

    let mut canvas = Canvas::new(width, height);
    let viewport = Viewport::new(frame, plane, width, height);

    for segment in segments {
        for pair in segment.windows(2) {
            let (x1, y1) = viewport.to_canvas(plane.project(&pair[0]));
            let (x2, y2) = viewport.to_canvas(plane.project(&pair[1]));
            canvas.line(x1, y1, x2, y2);
        }
    }

    for tendon in tendons {
        for pair in tendon.points.windows(2) {
            let a = viewport.to_canvas(plane.project(&pair[0]));
            let b = viewport.to_canvas(plane.project(&pair[1]));
            dotted_line(&mut canvas, a, b);
        }
    }

    for coupling in couplings {
        let (x, y) = viewport.to_canvas(plane.project(coupling));
        canvas.set(x, y);
        canvas.set(x.saturating_sub(1), y);
        canvas.set((x + 1).min(width.saturating_sub(1)), y);
        canvas.set(x, y.saturating_sub(1));
        canvas.set(x, (y + 1).min(height.saturating_sub(1)));
    }

    let mut output = String::new();
    output.push_str(&format!("{} view:\n", plane.label()));
    output.push_str(&canvas.frame());
    output.push_str(&format!(
        "\n  size: {:.4}  center: ({:.4}, {:.4}, {:.4})",
        frame.size, frame.center.x, frame.center.y, frame.center.z
    ));
    output
}

/// Every third dot along a line
fn dotted_line(canvas: &mut Canvas, (x1, y1): (u32, u32), (x2, y2): (u32, u32)) {
    let dx = x2 as f64 - x1 as f64;
    let dy = y2 as f64 - y1 as f64;
    let steps = dx.abs().max(dy.abs()).ceil() as u32;
    if steps == 0 {
        canvas.set(x1, y1);
        return;
    }
    for i in (0..=steps).step_by(3) {
        let t = i as f64 / steps as f64;
        let x = (x1 as f64 + dx * t).round() as u32;
        let y = (y1 as f64 + dy * t).round() as u32;
        canvas.set(x, y);
    }
}

/// Render a length change as a bar around zero
///
/// Pulls (negative changes) extend left of the center mark, releases extend
/// right. `limit` is the magnitude that fills half the bar.
///
/// ```text
///   ━━━━━━━━━━│           pull at full scale
///             │━━━━       small release
/// ```
pub fn render_change_bar(change: f64, limit: f64, width: usize) -> String {
    let half = width / 2;
    let mut bar: Vec<char> = vec![' '; half * 2 + 1];
    bar[half] = '│';

    if limit > 0.0 && change.is_finite() {
        let filled = ((change.abs() / limit) * half as f64).round() as usize;
        let filled = filled.min(half);
        for i in 1..=filled {
            if change < 0.0 {
                bar[half - i] = '━';
            } else {
                bar[half + i] = '━';
            }
        }
    }

    bar.into_iter().collect()
}
