//! Core module - unit handling, framing, colors, and recompute scheduling

pub mod config;
pub mod frame;
pub mod palette;
pub mod session;
pub mod units;

pub use config::{Config, ConfigError, DisplayConfig, WatchConfig};
pub use frame::{
    compute_frame, compute_frame_with, renderable_segments, valid_point, valid_points,
    BoundingFrame, CameraBounds, FramingConfig, RawSegment, DEFAULT_FRAME_SIZE,
};
pub use palette::{color_for, palette_index, Color, FALLBACK_COLOR, TENDON_PALETTE};
pub use session::{RecomputeScheduler, RecomputeTicket, Session};
pub use units::{
    convert_from_si, convert_to_si, AngleUnit, DisplayPolicy, LengthUnit, Mode, Unit, UnitError,
};
