//! # LCARS Face Core Library
//!
//! This library renders an LCARS-styled digital clock face onto a small
//! square or round display and decides when that face must be redrawn.
//!
//! ## Design Philosophy
//!
//! ### Stateless Layout
//! - **Pure frames**: [`layout::render_frame`] maps display metrics, a render
//!   mode and one clock sample to an ordered list of draw primitives
//! - **Painter's order**: later primitives overlay earlier ones, there is no z-index
//! - **No cached geometry**: every frame is recomputed from width and height
//!
//! ### Explicit Scheduling
//! The redraw logic is a small state machine fed by host lifecycle events.
//! It never touches a clock or a timer itself; it returns [`scheduler::Effect`]
//! values that the host loop carries out. That keeps it testable without a
//! live runtime.
//!
//! ### Data Flow
//! 1. **Host**: lifecycle callback → [`engine::WatchFaceEngine`] → scheduler effects
//! 2. **Redraw**: sample the clock once → render frame → rasterize
//! 3. **Timer**: one outstanding tick, re-armed on wall-clock second boundaries
//!
//! ## Core Types
//! - [`DisplayMetrics`]: the surface size frames are laid out for
//! - [`RenderMode`]: active (full color, ticking) or ambient (monochrome, idle)
//! - [`ClockSample`]: a single point-in-time reading of the local clock

use serde::{Deserialize, Serialize};

// Module declarations
pub mod clock;
pub mod config;
pub mod engine;
pub mod layout;
pub mod logging;
pub mod palette;
pub mod raster;
pub mod scheduler;

/// Surface dimensions in pixels, captured whenever the host surface is
/// created or resized.
///
/// # Example
/// ```
/// use lcars_face_lib::DisplayMetrics;
///
/// let metrics = DisplayMetrics::new(400.0, 400.0);
/// assert_eq!(metrics.width, 400.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width: f32,
    pub height: f32,
}

impl DisplayMetrics {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Display power state the face is drawn for.
///
/// - `Active`: full palette, anti-aliased shapes, one tick per second
/// - `Ambient`: white-on-black shapes, no anti-aliasing, no ticking
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Active,
    Ambient,
}

impl RenderMode {
    pub fn from_ambient(is_ambient: bool) -> Self {
        if is_ambient {
            RenderMode::Ambient
        } else {
            RenderMode::Active
        }
    }
}

/// One reading of the local wall clock.
///
/// A frame is always built from exactly one sample, so the time and date
/// texts can never disagree with each other.
///
/// # Example
/// ```
/// use lcars_face_lib::ClockSample;
///
/// let sample = ClockSample {
///     year: 2024, month: 3, day: 7,
///     hour: 14, minute: 5, second: 0.0,
/// };
/// assert_eq!(sample.hour, 14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockSample {
    pub year: i32,
    /// 1 = January
    pub month: u32,
    pub day: u32,
    /// 0-23
    pub hour: u32,
    pub minute: u32,
    /// Seconds including the fractional part, 0.0 to 59.999
    pub second: f32,
}
