//! # Types Module
//!
//! Shared value types used across the picture subsystem.
//!
//! ## Key Types
//! - `Coord`: 2D vector (`glam::Vec2`) for positions, sizes and deltas.
//! - `Angle`: Degrees normalized to `[0, 360)` with a radian view.
//! - `Rate`: Scalar with optional `[0, 1]` clamping (opacity and friends).
//! - `Rect`: Axis-aligned rectangle for crop and bounding-box queries.
//! - `PicturePointer`: Non-owning handle naming a picture by part number and slot.

use serde::{Deserialize, Serialize};

pub use glam::Vec2 as Coord;

/// An angle in degrees, always normalized to `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle {
    degree: f32,
}

impl Angle {
    pub fn new(degree: f32) -> Self {
        Self {
            degree: normalize_degree(degree),
        }
    }

    pub fn degree(&self) -> f32 {
        self.degree
    }

    pub fn rad(&self) -> f32 {
        self.degree.to_radians()
    }

    pub fn set(&mut self, degree: f32) {
        self.degree = normalize_degree(degree);
    }

    /// Adds `delta` degrees and re-normalizes.
    pub fn rotate(&mut self, delta: f32) {
        self.set(self.degree + delta);
    }
}

fn normalize_degree(degree: f32) -> f32 {
    let d = degree.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// A scalar that is either free-running or clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rate {
    value: f32,
    clamped: bool,
}

impl Rate {
    pub fn clamped(value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            clamped: true,
        }
    }

    pub fn free(value: f32) -> Self {
        Self {
            value,
            clamped: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    pub fn set(&mut self, value: f32) {
        self.value = if self.clamped {
            value.clamp(0.0, 1.0)
        } else {
            value
        };
    }

    pub fn add(&mut self, delta: f32) {
        self.set(self.value + delta);
    }
}

/// An RGB text colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canvas fill style, e.g. `rgb(255, 0, 0)`.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Coord,
    pub size: Coord,
}

impl Rect {
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Coord::new(x, y),
            size: Coord::new(w, h),
        }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn center(&self) -> Coord {
        self.origin + self.size / 2.0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.origin.min(other.origin);
        let max = Coord::new(self.right(), self.bottom()).max(Coord::new(other.right(), other.bottom()));
        Rect {
            origin: min,
            size: max - min,
        }
    }
}

/// Which layer of the map a part lives on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartsType {
    #[default]
    Object,
    Map,
}

impl PartsType {
    pub fn from_map_flag(is_map: bool) -> Self {
        if is_map {
            PartsType::Map
        } else {
            PartsType::Object
        }
    }
}

/// Names a picture by the part number that authored it and the registry slot it occupies.
///
/// Pictures hold this instead of a reference to their owner; it is resolved
/// through the registry when needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PicturePointer {
    pub parts_number: i32,
    pub id: i32,
}

/// Which of the two crop origins a blinking picture shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationFrame {
    #[default]
    Primary,
    Secondary,
}

impl AnimationFrame {
    pub fn flipped(self) -> Self {
        match self {
            AnimationFrame::Primary => AnimationFrame::Secondary,
            AnimationFrame::Secondary => AnimationFrame::Primary,
        }
    }
}
