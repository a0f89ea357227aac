//! # Config Module
//!
//! Field dimensions and registry sizing shared by every picture.
//!
//! The defaults match the stock engine: 40px chips on an 11x11 field.

use crate::errors::PictureError;
use serde::{Deserialize, Serialize};

/// Timer ticks per second. Authoring durations (`time`, `time_anim`, `wait`)
/// are expressed in these units.
pub const TICKS_PER_SECOND: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Edge length of one map chip in pixels.
    pub chip_size: u32,
    /// Visible field width in chips.
    pub field_width: u32,
    /// Visible field height in chips.
    pub field_height: u32,
    /// Number of picture slots in a registry.
    pub capacity: usize,
    /// Timer ticks between flips of the primary/secondary image frame.
    pub blink_interval: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            chip_size: 40,
            field_width: 11,
            field_height: 11,
            capacity: 256,
            blink_interval: 5,
        }
    }
}

impl FieldConfig {
    /// Parses a (possibly partial) JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, PictureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn canvas_width(&self) -> u32 {
        self.chip_size * self.field_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.chip_size * self.field_height
    }

    pub fn chip(&self) -> f32 {
        self.chip_size as f32
    }
}
