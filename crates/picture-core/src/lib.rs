//! # Picture Core
//!
//! `picture-core` implements timed, animated picture overlays for a tile-based
//! 2D adventure engine. Pictures are authored as blocks of `name=value` macro
//! lines attached to map parts, and are driven by a fixed-cadence game loop.
//!
//! ## Core Features
//!
//! *   **Macro Parsing**: Line grammar with quoted strings and relative (`+n`/`-n`) values.
//! *   **Typed Properties**: Every macro name maps to one [`Property`] variant.
//! *   **Timers**: Tick-driven countdowns and two-stage delay/duration timers.
//! *   **Animation**: Straight, circular, zoom, rotate and fade generators with acceleration.
//! *   **Registry**: Fixed-capacity slot arena with ordered broadcast and a shared blink frame.
//! *   **Rendering**: Backend-neutral tile loop over a [`render::DrawSurface`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use picture_core::{FieldConfig, PartTrigger, PictureRegistry};
//!
//! let mut registry = PictureRegistry::new(FieldConfig::default());
//! registry
//!     .create(0, PartTrigger::new(12), &["pos=40,40", "time=20", "anim_rotate=5"])
//!     .unwrap();
//! registry.start_all();
//!
//! // Once per timer tick (10/s):
//! registry.tick_all();
//! // Once per animation frame:
//! registry.update_all();
//! ```

/// Animation generators and the geometry they mutate.
pub mod animation;

/// Field dimensions and registry sizing.
pub mod config;

pub mod errors;

/// Side effects requested by pictures and the host trait that performs them.
pub mod events;

/// `name=value,...` line parsing.
pub mod macros;

/// The picture entity.
pub mod picture;

/// Typed property macros.
pub mod property;

/// Slot arena of live pictures.
pub mod registry;

/// Draw-call adapter for rendering backends.
pub mod render;

pub mod timer;

/// Shared value types.
pub mod types;

pub use config::FieldConfig;
pub use errors::{MacroError, PictureError};
pub use events::{AppearPart, GameHost, PartTrigger, PictureEvent, PictureSource};
pub use macros::{PropertyMacro, RelativeValue};
pub use picture::Picture;
pub use property::Property;
pub use registry::{FrameToggle, PictureRegistry};
pub use types::{AnimationFrame, Coord, PicturePointer};
