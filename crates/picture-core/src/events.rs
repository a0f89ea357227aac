//! # Events Module
//!
//! Side effects a picture requests from the surrounding game. Pictures never
//! call into the game directly; they queue [`PictureEvent`]s which the owner
//! drains and forwards to a [`GameHost`].

use crate::types::{Coord, PartsType, PicturePointer};
use glam::IVec2;

/// Describes the part whose activation created a picture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartTrigger {
    pub parts_number: i32,
    pub parts_type: PartsType,
    /// Tile position of the triggering part.
    pub position: IVec2,
    /// Crop origin in the chip image, in tiles.
    pub image_crop: Coord,
    /// Second crop origin for two-frame blinking; `(0, 0)` disables blinking.
    pub second_image_crop: Coord,
    /// Sound played when the picture appears; `0` is silent.
    pub sound_number: u32,
    /// Ticks before the picture appears.
    pub wait_time: u32,
}

impl PartTrigger {
    pub fn new(parts_number: i32) -> Self {
        Self {
            parts_number,
            ..Default::default()
        }
    }
}

/// Request to make a part appear on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppearPart {
    pub parts_number: i32,
    pub parts_type: PartsType,
    /// Tile position of the part that triggered the picture.
    pub trigger_position: IVec2,
    /// Resolved tile position to place the part at.
    pub position: IVec2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PictureEvent {
    PlaySound(u32),
    /// Follow-up pictures to create once this one has timed out.
    SpawnNext(Vec<PicturePointer>),
    AppearPart(AppearPart),
}

/// Everything needed to construct a picture from a part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PictureSource {
    pub trigger: PartTrigger,
    pub lines: Vec<String>,
}

/// The game-side collaborator that carries out picture side effects.
pub trait GameHost {
    fn play_sound(&mut self, sound_number: u32);

    fn appear_part(&mut self, request: &AppearPart);

    /// Looks up the part a `next` pointer names. `None` skips the spawn.
    fn picture_source(&mut self, pointer: PicturePointer) -> Option<PictureSource>;
}
