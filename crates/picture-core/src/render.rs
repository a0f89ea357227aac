//! # Render Adapter
//!
//! Turns a [`Picture`] into draw calls against a backend-neutral
//! [`DrawSurface`]. The surface only needs cropped blits, a rotation about a
//! point, a global alpha and text output.

use crate::picture::Picture;
use crate::property::{Font, TextStyle};
use crate::registry::PictureRegistry;
use crate::types::{AnimationFrame, Color, Coord, Rect};

pub trait DrawSurface {
    fn save(&mut self);

    fn restore(&mut self);

    /// Rotates subsequent drawing by `radians` about `center`.
    fn rotate_about(&mut self, center: Coord, radians: f32);

    fn set_alpha(&mut self, alpha: f32);

    /// Copies `src` from the chip image into `dst`, scaling as needed.
    fn blit(&mut self, src: Rect, dst: Rect);

    fn fill_text(&mut self, text: &TextStyle, font: &Font, color: Color, at: Coord);
}

/// Screen boundary a tile is cut against while the field scrolls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalClip {
    /// Nothing below `y` is drawn.
    Upper(f32),
    /// Nothing above `y` is drawn.
    Lower(f32),
}

/// Cuts a blit against `clip`, trimming source and destination proportionally.
/// Returns `None` when nothing of the tile remains.
pub fn clip_tile(src: Rect, dst: Rect, clip: VerticalClip) -> Option<(Rect, Rect)> {
    if dst.size.y <= 0.0 {
        return None;
    }
    let scale = src.size.y / dst.size.y;
    let (cut_top, cut_bottom) = match clip {
        VerticalClip::Upper(limit) => (0.0, (dst.bottom() - limit).max(0.0)),
        VerticalClip::Lower(limit) => ((limit - dst.top()).max(0.0), 0.0),
    };
    let kept = dst.size.y - cut_top - cut_bottom;
    if kept <= 0.0 {
        return None;
    }
    let src = Rect::from_xywh(
        src.left(),
        src.top() + cut_top * scale,
        src.size.x,
        kept * scale,
    );
    let dst = Rect::from_xywh(dst.left(), dst.top() + cut_top, dst.size.x, kept);
    Some((src, dst))
}

/// Draws every tile of `picture` and then its text, if any.
///
/// Rotation is applied about the centre of the picture's bounding box.
pub fn draw_picture<S: DrawSurface>(
    picture: &Picture,
    frame: AnimationFrame,
    surface: &mut S,
    clip: Option<VerticalClip>,
) {
    surface.save();
    if picture.has_angle() {
        surface.rotate_about(picture.bounding_box().center(), picture.angle().rad());
    }
    surface.set_alpha(picture.opacity());

    let src = picture.crop_rect(frame);
    let size = picture.size();
    for origin in picture.tiles() {
        let dst = Rect { origin, size };
        match clip {
            Some(clip) => {
                if let Some((src, dst)) = clip_tile(src, dst, clip) {
                    surface.blit(src, dst);
                }
            }
            None => surface.blit(src, dst),
        }
    }

    if let Some(text) = picture.text() {
        surface.fill_text(text, picture.font(), picture.color(), picture.pos());
    }
    surface.restore();
}

/// Draws the visible pictures of `registry` in slot order using its shared frame.
pub fn draw_registry<S: DrawSurface>(
    registry: &PictureRegistry,
    surface: &mut S,
    clip: Option<VerticalClip>,
) {
    let frame = registry.frame();
    for (_, picture) in registry.visible() {
        draw_picture(picture, frame, surface, clip);
    }
}
