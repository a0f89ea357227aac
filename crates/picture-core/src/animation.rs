//! # Animation Generators
//!
//! Per-frame mutators of a picture's [`Geometry`]. Every generator applies
//! its current delta to the target exactly once per [`update`](Animate::update)
//! and then steps the delta by its acceleration.
//!
//! ## Key Types
//! - `Geometry`: The mutable placement state a generator writes to.
//! - `Generator`: Closed set of generators (straight, circular, zoom, rotate, fade).

use crate::property::Acceleration;
use crate::types::{Angle, Coord, Rate};

/// Placement state of a picture.
///
/// `base_pos` is the anchor moved by straight-line translation; `pos` is where
/// the picture is actually drawn. Orbiting writes `pos` without touching the base.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub base_pos: Coord,
    pub pos: Coord,
    pub size: Coord,
    pub angle: Angle,
    pub opacity: Rate,
}

impl Geometry {
    pub fn new(size: Coord) -> Self {
        Self {
            base_pos: Coord::ZERO,
            pos: Coord::ZERO,
            size,
            angle: Angle::default(),
            opacity: Rate::clamped(1.0),
        }
    }

    /// Places both anchors at `pos`.
    pub fn set_pos(&mut self, pos: Coord) {
        self.base_pos = pos;
        self.pos = pos;
    }

    pub fn translate_base(&mut self, delta: Coord) {
        self.base_pos += delta;
        self.pos = self.base_pos;
    }

    pub fn jump_transient(&mut self, to: Coord) {
        self.pos = to;
    }

    /// Grows by `delta` while keeping the centre in place.
    pub fn resize_around_center(&mut self, delta: Coord) {
        self.size += delta;
        self.pos -= delta / 2.0;
    }

    pub fn rotate(&mut self, degree: f32) {
        self.angle.rotate(degree);
    }

    pub fn fade(&mut self, delta: f32) {
        self.opacity.add(delta);
    }
}

/// Identifies a generator slot; a picture holds at most one generator per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Straight,
    Circular,
    Zoom,
    Rotate,
    Fade,
}

pub trait Animate {
    /// Applies one frame of motion to `target`, then accelerates.
    fn update(&mut self, target: &mut Geometry);
}

/// Linear translation of the base position.
#[derive(Clone, Debug, PartialEq)]
pub struct Straight {
    pub velocity: Coord,
    pub accel: Coord,
}

impl Straight {
    pub fn new(velocity: Coord) -> Self {
        Self {
            velocity,
            accel: Coord::ZERO,
        }
    }
}

impl Animate for Straight {
    fn update(&mut self, target: &mut Geometry) {
        target.translate_base(self.velocity);
        self.velocity += self.accel;
    }
}

/// Orbit around the base position.
#[derive(Clone, Debug, PartialEq)]
pub struct Circular {
    pub angle: Angle,
    /// Degrees advanced per frame.
    pub speed: f32,
    /// Orbit radius in pixels.
    pub round: f32,
    pub speed_accel: f32,
    pub round_accel: f32,
}

impl Circular {
    pub fn new(round: f32, speed: f32, start_angle: f32) -> Self {
        Self {
            angle: Angle::new(start_angle),
            speed,
            round,
            speed_accel: 0.0,
            round_accel: 0.0,
        }
    }

    /// Offset from the base position at the current angle, floored to whole pixels.
    pub fn offset(&self) -> Coord {
        // f64 trig keeps cos(90deg) on the positive side of zero before flooring
        let rad = (self.angle.degree() as f64).to_radians();
        let round = self.round as f64;
        Coord::new(
            (rad.cos() * round).floor() as f32,
            (rad.sin() * round).floor() as f32,
        )
    }

    /// Moves the transient position onto the orbit without advancing the angle.
    pub fn place(&self, target: &mut Geometry) {
        target.jump_transient(target.base_pos + self.offset());
    }
}

impl Animate for Circular {
    fn update(&mut self, target: &mut Geometry) {
        self.place(target);
        self.angle.rotate(self.speed);
        self.speed += self.speed_accel;
        self.round += self.round_accel;
    }
}

/// Resize around the centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Zoom {
    pub delta: Coord,
    pub accel: Coord,
}

impl Zoom {
    pub fn new(delta: Coord) -> Self {
        Self {
            delta,
            accel: Coord::ZERO,
        }
    }
}

impl Animate for Zoom {
    fn update(&mut self, target: &mut Geometry) {
        target.resize_around_center(self.delta);
        self.delta += self.accel;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rotate {
    pub degree: f32,
    pub accel: f32,
}

impl Rotate {
    pub fn new(degree: f32) -> Self {
        Self { degree, accel: 0.0 }
    }
}

impl Animate for Rotate {
    fn update(&mut self, target: &mut Geometry) {
        target.rotate(self.degree);
        self.degree += self.accel;
    }
}

/// Opacity drift. The delta itself is free-running; the target opacity clamps.
#[derive(Clone, Debug, PartialEq)]
pub struct Fade {
    pub delta: Rate,
    pub accel: f32,
}

impl Fade {
    pub fn new(delta: f32) -> Self {
        Self {
            delta: Rate::free(delta),
            accel: 0.0,
        }
    }
}

impl Animate for Fade {
    fn update(&mut self, target: &mut Geometry) {
        target.fade(self.delta.value());
        self.delta.add(self.accel);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Generator {
    Straight(Straight),
    Circular(Circular),
    Zoom(Zoom),
    Rotate(Rotate),
    Fade(Fade),
}

impl Generator {
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Generator::Straight(_) => GeneratorKind::Straight,
            Generator::Circular(_) => GeneratorKind::Circular,
            Generator::Zoom(_) => GeneratorKind::Zoom,
            Generator::Rotate(_) => GeneratorKind::Rotate,
            Generator::Fade(_) => GeneratorKind::Fade,
        }
    }

    /// Installs `accel` if it targets this generator's kind. Returns whether it applied.
    pub fn set_accel(&mut self, accel: &Acceleration) -> bool {
        match (self, accel) {
            (Generator::Straight(g), Acceleration::Straight(a)) => g.accel = *a,
            (Generator::Circular(g), Acceleration::Circular { round, speed }) => {
                g.round_accel = *round;
                g.speed_accel = *speed;
            }
            (Generator::Zoom(g), Acceleration::Zoom(a)) => g.accel = *a,
            (Generator::Rotate(g), Acceleration::Rotate(a)) => g.accel = *a,
            (Generator::Fade(g), Acceleration::Fade(a)) => g.accel = *a,
            _ => return false,
        }
        true
    }
}

impl Animate for Generator {
    fn update(&mut self, target: &mut Geometry) {
        match self {
            Generator::Straight(g) => g.update(target),
            Generator::Circular(g) => g.update(target),
            Generator::Zoom(g) => g.update(target),
            Generator::Rotate(g) => g.update(target),
            Generator::Fade(g) => g.update(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_at(x: f32, y: f32) -> Geometry {
        let mut g = Geometry::new(Coord::new(16.0, 16.0));
        g.set_pos(Coord::new(x, y));
        g
    }

    #[test]
    fn test_straight_accelerates_after_use() {
        let mut target = geometry_at(0.0, 0.0);
        let mut gen = Straight::new(Coord::new(1.0, 0.0));
        gen.accel = Coord::new(1.0, 2.0);
        gen.update(&mut target);
        assert_eq!(target.base_pos, Coord::new(1.0, 0.0));
        gen.update(&mut target);
        assert_eq!(target.base_pos, Coord::new(3.0, 2.0));
        assert_eq!(target.pos, target.base_pos);
    }

    #[test]
    fn test_zoom_recenters() {
        let mut target = geometry_at(10.0, 10.0);
        Zoom::new(Coord::new(4.0, 2.0)).update(&mut target);
        assert_eq!(target.size, Coord::new(20.0, 18.0));
        assert_eq!(target.pos, Coord::new(8.0, 9.0));
        assert_eq!(target.base_pos, Coord::new(10.0, 10.0));
    }

    #[test]
    fn test_circular_keeps_radius_and_base() {
        let mut target = geometry_at(100.0, 100.0);
        let mut gen = Circular::new(50.0, 30.0, 15.0);
        for k in 1..=20 {
            gen.update(&mut target);
            let distance = target.pos.distance(target.base_pos);
            assert!((distance - 50.0).abs() <= 1.5, "distance {} at step {}", distance, k);
            let expected = (15.0 + k as f32 * 30.0).rem_euclid(360.0);
            assert!((gen.angle.degree() - expected).abs() < 1e-3);
        }
        assert_eq!(target.base_pos, Coord::new(100.0, 100.0));
    }

    #[test]
    fn test_circular_quarter_turn_offsets() {
        let mut gen = Circular::new(10.0, 90.0, 0.0);
        let mut target = geometry_at(0.0, 0.0);
        gen.update(&mut target);
        assert_eq!(target.pos, Coord::new(10.0, 0.0));
        gen.update(&mut target);
        assert_eq!(target.pos, Coord::new(0.0, 10.0));
    }

    #[test]
    fn test_rotate_and_fade() {
        let mut target = geometry_at(0.0, 0.0);
        let mut rotate = Rotate::new(350.0);
        rotate.accel = -20.0;
        rotate.update(&mut target);
        rotate.update(&mut target);
        // 350 + 330 wraps to 320
        assert!((target.angle.degree() - 320.0).abs() < 1e-3);

        target.opacity.set(0.5);
        let mut fade = Fade::new(-0.3);
        fade.update(&mut target);
        fade.update(&mut target);
        assert_eq!(target.opacity.value(), 0.0);
    }

    #[test]
    fn test_accel_kind_mismatch_is_ignored() {
        let mut gen = Generator::Rotate(Rotate::new(1.0));
        assert!(!gen.set_accel(&Acceleration::Fade(0.1)));
        assert!(gen.set_accel(&Acceleration::Rotate(2.0)));
        assert_eq!(gen, Generator::Rotate(Rotate { degree: 1.0, accel: 2.0 }));
    }
}
