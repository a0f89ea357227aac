//! # Picture Module
//!
//! A picture is a timed, animated overlay created from a block of macro lines.
//!
//! ## Responsibilities
//! - **Construction**: Parses every line into a [`Property`] and applies it.
//!   Any bad line rejects the whole block.
//! - **Lifecycle**: Display and animation [`TwoStageTimer`]s plus an optional
//!   wait timer, advanced by [`Picture::tick`].
//! - **Animation**: Installed generators run on [`Picture::update`] while the
//!   animation timer is active.
//! - **Geometry**: Tile layout, bounding box and crop rectangles for the renderer.

use crate::animation::{Animate, Generator, GeneratorKind, Geometry};
use crate::config::FieldConfig;
use crate::errors::{MacroError, PictureError};
use crate::events::{AppearPart, PartTrigger, PictureEvent};
use crate::macros::{PropertyMacro, RelativeValue};
use crate::property::{Acceleration, Font, Property, TextStyle, WaitSpec};
use crate::timer::{StageEvents, Timer, TwoStageTimer};
use crate::types::{Angle, AnimationFrame, Color, Coord, PicturePointer, Rect};
use glam::{IVec2, UVec2};
use tracing::{debug, instrument, warn};

/// Wait timer plus the part request it raises, resolved against the trigger.
#[derive(Clone, Debug)]
struct WaitState {
    request: AppearPart,
    timer: Timer,
}

#[derive(Clone, Debug)]
pub struct Picture {
    pointer: PicturePointer,
    trigger: PartTrigger,
    config: FieldConfig,
    geometry: Geometry,
    clip: Coord,
    repeat: UVec2,
    fill: bool,
    interval: Coord,
    shift: Coord,
    text: Option<TextStyle>,
    font: Font,
    color: Color,
    display: TwoStageTimer,
    animation: TwoStageTimer,
    wait: Option<WaitState>,
    next: Vec<PicturePointer>,
    generators: Vec<Generator>,
    visible: bool,
    timed_out: bool,
    events: Vec<PictureEvent>,
}

impl Picture {
    /// Builds a picture from an authoring block. Blank lines are skipped.
    #[instrument(level = "debug", skip(trigger, lines, config), fields(parts = trigger.parts_number))]
    pub fn new<S: AsRef<str>>(
        pointer: PicturePointer,
        trigger: PartTrigger,
        lines: &[S],
        config: FieldConfig,
    ) -> Result<Self, PictureError> {
        let mut picture = Self {
            pointer,
            display: TwoStageTimer::new(Timer::ticks(trigger.wait_time), None),
            trigger,
            config,
            geometry: Geometry::new(Coord::splat(config.chip())),
            clip: Coord::ONE,
            repeat: UVec2::ONE,
            fill: false,
            interval: Coord::ZERO,
            shift: Coord::ZERO,
            text: None,
            font: Font::default(),
            color: Color::BLACK,
            animation: TwoStageTimer::new(Timer::ticks(0), None),
            wait: None,
            next: Vec::new(),
            generators: Vec::new(),
            visible: false,
            timed_out: false,
            events: Vec::new(),
        };

        let mut accels = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let text = line.as_ref();
            if text.trim().is_empty() {
                continue;
            }
            PropertyMacro::parse(text)
                .and_then(|m| {
                    match Property::parse(&m)? {
                        Property::Accel(accel) => accels.push(accel),
                        other => picture.apply(other, &m)?,
                    }
                    Ok(())
                })
                .map_err(|source| PictureError::Macro {
                    line: index + 1,
                    text: text.to_string(),
                    source,
                })?;
        }

        // accel_* lines may precede their anim_* line
        for accel in &accels {
            picture.apply_accel(accel);
        }
        for generator in &picture.generators {
            if let Generator::Circular(orbit) = generator {
                orbit.place(&mut picture.geometry);
            }
        }

        debug!(
            id = pointer.id,
            generators = picture.generators.len(),
            "picture created"
        );
        Ok(picture)
    }

    /// `m` is the line `property` came from; relative values are resolved
    /// here so overflow is reported against its token.
    fn apply(&mut self, property: Property, m: &PropertyMacro) -> Result<(), MacroError> {
        match property {
            Property::Pos(pos) => self.geometry.set_pos(pos),
            Property::Time {
                duration,
                next_picture,
            } => {
                if next_picture != 0 {
                    warn!(next_picture, "single-id `time` follow-up is unsupported; use `next`");
                }
                self.display.set_duration(Some(Timer::ticks(duration)));
            }
            Property::TimeAnim { delay, duration } => {
                self.animation = TwoStageTimer::new(Timer::ticks(delay), Some(Timer::ticks(duration)));
            }
            Property::Wait(spec) => {
                self.wait = Some(WaitState {
                    timer: Timer::ticks(spec.duration),
                    request: self.resolve_wait(&spec, m)?,
                });
            }
            Property::Next(pointers) => {
                let own = self.pointer;
                self.next = pointers
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        Ok(PicturePointer {
                            parts_number: resolve(m, 2 * i, p.parts_number, own.parts_number)?,
                            id: resolve(m, 2 * i + 1, p.id, own.id)?,
                        })
                    })
                    .collect::<Result<_, MacroError>>()?;
            }
            Property::Size(size) => self.geometry.size = size,
            Property::Clip(clip) => self.clip = clip,
            Property::Angle(degree) => self.geometry.angle.set(degree),
            Property::Repeat { count, fill } => {
                self.repeat = count;
                self.fill |= fill;
            }
            Property::Fill(fill) => self.fill |= fill,
            Property::Interval { gap, shift } => {
                self.interval = gap;
                self.shift = shift;
            }
            Property::Opacity(value) => self.geometry.opacity.set(value),
            Property::Text(text) => self.text = Some(text),
            Property::Font(font) => self.font = font,
            Property::Color(color) => self.color = color,
            Property::Animation(generator) => self.install(generator),
            Property::Accel(accel) => self.apply_accel(&accel),
        }
        Ok(())
    }

    fn resolve_wait(&self, spec: &WaitSpec, m: &PropertyMacro) -> Result<AppearPart, MacroError> {
        let origin = self.trigger.position;
        Ok(AppearPart {
            parts_number: resolve(m, 1, spec.parts_number, self.trigger.parts_number)?,
            parts_type: spec.parts_type,
            trigger_position: origin,
            position: IVec2::new(
                resolve(m, 2, spec.x, origin.x)?,
                resolve(m, 3, spec.y, origin.y)?,
            ),
        })
    }

    /// Replaces a generator of the same kind in place, otherwise appends.
    fn install(&mut self, generator: Generator) {
        let kind = generator.kind();
        match self.generators.iter_mut().find(|g| g.kind() == kind) {
            Some(slot) => *slot = generator,
            None => self.generators.push(generator),
        }
    }

    fn apply_accel(&mut self, accel: &Acceleration) {
        let applied = self
            .generators
            .iter_mut()
            .any(|g| g.set_accel(accel));
        if !applied {
            debug!(kind = ?accel.kind(), "acceleration without matching animation ignored");
        }
    }

    // --- Lifecycle ---

    /// Arms the display timer (and the wait timer, if any). A picture that is
    /// already visible also restarts its animation timer.
    pub fn start(&mut self) {
        let was_visible = self.visible;
        self.timed_out = false;
        let events = self.display.start();
        self.on_display(events);
        if was_visible && !events.began {
            let events = self.animation.start();
            self.on_animation(events);
        }
        if let Some(wait) = &mut self.wait {
            if wait.timer.start() {
                self.finish_wait();
            }
        }
    }

    /// Cancels every timer without firing any transition.
    pub fn stop(&mut self) {
        self.display.stop();
        self.animation.stop();
        if let Some(wait) = &mut self.wait {
            wait.timer.stop();
        }
    }

    /// Advances the lifecycle timers by one tick.
    pub fn tick(&mut self) {
        let events = self.animation.tick();
        self.on_animation(events);
        let events = self.display.tick();
        self.on_display(events);
        let expired = self.wait.as_mut().is_some_and(|w| w.timer.tick());
        if expired {
            self.finish_wait();
        }
    }

    /// Runs every generator once, in installation order, while animating.
    pub fn update(&mut self) {
        if !self.is_animating() {
            return;
        }
        for generator in &mut self.generators {
            generator.update(&mut self.geometry);
        }
    }

    fn on_display(&mut self, events: StageEvents) {
        if events.began {
            self.visible = true;
            debug!(id = self.pointer.id, "picture visible");
            if self.trigger.sound_number != 0 {
                self.events
                    .push(PictureEvent::PlaySound(self.trigger.sound_number));
            }
            let anim = self.animation.start();
            self.on_animation(anim);
        }
        if events.ended {
            self.visible = false;
            self.timed_out = true;
            debug!(id = self.pointer.id, "picture timed out");
            if !self.next.is_empty() {
                self.events.push(PictureEvent::SpawnNext(self.next.clone()));
            }
        }
    }

    fn on_animation(&mut self, events: StageEvents) {
        if events.began {
            debug!(id = self.pointer.id, "animation started");
        }
        if events.ended {
            debug!(id = self.pointer.id, "animation stopped");
        }
    }

    fn finish_wait(&mut self) {
        let Some(wait) = &self.wait else {
            return;
        };
        let request = wait.request;
        debug!(id = self.pointer.id, parts = request.parts_number, "wait finished");
        if request.parts_number != 0 {
            self.events.push(PictureEvent::AppearPart(request));
        }
    }

    /// Drains queued side effects.
    pub fn take_events(&mut self) -> Vec<PictureEvent> {
        std::mem::take(&mut self.events)
    }

    /// `next` pointers resolved against this picture's own identity.
    pub fn next_pointers(&self) -> &[PicturePointer] {
        &self.next
    }

    // --- State ---

    pub fn pointer(&self) -> PicturePointer {
        self.pointer
    }

    pub fn trigger(&self) -> &PartTrigger {
        &self.trigger
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_active()
    }

    pub fn is_waiting(&self) -> bool {
        self.wait.as_ref().is_some_and(|w| w.timer.is_running())
    }

    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    pub fn generator_kinds(&self) -> Vec<GeneratorKind> {
        self.generators.iter().map(Generator::kind).collect()
    }

    pub fn sound_number(&self) -> u32 {
        self.trigger.sound_number
    }

    // --- Geometry ---

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn pos(&self) -> Coord {
        self.geometry.pos
    }

    pub fn base_pos(&self) -> Coord {
        self.geometry.base_pos
    }

    pub fn size(&self) -> Coord {
        self.geometry.size
    }

    pub fn angle(&self) -> Angle {
        self.geometry.angle
    }

    pub fn has_angle(&self) -> bool {
        self.geometry.angle.degree() != 0.0
    }

    pub fn opacity(&self) -> f32 {
        self.geometry.opacity.value()
    }

    /// Crop size in tiles.
    pub fn crop_size(&self) -> Coord {
        self.clip
    }

    pub fn is_fill(&self) -> bool {
        self.fill
    }

    /// Tile counts. Fill mode covers the field plus one extra tile per axis,
    /// since tiling starts up to one tile off-screen.
    pub fn repeat(&self) -> UVec2 {
        if self.fill {
            UVec2::new(self.config.field_width + 1, self.config.field_height + 1)
        } else {
            self.repeat
        }
    }

    pub fn interval(&self) -> Coord {
        self.interval
    }

    pub fn shift(&self) -> Coord {
        self.shift
    }

    /// Distance between neighbouring tile origins.
    pub fn chip_size(&self) -> Coord {
        self.geometry.size + self.interval
    }

    /// Top-left tile origin in fill mode: `(pos mod chip) - chip`, so tiling
    /// always begins off-screen and covers the canvas.
    pub fn fill_start_pos(&self) -> Coord {
        let chip = self.chip_size();
        let pos = self.geometry.pos;
        let axis = |p: f32, c: f32| if c > 0.0 { p.rem_euclid(c) - c } else { p };
        Coord::new(axis(pos.x, chip.x), axis(pos.y, chip.y))
    }

    /// Origin of the first tile.
    pub fn tile_origin(&self) -> Coord {
        if self.fill {
            self.fill_start_pos()
        } else {
            self.geometry.pos
        }
    }

    /// Destination origin of every tile, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        let repeat = self.repeat();
        let origin = self.tile_origin();
        let chip = self.chip_size();
        let shift = self.shift;
        (0..repeat.y).flat_map(move |row| {
            (0..repeat.x).map(move |col| {
                let (c, r) = (col as f32, row as f32);
                origin + Coord::new(c * chip.x + r * shift.x, r * chip.y + c * shift.y)
            })
        })
    }

    /// Lowest and highest tile origin offsets from `pos`, per axis. `None`
    /// when a repeat count is zero. Either pitch may be negative.
    fn tile_extent(&self) -> Option<(Coord, Coord)> {
        let repeat = self.repeat;
        if repeat.x == 0 || repeat.y == 0 {
            return None;
        }
        let last_col = (repeat.x - 1) as f32;
        let last_row = (repeat.y - 1) as f32;
        let chip = self.chip_size();
        let col = Coord::new(last_col * chip.x, last_col * self.shift.y);
        let row = Coord::new(last_row * self.shift.x, last_row * chip.y);
        let min = col.min(Coord::ZERO) + row.min(Coord::ZERO);
        let max = col.max(Coord::ZERO) + row.max(Coord::ZERO);
        Some((min, max))
    }

    pub fn width(&self) -> f32 {
        if self.fill {
            return self.config.canvas_width() as f32;
        }
        self.tile_extent()
            .map_or(0.0, |(min, max)| max.x - min.x + self.geometry.size.x)
    }

    pub fn height(&self) -> f32 {
        if self.fill {
            return self.config.canvas_height() as f32;
        }
        self.tile_extent()
            .map_or(0.0, |(min, max)| max.y - min.y + self.geometry.size.y)
    }

    /// Union of all tile rectangles; the whole canvas in fill mode.
    pub fn bounding_box(&self) -> Rect {
        if self.fill {
            return Rect::from_xywh(0.0, 0.0, self.width(), self.height());
        }
        let min = self.tile_extent().map_or(Coord::ZERO, |(min, _)| min);
        Rect {
            origin: self.geometry.pos + min,
            size: Coord::new(self.width(), self.height()),
        }
    }

    pub fn has_secondary_image(&self) -> bool {
        self.trigger.second_image_crop != Coord::ZERO
    }

    /// Crop origin in tiles for the given shared frame.
    pub fn image_crop(&self, frame: AnimationFrame) -> Coord {
        if self.has_secondary_image() && frame == AnimationFrame::Secondary {
            self.trigger.second_image_crop
        } else {
            self.trigger.image_crop
        }
    }

    /// Source rectangle in the chip image, in pixels.
    pub fn crop_rect(&self, frame: AnimationFrame) -> Rect {
        let chip = self.config.chip();
        let origin = self.image_crop(frame) * chip;
        let size = self.clip * chip;
        Rect::from_xywh(origin.x, origin.y, size.x, size.y)
    }

    pub fn text(&self) -> Option<&TextStyle> {
        self.text.as_ref()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

fn resolve(m: &PropertyMacro, index: usize, value: RelativeValue, base: i32) -> Result<i32, MacroError> {
    value.resolve(base).ok_or_else(|| m.resolve_error(index))
}
