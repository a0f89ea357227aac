//! # Registry Module
//!
//! Fixed-capacity slot arena owning every live [`Picture`].
//!
//! ## Responsibilities
//! - **Slots**: Caller-assigned ids in `[0, capacity)`; bad ids are errors.
//! - **Broadcast**: `start_all`, `stop_all`, `tick_all` and `update_all` visit
//!   occupied slots in ascending id order.
//! - **Frame Toggle**: Owns the shared primary/secondary blink frame.
//! - **Events**: Drains picture outboxes and forwards them to a [`GameHost`].

use crate::config::FieldConfig;
use crate::errors::PictureError;
use crate::events::{GameHost, PartTrigger, PictureEvent};
use crate::picture::Picture;
use crate::types::{AnimationFrame, PicturePointer};
use tracing::{debug, instrument, warn};

/// Flips the shared [`AnimationFrame`] every `interval` timer ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameToggle {
    frame: AnimationFrame,
    interval: u32,
    counter: u32,
}

impl FrameToggle {
    /// An interval of `0` never flips.
    pub fn new(interval: u32) -> Self {
        Self {
            frame: AnimationFrame::Primary,
            interval,
            counter: 0,
        }
    }

    pub fn frame(&self) -> AnimationFrame {
        self.frame
    }

    /// Returns `true` when the frame flipped on this tick.
    pub fn tick(&mut self) -> bool {
        if self.interval == 0 {
            return false;
        }
        self.counter += 1;
        if self.counter < self.interval {
            return false;
        }
        self.counter = 0;
        self.frame = self.frame.flipped();
        true
    }
}

pub struct PictureRegistry {
    config: FieldConfig,
    slots: Vec<Option<Picture>>,
    frame: FrameToggle,
}

impl PictureRegistry {
    pub fn new(config: FieldConfig) -> Self {
        let mut slots = Vec::with_capacity(config.capacity);
        slots.resize_with(config.capacity, || None);
        Self {
            config,
            slots,
            frame: FrameToggle::new(config.blink_interval),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn check(&self, id: usize) -> Result<(), PictureError> {
        if id < self.slots.len() {
            Ok(())
        } else {
            Err(PictureError::SlotOutOfRange {
                id: id as i64,
                capacity: self.slots.len(),
            })
        }
    }

    /// Builds a picture in slot `id`, replacing any previous occupant.
    /// The picture's pointer is `(trigger.parts_number, id)`.
    #[instrument(level = "debug", skip(self, trigger, lines), fields(parts = trigger.parts_number))]
    pub fn create<S: AsRef<str>>(
        &mut self,
        id: usize,
        trigger: PartTrigger,
        lines: &[S],
    ) -> Result<&mut Picture, PictureError> {
        self.check(id)?;
        let pointer = PicturePointer {
            parts_number: trigger.parts_number,
            id: i32::try_from(id).map_err(|_| PictureError::SlotOutOfRange {
                id: id as i64,
                capacity: self.slots.len(),
            })?,
        };
        let picture = Picture::new(pointer, trigger, lines, self.config)?;
        self.insert(id, picture)
    }

    /// Places an already-built picture in slot `id`.
    pub fn insert(&mut self, id: usize, picture: Picture) -> Result<&mut Picture, PictureError> {
        self.check(id)?;
        let slot = &mut self.slots[id];
        if slot.is_some() {
            debug!(id, "replacing picture");
        }
        Ok(slot.insert(picture))
    }

    /// Clears slot `id` and returns its picture.
    pub fn remove(&mut self, id: usize) -> Result<Picture, PictureError> {
        self.check(id)?;
        let picture = self.slots[id].take().ok_or(PictureError::EmptySlot(id))?;
        debug!(id, "picture removed");
        Ok(picture)
    }

    pub fn get(&self, id: usize) -> Result<&Picture, PictureError> {
        self.check(id)?;
        self.slots[id].as_ref().ok_or(PictureError::EmptySlot(id))
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut Picture, PictureError> {
        self.check(id)?;
        self.slots[id].as_mut().ok_or(PictureError::EmptySlot(id))
    }

    /// Probe that never fails; out-of-range ids are reported as empty.
    pub fn is_empty(&self, id: usize) -> bool {
        !matches!(self.slots.get(id), Some(Some(_)))
    }

    pub fn start(&mut self, id: usize) -> Result<(), PictureError> {
        self.get_mut(id)?.start();
        Ok(())
    }

    pub fn stop(&mut self, id: usize) -> Result<(), PictureError> {
        self.get_mut(id)?.stop();
        Ok(())
    }

    pub fn start_all(&mut self) {
        self.pictures_mut().for_each(Picture::start);
    }

    pub fn stop_all(&mut self) {
        self.pictures_mut().for_each(Picture::stop);
    }

    /// Timer cadence: flips the blink frame on schedule, then ticks every picture.
    pub fn tick_all(&mut self) {
        self.frame.tick();
        self.pictures_mut().for_each(Picture::tick);
    }

    /// Animation cadence: runs every picture's generators once.
    pub fn update_all(&mut self) {
        self.pictures_mut().for_each(Picture::update);
    }

    pub fn frame(&self) -> AnimationFrame {
        self.frame.frame()
    }

    /// Occupied slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Picture)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|p| (id, p)))
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &Picture)> {
        self.iter().filter(|(_, p)| p.is_visible())
    }

    fn pictures_mut(&mut self) -> impl Iterator<Item = &mut Picture> {
        self.slots.iter_mut().flatten()
    }

    /// Collects queued events from every picture, in slot order.
    pub fn drain_events(&mut self) -> Vec<(usize, PictureEvent)> {
        let mut drained = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if let Some(picture) = slot {
                drained.extend(picture.take_events().into_iter().map(|e| (id, e)));
            }
        }
        drained
    }

    /// Drains pending events and carries them out through `host`.
    ///
    /// `SpawnNext` creates and starts each follow-up picture the host can
    /// resolve. Events raised by those new pictures stay queued for the next call.
    ///
    /// Every drained event is handled even if a spawn fails; the first
    /// failure is returned once the batch is done.
    pub fn dispatch<H: GameHost>(&mut self, host: &mut H) -> Result<(), PictureError> {
        let mut first_error = None;
        for (id, event) in self.drain_events() {
            match event {
                PictureEvent::PlaySound(sound) => host.play_sound(sound),
                PictureEvent::AppearPart(request) => host.appear_part(&request),
                PictureEvent::SpawnNext(pointers) => {
                    for pointer in pointers {
                        if let Err(err) = self.spawn(host, pointer) {
                            warn!(id, ?pointer, error = %err, "follow-up picture not spawned");
                            first_error.get_or_insert(err);
                        }
                    }
                    debug!(id, "follow-up pictures spawned");
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn spawn<H: GameHost>(&mut self, host: &mut H, pointer: PicturePointer) -> Result<(), PictureError> {
        let slot = usize::try_from(pointer.id).map_err(|_| PictureError::SlotOutOfRange {
            id: pointer.id as i64,
            capacity: self.slots.len(),
        })?;
        self.check(slot)?;
        let Some(source) = host.picture_source(pointer) else {
            debug!(?pointer, "no picture source for follow-up");
            return Ok(());
        };
        let picture = Picture::new(pointer, source.trigger, source.lines.as_slice(), self.config)?;
        self.insert(slot, picture)?.start();
        Ok(())
    }
}

impl Default for PictureRegistry {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}
