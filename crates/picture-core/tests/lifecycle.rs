//! Picture lifecycle scenarios driven through the registry and a mock host.

use anyhow::Result;
use glam::IVec2;
use picture_core::{
    AppearPart, FieldConfig, GameHost, PartTrigger, PictureError, PicturePointer, PictureRegistry,
    PictureSource,
};
use picture_core::types::PartsType;
use std::collections::HashMap;

#[derive(Default)]
struct MockHost {
    sounds: Vec<u32>,
    appeared: Vec<AppearPart>,
    requested: Vec<PicturePointer>,
    sources: HashMap<i32, Vec<String>>,
}

impl MockHost {
    fn with_source(mut self, parts_number: i32, lines: &[&str]) -> Self {
        self.sources
            .insert(parts_number, lines.iter().map(|l| l.to_string()).collect());
        self
    }
}

impl GameHost for MockHost {
    fn play_sound(&mut self, sound_number: u32) {
        self.sounds.push(sound_number);
    }

    fn appear_part(&mut self, request: &AppearPart) {
        self.appeared.push(*request);
    }

    fn picture_source(&mut self, pointer: PicturePointer) -> Option<PictureSource> {
        self.requested.push(pointer);
        let lines = self.sources.get(&pointer.parts_number)?.clone();
        Some(PictureSource {
            trigger: PartTrigger::new(pointer.parts_number),
            lines,
        })
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn registry() -> PictureRegistry {
    PictureRegistry::new(FieldConfig {
        capacity: 8,
        ..Default::default()
    })
}

/// `time=20,0` is visible immediately and times out on exactly the 20th tick.
#[test]
fn display_times_out_on_twentieth_tick() -> Result<()> {
    init_tracing();
    let mut registry = registry();
    registry.create(0, PartTrigger::new(3), &["pos=0,0", "time=20,0"])?;
    registry.start(0)?;
    assert!(registry.get(0)?.is_visible());

    for tick in 1..=20 {
        registry.tick_all();
        let picture = registry.get(0)?;
        if tick < 20 {
            assert!(picture.is_visible(), "hidden early at tick {}", tick);
            assert!(!picture.is_timed_out());
        } else {
            assert!(!picture.is_visible());
            assert!(picture.is_timed_out());
        }
    }
    Ok(())
}

/// `next=+1,+0` on `(5, 2)` spawns `(6, 2)` once the display ends.
#[test]
fn next_spawns_relative_pointer() -> Result<()> {
    init_tracing();
    let mut registry = registry();
    let mut host = MockHost::default().with_source(6, &["pos=8,8", "time=5"]);

    registry.create(2, PartTrigger::new(5), &["time=3", "next=+1,+0"])?;
    registry.start(2)?;
    for _ in 0..3 {
        registry.tick_all();
    }
    registry.dispatch(&mut host)?;

    assert_eq!(host.requested, vec![PicturePointer { parts_number: 6, id: 2 }]);
    let spawned = registry.get(2)?;
    assert_eq!(spawned.pointer(), PicturePointer { parts_number: 6, id: 2 });
    assert!(spawned.is_visible());
    assert_eq!(spawned.pos().x, 8.0);
    Ok(())
}

#[test]
fn next_lists_spawn_in_order_and_skip_unknown_parts() -> Result<()> {
    let mut registry = registry();
    let mut host = MockHost::default()
        .with_source(11, &["pos=1,1"])
        .with_source(12, &["pos=2,2"]);

    registry.create(0, PartTrigger::new(10), &["time=1", "next=+1,+1,+2,+2,99,3"])?;
    registry.start(0)?;
    registry.tick_all();
    registry.dispatch(&mut host)?;

    assert_eq!(
        host.requested,
        vec![
            PicturePointer { parts_number: 11, id: 1 },
            PicturePointer { parts_number: 12, id: 2 },
            PicturePointer { parts_number: 99, id: 3 },
        ]
    );
    assert!(!registry.is_empty(1));
    assert!(!registry.is_empty(2));
    assert!(registry.is_empty(3));
    Ok(())
}

#[test]
fn next_outside_registry_is_an_error() -> Result<()> {
    let mut registry = registry();
    let mut host = MockHost::default();
    registry.create(0, PartTrigger::new(1), &["time=1", "next=+0,-1"])?;
    registry.start(0)?;
    registry.tick_all();

    let err = registry.dispatch(&mut host).unwrap_err();
    assert!(matches!(err, PictureError::SlotOutOfRange { id: -1, capacity: 8 }));
    Ok(())
}

#[test]
fn failed_spawn_does_not_swallow_other_events() -> Result<()> {
    let mut registry = registry();
    let mut host = MockHost::default().with_source(2, &["pos=4,4"]);
    registry.create(0, PartTrigger::new(1), &["time=1", "next=+0,-1,+1,+3"])?;
    let mut trigger = PartTrigger::new(1);
    trigger.sound_number = 9;
    trigger.wait_time = 1;
    registry.create(1, trigger, &["wait=1,7"])?;
    registry.start_all();
    registry.tick_all();

    let err = registry.dispatch(&mut host).unwrap_err();
    assert!(matches!(err, PictureError::SlotOutOfRange { id: -1, .. }));
    assert_eq!(host.sounds, vec![9]);
    assert_eq!(host.appeared.len(), 1);
    assert_eq!(host.appeared[0].parts_number, 7);
    // the pointer after the bad one still spawns
    assert_eq!(registry.get(3)?.pointer(), PicturePointer { parts_number: 2, id: 3 });

    registry.dispatch(&mut host)?;
    assert_eq!(host.sounds, vec![9]);
    assert_eq!(host.appeared.len(), 1);
    Ok(())
}

#[test]
fn overflowing_relative_values_are_rejected_at_creation() {
    let mut registry = registry();
    let err = registry
        .create(0, PartTrigger::new(5), &["time=1", "next=+2147483647,+0"])
        .unwrap_err();
    assert!(matches!(
        err,
        PictureError::Macro {
            line: 2,
            source: picture_core::MacroError::Format { index: 0, .. },
            ..
        }
    ));
    assert!(registry.is_empty(0));

    let mut trigger = PartTrigger::new(1);
    trigger.position = IVec2::new(0, i32::MIN);
    let err = registry
        .create(1, trigger, &["wait=1,3,+0,-1"])
        .unwrap_err();
    assert!(matches!(
        err,
        PictureError::Macro {
            line: 1,
            source: picture_core::MacroError::Format { index: 3, .. },
            ..
        }
    ));
}

#[test]
fn sound_and_wait_reach_the_host() -> Result<()> {
    let mut registry = registry();
    let mut host = MockHost::default();
    let mut trigger = PartTrigger::new(20);
    trigger.sound_number = 4;
    trigger.position = IVec2::new(5, 5);

    registry.create(1, trigger, &["wait=2,0,+1,+0", "time=10"])?;
    registry.start_all();
    registry.dispatch(&mut host)?;
    assert_eq!(host.sounds, vec![4]);
    assert!(registry.get(1)?.is_waiting());

    registry.tick_all();
    registry.tick_all();
    registry.dispatch(&mut host)?;
    // resolved part number 0 appears nothing
    assert!(host.appeared.is_empty());
    assert!(!registry.get(1)?.is_waiting());

    registry.create(2, PartTrigger::new(20), &["wait=1,30,+1,+0,1"])?;
    registry.start(2)?;
    registry.tick_all();
    registry.dispatch(&mut host)?;
    assert_eq!(
        host.appeared,
        vec![AppearPart {
            parts_number: 30,
            parts_type: PartsType::Map,
            trigger_position: IVec2::ZERO,
            position: IVec2::new(1, 0),
        }]
    );
    Ok(())
}

#[test]
fn stop_all_cancels_every_timer() -> Result<()> {
    let mut registry = registry();
    let mut host = MockHost::default();
    registry.create(0, PartTrigger::new(1), &["time=2", "next=+1,+1"])?;
    registry.create(1, PartTrigger::new(1), &["wait=2,5"])?;
    registry.start_all();
    registry.stop_all();
    for _ in 0..5 {
        registry.tick_all();
    }
    registry.dispatch(&mut host)?;
    assert!(host.requested.is_empty());
    assert!(host.appeared.is_empty());
    assert!(!registry.get(0)?.is_timed_out());
    Ok(())
}

#[test]
fn restarting_a_visible_picture_restarts_animation() -> Result<()> {
    let mut registry = registry();
    registry.create(0, PartTrigger::new(1), &["anim_straight=1,0", "time_anim=0,2"])?;
    registry.start(0)?;
    registry.tick_all();
    registry.tick_all();
    assert!(!registry.get(0)?.is_animating());

    registry.start(0)?;
    assert!(registry.get(0)?.is_animating());
    registry.update_all();
    assert_eq!(registry.get(0)?.pos().x, 1.0);
    Ok(())
}
