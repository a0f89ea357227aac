//! Authoring-block parsing and geometry checks against the public API.

use anyhow::Result;
use glam::UVec2;
use picture_core::types::Rect;
use picture_core::{
    AnimationFrame, Coord, FieldConfig, MacroError, PartTrigger, Picture, PictureError,
    PicturePointer, Property, PropertyMacro,
};

fn build(lines: &[&str]) -> Result<Picture, PictureError> {
    Picture::new(
        PicturePointer { parts_number: 1, id: 0 },
        PartTrigger::new(1),
        lines,
        FieldConfig::default(),
    )
}

#[test]
fn parsing_is_idempotent() -> Result<()> {
    let lines = [
        "pos=10,-20",
        r#"text="a, b, c",2,1"#,
        "next=+1,+0,-2,7",
        "anim_circle=30,12,90",
        "font=12,0,1,\"monospace\"",
        "repeat=3,4,0   ",
    ];
    for line in lines {
        let first = Property::parse(&PropertyMacro::parse(line)?)?;
        let second = Property::parse(&line.parse::<PropertyMacro>()?)?;
        assert_eq!(first, second, "line {:?}", line);
    }
    Ok(())
}

#[test]
fn malformed_blocks_are_rejected_whole() {
    let cases: [(&[&str], usize); 4] = [
        (&["pos=0,0", "=1"], 2),
        (&["size=4", "pos=0,0"], 1),
        (&["pos=0,0", "", "opacity=lots"], 3),
        (&["glow=1"], 1),
    ];
    for (block, expected_line) in cases {
        match build(block) {
            Err(PictureError::Macro { line, .. }) => assert_eq!(line, expected_line, "{:?}", block),
            other => panic!("block {:?} gave {:?}", block, other.map(|_| ())),
        }
    }
}

#[test]
fn error_messages_name_the_line() {
    let err = build(&["pos=0,0", "size=4"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"), "{}", message);
    assert!(message.contains("size=4"), "{}", message);
    assert!(matches!(
        err,
        PictureError::Macro {
            source: MacroError::MissingValue { index: 1, .. },
            ..
        }
    ));
}

#[test]
fn orbit_keeps_radius_across_updates() -> Result<()> {
    let mut picture = build(&["pos=200,200", "anim_circle=60,7,15"])?;
    picture.start();
    for k in 1..=50 {
        picture.update();
        let distance = picture.pos().distance(picture.base_pos());
        assert!((distance - 60.0).abs() <= 1.5, "distance {} at update {}", distance, k);
    }
    assert_eq!(picture.base_pos(), Coord::new(200.0, 200.0));
    Ok(())
}

#[test]
fn fill_ignores_authored_repeat() -> Result<()> {
    let config = FieldConfig {
        field_width: 15,
        field_height: 9,
        ..Default::default()
    };
    let picture = Picture::new(
        PicturePointer { parts_number: 1, id: 0 },
        PartTrigger::new(1),
        &["repeat=2,2", "fill=1", "pos=13,7"],
        config,
    )?;
    assert_eq!(picture.repeat(), UVec2::new(16, 10));
    assert_eq!(picture.width(), 600.0);
    assert_eq!(picture.height(), 360.0);
    assert_eq!(picture.bounding_box(), Rect::from_xywh(0.0, 0.0, 600.0, 360.0));

    let start = picture.fill_start_pos();
    assert!(start.x <= 0.0 && start.x > -40.0);
    assert!(start.y <= 0.0 && start.y > -40.0);
    let last = picture.tiles().last().unwrap_or_default();
    assert!(last.x + 40.0 >= 600.0 && last.y + 40.0 >= 360.0);
    Ok(())
}

#[test]
fn crop_follows_shared_frame() -> Result<()> {
    let mut trigger = PartTrigger::new(1);
    trigger.image_crop = Coord::new(2.0, 0.0);
    trigger.second_image_crop = Coord::new(3.0, 0.0);
    let picture = Picture::new(
        PicturePointer { parts_number: 1, id: 0 },
        trigger,
        &["pos=0,0"],
        FieldConfig::default(),
    )?;
    let mut frame = AnimationFrame::Primary;
    let crops: Vec<f32> = (0..4)
        .map(|_| {
            let x = picture.image_crop(frame).x;
            frame = frame.flipped();
            x
        })
        .collect();
    assert_eq!(crops, vec![2.0, 3.0, 2.0, 3.0]);
    Ok(())
}
