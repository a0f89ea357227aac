//! # Property Module
//!
//! Maps a parsed [`PropertyMacro`] onto a typed [`Property`]. Each macro name
//! corresponds to exactly one variant; anything else is rejected as an
//! unknown property.
//!
//! ## Recognized names
//! - Layout: `pos`, `size`, `clip`, `angle`, `repeat`, `fill`, `interval`, `opacity`
//! - Lifecycle: `time`, `time_anim`, `wait`, `next`
//! - Text: `text`, `font`, `color`
//! - Animation: `anim_*` / `accel_*` for `straight`, `circle`, `zoom`, `rotate`, `fade`

use crate::animation::{Circular, Fade, Generator, GeneratorKind, Rotate, Straight, Zoom};
use crate::errors::MacroError;
use crate::macros::{PropertyMacro, RelativeValue};
use crate::types::{Color, Coord, PartsType};
use glam::UVec2;

/// Horizontal text anchor, indexed `0..=2` in authoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(TextAlign::Start),
            1 => Some(TextAlign::Center),
            2 => Some(TextAlign::End),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Center => "center",
            TextAlign::End => "end",
        }
    }
}

/// Vertical text anchor, indexed `0..=3` in authoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

impl TextBaseline {
    fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(TextBaseline::Top),
            1 => Some(TextBaseline::Middle),
            2 => Some(TextBaseline::Alphabetic),
            3 => Some(TextBaseline::Bottom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub family: String,
}

impl Font {
    pub const DEFAULT_SIZE: u32 = 16;
    pub const DEFAULT_FAMILY: &'static str = "sans-serif";

    /// Canvas font shorthand, e.g. `italic bold 16px sans-serif`.
    pub fn css(&self) -> String {
        let style = if self.italic { "italic" } else { "normal" };
        let weight = if self.bold { "bold" } else { "normal" };
        format!("{} {} {}px {}", style, weight, self.size, self.family)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            bold: false,
            italic: false,
            family: Self::DEFAULT_FAMILY.to_string(),
        }
    }
}

/// `wait=duration,part,x,y,is_map`: after `duration` ticks, make a part appear.
///
/// Part number and position are resolved against the triggering part; a
/// resolved part number of `0` appears nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitSpec {
    pub duration: u32,
    pub parts_number: RelativeValue,
    pub x: RelativeValue,
    pub y: RelativeValue,
    pub parts_type: PartsType,
}

/// One `(part number, picture id)` pair of a `next` list, unresolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextPointer {
    pub parts_number: RelativeValue,
    pub id: RelativeValue,
}

/// Payload of an `accel_*` macro.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Acceleration {
    Straight(Coord),
    Circular { round: f32, speed: f32 },
    Zoom(Coord),
    Rotate(f32),
    Fade(f32),
}

impl Acceleration {
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Acceleration::Straight(_) => GeneratorKind::Straight,
            Acceleration::Circular { .. } => GeneratorKind::Circular,
            Acceleration::Zoom(_) => GeneratorKind::Zoom,
            Acceleration::Rotate(_) => GeneratorKind::Rotate,
            Acceleration::Fade(_) => GeneratorKind::Fade,
        }
    }
}

/// A fully typed macro line.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Pos(Coord),
    /// `next_picture` is the deprecated single-id follow-up; it is parsed but not acted on.
    Time { duration: u32, next_picture: i32 },
    TimeAnim { delay: u32, duration: u32 },
    Wait(WaitSpec),
    Next(Vec<NextPointer>),
    Size(Coord),
    Clip(Coord),
    Angle(f32),
    Repeat { count: UVec2, fill: bool },
    Fill(bool),
    Interval { gap: Coord, shift: Coord },
    Opacity(f32),
    Text(TextStyle),
    Font(Font),
    Color(Color),
    Animation(Generator),
    Accel(Acceleration),
}

impl Property {
    pub fn parse(m: &PropertyMacro) -> Result<Self, MacroError> {
        let property = match m.name() {
            "pos" => Property::Pos(int_pair(m, 0)?),
            "time" => Property::Time {
                duration: ticks(m, 0)?,
                next_picture: m.get_int(1, Some(0))?,
            },
            "time_anim" => Property::TimeAnim {
                delay: ticks(m, 0)?,
                duration: ticks(m, 1)?,
            },
            "wait" => Property::Wait(WaitSpec {
                duration: ticks(m, 0)?,
                parts_number: m.relative_value(1, Some(RelativeValue::Absolute(0)))?,
                x: m.relative_value(2, Some(RelativeValue::Relative(0)))?,
                y: m.relative_value(3, Some(RelativeValue::Relative(0)))?,
                parts_type: PartsType::from_map_flag(m.get_bool(4, Some(false))?),
            }),
            "next" => Property::Next(next_pointers(m)?),
            "size" => Property::Size(int_pair(m, 0)?),
            "clip" => Property::Clip(int_pair(m, 0)?),
            "angle" => Property::Angle(m.get_int(0, None)? as f32),
            "repeat" => Property::Repeat {
                count: UVec2::new(count(m, 0)?, count(m, 1)?),
                fill: m.get_bool(2, Some(false))?,
            },
            "fill" => Property::Fill(m.get_bool(0, None)?),
            "interval" => Property::Interval {
                gap: int_pair(m, 0)?,
                shift: Coord::new(
                    m.get_int(2, Some(0))? as f32,
                    m.get_int(3, Some(0))? as f32,
                ),
            },
            "opacity" => Property::Opacity(m.get_float(0, None)?),
            "text" => Property::Text(TextStyle {
                text: m.get_string(0, true, None)?,
                align: indexed(m, 1, TextAlign::from_index, "a text align index (0-2)")?,
                baseline: indexed(m, 2, TextBaseline::from_index, "a baseline index (0-3)")?,
            }),
            "font" => Property::Font(Font {
                size: count(m, 0)?,
                bold: m.get_bool(1, Some(false))?,
                italic: m.get_bool(2, Some(false))?,
                family: m.get_string(3, false, Some(Font::DEFAULT_FAMILY))?,
            }),
            "color" => Property::Color(Color::new(
                channel(m, 0)?,
                channel(m, 1)?,
                channel(m, 2)?,
            )),
            "anim_straight" => {
                Property::Animation(Generator::Straight(Straight::new(float_pair(m, 0)?)))
            }
            "anim_circle" => Property::Animation(Generator::Circular(Circular::new(
                m.get_float(0, None)?,
                m.get_float(1, None)?,
                m.get_float(2, Some(0.0))?,
            ))),
            "anim_zoom" => Property::Animation(Generator::Zoom(Zoom::new(float_pair(m, 0)?))),
            "anim_rotate" => Property::Animation(Generator::Rotate(Rotate::new(m.get_float(0, None)?))),
            "anim_fade" => Property::Animation(Generator::Fade(Fade::new(m.get_float(0, None)?))),
            "accel_straight" => Property::Accel(Acceleration::Straight(float_pair(m, 0)?)),
            "accel_circle" => Property::Accel(Acceleration::Circular {
                round: m.get_float(0, None)?,
                speed: m.get_float(1, None)?,
            }),
            "accel_zoom" => Property::Accel(Acceleration::Zoom(float_pair(m, 0)?)),
            "accel_rotate" => Property::Accel(Acceleration::Rotate(m.get_float(0, None)?)),
            "accel_fade" => Property::Accel(Acceleration::Fade(m.get_float(0, None)?)),
            other => return Err(MacroError::UnknownProperty(other.to_string())),
        };
        Ok(property)
    }
}

fn int_pair(m: &PropertyMacro, index: usize) -> Result<Coord, MacroError> {
    Ok(Coord::new(
        m.get_int(index, None)? as f32,
        m.get_int(index + 1, None)? as f32,
    ))
}

fn float_pair(m: &PropertyMacro, index: usize) -> Result<Coord, MacroError> {
    Ok(Coord::new(m.get_float(index, None)?, m.get_float(index + 1, None)?))
}

fn non_negative(m: &PropertyMacro, index: usize, expected: &'static str) -> Result<u32, MacroError> {
    let value = m.get_int(index, None)?;
    u32::try_from(value).map_err(|_| MacroError::Format {
        name: m.name().to_string(),
        index,
        token: m.values()[index].clone(),
        expected,
    })
}

fn ticks(m: &PropertyMacro, index: usize) -> Result<u32, MacroError> {
    non_negative(m, index, "a non-negative tick count")
}

fn count(m: &PropertyMacro, index: usize) -> Result<u32, MacroError> {
    non_negative(m, index, "a non-negative integer")
}

fn channel(m: &PropertyMacro, index: usize) -> Result<u8, MacroError> {
    let value = m.get_int(index, None)?;
    u8::try_from(value).map_err(|_| MacroError::Format {
        name: m.name().to_string(),
        index,
        token: m.values()[index].clone(),
        expected: "a colour channel (0-255)",
    })
}

/// Optional index into a fixed table; defaults to the first entry.
fn indexed<T: Default>(
    m: &PropertyMacro,
    index: usize,
    lookup: fn(i32) -> Option<T>,
    expected: &'static str,
) -> Result<T, MacroError> {
    if index >= m.len() {
        return Ok(T::default());
    }
    let raw = m.get_int(index, None)?;
    lookup(raw).ok_or_else(|| MacroError::Format {
        name: m.name().to_string(),
        index,
        token: m.values()[index].clone(),
        expected,
    })
}

fn next_pointers(m: &PropertyMacro) -> Result<Vec<NextPointer>, MacroError> {
    (0..m.len())
        .step_by(2)
        .map(|i| {
            Ok(NextPointer {
                parts_number: m.relative_value(i, None)?,
                id: m.relative_value(i + 1, None)?,
            })
        })
        .collect()
}
