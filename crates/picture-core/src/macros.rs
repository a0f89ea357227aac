//! # Macro Line Parsing
//!
//! A picture is authored as a block of `name=value,value,...` lines. This
//! module splits one line into its name and raw value tokens and offers typed
//! accessors over the tokens.
//!
//! Tokens are either double-quoted strings (quotes kept, commas inside allowed)
//! or runs of non-comma characters. Empty segments produce no token.

use crate::errors::MacroError;
use std::str::FromStr;

/// One parsed `name=value,...` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyMacro {
    name: String,
    values: Vec<String>,
}

/// A value that is either absolute or a signed delta against some base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeValue {
    Absolute(i32),
    Relative(i32),
}

impl RelativeValue {
    /// `None` when a delta would overflow `i32`.
    pub fn resolve(self, base: i32) -> Option<i32> {
        match self {
            RelativeValue::Absolute(v) => Some(v),
            RelativeValue::Relative(delta) => base.checked_add(delta),
        }
    }
}

impl Default for RelativeValue {
    /// "Same as base".
    fn default() -> Self {
        RelativeValue::Relative(0)
    }
}

impl PropertyMacro {
    pub fn parse(line: &str) -> Result<Self, MacroError> {
        let line = line.trim_end();
        let (name, rest) = line.split_once('=').ok_or(MacroError::Syntax)?;
        if !is_identifier(name) {
            return Err(MacroError::Syntax);
        }
        let values = tokenize(rest);
        if values.is_empty() {
            return Err(MacroError::Syntax);
        }
        Ok(Self {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `Ok(None)` when the index is out of range but a fallback exists.
    fn token<T>(&self, index: usize, fallback: &Option<T>) -> Result<Option<&str>, MacroError> {
        match self.values.get(index) {
            Some(token) => Ok(Some(token.as_str())),
            None if fallback.is_some() => Ok(None),
            None => Err(MacroError::MissingValue {
                name: self.name.clone(),
                index,
            }),
        }
    }

    fn format_error(&self, index: usize, token: &str, expected: &'static str) -> MacroError {
        MacroError::Format {
            name: self.name.clone(),
            index,
            token: token.to_string(),
            expected,
        }
    }

    pub fn get_int(&self, index: usize, fallback: Option<i32>) -> Result<i32, MacroError> {
        let Some(token) = self.token(index, &fallback)? else {
            return Ok(fallback.unwrap_or_default());
        };
        token
            .trim()
            .parse::<i32>()
            .map_err(|_| self.format_error(index, token, "an integer"))
    }

    pub fn get_float(&self, index: usize, fallback: Option<f32>) -> Result<f32, MacroError> {
        let Some(token) = self.token(index, &fallback)? else {
            return Ok(fallback.unwrap_or_default());
        };
        token
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.format_error(index, token, "a number"))
    }

    /// Only `0` and `1` are accepted.
    pub fn get_bool(&self, index: usize, fallback: Option<bool>) -> Result<bool, MacroError> {
        let Some(token) = self.token(index, &fallback)? else {
            return Ok(fallback.unwrap_or_default());
        };
        match token.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(self.format_error(index, token, "0 or 1")),
        }
    }

    /// Strips surrounding double quotes when present.
    pub fn get_string(
        &self,
        index: usize,
        requires_quotes: bool,
        fallback: Option<&str>,
    ) -> Result<String, MacroError> {
        let Some(token) = self.token(index, &fallback)? else {
            return Ok(fallback.unwrap_or_default().to_string());
        };
        match unquote(token) {
            Some(inner) => Ok(inner.to_string()),
            None if requires_quotes => Err(self.format_error(index, token, "a quoted string")),
            None => Ok(token.to_string()),
        }
    }

    /// `+n`/`-n` are deltas against `base`; bare numbers are absolute.
    pub fn get_relative(&self, index: usize, base: i32, fallback: Option<i32>) -> Result<i32, MacroError> {
        let fallback = fallback.map(RelativeValue::Absolute);
        self.relative_value(index, fallback)?
            .resolve(base)
            .ok_or_else(|| self.resolve_error(index))
    }

    /// Format error for a relative token whose resolved value overflows.
    pub fn resolve_error(&self, index: usize) -> MacroError {
        let token = self.values.get(index).map(String::as_str).unwrap_or_default();
        self.format_error(index, token, "a delta that stays within i32 range")
    }

    /// Like [`get_relative`](Self::get_relative) but keeps the value unresolved.
    pub fn relative_value(
        &self,
        index: usize,
        fallback: Option<RelativeValue>,
    ) -> Result<RelativeValue, MacroError> {
        let Some(token) = self.token(index, &fallback)? else {
            return Ok(fallback.unwrap_or_default());
        };
        let trimmed = token.trim();
        let value = trimmed
            .parse::<i32>()
            .map_err(|_| self.format_error(index, token, "an integer"))?;
        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            Ok(RelativeValue::Relative(value))
        } else {
            Ok(RelativeValue::Absolute(value))
        }
    }
}

impl FromStr for PropertyMacro {
    type Err = MacroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn tokenize(rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < rest.len() {
        let tail = &rest[i..];
        if tail.starts_with(',') {
            i += 1;
            continue;
        }
        if tail.starts_with('"') {
            if let Some(close) = tail[1..].find('"') {
                let end = close + 2;
                tokens.push(tail[..end].to_string());
                i += end;
                continue;
            }
        }
        let end = tail.find(',').unwrap_or(tail.len());
        tokens.push(tail[..end].to_string());
        i += end;
    }
    tokens
}

fn unquote(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}
