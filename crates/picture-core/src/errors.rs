use thiserror::Error;

/// Failure to interpret a single macro line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MacroError {
    #[error("not a property line (expected `name=value[,value...]`)")]
    Syntax,
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("`{name}` is missing value #{index}")]
    MissingValue { name: String, index: usize },
    #[error("`{name}` value #{index} ({token:?}) is not {expected}")]
    Format {
        name: String,
        index: usize,
        token: String,
        expected: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum PictureError {
    /// A line of an authoring block was rejected. `line` is 1-based.
    #[error("line {line} `{text}`: {source}")]
    Macro {
        line: usize,
        text: String,
        #[source]
        source: MacroError,
    },
    #[error("invalid timer duration: {0}")]
    InvalidDuration(f64),
    #[error("picture id {id} is out of range (capacity {capacity})")]
    SlotOutOfRange { id: i64, capacity: usize },
    #[error("picture slot {0} is empty")]
    EmptySlot(usize),
    #[error("invalid field config: {0}")]
    Config(#[from] serde_json::Error),
}
