pub mod bitmap;
pub mod config;
pub mod header;
pub mod mti;
pub mod parser;
mod test;

use std::fmt;

use serde::{Serialize, Serializer};

/// Stages of the header pipeline. A parse moves through them strictly in
/// declaration order and any stage may jump straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    Validating,
    ResolvingMti,
    DecodingBitmaps,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsoError {
    EmptyMessage,
    InvalidMti,
    InvalidVersion,
    InvalidClass,
    InvalidFunction,
    InvalidOrigin,
    BitmapTooShort,
    BitmapNotHex,
    /// Only raised when a cap on the chain length has been configured
    BitmapChainTooLong { max: usize },
    /// Failure while loading a parser configuration, never produced by a parse
    Config { msg: String },
}

impl IsoError {
    /// Returns the pipeline stage that raised this error
    pub fn stage(&self) -> Stage {
        match self {
            IsoError::EmptyMessage | IsoError::InvalidMti => Stage::Validating,
            IsoError::InvalidVersion
            | IsoError::InvalidClass
            | IsoError::InvalidFunction
            | IsoError::InvalidOrigin => Stage::ResolvingMti,
            IsoError::BitmapTooShort
            | IsoError::BitmapNotHex
            | IsoError::BitmapChainTooLong { .. } => Stage::DecodingBitmaps,
            IsoError::Config { .. } => Stage::NotStarted,
        }
    }
}

impl fmt::Display for IsoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsoError::EmptyMessage => f.write_str("ISO message cannot be empty."),
            IsoError::InvalidMti => f.write_str("MTI value not valid."),
            IsoError::InvalidVersion => f.write_str("Message version not valid."),
            IsoError::InvalidClass => f.write_str("Message class not valid."),
            IsoError::InvalidFunction => f.write_str("Message function not valid."),
            IsoError::InvalidOrigin => f.write_str("Message origin not valid."),
            IsoError::BitmapTooShort => f.write_str("Bitmap(s) not valid: too short."),
            IsoError::BitmapNotHex => f.write_str("Bitmap(s) not valid: non hex."),
            IsoError::BitmapChainTooLong { max } => write!(
                f,
                "Bitmap(s) not valid: too many chained bitmaps (max {}).",
                max
            ),
            IsoError::Config { msg } => write!(f, "(iso8583:: config-error: {})", msg),
        }
    }
}

impl std::error::Error for IsoError {}

// a failed parse is rendered as its description, e.g. {err: "MTI value not valid."}
impl Serialize for IsoError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
