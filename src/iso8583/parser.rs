use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::iso8583::bitmap::{self, Bitmap};
use crate::iso8583::config::ParserConfig;
use crate::iso8583::header::{self, MTI_LEN};
use crate::iso8583::mti::{self, Mti};
use crate::iso8583::{IsoError, Stage};

// IsoHeader is the decoded header of a message - MTI and the bitmap chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsoHeader {
    raw: String,
    #[serde(flatten)]
    mti: Mti,
    bitmaps: Vec<Bitmap>,
}

impl IsoHeader {
    /// The trimmed message the header was decoded from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn mti(&self) -> &Mti {
        &self.mti
    }

    pub fn bitmaps(&self) -> &[Bitmap] {
        &self.bitmaps
    }

    // All field numbers present on the message, in ascending order
    pub fn fields(&self) -> Vec<u32> {
        self.bitmaps
            .iter()
            .flat_map(|b| b.fields().iter().copied())
            .collect()
    }

    // Returns true if field `pos` is present. The continuation positions (1, 65, ..)
    // are never fields.
    pub fn is_on(&self, pos: u32) -> bool {
        if pos == 0 {
            return false;
        }
        let block = ((pos - 1) / bitmap::BITMAP_BITS) as usize;
        let rel_pos = pos - bitmap::BITMAP_BITS * block as u32;

        match self.bitmaps.get(block) {
            Some(bmp) => rel_pos != 1 && bmp.is_on(rel_pos),
            None => false,
        }
    }
}

impl Display for IsoHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{:20.40}: {}", "MTI", self.mti)?;
        write!(f, "\n{:20.40}: {}", "version", self.mti.version())?;
        write!(f, "\n{:20.40}: {}", "class", self.mti.class())?;
        write!(f, "\n{:20.40}: {}", "function", self.mti.function())?;
        write!(f, "\n{:20.40}: {}", "origin", self.mti.origin())?;
        for (i, bmp) in self.bitmaps.iter().enumerate() {
            write!(
                f,
                "\n{:20.40}: {} {:?}",
                format!("bitmap[{}]", i),
                bmp.hexadecimal(),
                bmp.fields()
            )?;
        }
        Ok(())
    }
}

/// Outcome of a parse - either the decoded header or the first error hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParseResult {
    Parsed(IsoHeader),
    Failed { err: IsoError },
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ParseResult::Parsed(_))
    }

    pub fn header(&self) -> Option<&IsoHeader> {
        match self {
            ParseResult::Parsed(h) => Some(h),
            ParseResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&IsoError> {
        match self {
            ParseResult::Parsed(_) => None,
            ParseResult::Failed { err } => Some(err),
        }
    }

    /// The terminal state of the pipeline that produced this result
    pub fn stage(&self) -> Stage {
        match self {
            ParseResult::Parsed(_) => Stage::Succeeded,
            ParseResult::Failed { .. } => Stage::Failed,
        }
    }

    pub fn into_result(self) -> Result<IsoHeader, IsoError> {
        self.into()
    }
}

impl From<Result<IsoHeader, IsoError>> for ParseResult {
    fn from(res: Result<IsoHeader, IsoError>) -> Self {
        match res {
            Ok(h) => ParseResult::Parsed(h),
            Err(err) => ParseResult::Failed { err },
        }
    }
}

impl From<ParseResult> for Result<IsoHeader, IsoError> {
    fn from(res: ParseResult) -> Self {
        match res {
            ParseResult::Parsed(h) => Ok(h),
            ParseResult::Failed { err } => Err(err),
        }
    }
}

/// Parser runs the header pipeline - validation, MTI resolution and bitmap
/// decoding - over one message at a time. It holds no per-message state and
/// can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Parser {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses the header of `raw`. This never fails - a failure is reported
    /// through the returned ParseResult.
    pub fn parse(&self, raw: &str) -> ParseResult {
        let res = self.parse_header(raw);
        match &res {
            Ok(h) => debug!("{:?}: {} with {} bitmap(s)", Stage::Succeeded, h.mti, h.bitmaps.len()),
            Err(e) => debug!("{:?} during {:?}: {}", Stage::Failed, e.stage(), e),
        }
        res.into()
    }

    /// Same as `parse` but as a Result, for callers that want to use `?`
    pub fn parse_header(&self, raw: &str) -> Result<IsoHeader, IsoError> {
        let raw = raw.trim();

        enter(Stage::Validating);
        let code = header::validate(raw)?;

        enter(Stage::ResolvingMti);
        let mti = mti::resolve(code)?;

        enter(Stage::DecodingBitmaps);
        let bitmaps = bitmap::decode_chain(raw, MTI_LEN, self.config.max_bitmaps())?;

        Ok(IsoHeader {
            raw: raw.to_string(),
            mti,
            bitmaps,
        })
    }
}

fn enter(stage: Stage) {
    trace!("header pipeline -> {:?}", stage);
}

/// Parses `raw` with a default (unbounded) parser
pub fn parse(raw: &str) -> ParseResult {
    Parser::default().parse(raw)
}
