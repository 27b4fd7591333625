#[macro_use]
extern crate lazy_static;
extern crate hex;
extern crate byteorder;

#[macro_use]
extern crate log;
extern crate serde_yaml;

pub mod iso8583;

pub use crate::iso8583::parser::{parse, IsoHeader, ParseResult, Parser};
pub use crate::iso8583::IsoError;
