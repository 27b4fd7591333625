//! This module resolves the four digits of a message type indicator (MTI) to their
//! ISO8583 meaning - version, class, function and origin

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::iso8583::IsoError;

lazy_static! {
    static ref VERSIONS: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('0', "ISO 8583:1987");
        m.insert('1', "ISO 8583:1993");
        m.insert('2', "ISO 8583:2003");
        for d in &['3', '4', '5', '6', '7'] {
            m.insert(*d, "Reserved by ISO");
        }
        m.insert('8', "National use");
        m.insert('9', "Private use");
        m
    };

    static ref CLASSES: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('0', "Reserved by ISO");
        m.insert('1', "Authorization message");
        m.insert('2', "Financial messages");
        m.insert('3', "File actions message");
        m.insert('4', "Reversal and chargeback messages");
        m.insert('5', "Reconciliation message");
        m.insert('6', "Administrative message");
        m.insert('7', "Fee collection messages");
        m.insert('8', "Network management message");
        m.insert('9', "Reserved by ISO");
        m
    };

    static ref FUNCTIONS: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('0', "Request");
        m.insert('1', "Request response");
        m.insert('2', "Advice");
        m.insert('3', "Advice response");
        m.insert('4', "Notification");
        m.insert('5', "Notification acknowledgement");
        m.insert('6', "Instruction");
        m.insert('7', "Instruction acknowledgement");
        m.insert('8', "Reserved for ISO use");
        m.insert('9', "Reserved for ISO use");
        m
    };

    // 5-9 are left undefined
    static ref ORIGINS: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('0', "Acquirer");
        m.insert('1', "Acquirer repeat");
        m.insert('2', "Issuer");
        m.insert('3', "Issuer repeat");
        m.insert('4', "Other");
        m
    };
}

/// A resolved message type indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mti {
    #[serde(rename = "MTI")]
    code: String,
    version: &'static str,
    class: &'static str,
    function: &'static str,
    origin: &'static str,
}

impl Mti {
    /// The 4 characters of the MTI as they appeared on the message
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn origin(&self) -> &'static str {
        self.origin
    }
}

impl Display for Mti {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

fn lookup(
    table: &HashMap<char, &'static str>,
    digit: Option<char>,
    err: IsoError,
) -> Result<&'static str, IsoError> {
    match digit.and_then(|d| table.get(&d)) {
        Some(desc) => Ok(*desc),
        None => Err(err),
    }
}

/// Resolves version, class, function and origin of `code` in that order, failing
/// on the first digit that isn't defined for its position
pub fn resolve(code: &str) -> Result<Mti, IsoError> {
    let mut digits = code.chars();

    let version = lookup(&VERSIONS, digits.next(), IsoError::InvalidVersion)?;
    let class = lookup(&CLASSES, digits.next(), IsoError::InvalidClass)?;
    let function = lookup(&FUNCTIONS, digits.next(), IsoError::InvalidFunction)?;
    let origin = lookup(&ORIGINS, digits.next(), IsoError::InvalidOrigin)?;
    trace!("mti {} := {} / {} / {} / {}", code, version, class, function, origin);

    Ok(Mti {
        code: code.to_string(),
        version,
        class,
        function,
        origin,
    })
}

#[test]
fn test_resolve_network_mgmt_request() {
    let mti = resolve("0800").unwrap();
    assert_eq!("0800", mti.code());
    assert_eq!("ISO 8583:1987", mti.version());
    assert_eq!("Network management message", mti.class());
    assert_eq!("Request", mti.function());
    assert_eq!("Acquirer", mti.origin());
}

#[test]
fn test_resolve_auth_response_1993() {
    let mti = resolve("1110").unwrap();
    assert_eq!("ISO 8583:1993", mti.version());
    assert_eq!("Authorization message", mti.class());
    assert_eq!("Request response", mti.function());
    assert_eq!("Acquirer", mti.origin());
    assert_eq!("1110", mti.to_string());
}

#[test]
fn test_digits_resolve_independently() {
    let digits = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
    let origins = ['0', '1', '2', '3', '4'];

    for d in digits.iter() {
        let expected_version = VERSIONS[d];
        let expected_class = CLASSES[d];
        let expected_function = FUNCTIONS[d];
        for other in origins.iter() {
            let as_version = resolve(&format!("{}{}{}{}", d, other, other, other)).unwrap();
            assert_eq!(expected_version, as_version.version());

            let as_class = resolve(&format!("{}{}{}{}", other, d, other, other)).unwrap();
            assert_eq!(expected_class, as_class.class());

            let as_function = resolve(&format!("{}{}{}{}", other, other, d, other)).unwrap();
            assert_eq!(expected_function, as_function.function());
        }
    }

    for o in origins.iter() {
        for d in digits.iter() {
            let mti = resolve(&format!("{}{}{}{}", d, d, d, o)).unwrap();
            assert_eq!(ORIGINS[o], mti.origin());
        }
    }
}

#[test]
fn test_origin_outside_table() {
    for o in &['5', '6', '7', '8', '9'] {
        assert_eq!(Err(IsoError::InvalidOrigin), resolve(&format!("080{}", o)));
    }
}

#[test]
fn test_first_failure_wins() {
    assert_eq!(Err(IsoError::InvalidVersion), resolve("A8Z9"));
    assert_eq!(Err(IsoError::InvalidClass), resolve("0XZ9"));
    assert_eq!(Err(IsoError::InvalidFunction), resolve("08Z9"));
    assert_eq!(Err(IsoError::InvalidOrigin), resolve("0809"));
}
