//! This module deals with the configuration that can be applied to a header parser,
//! either built in code or read from a YAML file

use serde::Deserialize;

use crate::iso8583::IsoError;

/// Number of bitmaps defined by ISO8583 - primary, secondary and tertiary
pub const STANDARD_MAX_BITMAPS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    max_bitmaps: Option<usize>,
    log_level: Option<String>,
}

impl ParserConfig {
    /// Creates a new config with an unbounded bitmap chain
    pub fn new() -> ParserConfig {
        ParserConfig {
            max_bitmaps: None,
            log_level: None,
        }
    }

    /// Returns the cap on the bitmap chain length, if any
    pub fn max_bitmaps(&self) -> Option<usize> {
        self.max_bitmaps
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    /// Use the Config with a builder pattern. A cap below 1 is raised to 1 since
    /// the primary bitmap is always present.
    pub fn with_max_bitmaps(&mut self, max: usize) -> &mut ParserConfig {
        self.max_bitmaps = Some(max.max(1));
        self
    }

    /// Use the Config with a builder pattern
    pub fn with_log_level(&mut self, level: &str) -> &mut ParserConfig {
        self.log_level = Some(level.to_string());
        self
    }
}

/// Reads a ParserConfig from a YAML file
pub fn read_config(config_file: &str) -> Result<ParserConfig, IsoError> {
    let yaml_str = std::fs::read_to_string(config_file).map_err(|e| IsoError::Config {
        msg: format!("{}: {}", config_file, e),
    })?;

    from_yaml(&yaml_str)
}

pub fn from_yaml(yaml_str: &str) -> Result<ParserConfig, IsoError> {
    let mut config: ParserConfig =
        serde_yaml::from_str(yaml_str).map_err(|e| IsoError::Config { msg: e.to_string() })?;

    if let Some(max) = config.max_bitmaps {
        config.with_max_bitmaps(max);
    }
    debug!("parser config: {:?}", config);
    Ok(config)
}

#[test]
fn test_builder() {
    let mut config = ParserConfig::new();
    config
        .with_max_bitmaps(STANDARD_MAX_BITMAPS)
        .with_log_level("debug");

    assert_eq!(Some(3), config.max_bitmaps());
    assert_eq!(Some("debug"), config.log_level());
    assert_eq!(Some(1), ParserConfig::new().with_max_bitmaps(0).max_bitmaps());
    assert_eq!(None, ParserConfig::default().max_bitmaps());
}

#[test]
fn test_read_config() {
    match read_config("sample_config/parser.yaml") {
        Ok(config) => {
            assert_eq!(Some(STANDARD_MAX_BITMAPS), config.max_bitmaps());
            assert_eq!(Some("debug"), config.log_level());
        }
        Err(e) => panic!("{}", e),
    }
}

#[test]
fn test_from_yaml() {
    assert_eq!(ParserConfig::new(), from_yaml("{}").unwrap());
    assert_eq!(Some(1), from_yaml("max_bitmaps: 0").unwrap().max_bitmaps());

    match from_yaml("max_bitmaps: [1, 2]") {
        Err(IsoError::Config { .. }) => {}
        other => panic!("expected config error, got {:?}", other),
    }
    match read_config("sample_config/missing.yaml") {
        Err(e) => assert!(e.to_string().contains("missing.yaml")),
        Ok(_) => panic!("missing file should not load"),
    }
}
