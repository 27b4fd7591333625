#[cfg(test)]
mod tests {
    use crate::iso8583::config::{ParserConfig, STANDARD_MAX_BITMAPS};
    use crate::iso8583::parser::{self, ParseResult, Parser};
    use crate::iso8583::{IsoError, Stage};

    const NET_MGMT_MSG: &str =
        "0800823A000020000000840000000000000004200906139000010906130420042003ÉÉÉ001";

    const REVERSAL_MSG: &str = "0400F23A400108418202000000400000000019111111111000000000018000000000003000001090806461003310011200909080996010060002000000000003430003948 03808110012000004096565733200000003000001360030003317000394809080646";

    fn failure(raw: &str) -> IsoError {
        match parser::parse(raw) {
            ParseResult::Failed { err } => err,
            ParseResult::Parsed(h) => panic!("expected failure, parsed {}", h),
        }
    }

    #[test]
    fn test_parse_net_mgmt() -> Result<(), IsoError> {
        let header = parser::parse(NET_MGMT_MSG).into_result()?;

        assert_eq!(NET_MGMT_MSG, header.raw());
        assert_eq!("0800", header.mti().code());
        assert_eq!("ISO 8583:1987", header.mti().version());
        assert_eq!("Network management message", header.mti().class());
        assert_eq!("Request", header.mti().function());
        assert_eq!("Acquirer", header.mti().origin());

        // both the primary and the secondary carry the continuation bit
        assert_eq!(3, header.bitmaps().len());
        assert_eq!(
            vec![7, 11, 12, 13, 15, 35, 70, 134, 139, 149, 152, 158, 159, 164, 167, 168, 169, 172, 192],
            header.fields()
        );
        Ok(())
    }

    #[test]
    fn test_parse_reversal() -> Result<(), IsoError> {
        let header = Parser::default().parse_header(REVERSAL_MSG)?;

        assert_eq!("Reversal and chargeback messages", header.mti().class());
        assert_eq!(2, header.bitmaps().len());
        assert_eq!("0000004000000000", header.bitmaps()[1].hexadecimal());
        assert_eq!(&[90], header.bitmaps()[1].fields());
        assert!(header.is_on(2));
        assert!(header.is_on(90));
        assert!(!header.is_on(1));
        assert!(!header.is_on(65));
        assert!(!header.is_on(130));
        Ok(())
    }

    #[test]
    fn test_parse_single_bitmap() {
        let res = parser::parse("0800223A000020000000F00D");

        assert!(res.is_ok());
        assert_eq!(Stage::Succeeded, res.stage());
        assert!(res.error().is_none());
        let header = res.header().unwrap();
        assert_eq!(1, header.bitmaps().len());
        assert!(!header.bitmaps()[0].has_next());
    }

    #[test]
    fn test_parse_trims_input() {
        let header = parser::parse("  \t0800223A000020000000\n").into_result().unwrap();
        assert_eq!("0800223A000020000000", header.raw());
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(IsoError::EmptyMessage, failure(""));
        assert_eq!(IsoError::EmptyMessage, failure(" \n\t "));
        assert_eq!(IsoError::InvalidMti, failure("12"));
        assert_eq!(IsoError::InvalidVersion, failure("X800223A000020000000"));
        assert_eq!(IsoError::InvalidClass, failure("0X00223A000020000000"));
        assert_eq!(IsoError::InvalidFunction, failure("08X0223A000020000000"));
        assert_eq!(IsoError::InvalidOrigin, failure("0805223A000020000000"));
        assert_eq!(IsoError::BitmapTooShort, failure("0800"));
        assert_eq!(IsoError::BitmapTooShort, failure("0800223A"));
        assert_eq!(IsoError::BitmapNotHex, failure("0800223A00002000000Z"));
        assert_eq!(IsoError::BitmapTooShort, failure("0800823A000020000000840000"));
    }

    #[test]
    fn test_failure_stage() {
        let res = parser::parse("0805223A000020000000");
        assert_eq!(Stage::Failed, res.stage());
        assert!(res.header().is_none());
        assert_eq!(Some(Stage::ResolvingMti), res.error().map(|e| e.stage()));

        assert_eq!(Stage::Validating, failure("12").stage());
        assert_eq!(Stage::DecodingBitmaps, failure("0800ZZ").stage());
    }

    #[test]
    fn test_capped_parser() {
        let mut config = ParserConfig::new();
        config.with_max_bitmaps(STANDARD_MAX_BITMAPS);
        let capped = Parser::new(config);
        assert!(capped.parse(NET_MGMT_MSG).is_ok());

        let mut config = ParserConfig::new();
        config.with_max_bitmaps(1);
        let primary_only = Parser::new(config);
        assert_eq!(
            Some(&IsoError::BitmapChainTooLong { max: 1 }),
            primary_only.parse(NET_MGMT_MSG).error()
        );
        assert!(primary_only.parse("0800223A000020000000").is_ok());
    }

    #[test]
    fn test_serialized_success() {
        let value = serde_yaml::to_value(parser::parse(NET_MGMT_MSG)).unwrap();

        assert_eq!(Some(NET_MGMT_MSG), value["raw"].as_str());
        assert_eq!(Some("0800"), value["MTI"].as_str());
        assert_eq!(Some("ISO 8583:1987"), value["version"].as_str());
        assert_eq!(Some("Network management message"), value["class"].as_str());
        assert_eq!(Some("Request"), value["function"].as_str());
        assert_eq!(Some("Acquirer"), value["origin"].as_str());
        assert!(value.get("err").is_none());

        let bitmaps = value["bitmaps"].as_sequence().unwrap();
        assert_eq!(3, bitmaps.len());
        assert_eq!(Some("8400000000000000"), bitmaps[1]["hexadecimal"].as_str());
        assert_eq!(Some(64), bitmaps[1]["binary"].as_str().map(|b| b.len()));
        assert_eq!(Some(70), bitmaps[1]["fields"][0].as_u64());
        assert!(bitmaps[1].get("value").is_none());
    }

    #[test]
    fn test_serialized_failure() {
        let value = serde_yaml::to_value(parser::parse("12")).unwrap();

        assert_eq!(Some(1), value.as_mapping().map(|m| m.len()));
        assert_eq!(Some("MTI value not valid."), value["err"].as_str());
    }

    #[test]
    fn test_display() {
        let header = parser::parse("0800223A000020000000").into_result().unwrap();
        let text = header.to_string();

        assert!(text.contains("Network management message"));
        assert!(text.contains("223A000020000000"));
        assert_eq!(
            "Bitmap(s) not valid: non hex.",
            IsoError::BitmapNotHex.to_string()
        );
    }

    #[test]
    fn test_shared_between_threads() {
        let parser = std::sync::Arc::new(Parser::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = parser.clone();
                std::thread::spawn(move || parser.parse(NET_MGMT_MSG))
            })
            .collect();

        for h in handles {
            assert_eq!(parser.parse(NET_MGMT_MSG), h.join().unwrap());
        }
    }
}
