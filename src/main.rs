#[macro_use]
extern crate log;
extern crate simplelog;

use iso8583_header::iso8583::config::{self, ParserConfig};
use iso8583_header::{ParseResult, Parser};
use simplelog::LevelFilter;

const SAMPLE_MSG: &str = "0800823A000020000000840000000000000004200906139000010906130420042003ÉÉÉ001";

fn main() {
    let config = match std::env::var("ISO8583_HEADER_CONFIG") {
        Ok(config_file) => match config::read_config(&config_file) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        Err(_) => ParserConfig::new(),
    };

    let level = config
        .log_level()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    let _ = simplelog::SimpleLogger::init(level, simplelog::Config::default());

    let msg = std::env::args().nth(1).unwrap_or_else(|| SAMPLE_MSG.to_string());
    let parser = Parser::new(config);

    let result = parser.parse(&msg);
    match &result {
        ParseResult::Parsed(header) => info!("parsed header: \n{}", header),
        ParseResult::Failed { err } => warn!("failed to parse header - {}", err),
    }

    match serde_yaml::to_string(&result) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => error!("failed to render result: {}", e),
    }
}
