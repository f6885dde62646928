use rulekit_policy::{Canonicalizer, CanonicalizerConfig, DocumentNode};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RULEKIT_LOG";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Log to stderr so stdout stays machine-readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn read_input_or_exit(input: &str) -> String {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).unwrap_or_else(|err| {
            eprintln!("error: failed to read stdin: {err}");
            std::process::exit(2);
        });
        return text;
    }
    fs::read_to_string(input).unwrap_or_else(|err| {
        eprintln!("error: failed to read {input}: {err}");
        std::process::exit(2);
    })
}

pub fn parse_document_or_exit(input: &str) -> DocumentNode {
    let text = read_input_or_exit(input);
    DocumentNode::parse(&text).unwrap_or_else(|err| {
        eprintln!("error: {input}: {err}");
        std::process::exit(2);
    })
}

pub fn load_canonicalizer_or_exit(config: Option<&str>, allow_empty_rules: bool) -> Canonicalizer {
    let mut loaded = match config {
        Some(path) => CanonicalizerConfig::load(Path::new(path)).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(2);
        }),
        None => CanonicalizerConfig::default(),
    };
    if allow_empty_rules {
        loaded.allow_empty_rules = true;
    }
    Canonicalizer::new(loaded)
}

pub fn current_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn print_json_or_exit<T: serde::Serialize>(payload: &T, label: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
