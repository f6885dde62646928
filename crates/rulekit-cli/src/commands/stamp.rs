use crate::support::{current_timestamp, parse_document_or_exit, print_json_or_exit};
use rulekit_policy::{PolicyStamp, stamp_policy_name};

pub struct Args {
    pub input: String,
    pub account: String,
    pub environment: String,
    pub platform: String,
    pub timestamp: Option<String>,
}

pub fn run(args: Args) {
    let doc = parse_document_or_exit(&args.input);
    let stamp = PolicyStamp {
        account: args.account,
        environment: args.environment,
        platform: args.platform,
        timestamp: args.timestamp.unwrap_or_else(current_timestamp),
    };
    let stamped = stamp_policy_name(&doc, &stamp).unwrap_or_else(|err| {
        eprintln!("error: {}: {err}", args.input);
        std::process::exit(2);
    });
    print_json_or_exit(&stamped, "stamped policy");
}
