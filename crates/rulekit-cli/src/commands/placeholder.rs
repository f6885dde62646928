use crate::support::{current_timestamp, print_json_or_exit};
use rulekit_policy::build_placeholder;

pub fn run(platform: String, timestamp: Option<String>) {
    let timestamp = timestamp.unwrap_or_else(current_timestamp);
    print_json_or_exit(&build_placeholder(&platform, &timestamp), "placeholder");
}
