use crate::support::{load_canonicalizer_or_exit, parse_document_or_exit, print_json_or_exit};
use rulekit_doc::stable_digest;
use rulekit_policy::DocumentNode;
use serde::Serialize;

/// Serialized through a struct so the canonical document keeps its key order.
#[derive(Serialize)]
struct Envelope<'a> {
    canonical: &'a DocumentNode,
    digest: String,
}

pub fn run(input: String, config: Option<String>, allow_empty_rules: bool, json_output: bool) {
    let doc = parse_document_or_exit(&input);
    let canonicalizer = load_canonicalizer_or_exit(config.as_deref(), allow_empty_rules);

    let canonical = canonicalizer.canonicalize(&doc).unwrap_or_else(|err| {
        eprintln!("error: {input}: {err}");
        std::process::exit(2);
    });

    if json_output {
        let digest = stable_digest(&canonical).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(2);
        });
        print_json_or_exit(
            &Envelope {
                canonical: &canonical,
                digest,
            },
            "canonicalize",
        );
        return;
    }

    print_json_or_exit(&canonical, "canonical policy");
}
