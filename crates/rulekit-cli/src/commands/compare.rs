use crate::support::{load_canonicalizer_or_exit, parse_document_or_exit, print_json_or_exit};
use rulekit_policy::{Difference, DocumentNode, differences};
use serde::Serialize;

pub struct Args {
    pub old: String,
    pub new: String,
    pub canonicalize: bool,
    pub config: Option<String>,
    pub json: bool,
}

/// Typed so `from`/`to` documents inside each difference keep their key order.
#[derive(Serialize)]
struct Report<'a> {
    equivalent: bool,
    differences: &'a [Difference],
}

pub fn run(args: Args) {
    let mut old = parse_document_or_exit(&args.old);
    let mut new = parse_document_or_exit(&args.new);

    if args.canonicalize || args.config.is_some() {
        let canonicalizer = load_canonicalizer_or_exit(args.config.as_deref(), false);
        let canonical = |doc: &DocumentNode, label: &str| {
            canonicalizer.canonicalize(doc).unwrap_or_else(|err| {
                eprintln!("error: {label}: {err}");
                std::process::exit(2);
            })
        };
        old = canonical(&old, &args.old);
        new = canonical(&new, &args.new);
    }

    let diffs = differences(&old, &new);
    let equivalent = diffs.is_empty();
    tracing::debug!(differences = diffs.len(), "compared policy documents");

    if args.json {
        print_json_or_exit(
            &Report {
                equivalent,
                differences: &diffs,
            },
            "compare",
        );
    } else {
        println!("rulekit compare");
        println!("  Old: {}", args.old);
        println!("  New: {}", args.new);
        println!(
            "  Result: {}",
            if equivalent { "equivalent" } else { "different" }
        );
        for diff in &diffs {
            println!("    {diff}");
        }
    }

    if !equivalent {
        std::process::exit(1);
    }
}
