use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rulekit",
    about = "Rulekit: canonicalize and compare CDN rules-engine policy documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Strip server metadata from a policy document
    Canonicalize {
        /// Path to policy JSON (`-` for stdin)
        input: String,

        /// Optional canonicalizer config TOML
        #[arg(long)]
        config: Option<String>,

        /// Accept a policy with a missing or empty rules list
        #[arg(long)]
        allow_empty_rules: bool,

        /// Output as JSON envelope with digest
        #[arg(long)]
        json: bool,
    },

    /// Decide whether two policy documents are equivalent (exit 1 when not)
    Compare {
        /// Path to the previously tracked policy JSON
        old: String,

        /// Path to the proposed policy JSON
        new: String,

        /// Canonicalize both documents before comparing
        #[arg(long)]
        canonicalize: bool,

        /// Optional canonicalizer config TOML (implies --canonicalize)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit the placeholder policy sent in place of a delete
    Placeholder {
        /// Delivery platform, e.g. http_large
        #[arg(long)]
        platform: String,

        /// Timestamp to embed (defaults to the current UTC time)
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Stamp the generated policy name onto a document before it is written
    Stamp {
        /// Path to policy JSON (`-` for stdin)
        input: String,

        /// Account number embedded in the name
        #[arg(long, default_value = "")]
        account: String,

        /// Environment embedded in the name, e.g. staging
        #[arg(long)]
        environment: String,

        /// Delivery platform, e.g. http_large
        #[arg(long)]
        platform: String,

        /// Timestamp to embed (defaults to the current UTC time)
        #[arg(long)]
        timestamp: Option<String>,
    },
}
