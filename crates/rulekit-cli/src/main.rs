//! Rulekit CLI: the `rulekit` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Canonicalize {
            input,
            config,
            allow_empty_rules,
            json,
        } => commands::canonicalize::run(input, config, allow_empty_rules, json),

        Commands::Compare {
            old,
            new,
            canonicalize,
            config,
            json,
        } => commands::compare::run(commands::compare::Args {
            old,
            new,
            canonicalize,
            config,
            json,
        }),

        Commands::Placeholder {
            platform,
            timestamp,
        } => commands::placeholder::run(platform, timestamp),

        Commands::Stamp {
            input,
            account,
            environment,
            platform,
            timestamp,
        } => commands::stamp::run(commands::stamp::Args {
            input,
            account,
            environment,
            platform,
            timestamp,
        }),
    }
}
