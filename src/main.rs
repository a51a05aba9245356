//! dialog - filter expression inspector

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use dialog::expression::{parse, Lexer, TokenKind};
use log::debug;

/// Parse a boolean filter and print its negation-normal form
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filter text, e.g. "!(price>10 && qty==0)"
    #[arg(short, long)]
    filter: String,

    /// Print the token stream before parsing
    #[arg(short, long)]
    tokens: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.tokens {
        let tokens = Lexer::new(&args.filter)
            .tokenize()
            .context("Failed to tokenize filter")?;
        for token in tokens.iter().filter(|t| t.kind != TokenKind::End) {
            println!("{:<9} {}", format!("{:?}", token.kind), token.text);
        }
    }

    let expr = parse(&args.filter).context("Failed to parse filter")?;
    debug!("{} predicates in {}", expr.predicates().len(), expr);
    println!("{}", expr);

    Ok(())
}
