//! Tarsier selector inspector
//!
//! Parses a selector string and prints the descriptor list as JSON, for
//! debugging what the query engine actually sees.

use anyhow::Result;
use std::env;
use tarsier_selector::parse_selectors;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: tarsier <selector>");
        eprintln!("       tarsier 'div#main.wrapped[data-theme=\"dark\"] ul li'");
        std::process::exit(1);
    }

    let queries = parse_selectors(&args[1])?;
    println!("{}", serde_json::to_string_pretty(&queries)?);

    Ok(())
}
