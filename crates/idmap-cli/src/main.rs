//! idmap - canonical identity map CLI
//!
//! # Examples
//!
//! ```bash
//! # Resolve an incoming contact
//! idmap resolve --channel telegram --user-id 123456789
//!
//! # Link a contact to a person
//! idmap add --canonical alice --channel discord --user-id 'alice#1234'
//!
//! # Everything, as JSON
//! idmap list --pretty
//! ```

use idmap_cli::{Cli, CliResult, Output, OutputFormat, dispatch, load_config, logger, output};

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::from_flags(cli.json, cli.pretty);

    let rendered = run(&cli).and_then(|output| output.render(format));

    match rendered {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if format.is_json() {
                println!("{}", output::error_json(&e.to_string(), format));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<Output> {
    let (workspace, config) = load_config(cli)?;

    logger::initialize(&config.logging)?;
    config.log_summary();

    dispatch(&cli.command, &workspace, &config)
}
