use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use sshscope::cli::Cli;
use sshscope::output::OutputWriter;
use sshscope::scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "sshscope=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let scanner = Scanner::new(cli.scan_config());
    let output_writer = OutputWriter::new(cli.output_format, cli.output_file.clone());

    let report = match scanner.scan(&cli.target).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            eprintln!("Example: sshscope 192.168.1.0/24");
            std::process::exit(2);
        }
    };

    output_writer.write(&report)?;

    Ok(())
}
