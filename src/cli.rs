use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::{ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_PORT, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(name = "sshscope")]
#[command(version)]
#[command(about = "Find SSH services across an IPv4 block and capture their banners", long_about = None)]
pub struct Cli {
    #[arg(help = "IPv4 CIDR block to sweep, e.g. 192.168.1.0/24. Host bits must be clear.")]
    pub target: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT, help = "TCP port to probe")]
    pub port: u16,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TIMEOUT.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Connect and read timeout per host, in milliseconds"
    )]
    pub timeout: u64,

    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY, help = "Maximum hosts probed at once")]
    pub concurrency: usize,

    #[arg(long, help = "Report hosts in address order rather than as they answer")]
    pub ordered: bool,

    #[arg(short = 'o', long, value_enum, default_value = "human", help = "Output format")]
    pub output_format: OutputFormat,

    #[arg(short = 'f', long, help = "Output file path")]
    pub output_file: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short, long, help = "Log every probe outcome")]
    pub verbose: bool,

    #[arg(short, long, help = "Hide the progress bar")]
    pub quiet: bool,
}

impl Cli {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .port(self.port)
            .timeout(Duration::from_millis(self.timeout))
            .concurrency(self.concurrency)
            .ordered(self.ordered)
            .progress(!self.quiet)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    #[value(name = "human", help = "Human-readable output")]
    Human,
    #[value(name = "json", help = "JSON output")]
    Json,
    #[value(name = "csv", help = "CSV output")]
    Csv,
}
