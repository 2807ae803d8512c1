use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::*;

use crate::cli::OutputFormat;
use crate::scanner::results::ScanReport;

pub struct OutputWriter {
    format: OutputFormat,
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, file: Option<PathBuf>) -> Self {
        Self { format, file }
    }

    pub fn write(&self, report: &ScanReport) -> Result<()> {
        let output = self.render(report)?;

        match &self.file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(output.as_bytes())?;
                writer.flush()?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(output.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    pub fn render(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_human(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
            OutputFormat::Csv => Ok(format_csv(report)),
        }
    }
}

fn format_human(report: &ScanReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(
        output,
        "\n{} {} {} {}",
        "⟦".truecolor(64, 64, 64),
        format!("{}:{}", report.target, report.port).truecolor(255, 255, 255).bold(),
        "•".truecolor(0, 255, 65),
        format!("{}ms", report.elapsed_ms()).truecolor(0, 212, 255).bold(),
    );
    let _ = writeln!(
        output,
        "{} {} {} {} {} {}\n",
        "⟦".truecolor(64, 64, 64),
        format!("{} probed", summary.attempted).truecolor(191, 64, 191).bold(),
        "•".truecolor(0, 255, 65),
        format!("{} timeouts", summary.timeouts).truecolor(128, 128, 128),
        "•".truecolor(0, 255, 65),
        format!("{} errors", summary.connection_errors).truecolor(255, 140, 0),
    );

    if report.results.is_empty() {
        let _ = writeln!(
            output,
            "{} {}",
            "⚠".truecolor(255, 140, 0).bold(),
            "No SSH banners captured".truecolor(128, 128, 128)
        );
        return output;
    }

    for result in &report.results {
        let _ = writeln!(
            output,
            "{} {:<15} {}",
            "▶".truecolor(0, 255, 65).bold(),
            result.address.to_string().truecolor(255, 255, 255).bold(),
            result.protocol_version.escape_debug().to_string().truecolor(0, 212, 255),
        );
        if !result.kex_method_blob.is_empty() {
            let _ = writeln!(
                output,
                "  {} {}",
                "kex".truecolor(64, 64, 64),
                result.kex_method_blob.escape_ascii().to_string().truecolor(128, 128, 128),
            );
        }
    }

    let _ = writeln!(
        output,
        "\n{} {}",
        "⚡".truecolor(0, 255, 65).bold(),
        format!("{} SSH hosts found", report.results.len()).truecolor(255, 255, 255).bold(),
    );
    output
}

fn format_csv(report: &ScanReport) -> String {
    let mut csv = String::from("address,protocol_version,kex_blob_hex\n");

    for result in &report.results {
        let hex: String = result.kex_method_blob.iter().map(|b| format!("{b:02x}")).collect();
        let _ = writeln!(csv, "{},{},{}", result.address, csv_field(&result.protocol_version), hex);
    }

    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
