//! Shared output formatting for scan results.

use anyhow::Result;
use gripe_core::{Complaint, RenderOptions, Renderer, ScanOutput};
use serde::Serialize;

use crate::OutputFormat;

/// Print scan results in the specified format.
pub fn print(output: &ScanOutput, options: RenderOptions, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(output, options),
        OutputFormat::Json => return print_json(output),
    }
    Ok(())
}

fn print_text(output: &ScanOutput, options: RenderOptions) {
    let renderer = Renderer::new(options, &output.sources);
    for complaint in output.collector.complaints() {
        println!("{}", renderer.render(complaint));
        println!();
    }
    println!("{}", output.collector.summary());
}

#[derive(Serialize)]
struct JsonReport<'a> {
    complaints: &'a [Complaint],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    warnings: usize,
    critical: usize,
    files_scanned: usize,
    message: String,
}

fn print_json(output: &ScanOutput) -> Result<()> {
    let collector = &output.collector;
    let report = JsonReport {
        complaints: collector.complaints(),
        summary: JsonSummary {
            total: collector.total(),
            warnings: collector.warnings(),
            critical: collector.critical(),
            files_scanned: output.stats.files_scanned,
            message: collector.summary(),
        },
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}
