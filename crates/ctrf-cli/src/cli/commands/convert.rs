use std::io::Read;
use std::path::Path;

use anyhow::Context;
use ctrf_core::report::console::print_summary;
use ctrf_core::reporter::{CtrfReporter, Reporter};
use ctrf_core::tree::RunnerOutput;
use ctrf_core::ReporterOptions;

use super::super::args::ConvertArgs;
use crate::exit_codes::{EXIT_INPUT_ERROR, EXIT_SUCCESS, EXIT_WRITE_FAILED};

pub fn run(args: ConvertArgs) -> anyhow::Result<i32> {
    let mut options = match &args.config {
        Some(path) => match ReporterOptions::load(path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("error: {e}");
                return Ok(EXIT_INPUT_ERROR);
            }
        },
        None => ReporterOptions::default(),
    };
    args.apply_overrides(&mut options);

    let output = match read_input(&args.input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(EXIT_INPUT_ERROR);
        }
    };
    tracing::debug!(roots = output.files.len(), errors = output.errors.len(), "read runner output");

    let mut reporter = CtrfReporter::new(&options);
    reporter.on_init();
    reporter.on_finished(output);

    let Some(path) = reporter.written_path() else {
        eprintln!(
            "error: failed to write report to {}",
            reporter.output_path().display()
        );
        return Ok(EXIT_WRITE_FAILED);
    };
    println!("{}", path.display());

    if !args.quiet {
        if let Some(report) = reporter.report() {
            print_summary(report);
        }
    }
    Ok(EXIT_SUCCESS)
}

fn read_input(input: &Path) -> anyhow::Result<RunnerOutput> {
    let text = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    RunnerOutput::from_json(&text).with_context(|| format!("invalid input {}", input.display()))
}
