//! Report command.
//!
//! This module owns the default "machine-report" behavior: load the layout,
//! collect metrics, then print the table or its JSON form.

use crate::cli::Cli;
use crate::config::Config;
use crate::render::{self, LayoutConfig, ReportBody};
use crate::report;
use crate::status::{self, MachineStatus};
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use sysinfo::System;

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'a MachineStatus,
    report: &'a ReportBody,
}

pub(crate) fn load_layout(cli: &Cli) -> anyhow::Result<LayoutConfig> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_cli_overrides(cli.title.clone(), cli.subtitle.clone());

    // Reject bad bounds before spending time on collection
    config.layout.validate()?;
    Ok(config.layout)
}

pub fn handle_report(cli: Cli) -> anyhow::Result<()> {
    let layout = load_layout(&cli)?;

    let mut system = System::new();
    let status =
        status::gather_status(&mut system).context("Failed to collect machine metrics")?;
    let body = report::build_report(&status, &layout)?;

    let output = if cli.json {
        let mut json = serde_json::to_string_pretty(&JsonReport {
            status: &status,
            report: &body,
        })?;
        json.push('\n');
        json
    } else {
        render::render(&body, &layout)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write report to stdout")?;
    stdout.flush()?;
    Ok(())
}
