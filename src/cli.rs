use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::config::Config;
use crate::jenkins::{self, JenkinsClient};
use crate::output::{self, ChartOptions, PhaseProgress};

#[derive(Parser)]
#[command(name = "robotrend")]
#[command(author, version, about = "Robot Framework pass-rate trends for Jenkins jobs", long_about = None)]
pub struct Cli {
    /// Jenkins job base URLs
    #[arg(required = true, value_name = "JOB_URL")]
    jobs: Vec<String>,

    /// Chart output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chart title
    #[arg(short, long)]
    title: Option<String>,

    /// Only chart the N most recent builds of each job
    #[arg(short, long)]
    limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Do not open the chart in a browser
    #[arg(long, default_value_t = false)]
    no_open: bool,

    /// Also export the aggregated report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Pretty-print the JSON export
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Exit with a non-zero code when no job yielded any build data
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl Cli {
    /// Resolve settings, collect every job's history, write the chart and
    /// print the summary. CLI flags override config file values.
    pub async fn execute(&self) -> Result<ExitCode> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        if let Some(title) = &self.title {
            config.output.title = title.clone();
        }
        if self.no_open {
            config.output.auto_open = false;
        }
        if self.strict {
            config.output.strict = true;
        }

        let client = JenkinsClient::new(&config.http)?;

        let progress = PhaseProgress::start_phase_1(self.jobs.len());
        let report = jenkins::collect_all(&client, &self.jobs, self.limit).await;

        let progress = progress.finish_phase_1_start_phase_2(report.total_builds);
        let series = output::build_series(&report);

        let progress = progress.finish_phase_2_start_phase_3();
        let chart = ChartOptions {
            path: config.output.path.clone(),
            title: config.output.title.clone(),
            auto_open: config.output.auto_open,
        };
        output::write_chart(&series, report.collected_at, &chart)?;
        progress.finish_phase_3();

        if let Some(json_path) = &self.json {
            let json_output = if self.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            std::fs::write(json_path, json_output)?;
            info!("Report written to: {}", json_path.display());
        }

        output::print_summary(&report);
        println!(
            "{}",
            output::bright_green(format!("Chart written to {}", chart.path.display()))
        );

        if config.output.strict && report.total_builds == 0 {
            info!("No job yielded any build data");
            return Ok(ExitCode::from(2));
        }

        Ok(ExitCode::SUCCESS)
    }
}
