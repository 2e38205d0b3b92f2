use std::fmt::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::trends::TrendReport;

use super::styling::bright;

/// Prints a human-readable summary of the collected trends to stdout.
///
/// One row per job: builds fetched, builds that actually carried robot
/// data, and the critical pass rate of the most recent such build,
/// color-coded (green >80%, yellow 50-80%, red <50%).
pub fn print_summary(report: &TrendReport) {
    println!("{}", render_summary(report));
}

fn render_summary(report: &TrendReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} {}", bright("📊"), bright("Jobs").underlined());

    let mut table = create_table();
    table.set_header(create_cyan_header(&[
        "Job",
        "Builds",
        "With Data",
        "Latest Critical",
    ]));

    for (name, job) in &report.jobs {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(job.builds_listed),
            Cell::new(job.builds.len()),
            latest_rate_cell(job.latest_critical_rate()),
        ]);
    }

    let _ = writeln!(output, "{table}");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Collected {} build(s) with robot data across {} job(s)",
        report.total_builds, report.total_jobs
    );

    output
}

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn latest_rate_cell(rate: Option<f64>) -> Cell {
    match rate {
        Some(rate) => {
            let text = format!("{rate:.1}%");
            if rate > 80.0 {
                Cell::new(text).fg(TableColor::Green)
            } else if rate >= 50.0 {
                Cell::new(text).fg(TableColor::Yellow)
            } else {
                Cell::new(text).fg(TableColor::Red)
            }
        }
        None => Cell::new("n/a").fg(TableColor::DarkGrey),
    }
}
