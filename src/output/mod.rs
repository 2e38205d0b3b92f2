mod chart;
mod progress;
mod styling;
mod summary;

pub use chart::{build_series, write_chart, ChartOptions};
pub use progress::PhaseProgress;
pub use styling::{bright_green, dim, magenta_bold};
pub use summary::print_summary;

/// Prints the robotrend banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("📈 RoboTrend"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Jenkins test pass-rate trends")
    );
}
