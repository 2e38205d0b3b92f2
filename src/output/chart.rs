use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_json::json;

use crate::error::Result;
use crate::trends::TrendReport;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// One point of a job's series. `x` positions are chart coordinates after
/// right alignment, `label` is the "job/build" hover text.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub x: usize,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub name: String,
    pub points: Vec<TrendPoint>,
}

/// Chart output settings, resolved from config file and CLI flags.
pub struct ChartOptions {
    pub path: PathBuf,
    pub title: String,
    pub auto_open: bool,
}

/// Flattens the aggregated report into one ordered series per job.
///
/// Builds are taken in ascending number order. A build contributes a point
/// only when both of its buckets have a defined pass rate; others are left
/// out of the series entirely rather than zero-filled. Series are right
/// aligned: shorter series are offset so every job's most recent build sits
/// at the same x position.
pub fn build_series(report: &TrendReport) -> Vec<TrendSeries> {
    let per_job: Vec<(&String, Vec<(f64, String)>)> = report
        .jobs
        .iter()
        .map(|(name, job)| {
            let values = job
                .builds
                .iter()
                .filter_map(|(number, build)| match (
                    build.critical.pass_rate,
                    build.overall.pass_rate,
                ) {
                    (Some(critical), Some(_)) => Some((critical, format!("{name}/{number}"))),
                    _ => None,
                })
                .collect();
            (name, values)
        })
        .collect();

    let max_len = per_job.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    per_job
        .into_iter()
        .map(|(name, values)| {
            let offset = max_len - values.len();
            TrendSeries {
                name: format!("{name} - Critical tests"),
                points: values
                    .into_iter()
                    .enumerate()
                    .map(|(index, (y, label))| TrendPoint {
                        x: offset + index,
                        y,
                        label,
                    })
                    .collect(),
            }
        })
        .collect()
}

fn trace_json(series: &TrendSeries) -> serde_json::Value {
    json!({
        "x": series.points.iter().map(|p| p.x).collect::<Vec<_>>(),
        "y": series.points.iter().map(|p| p.y).collect::<Vec<_>>(),
        "text": series.points.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
        "name": series.name,
        "mode": "lines+markers",
        "type": "scatter",
    })
}

/// Renders the series as a self-contained HTML page with an interactive
/// plotly chart.
pub fn render(
    series: &[TrendSeries],
    title: &str,
    generated_at: DateTime<Utc>,
    output: &mut dyn Write,
) -> Result<()> {
    let traces: Vec<serde_json::Value> = series.iter().map(trace_json).collect();
    let layout = json!({
        "title": {"text": title},
        "xaxis": {"title": {"text": "Last Builds"}},
        "yaxis": {"title": {"text": "Percent"}, "range": [0, 100]},
    });

    writeln!(output, "<!DOCTYPE html>")?;
    writeln!(output, "<html lang=\"en\">")?;
    writeln!(output, "<head>")?;
    writeln!(output, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        output,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(output, "    <title>{}</title>", title)?;
    writeln!(output, "    <script src=\"{}\"></script>", PLOTLY_CDN)?;
    writeln!(output, "    <style>")?;
    writeln!(
        output,
        "        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; background: #f5f5f5; }}"
    )?;
    writeln!(
        output,
        "        .container {{ max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}"
    )?;
    writeln!(
        output,
        "        footer {{ margin-top: 20px; color: #666; text-align: center; }}"
    )?;
    writeln!(output, "    </style>")?;
    writeln!(output, "</head>")?;
    writeln!(output, "<body>")?;
    writeln!(output, "    <div class=\"container\">")?;
    writeln!(output, "        <div id=\"chart\"></div>")?;
    writeln!(output, "        <footer>")?;
    writeln!(
        output,
        "            <p>Generated by robotrend v{} on {}</p>",
        env!("CARGO_PKG_VERSION"),
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(output, "        </footer>")?;
    writeln!(output, "    </div>")?;
    writeln!(output, "    <script>")?;
    writeln!(
        output,
        "        const data = {};",
        serde_json::to_string(&traces)?
    )?;
    writeln!(
        output,
        "        const layout = {};",
        serde_json::to_string(&layout)?
    )?;
    writeln!(
        output,
        "        Plotly.newPlot(\"chart\", data, layout, {{responsive: true}});"
    )?;
    writeln!(output, "    </script>")?;
    writeln!(output, "</body>")?;
    writeln!(output, "</html>")?;

    Ok(())
}

/// Writes the chart artifact to disk and opens it in a viewer when enabled.
pub fn write_chart(
    series: &[TrendSeries],
    generated_at: DateTime<Utc>,
    options: &ChartOptions,
) -> Result<()> {
    let file = File::create(&options.path)?;
    let mut writer = BufWriter::new(file);
    render(series, &options.title, generated_at, &mut writer)?;
    writer.flush()?;

    info!("Chart written to {}", options.path.display());

    if options.auto_open {
        if let Err(e) = open::that(&options.path) {
            warn!(
                "Failed to open {} in a viewer: {e}",
                options.path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::trends::{BuildReport, JobTrend, TestCounts, TrendReport};
    use indexmap::IndexMap;

    fn build(critical: (u64, u64), overall: (u64, u64)) -> BuildReport {
        BuildReport {
            critical: TestCounts::new(critical.0, critical.1, critical.0 - critical.1),
            overall: TestCounts::new(overall.0, overall.1, overall.0 - overall.1),
        }
    }

    fn job(url: &str, builds: Vec<(u64, BuildReport)>) -> JobTrend {
        let mut trend = JobTrend::empty(url);
        trend.builds_listed = builds.len();
        trend.builds = builds.into_iter().collect();
        trend
    }

    fn report(jobs: Vec<(&str, JobTrend)>) -> TrendReport {
        let jobs: IndexMap<String, JobTrend> = jobs
            .into_iter()
            .map(|(name, trend)| (name.to_string(), trend))
            .collect();
        TrendReport::new(jobs)
    }

    #[cfg(test)]
    mod build_series {
        use super::*;

        #[test]
        fn orders_points_by_ascending_build_number() {
            let trend = report(vec![(
                "demo",
                job(
                    "https://ci/job/demo",
                    vec![
                        (3, build((20, 20), (40, 40))),
                        (1, build((10, 8), (30, 24))),
                    ],
                ),
            )]);

            let series = build_series(&trend);
            assert_eq!(series.len(), 1);
            let labels: Vec<_> = series[0].points.iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels, vec!["demo/1", "demo/3"]);
        }

        #[test]
        fn excludes_builds_with_undefined_pass_rates() {
            let trend = report(vec![(
                "demo",
                job(
                    "https://ci/job/demo",
                    vec![
                        (1, build((10, 8), (30, 24))),
                        (2, build((0, 0), (0, 0))),
                        (3, build((20, 20), (40, 40))),
                    ],
                ),
            )]);

            let series = build_series(&trend);
            assert_eq!(
                series[0].points.len(),
                2,
                "The zero-total build must not appear in the series"
            );
            let xs: Vec<_> = series[0].points.iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![0, 1], "x positions re-index after exclusion");
        }

        #[test]
        fn right_aligns_shorter_series() {
            let long = job(
                "https://ci/job/long",
                (1..=5).map(|n| (n, build((10, 9), (20, 18)))).collect(),
            );
            let short = job(
                "https://ci/job/short",
                (1..=3).map(|n| (n, build((10, 10), (20, 20)))).collect(),
            );
            let trend = report(vec![("long", long), ("short", short)]);

            let series = build_series(&trend);

            let long_xs: Vec<_> = series[0].points.iter().map(|p| p.x).collect();
            let short_xs: Vec<_> = series[1].points.iter().map(|p| p.x).collect();
            assert_eq!(long_xs, vec![0, 1, 2, 3, 4]);
            assert_eq!(short_xs, vec![2, 3, 4]);
            assert_eq!(
                long_xs.last(),
                short_xs.last(),
                "Both series must end at the same x position"
            );
        }

        #[test]
        fn matches_the_demo_scenario() {
            // Job with builds 1, 2, 3 where build 2 never produced robot data
            let trend = report(vec![(
                "demo",
                job(
                    "https://ci/job/demo",
                    vec![
                        (1, build((10, 8), (30, 24))),
                        (3, build((20, 20), (40, 40))),
                    ],
                ),
            )]);

            let series = build_series(&trend);
            assert_eq!(series[0].name, "demo - Critical tests");
            assert_eq!(
                series[0].points,
                vec![
                    TrendPoint {
                        x: 0,
                        y: 80.0,
                        label: "demo/1".to_string()
                    },
                    TrendPoint {
                        x: 1,
                        y: 100.0,
                        label: "demo/3".to_string()
                    },
                ]
            );
        }

        #[test]
        fn empty_report_produces_no_series() {
            let trend = report(vec![]);
            assert!(build_series(&trend).is_empty());
        }

        #[test]
        fn job_without_data_produces_an_empty_series() {
            let trend = report(vec![
                ("empty", job("https://ci/job/empty", vec![])),
                (
                    "demo",
                    job("https://ci/job/demo", vec![(1, build((10, 8), (30, 24)))]),
                ),
            ]);

            let series = build_series(&trend);
            assert_eq!(series.len(), 2);
            assert!(series[0].points.is_empty());
            assert_eq!(series[1].points.len(), 1);
        }
    }

    #[cfg(test)]
    mod render {
        use super::*;
        use chrono::Utc;

        fn render_to_string(series: &[TrendSeries], title: &str) -> String {
            let mut output = Vec::new();
            render(series, title, Utc::now(), &mut output).unwrap();
            String::from_utf8(output).unwrap()
        }

        #[test]
        fn writes_a_complete_html_document() {
            let trend = report(vec![(
                "demo",
                job("https://ci/job/demo", vec![(1, build((10, 8), (30, 24)))]),
            )]);
            let series = build_series(&trend);

            let html = render_to_string(&series, "Regression Status");
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("</html>"));
            assert!(html.contains(PLOTLY_CDN));
            assert!(html.contains("<title>Regression Status</title>"));
        }

        #[test]
        fn embeds_axis_titles_and_percent_range() {
            let html = render_to_string(&[], "Regression Status");
            assert!(html.contains("Last Builds"));
            assert!(html.contains("Percent"));
            assert!(html.contains("\"range\":[0,100]"));
        }

        #[test]
        fn embeds_series_data_and_labels() {
            let trend = report(vec![(
                "demo",
                job(
                    "https://ci/job/demo",
                    vec![
                        (1, build((10, 8), (30, 24))),
                        (3, build((20, 20), (40, 40))),
                    ],
                ),
            )]);
            let series = build_series(&trend);

            let html = render_to_string(&series, "Regression Status");
            assert!(html.contains("demo - Critical tests"));
            assert!(html.contains("demo/1"));
            assert!(html.contains("demo/3"));
            assert!(html.contains("lines+markers"));
        }

        #[test]
        fn renders_an_empty_chart_without_data() {
            let html = render_to_string(&[], "Regression Status");
            assert!(html.contains("const data = [];"));
            assert!(html.contains("Plotly.newPlot"));
        }
    }

    #[cfg(test)]
    mod write_chart {
        use super::*;
        use chrono::Utc;

        #[test]
        fn writes_the_artifact_to_the_configured_path() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("trend.html");
            let options = ChartOptions {
                path: path.clone(),
                title: "Regression Status".to_string(),
                auto_open: false,
            };

            write_chart(&[], Utc::now(), &options).unwrap();

            let html = std::fs::read_to_string(&path).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"));
        }
    }
}
