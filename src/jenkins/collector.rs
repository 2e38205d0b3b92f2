use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, info, warn};
use url::Url;

use crate::trends::{BuildReport, JobTrend, TrendReport};

use super::client::JenkinsClient;

/// Display/grouping name for a job: the final path segment of its URL,
/// ignoring any trailing separator.
pub fn job_name(job_url: &str) -> String {
    let trimmed = job_url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

fn most_recent(mut builds: Vec<u64>, limit: Option<usize>) -> Vec<u64> {
    if let Some(limit) = limit {
        builds.sort_unstable_by(|a, b| b.cmp(a));
        builds.truncate(limit);
    }
    builds
}

/// Collect the build history of a single job.
///
/// Lists builds, then fetches every build's report concurrently and waits
/// for all of them. Builds without a parseable report are left out of the
/// history. A job whose listing fails (or whose URL does not parse) still
/// produces an entry, with an empty history.
pub async fn collect_job(
    client: &JenkinsClient,
    job_url: &str,
    limit: Option<usize>,
) -> (String, JobTrend) {
    let name = job_name(job_url);
    let base = job_url.trim_end_matches('/').to_string();

    if let Err(e) = Url::parse(&base) {
        warn!("Skipping job {job_url}: {e}");
        return (name, JobTrend::empty(&base));
    }

    let listed = client.list_builds(&base).await.unwrap_or_default();
    let builds = most_recent(listed, limit);

    let fetches = builds.iter().map(|&number| {
        let base = &base;
        async move { (number, client.fetch_build_report(base, number).await) }
    });

    // Fan-in: all of this job's builds complete before the job is done
    let results = futures::future::join_all(fetches).await;

    let reports: BTreeMap<u64, BuildReport> = results
        .into_iter()
        .filter_map(|(number, report)| report.map(|r| (number, r)))
        .collect();

    debug!(
        "Job {name}: {} of {} builds have robot data",
        reports.len(),
        builds.len()
    );

    let trend = JobTrend {
        url: base,
        builds_listed: builds.len(),
        builds: reports,
    };

    (name, trend)
}

/// Collect build histories for every job concurrently.
///
/// Each job task returns its own history; the merge into the final report
/// happens sequentially after the join, so no task ever touches shared
/// state. Job order in the result follows the argument order.
pub async fn collect_all(
    client: &JenkinsClient,
    job_urls: &[String],
    limit: Option<usize>,
) -> TrendReport {
    info!("Collecting build statistics for {} job(s)", job_urls.len());

    let tasks = job_urls.iter().map(|url| collect_job(client, url, limit));
    let results = futures::future::join_all(tasks).await;

    let mut jobs: IndexMap<String, JobTrend> = IndexMap::new();
    for (name, trend) in results {
        if jobs.insert(name.clone(), trend).is_some() {
            warn!("Duplicate job name {name:?}, keeping the last occurrence");
        }
    }

    TrendReport::new(jobs)
}
