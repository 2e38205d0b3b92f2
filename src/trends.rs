use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Pass rate as a percentage, or `None` when no tests were recorded.
#[allow(clippy::cast_precision_loss)]
pub fn pass_rate(passed: u64, total: u64) -> Option<f64> {
    if total > 0 {
        Some((passed as f64 / total as f64) * 100.0)
    } else {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub pass_rate: Option<f64>,
}

impl TestCounts {
    pub fn new(total: u64, passed: u64, failed: u64) -> Self {
        Self {
            total,
            passed,
            failed,
            pass_rate: pass_rate(passed, total),
        }
    }
}

/// Robot Framework statistics for a single build: the prioritized
/// "Critical tests" bucket and the full "All tests" bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub critical: TestCounts,
    pub overall: TestCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTrend {
    pub url: String,
    pub builds_listed: usize,
    pub builds: BTreeMap<u64, BuildReport>,
}

impl JobTrend {
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            builds_listed: 0,
            builds: BTreeMap::new(),
        }
    }

    /// Critical pass rate of the most recent build that has one.
    pub fn latest_critical_rate(&self) -> Option<f64> {
        self.builds
            .values()
            .rev()
            .find_map(|report| report.critical.pass_rate)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendReport {
    pub collected_at: DateTime<Utc>,
    pub total_jobs: usize,
    pub total_builds: usize,
    pub jobs: IndexMap<String, JobTrend>,
}

impl TrendReport {
    pub fn new(jobs: IndexMap<String, JobTrend>) -> Self {
        let total_builds = jobs.values().map(|job| job.builds.len()).sum();

        Self {
            collected_at: Utc::now(),
            total_jobs: jobs.len(),
            total_builds,
            jobs,
        }
    }
}
