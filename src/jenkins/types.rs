use serde::Deserialize;

use crate::trends::{BuildReport, TestCounts};

/// Response from `<job>/api/json?tree=builds[number]`.
///
/// A listing without a `builds` array (Jenkins answers `{}` for jobs it
/// cannot resolve) is treated as "no data" at the parse step.
#[derive(Debug, Deserialize)]
pub struct BuildListing {
    pub builds: Vec<BuildRef>,
}

#[derive(Debug, Deserialize)]
pub struct BuildRef {
    pub number: u64,
}

/// Response from `<job>/<build>/robot/api/json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotReport {
    pub critical_total: u64,
    pub critical_passed: u64,
    pub critical_failed: u64,
    pub overall_total: u64,
    pub overall_passed: u64,
    pub overall_failed: u64,
}

impl From<RobotReport> for BuildReport {
    fn from(report: RobotReport) -> Self {
        Self {
            critical: TestCounts::new(
                report.critical_total,
                report.critical_passed,
                report.critical_failed,
            ),
            overall: TestCounts::new(
                report.overall_total,
                report.overall_passed,
                report.overall_failed,
            ),
        }
    }
}
