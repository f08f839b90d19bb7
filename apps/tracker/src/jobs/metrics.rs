use serde::Serialize;

use crate::jobs::models::{JobRecord, JobStatus};

/// Headline numbers shown above the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetrics {
    pub total: u32,
    /// Anything past `Saved`.
    pub applied: u32,
    pub interviews: u32,
    pub offers: u32,
    /// Whole percent of applied jobs that reached an interview.
    pub interview_rate: u32,
    /// Whole percent of applied jobs that produced an offer.
    pub success_rate: u32,
}

/// Archived records are ignored.
pub fn compute_metrics(jobs: &[JobRecord]) -> JobMetrics {
    let active = jobs.iter().filter(|j| j.status != JobStatus::Archived);

    let mut metrics = JobMetrics::default();
    for job in active {
        metrics.total += 1;
        if job.status != JobStatus::Saved {
            metrics.applied += 1;
        }
        if job.status.reached_interview() {
            metrics.interviews += 1;
        }
        if job.status == JobStatus::Offer {
            metrics.offers += 1;
        }
    }

    metrics.interview_rate = percent(metrics.interviews, metrics.applied);
    metrics.success_rate = percent(metrics.offers, metrics.applied);
    metrics
}

/// Rounds half up; zero denominator yields zero.
fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u64, whole as u64);
    ((part * 200 + whole) / (whole * 2)) as u32
}
