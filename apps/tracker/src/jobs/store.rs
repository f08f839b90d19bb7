//! In-memory job store. Holds the only copy of the user's records; nothing is
//! persisted and concurrent writers resolve as last-write-wins.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::jobs::documents;
use crate::jobs::models::{JobRecord, JobStatus, JobUpdate, NewJob};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Invalid(String),
}

/// Which records `list` returns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    #[serde(default, deserialize_with = "status_param")]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub include_archived: bool,
}

impl JobFilter {
    fn matches(&self, job: &JobRecord) -> bool {
        match self.status {
            Some(status) => job.status == status,
            None => self.include_archived || job.status != JobStatus::Archived,
        }
    }
}

/// Query strings go through `JobStatus::from_str`, so `?status=applied` works.
fn status_param<'de, D>(deserializer: D) -> Result<Option<JobStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One Kanban column.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub status: JobStatus,
    pub jobs: Vec<JobRecord>,
}

#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<Vec<JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self, filter: &JobFilter) -> Vec<JobRecord> {
        self.jobs
            .read()
            .await
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect()
    }

    /// Every record that counts toward the dashboard: all but archived.
    pub async fn active(&self) -> Vec<JobRecord> {
        self.list(&JobFilter::default()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<JobRecord, StoreError> {
        self.jobs
            .read()
            .await
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn add(&self, job: NewJob) -> Result<JobRecord, StoreError> {
        job.validate().map_err(StoreError::Invalid)?;
        let record = JobRecord::from_new(job);
        info!(
            "Added job {} ({} at {})",
            record.id, record.role, record.company
        );
        self.jobs.write().await.push(record.clone());
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, update: JobUpdate) -> Result<JobRecord, StoreError> {
        update.validate().map_err(StoreError::Invalid)?;
        self.modify(id, |job| {
            job.apply_update(update);
            Ok(())
        })
        .await
    }

    /// Moves a record to another column. No transition rules apply.
    pub async fn set_status(&self, id: Uuid, status: JobStatus) -> Result<JobRecord, StoreError> {
        self.modify(id, |job| {
            debug!("Job {} moved {} -> {}", job.id, job.status, status);
            job.status = status;
            job.touch();
            Ok(())
        })
        .await
    }

    /// Hides a record from the board and metrics without dropping it.
    pub async fn archive(&self, id: Uuid) -> Result<JobRecord, StoreError> {
        self.set_status(id, JobStatus::Archived).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let idx = jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or(StoreError::NotFound(id))?;
        jobs.remove(idx);
        info!("Deleted job {id}");
        Ok(())
    }

    pub async fn attach_document(&self, id: Uuid, doc_id: &str) -> Result<JobRecord, StoreError> {
        self.modify(id, |job| documents::attach(job, doc_id)).await
    }

    pub async fn detach_document(&self, id: Uuid, doc_id: &str) -> Result<JobRecord, StoreError> {
        self.modify(id, |job| {
            documents::detach(job, doc_id);
            Ok(())
        })
        .await
    }

    /// Non-archived records grouped by pipeline stage, insertion order kept.
    pub async fn board(&self) -> Vec<BoardColumn> {
        let jobs = self.jobs.read().await;
        JobStatus::PIPELINE
            .iter()
            .map(|&status| BoardColumn {
                status,
                jobs: jobs.iter().filter(|j| j.status == status).cloned().collect(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Loads the demo records shown on a fresh dashboard.
    pub async fn seed_samples(&self) {
        let samples = sample_jobs();
        let count = samples.len();
        let mut jobs = self.jobs.write().await;
        jobs.extend(samples.into_iter().map(JobRecord::from_new));
        info!("Seeded {count} sample jobs");
    }

    async fn modify<F>(&self, id: Uuid, f: F) -> Result<JobRecord, StoreError>
    where
        F: FnOnce(&mut JobRecord) -> Result<(), StoreError>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or(StoreError::NotFound(id))?;
        f(job)?;
        Ok(job.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    company: &str,
    role: &str,
    location: &str,
    status: JobStatus,
    salary: &str,
    source: &str,
    link: &str,
    date_applied: Option<(i32, u32, u32)>,
    contact: &str,
    notes: &str,
    docs: &[&str],
) -> NewJob {
    NewJob {
        company: company.to_string(),
        role: role.to_string(),
        location: location.to_string(),
        status,
        salary: salary.to_string(),
        source: source.to_string(),
        link: link.to_string(),
        date_applied: date_applied.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        contact: contact.to_string(),
        notes: notes.to_string(),
        documents: docs.iter().map(|d| d.to_string()).collect(),
    }
}

fn sample_jobs() -> Vec<NewJob> {
    vec![
        sample(
            "Google",
            "Senior Product Manager",
            "Mountain View, CA",
            JobStatus::Applied,
            "$150,000 - $180,000",
            "LinkedIn",
            "https://careers.google.com",
            Some((2025, 5, 10)),
            "John Smith, Recruiter",
            "Applied for the product team, focusing on AI initiatives",
            &["Resume-Tech-PM.pdf"],
        ),
        sample(
            "Microsoft",
            "Technical Program Manager",
            "Redmond, WA",
            JobStatus::Interview,
            "$140,000 - $170,000",
            "Company Website",
            "https://careers.microsoft.com",
            Some((2025, 5, 5)),
            "Sarah Johnson, HR",
            "First interview scheduled for May 20th",
            &["Resume-Tech-PM.pdf", "Cover-Letter-Microsoft.pdf"],
        ),
        sample(
            "Amazon",
            "Project Manager",
            "Seattle, WA",
            JobStatus::Saved,
            "$130,000 - $160,000",
            "Referral",
            "https://amazon.jobs",
            None,
            "",
            "Need to prepare tailored resume",
            &[],
        ),
        sample(
            "Apple",
            "Product Manager",
            "Cupertino, CA",
            JobStatus::Offer,
            "$160,000 - $190,000",
            "LinkedIn",
            "https://apple.com/careers",
            Some((2025, 4, 15)),
            "Michael Brown, Hiring Manager",
            "Received offer on May 15th, need to respond by May 22nd",
            &["Resume-Tech-PM.pdf", "Cover-Letter-Apple.pdf"],
        ),
        sample(
            "Netflix",
            "Technical Project Manager",
            "Los Gatos, CA",
            JobStatus::Applied,
            "$145,000 - $175,000",
            "Indeed",
            "https://jobs.netflix.com",
            Some((2025, 5, 12)),
            "",
            "Applied for the streaming platform team",
            &["Resume-Tech-PM.pdf"],
        ),
        sample(
            "Meta",
            "Product Manager",
            "Menlo Park, CA",
            JobStatus::Assignment,
            "$155,000 - $185,000",
            "LinkedIn",
            "https://careers.meta.com",
            Some((2025, 5, 1)),
            "Jessica Lee, Recruiter",
            "Need to complete product design assignment by May 25th",
            &["Resume-Tech-PM.pdf", "Cover-Letter-Meta.pdf"],
        ),
    ]
}
