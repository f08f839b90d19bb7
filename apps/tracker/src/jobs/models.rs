use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Lifecycle stage of an application. Moves are user-driven; any status may
/// follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interview,
    Assignment,
    Offer,
    Archived,
}

impl JobStatus {
    /// Board columns, in display order. `Archived` is never shown on the board.
    pub const PIPELINE: [JobStatus; 5] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Assignment,
        JobStatus::Offer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "Saved",
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Assignment => "Assignment",
            JobStatus::Offer => "Offer",
            JobStatus::Archived => "Archived",
        }
    }

    /// Interview, Assignment and Offer all imply the application got past screening.
    pub fn reached_interview(&self) -> bool {
        matches!(
            self,
            JobStatus::Interview | JobStatus::Assignment | JobStatus::Offer
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [JobStatus::Archived]
            .into_iter()
            .chain(JobStatus::PIPELINE)
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown job status '{s}'"))
    }
}

/// A single tracked application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: JobStatus,
    pub salary: String,
    pub source: String,
    pub link: String,
    pub date_applied: Option<NaiveDate>,
    pub contact: String,
    pub notes: String,
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a job. Only company and role are mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJob {
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: JobStatus,
    pub salary: String,
    pub source: String,
    pub link: String,
    #[serde(deserialize_with = "blank_date")]
    pub date_applied: Option<NaiveDate>,
    pub contact: String,
    pub notes: String,
    pub documents: Vec<String>,
}

/// Full replacement payload for an edit. Same shape as `NewJob`.
pub type JobUpdate = NewJob;

impl NewJob {
    /// Company and role must be present; everything else may be blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.company.trim().is_empty() {
            return Err("company cannot be empty".to_string());
        }
        if self.role.trim().is_empty() {
            return Err("role cannot be empty".to_string());
        }
        Ok(())
    }
}

impl JobRecord {
    pub fn from_new(job: NewJob) -> Self {
        let now = Utc::now();
        JobRecord {
            id: Uuid::new_v4(),
            company: job.company.trim().to_string(),
            role: job.role.trim().to_string(),
            location: job.location,
            status: job.status,
            salary: job.salary,
            source: job.source,
            link: job.link,
            date_applied: job.date_applied,
            contact: job.contact,
            notes: job.notes,
            documents: dedup_documents(job.documents),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field. Id and creation time are kept.
    pub fn apply_update(&mut self, update: JobUpdate) {
        self.company = update.company.trim().to_string();
        self.role = update.role.trim().to_string();
        self.location = update.location;
        self.status = update.status;
        self.salary = update.salary;
        self.source = update.source;
        self.link = update.link;
        self.date_applied = update.date_applied;
        self.contact = update.contact;
        self.notes = update.notes;
        self.documents = dedup_documents(update.documents);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn dedup_documents(documents: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(documents.len());
    for doc in documents {
        if !doc.trim().is_empty() && !out.contains(&doc) {
            out.push(doc);
        }
    }
    out
}

/// Dashboard forms submit `""` for an untouched date field.
fn blank_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
