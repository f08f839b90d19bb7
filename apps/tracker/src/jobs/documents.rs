use serde::Serialize;

use crate::jobs::models::JobRecord;
use crate::jobs::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: DocumentKind,
}

const CATALOG: &[Document] = &[
    Document {
        id: "resume1",
        name: "General Resume",
        kind: DocumentKind::Resume,
    },
    Document {
        id: "resume2",
        name: "Tech Resume",
        kind: DocumentKind::Resume,
    },
    Document {
        id: "cover1",
        name: "General Cover Letter",
        kind: DocumentKind::CoverLetter,
    },
    Document {
        id: "cover2",
        name: "Tech Cover Letter",
        kind: DocumentKind::CoverLetter,
    },
];

/// Documents a job can be linked to.
pub fn catalog() -> &'static [Document] {
    CATALOG
}

pub fn find(doc_id: &str) -> Option<&'static Document> {
    CATALOG.iter().find(|d| d.id == doc_id)
}

/// Links a catalog document to the job. Already-linked ids are left alone.
pub fn attach(job: &mut JobRecord, doc_id: &str) -> Result<(), StoreError> {
    let doc = find(doc_id)
        .ok_or_else(|| StoreError::Invalid(format!("unknown document '{doc_id}'")))?;
    if !job.documents.iter().any(|d| d == doc.id) {
        job.documents.push(doc.id.to_string());
        job.touch();
    }
    Ok(())
}

pub fn detach(job: &mut JobRecord, doc_id: &str) {
    let before = job.documents.len();
    job.documents.retain(|d| d != doc_id);
    if job.documents.len() != before {
        job.touch();
    }
}
