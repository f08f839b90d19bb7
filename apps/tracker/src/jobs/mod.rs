// Job records: the in-memory list, its board view, metrics and document links.

pub mod documents;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod store;
