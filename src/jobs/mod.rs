//! Store-facing operations built on the classifier.

pub mod alerts;
pub mod ingest;
pub mod recategorize;
