mod groq_batch;
mod jobs;
mod keyword_only;

use tender_categorizer::prelude::*;

pub(crate) fn keyword_classifier() -> TenderClassifier {
    TenderCategorizer::keyword_only()
        .logging_enabled(false)
        .init()
        .unwrap()
}
