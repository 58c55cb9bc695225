pub use crate::{
    batch::{BatchConfig, BatchItem, TenderId},
    categories::Category,
    classifier::{
        Classification,
        ClassificationInput,
        ClassificationOutcome,
        RemoteClassifier,
        TenderClassifier,
    },
    fallback::KeywordTable,
    jobs::{
        alerts::{send_daily_alerts, validate_interest, AlertReport},
        ingest::ingest_manual_tender,
        recategorize::{recategorize_uncategorized, RecategorizeReport},
    },
    llms::api::{groq::GroqConfig, LlmApiConfigTrait},
    logging::{LoggingConfig, LoggingConfigTrait},
    store::{memory::InMemoryTenderStore, NewTender, Subscriber, TenderRecord, TenderStore},
    TenderCategorizer,
};
