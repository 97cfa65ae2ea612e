pub mod config;
pub mod error;
pub mod models;
pub mod text;
pub mod llm;
pub mod airtable;
pub mod pipeline;
pub mod storage;

pub use config::{AirtableConfig, ClassifierConfig, OpenAiConfig};
pub use error::{Error, Result};
pub use airtable::{AirtableApi, AirtableClient};
pub use llm::{CompletionProvider, OpenAiProvider, RetryPolicy};
pub use models::{Category, ClassifiedDocument, ClassifiedItem, CommentRecord};
pub use pipeline::{Aggregator, ClassifierPipeline, Uploader};
