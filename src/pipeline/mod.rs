pub mod aggregator;
pub mod classifier;
pub mod uploader;

pub use aggregator::{Aggregator, CombineSummary};
pub use classifier::{ClassifierPipeline, ClassifySummary, FileOutcome};
pub use uploader::{SchemaReady, SchemaStatus, UploadOutcome, UploadSummary, Uploader};
