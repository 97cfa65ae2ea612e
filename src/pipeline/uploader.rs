use std::path::Path;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::airtable::{missing_fields, required_fields, AirtableApi, FieldDescriptor, RecordFields};
use crate::error::{Error, Result};
use crate::models::ClassifiedDocument;
use crate::storage::read_document;

/// Proof that the remote table has every required field.
///
/// Only a completed schema sync hands one out, and [`Uploader::upload`] needs it.
#[derive(Debug)]
pub struct SchemaReady {
    _private: (),
}

#[derive(Debug)]
pub enum SchemaStatus {
    Ready(SchemaReady),
    Missing(Vec<FieldDescriptor>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub successful: usize,
    pub total: usize,
}

impl std::fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.successful, self.total)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The user did not allow the missing fields to be created.
    Declined,
    Uploaded(UploadSummary),
}

pub struct Uploader<A: AirtableApi> {
    api: A,
}

impl<A: AirtableApi> Uploader<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Fetches the live schema and diffs the target table against the required set.
    pub async fn check_schema(&self) -> Result<SchemaStatus> {
        let schema = self.api.get_base_schema().await?;
        let table_id = self.api.table_id();
        let table = schema
            .table(table_id)
            .ok_or_else(|| Error::Airtable(format!("Table {} not found in schema", table_id)))?;

        tracing::info!("Table name: {}", table.name);
        for field in &table.fields {
            tracing::info!("- {}: {}", field.name, field.field_type);
        }

        let missing = missing_fields(&required_fields(), table);
        if missing.is_empty() {
            return Ok(SchemaStatus::Ready(SchemaReady { _private: () }));
        }

        tracing::info!("Missing fields that need to be added:");
        for field in &missing {
            tracing::info!("- {} ({})", field.name, field.kind.api_type());
        }
        Ok(SchemaStatus::Missing(missing))
    }

    /// Creates the fields in order, stopping at the first failure.
    pub async fn create_fields(&self, missing: &[FieldDescriptor]) -> Result<SchemaReady> {
        for field in missing {
            if let Err(e) = self.api.create_field(field).await {
                tracing::error!("Failed to create field {}: {}", field.name, e);
                return Err(e);
            }
            tracing::info!("Successfully created field: {}", field.name);
        }

        tracing::info!("All fields created successfully");
        Ok(SchemaReady { _private: () })
    }

    /// Posts one row per item. A failed row is counted and the rest carry on.
    pub async fn upload(&self, _ready: &SchemaReady, document: &ClassifiedDocument) -> UploadSummary {
        let pb = ProgressBar::new(document.total_items() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        let mut summary = UploadSummary::default();

        for (category, item) in document.iter() {
            let fields = RecordFields::new(category, item, Utc::now());
            summary.total += 1;

            match self.api.create_record(&fields).await {
                Ok(()) => summary.successful += 1,
                Err(e) => tracing::warn!("Error creating {} record: {}", category, e),
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        tracing::info!(
            "Upload complete! Successfully uploaded {} of {} records",
            summary.successful,
            summary.total
        );
        summary
    }

    /// Schema sync, then upload of the document at `path`.
    ///
    /// `confirm` is asked once, only when fields are missing. The document is
    /// read after the schema is complete.
    pub async fn run(
        &self,
        path: &Path,
        confirm: impl FnOnce(&[FieldDescriptor]) -> bool,
    ) -> Result<UploadOutcome> {
        let ready = match self.check_schema().await? {
            SchemaStatus::Ready(ready) => ready,
            SchemaStatus::Missing(missing) => {
                if !confirm(&missing) {
                    return Ok(UploadOutcome::Declined);
                }
                self.create_fields(&missing).await?
            }
        };

        let document = read_document(path)?;
        Ok(UploadOutcome::Uploaded(self.upload(&ready, &document).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::{BaseSchema, TableSchema};
    use crate::airtable::schema::FieldSchema;
    use crate::models::{Category, ClassifiedItem};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAirtable {
        existing: Vec<&'static str>,
        fail_schema: bool,
        fail_field: Option<&'static str>,
        fail_content: Option<&'static str>,
        created_fields: Mutex<Vec<String>>,
        records: Mutex<Vec<RecordFields>>,
    }

    #[async_trait]
    impl AirtableApi for FakeAirtable {
        async fn get_base_schema(&self) -> Result<BaseSchema> {
            if self.fail_schema {
                return Err(Error::Airtable("Failed to get schema: 401".to_string()));
            }
            Ok(BaseSchema {
                tables: vec![TableSchema {
                    id: "tblComments".to_string(),
                    name: "Comments".to_string(),
                    fields: self
                        .existing
                        .iter()
                        .map(|name| FieldSchema {
                            id: None,
                            name: name.to_string(),
                            field_type: "singleLineText".to_string(),
                        })
                        .collect(),
                }],
            })
        }

        async fn create_field(&self, field: &FieldDescriptor) -> Result<()> {
            if self.fail_field == Some(field.name.as_str()) {
                return Err(Error::Airtable("422".to_string()));
            }
            self.created_fields.lock().unwrap().push(field.name.clone());
            Ok(())
        }

        async fn create_record(&self, fields: &RecordFields) -> Result<()> {
            if self.fail_content == Some(fields.content.as_str()) {
                return Err(Error::Airtable("500".to_string()));
            }
            self.records.lock().unwrap().push(fields.clone());
            Ok(())
        }

        fn table_id(&self) -> &str {
            "tblComments"
        }
    }

    const ALL_FIELDS: [&str; 7] = [
        "Category", "Content", "Author", "Votes", "Hearted", "Has_Replies", "Last_Updated",
    ];

    fn item(content: &str) -> ClassifiedItem {
        ClassifiedItem {
            content: content.to_string(),
            author: "@a".to_string(),
            votes: 1.0,
            hearted: false,
            has_replies: false,
        }
    }

    fn document_file() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined_comments.json");
        let mut doc = ClassifiedDocument::empty();
        doc.tutorial_ideas = vec![item("first tutorial idea"), item("second tutorial idea")];
        doc.problem_statements = vec![item("a problem statement")];
        crate::storage::write_document(&path, &doc).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_complete_schema_uploads_everything() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable {
            existing: ALL_FIELDS.to_vec(),
            ..Default::default()
        });

        let outcome = uploader
            .run(&path, |_| panic!("no confirmation needed"))
            .await
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Uploaded(UploadSummary { successful: 3, total: 3 }));
        let records = uploader.api.records.lock().unwrap();
        assert_eq!(records[0].category, Category::TutorialIdeas);
        assert_eq!(records[2].category, Category::ProblemStatements);
    }

    #[tokio::test]
    async fn test_case_differing_field_counts_as_missing() {
        let mut existing: Vec<&'static str> = ALL_FIELDS[1..].to_vec();
        existing.push("category");
        let uploader = Uploader::new(FakeAirtable {
            existing,
            ..Default::default()
        });

        match uploader.check_schema().await.unwrap() {
            SchemaStatus::Missing(missing) => {
                let names: Vec<_> = missing.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, ["Category"]);
            }
            SchemaStatus::Ready(_) => panic!("exact-name match expected"),
        }
    }

    #[tokio::test]
    async fn test_declined_confirmation_uploads_nothing() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable::default());

        let outcome = uploader.run(&path, |missing| {
            assert_eq!(missing.len(), 7);
            false
        })
        .await
        .unwrap();

        assert_eq!(outcome, UploadOutcome::Declined);
        assert!(uploader.api.created_fields.lock().unwrap().is_empty());
        assert!(uploader.api.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_field_creation_is_fail_fast_and_blocks_upload() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable {
            existing: vec!["Category", "Content"],
            fail_field: Some("Votes"),
            ..Default::default()
        });

        let result = uploader.run(&path, |_| true).await;

        assert!(matches!(result, Err(Error::Airtable(_))));
        assert_eq!(*uploader.api.created_fields.lock().unwrap(), ["Author"]);
        assert!(uploader.api.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_fields_then_upload() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable::default());

        let outcome = uploader.run(&path, |_| true).await.unwrap();

        assert_eq!(uploader.api.created_fields.lock().unwrap().len(), 7);
        assert_eq!(outcome, UploadOutcome::Uploaded(UploadSummary { successful: 3, total: 3 }));
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_the_rest() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable {
            existing: ALL_FIELDS.to_vec(),
            fail_content: Some("second tutorial idea"),
            ..Default::default()
        });

        let outcome = uploader.run(&path, |_| true).await.unwrap();

        let summary = UploadSummary { successful: 2, total: 3 };
        assert_eq!(outcome, UploadOutcome::Uploaded(summary));
        assert_eq!(summary.to_string(), "2/3");
    }

    #[tokio::test]
    async fn test_schema_fetch_failure_aborts() {
        let (_dir, path) = document_file();
        let uploader = Uploader::new(FakeAirtable {
            fail_schema: true,
            ..Default::default()
        });

        assert!(uploader.run(&path, |_| true).await.is_err());
        assert!(uploader.api.records.lock().unwrap().is_empty());
    }
}
