use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::models::document::serialize_votes;
use crate::models::{Category, ClassifiedItem};

/// One remote row, keyed by the table's field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFields {
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Votes", serialize_with = "serialize_votes")]
    pub votes: f64,
    #[serde(rename = "Hearted")]
    pub hearted: bool,
    #[serde(rename = "Has_Replies")]
    pub has_replies: bool,
    #[serde(rename = "Last_Updated", serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl RecordFields {
    pub fn new(category: Category, item: &ClassifiedItem, last_updated: DateTime<Utc>) -> Self {
        Self {
            category,
            content: item.content.clone(),
            author: item.author.clone(),
            votes: item.votes,
            hearted: item.hearted,
            has_replies: item.has_replies,
            last_updated,
        }
    }
}

/// Body of `POST /{base}/{table}`.
#[derive(Debug, Serialize)]
pub struct CreateRecord<'a> {
    pub fields: &'a RecordFields,
}
