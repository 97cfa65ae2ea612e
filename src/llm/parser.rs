use serde_json::Value;
use thiserror::Error;

use crate::models::{Category, ClassifiedDocument};

pub const MIN_CONTENT_CHARS: usize = 10;
pub const MAX_CONTENT_CHARS: usize = 500;

/// Lowercase fragments that betray template text echoed back by the model.
pub const PLACEHOLDER_INDICATORS: &[&str] =
    &["example", "placeholder", "idea1", "use case1", "question1"];

const ITEM_FIELDS: [&str; 5] = ["content", "author", "votes", "hearted", "has_replies"];

/// First rule a model response broke. One broken item rejects the whole response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("response is not a JSON object")]
    NoJsonObject,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("missing bucket {0}")]
    MissingBucket(Category),

    #[error("bucket {0} is not an array")]
    BucketNotArray(Category),

    #[error("{category}[{index}] is not an object")]
    ItemNotObject { category: Category, index: usize },

    #[error("{category}[{index}] has no field {field}")]
    MissingField {
        category: Category,
        index: usize,
        field: &'static str,
    },

    #[error("{category}[{index}].{field} has the wrong type")]
    WrongType {
        category: Category,
        index: usize,
        field: &'static str,
    },

    #[error("{category}[{index}] content is {len} chars, expected 10-500")]
    ContentLength {
        category: Category,
        index: usize,
        len: usize,
    },

    #[error("{category}[{index}] content contains placeholder text {indicator:?}")]
    Placeholder {
        category: Category,
        index: usize,
        indicator: &'static str,
    },
}

/// Strips markdown fencing, keeping the span from the first `{` to the last `}`.
pub fn clean_model_output(output: &str) -> &str {
    let output = output.trim();

    if output.starts_with("```") {
        if let (Some(start), Some(end)) = (output.find('{'), output.rfind('}')) {
            if start < end {
                return output[start..=end].trim();
            }
        }
    }

    output
}

fn field_has_type(field: &str, value: &Value) -> bool {
    match field {
        "content" | "author" => value.is_string(),
        "votes" => value.is_number(),
        _ => value.is_boolean(),
    }
}

fn validate_item(category: Category, index: usize, item: &Value) -> Result<(), ValidationError> {
    let object = item
        .as_object()
        .ok_or(ValidationError::ItemNotObject { category, index })?;

    for field in ITEM_FIELDS {
        let value = object
            .get(field)
            .ok_or(ValidationError::MissingField { category, index, field })?;
        if !field_has_type(field, value) {
            return Err(ValidationError::WrongType { category, index, field });
        }
    }

    let content = object
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();

    let len = content.chars().count();
    if !(MIN_CONTENT_CHARS..=MAX_CONTENT_CHARS).contains(&len) {
        return Err(ValidationError::ContentLength { category, index, len });
    }

    let lowered = content.to_lowercase();
    if let Some(indicator) = PLACEHOLDER_INDICATORS
        .iter()
        .copied()
        .find(|indicator| lowered.contains(indicator))
    {
        return Err(ValidationError::Placeholder {
            category,
            index,
            indicator,
        });
    }

    Ok(())
}

/// Checks the four buckets and every item in them.
pub fn validate_json_structure(value: &Value) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NoJsonObject)?;

    for category in Category::ALL {
        let bucket = object
            .get(category.as_str())
            .ok_or(ValidationError::MissingBucket(category))?
            .as_array()
            .ok_or(ValidationError::BucketNotArray(category))?;

        for (index, item) in bucket.iter().enumerate() {
            validate_item(category, index, item)?;
        }
    }

    Ok(())
}

/// Turns raw model text into a validated document.
pub fn parse_classified_response(output: &str) -> Result<ClassifiedDocument, ValidationError> {
    let cleaned = clean_model_output(output);
    if !(cleaned.starts_with('{') && cleaned.ends_with('}')) {
        return Err(ValidationError::NoJsonObject);
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    validate_json_structure(&value)?;

    serde_json::from_value(value).map_err(|e| ValidationError::InvalidJson(e.to_string()))
}
